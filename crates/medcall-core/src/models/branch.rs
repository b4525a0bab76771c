//! Canonical clinic branches.

use serde::{Deserialize, Serialize};

/// A clinic branch. The set is closed: free-text branch labels from
/// spreadsheets and request payloads are normalized against these canonical
/// names by [`crate::resolver::BranchMatcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Branch {
    #[serde(rename = "ТАШКЕНТ")]
    Tashkent,
    #[serde(rename = "ЧИЛАНЗАР")]
    Chilanzar,
    #[serde(rename = "ЮНУСАБАД")]
    Yunusabad,
    #[serde(rename = "САМАРКАНД")]
    Samarkand,
    #[serde(rename = "БУХАРА")]
    Bukhara,
    #[serde(rename = "ФЕРГАНА")]
    Fergana,
    #[serde(rename = "АНДИЖАН")]
    Andijan,
}

impl Branch {
    /// All canonical branches, in report order.
    pub const ALL: [Branch; 7] = [
        Branch::Tashkent,
        Branch::Chilanzar,
        Branch::Yunusabad,
        Branch::Samarkand,
        Branch::Bukhara,
        Branch::Fergana,
        Branch::Andijan,
    ];

    /// Canonical display name, as stored and as printed on cards/reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Branch::Tashkent => "ТАШКЕНТ",
            Branch::Chilanzar => "ЧИЛАНЗАР",
            Branch::Yunusabad => "ЮНУСАБАД",
            Branch::Samarkand => "САМАРКАНД",
            Branch::Bukhara => "БУХАРА",
            Branch::Fergana => "ФЕРГАНА",
            Branch::Andijan => "АНДИЖАН",
        }
    }

    /// Parse an exact canonical name. Fuzzy input goes through
    /// [`crate::resolver::BranchMatcher`] instead.
    pub fn parse(s: &str) -> Option<Branch> {
        Branch::ALL.iter().copied().find(|b| b.as_str() == s)
    }
}

impl std::fmt::Display for Branch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
