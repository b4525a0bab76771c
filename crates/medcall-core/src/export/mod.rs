//! Management report export.

mod summary;

pub use summary::{BranchSummary, SummaryExporter, SummaryReport};
