//! Board credentials and endpoints.

use medcall_core::board::{BoardError, BoardResult};

const DEFAULT_BASE_URL: &str = "https://api.trello.com/1";

/// Everything the client needs to talk to one board. Built once at startup
/// and injected; nothing here reads the environment after construction.
#[derive(Debug, Clone)]
pub struct BoardConfig {
    pub api_key: String,
    pub token: String,
    pub board_id: String,
    pub base_url: String,
}

impl BoardConfig {
    pub fn new(api_key: String, token: String, board_id: String) -> Self {
        Self {
            api_key,
            token,
            board_id,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Read the configuration from `TRELLO_KEY`, `TRELLO_TOKEN` and
    /// `TRELLO_BOARD_ID`.
    pub fn from_env() -> BoardResult<Self> {
        let read = |name: &str| {
            std::env::var(name)
                .map_err(|_| BoardError::Config(format!("missing environment variable {name}")))
        };
        Ok(Self::new(
            read("TRELLO_KEY")?,
            read("TRELLO_TOKEN")?,
            read("TRELLO_BOARD_ID")?,
        ))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BoardConfig::new("key".into(), "token".into(), "board".into());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_base_url_override() {
        let config = BoardConfig::new("key".into(), "token".into(), "board".into())
            .with_base_url("http://localhost:8080/1");
        assert_eq!(config.base_url, "http://localhost:8080/1");
    }
}
