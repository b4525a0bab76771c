//! Trello REST client.

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use medcall_core::board::{BoardError, BoardResult, CardBoard, CardRequest, CreatedCard};

use crate::config::BoardConfig;

#[derive(Debug, Deserialize)]
struct BoardList {
    id: String,
}

#[derive(Debug, Deserialize)]
struct BoardLabel {
    id: String,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct TrelloCard {
    id: String,
}

/// Blocking Trello client. New cards always land on the board's first list,
/// which the intake team keeps as the incoming column.
pub struct TrelloClient {
    config: BoardConfig,
    http: Client,
}

impl TrelloClient {
    pub fn new(config: BoardConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}{}?key={}&token={}",
            self.config.base_url, path, self.config.api_key, self.config.token
        )
    }

    fn transport(e: reqwest::Error) -> BoardError {
        BoardError::Transport(e.to_string())
    }

    fn intake_list(&self) -> BoardResult<String> {
        let lists: Vec<BoardList> = self
            .http
            .get(self.url(&format!("/boards/{}/lists", self.config.board_id)))
            .send()
            .map_err(Self::transport)?
            .error_for_status()
            .map_err(Self::transport)?
            .json()
            .map_err(Self::transport)?;

        lists
            .into_iter()
            .next()
            .map(|list| list.id)
            .ok_or(BoardError::NoLists)
    }

    /// Find the label named after the branch, creating it if missing.
    fn ensure_label(&self, name: &str) -> BoardResult<String> {
        let labels: Vec<BoardLabel> = self
            .http
            .get(self.url(&format!("/boards/{}/labels", self.config.board_id)))
            .send()
            .map_err(Self::transport)?
            .error_for_status()
            .map_err(Self::transport)?
            .json()
            .map_err(Self::transport)?;

        if let Some(label) = labels.into_iter().find(|l| l.name == name) {
            return Ok(label.id);
        }

        let created: BoardLabel = self
            .http
            .post(self.url("/labels"))
            .json(&json!({
                "idBoard": self.config.board_id,
                "name": name,
                "color": "blue",
            }))
            .send()
            .map_err(Self::transport)?
            .error_for_status()
            .map_err(Self::transport)?
            .json()
            .map_err(Self::transport)?;
        Ok(created.id)
    }
}

impl CardBoard for TrelloClient {
    fn create_card(&self, request: &CardRequest) -> BoardResult<CreatedCard> {
        let list_id = self.intake_list()?;
        let label_id = self.ensure_label(&request.label)?;

        let card: TrelloCard = self
            .http
            .post(self.url("/cards"))
            .json(&json!({
                "idList": list_id,
                "name": request.title,
                "desc": request.description,
                "idLabels": label_id,
            }))
            .send()
            .map_err(Self::transport)?
            .error_for_status()
            .map_err(Self::transport)?
            .json()
            .map_err(Self::transport)?;

        info!(
            card_id = %card.id,
            feedback_id = %request.feedback_id,
            "board card created"
        );

        Ok(CreatedCard {
            card_id: card.id,
            list_id,
            board_id: self.config.board_id.clone(),
        })
    }
}
