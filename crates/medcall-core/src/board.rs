//! Card-board integration contract.
//!
//! The core renders a [`CardRequest`] for every committed complaint and
//! queues it in the outbox. The transport lives in a separate crate behind
//! the [`CardBoard`] trait so the core never touches HTTP.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Feedback, Message, MessageKind};

#[derive(Error, Debug)]
pub enum BoardError {
    #[error("board configuration error: {0}")]
    Config(String),

    #[error("board has no lists")]
    NoLists,

    #[error("board transport error: {0}")]
    Transport(String),
}

pub type BoardResult<T> = Result<T, BoardError>;

/// A fully rendered card, ready for any board transport.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardRequest {
    pub feedback_id: String,
    pub title: String,
    pub description: String,
    pub label: String,
}

/// Identifiers of a card the board actually created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedCard {
    pub card_id: String,
    pub list_id: String,
    pub board_id: String,
}

/// External card board. Implementations must be safe to call outside any
/// database transaction.
pub trait CardBoard {
    fn create_card(&self, request: &CardRequest) -> BoardResult<CreatedCard>;
}

impl CardRequest {
    /// Render the card for a complaint, in the format the intake team reads.
    pub fn for_feedback(feedback: &Feedback, messages: &[Message], branch_label: &str) -> Self {
        let category = feedback.category.as_str();

        let texts: Vec<String> = messages
            .iter()
            .filter(|m| m.kind == MessageKind::Text)
            .enumerate()
            .map(|(i, m)| format!("{}. {}", i + 1, m.body.as_deref().unwrap_or("")))
            .collect();
        let text_block = if texts.is_empty() {
            "нет текста".to_string()
        } else {
            texts.join("\n")
        };

        let voices: Vec<String> = messages
            .iter()
            .filter(|m| m.kind == MessageKind::Voice)
            .enumerate()
            .map(|(i, m)| {
                format!("[🔊 Аудио {}]({})", i + 1, m.media_url.as_deref().unwrap_or(""))
            })
            .collect();

        let mut lines = vec![
            "📋 Жалоба от пациента".to_string(),
            String::new(),
            format!("👤 ФИО: {}", feedback.display_name()),
            format!("📞 Телефон: {}", feedback.phone_number),
            format!("🏥 Филиал: {branch_label}"),
            format!("📂 Категория: {category}"),
            format!("🗂️ Статус: {}", feedback.status),
            String::new(),
            "📝 Текст:".to_string(),
            text_block,
        ];
        if !voices.is_empty() {
            lines.push(String::new());
            lines.push(voices.join("\n"));
        }
        lines.push(String::new());
        lines.push(format!("📅 Дата: {}", feedback.created_at));

        Self {
            feedback_id: feedback.id.clone(),
            title: format!("{branch_label} — {category}"),
            description: lines.join("\n"),
            label: branch_label.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FeedbackCategory;

    fn sample_feedback() -> Feedback {
        Feedback::new(
            Some("Алишер".into()),
            Some("Каримов".into()),
            FeedbackCategory::Complaint,
            "+998901234567".into(),
            "op-1".into(),
            None,
        )
    }

    #[test]
    fn test_render_with_text_and_voice() {
        let feedback = sample_feedback();
        let messages = vec![
            Message::text("+998901234567".into(), "Очень долго ждали врача".into()),
            Message::voice("+998901234567".into(), "https://cdn/audio/1.ogg".into()),
        ];

        let card = CardRequest::for_feedback(&feedback, &messages, "ТАШКЕНТ");
        assert_eq!(card.title, "ТАШКЕНТ — COMPLAINT");
        assert_eq!(card.label, "ТАШКЕНТ");
        assert!(card.description.contains("👤 ФИО: Алишер Каримов"));
        assert!(card.description.contains("📞 Телефон: +998901234567"));
        assert!(card.description.contains("1. Очень долго ждали врача"));
        assert!(card
            .description
            .contains("[🔊 Аудио 1](https://cdn/audio/1.ogg)"));
    }

    #[test]
    fn test_render_without_messages() {
        let feedback = sample_feedback();
        let card = CardRequest::for_feedback(&feedback, &[], "БУХАРА");
        assert!(card.description.contains("нет текста"));
        assert!(!card.description.contains("🔊"));
    }

    #[test]
    fn test_anonymous_name_placeholder() {
        let mut feedback = sample_feedback();
        feedback.first_name = None;
        feedback.last_name = None;
        let card = CardRequest::for_feedback(&feedback, &[], "ТАШКЕНТ");
        assert!(card.description.contains("👤 ФИО: Не указано"));
    }

    #[test]
    fn test_round_trips_through_json() {
        let card = CardRequest::for_feedback(&sample_feedback(), &[], "ТАШКЕНТ");
        let json = serde_json::to_string(&card).unwrap();
        let back: CardRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, card);
    }
}
