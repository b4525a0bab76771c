//! Inbound message pool models.
//!
//! Messages arrive through the messaging-webhook collaborator and sit in the
//! pool as `Temporary` until a complaint claims them. Claiming is
//! irreversible: a `Claimed` message belongs to exactly one feedback.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKind {
    Text,
    Voice,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Text => "TEXT",
            MessageKind::Voice => "VOICE",
        }
    }

    pub fn parse(s: &str) -> Option<MessageKind> {
        match s {
            "TEXT" => Some(MessageKind::Text),
            "VOICE" => Some(MessageKind::Voice),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageStatus {
    Temporary,
    Claimed,
}

impl MessageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageStatus::Temporary => "TEMPORARY",
            MessageStatus::Claimed => "CLAIMED",
        }
    }

    pub fn parse(s: &str) -> Option<MessageStatus> {
        match s {
            "TEMPORARY" => Some(MessageStatus::Temporary),
            "CLAIMED" => Some(MessageStatus::Claimed),
            _ => None,
        }
    }
}

/// One inbound message from the messaging channel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub id: String,
    pub kind: MessageKind,
    /// Sender identifier as reported by the messaging collaborator.
    pub sender: String,
    /// Text body (text messages).
    pub body: Option<String>,
    /// Streamable media URL (voice messages).
    pub media_url: Option<String>,
    pub status: MessageStatus,
    pub feedback_id: Option<String>,
    pub created_at: String,
}

impl Message {
    /// A pooled text message awaiting a claim.
    pub fn text(sender: String, body: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind: MessageKind::Text,
            sender,
            body: Some(body),
            media_url: None,
            status: MessageStatus::Temporary,
            feedback_id: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// A pooled voice message awaiting a claim.
    pub fn voice(sender: String, media_url: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind: MessageKind::Voice,
            sender,
            body: None,
            media_url: Some(media_url),
            status: MessageStatus::Temporary,
            feedback_id: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_message_defaults() {
        let msg = Message::text("+998901234567".into(), "Жалоба на очередь".into());
        assert_eq!(msg.kind, MessageKind::Text);
        assert_eq!(msg.status, MessageStatus::Temporary);
        assert!(msg.media_url.is_none());
        assert!(msg.feedback_id.is_none());
    }

    #[test]
    fn test_voice_message_defaults() {
        let msg = Message::voice("+998901234567".into(), "https://host/voice/1".into());
        assert_eq!(msg.kind, MessageKind::Voice);
        assert!(msg.body.is_none());
        assert_eq!(msg.media_url.as_deref(), Some("https://host/voice/1"));
    }
}
