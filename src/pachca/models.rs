use serde::{Deserialize, Serialize};

use crate::types::MessageId;

const BODY_PREVIEW_LIMIT: usize = 256;
const ENTITY_TYPE: &str = "discussion";

/// Result of delivering one message.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Delivery {
    Created(MessageId),
    Updated(MessageId),
    /// The message we were asked to edit no longer exists.
    Stale,
}

#[derive(Debug, Serialize)]
pub(crate) struct MessageRequest<'a> {
    pub(crate) message: MessageBody<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct MessageBody<'a> {
    pub(crate) entity_type: &'static str,
    pub(crate) entity_id: u64,
    pub(crate) chat_id: u64,
    pub(crate) content: &'a str,
}

impl<'a> MessageRequest<'a> {
    pub(crate) const fn discussion(chat_id: u64, content: &'a str) -> Self {
        Self {
            message: MessageBody {
                entity_type: ENTITY_TYPE,
                entity_id: chat_id,
                chat_id,
                content,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessageEnvelope {
    #[serde(default)]
    pub(crate) data: Option<MessageData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessageData {
    #[serde(default)]
    pub(crate) id: Option<MessageId>,
}

pub(crate) fn body_preview(body: &[u8]) -> String {
    if body.is_empty() {
        return "<empty>".to_string();
    }
    let end = body.len().min(BODY_PREVIEW_LIMIT);
    let mut preview = String::from_utf8_lossy(&body[..end]).to_string();
    if body.len() > BODY_PREVIEW_LIMIT {
        preview.push_str("...");
    }
    preview.replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::{MessageEnvelope, body_preview};
    use crate::types::MessageId;

    #[test]
    fn envelope_reads_nested_id() {
        let envelope: MessageEnvelope =
            serde_json::from_str(r#"{"data":{"id":194275,"content":"hi","chat_id":7}}"#).unwrap();
        assert_eq!(
            envelope.data.and_then(|d| d.id),
            Some(MessageId::Numeric(194_275))
        );
    }

    #[test]
    fn preview_is_single_line_and_bounded() {
        let body = format!("line one\n{}", "x".repeat(400));
        let preview = body_preview(body.as_bytes());
        assert!(preview.starts_with("line one\\nxxx"));
        assert!(preview.ends_with("..."));
        assert_eq!(body_preview(b""), "<empty>");
    }
}
