use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// Identifier of a Pachca message.
///
/// The API hands out integers, but older cache files may carry them as
/// strings; both shapes are accepted and written back as they were read.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MessageId {
    Numeric(u64),
    Text(String),
}

impl Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

impl MessageId {
    /// An empty or whitespace-only text id does not point at any message.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(id) if id.trim().is_empty())
    }
}

/// One alert as handed over by a Zabbix media type.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Alert {
    pub subject: String,
    pub body: String,
    pub trigger_id: String,
    pub event_id: String,
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::MessageId;

    #[test]
    fn message_id_accepts_numbers_and_strings() {
        let numeric: MessageId = serde_json::from_str("42").unwrap();
        let text: MessageId = serde_json::from_str(r#""42""#).unwrap();
        assert_eq!(numeric, MessageId::Numeric(42));
        assert_eq!(text, MessageId::Text("42".to_string()));
        assert_eq!(numeric.to_string(), text.to_string());
    }

    #[test]
    fn only_empty_text_ids_are_blank() {
        assert!(MessageId::Text(String::new()).is_blank());
        assert!(MessageId::Text(" ".to_string()).is_blank());
        assert!(!MessageId::Text("17".to_string()).is_blank());
        assert!(!MessageId::Numeric(0).is_blank());
    }

    #[test]
    fn message_id_rejects_other_shapes() {
        assert!(serde_json::from_str::<MessageId>("[1]").is_err());
        assert!(serde_json::from_str::<MessageId>("null").is_err());
    }
}
