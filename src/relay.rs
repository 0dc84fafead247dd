//! One alert in, one Pachca message created or edited, cache brought up to date.

use std::fmt::{self, Display};

use tracing::{debug, info};

use crate::Result;
use crate::cache::MessageCache;
use crate::config::Config;
use crate::format;
use crate::pachca::{Delivery, PachcaClient};
use crate::types::{Alert, MessageId};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    Created(MessageId),
    Updated(MessageId),
    /// The cached message was gone remotely and a new one took its place.
    Recreated { stale: MessageId, id: MessageId },
}

impl Outcome {
    #[must_use]
    pub const fn message_id(&self) -> &MessageId {
        match self {
            Self::Created(id) | Self::Updated(id) | Self::Recreated { id, .. } => id,
        }
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created(id) => write!(f, "Message sent: {id}"),
            Self::Updated(id) => write!(f, "Message updated: {id}"),
            Self::Recreated { stale, id } => write!(f, "Message recreated: {id} (was {stale})"),
        }
    }
}

/// Forward `alert` to `chat_id` and record the resulting message.
///
/// The cache is rewritten only after the remote call succeeded.
///
/// # Errors
///
/// Fails when the cache cannot be prepared or saved, or when Pachca rejects
/// the request for any reason other than a vanished message.
pub async fn relay(
    config: &Config,
    client: &PachcaClient,
    chat_id: u64,
    alert: &Alert,
) -> Result<Outcome> {
    let cache = MessageCache::new(&config.cache_path);
    cache.ensure()?;
    let mut messages = cache.read();

    let text = format::render(alert, &config.zabbix_url);
    let known = messages
        .get(&alert.event_id)
        .filter(|id| !id.is_blank())
        .cloned();
    debug!(
        event_id = %alert.event_id,
        known = ?known,
        resolved = format::is_resolved(alert),
        "relaying alert"
    );

    let delivery = client.dispatch(chat_id, &text, known.as_ref()).await?;
    let outcome = match (delivery, known) {
        (Delivery::Updated(id), _) => Outcome::Updated(id),
        (Delivery::Created(id), _) => {
            messages.insert(alert.event_id.clone(), id.clone());
            Outcome::Created(id)
        }
        (Delivery::Stale, stale) => {
            let id = client.create_message(chat_id, &text).await?;
            messages.insert(alert.event_id.clone(), id.clone());
            match stale {
                Some(stale) => Outcome::Recreated { stale, id },
                None => Outcome::Created(id),
            }
        }
    };

    cache.write(&messages)?;
    info!(event_id = %alert.event_id, id = %outcome.message_id(), "cache updated");
    Ok(outcome)
}
