use reqwest::{Method, StatusCode};
use tracing::{info, warn};
use url::Url;

use crate::Result;
use crate::error::PachcaError;
use crate::types::MessageId;

use super::PachcaClient;
use super::client::Reply;
use super::models::{Delivery, MessageRequest};

impl PachcaClient {
    /// Post `text` to the chat, or edit `known` in place when given.
    ///
    /// # Errors
    ///
    /// Fails on transport errors, non-success statuses other than a 404 on
    /// update, and responses without `data.id`.
    pub async fn dispatch(
        &self,
        chat_id: u64,
        text: &str,
        known: Option<&MessageId>,
    ) -> Result<Delivery> {
        match known {
            Some(id) => self.update_message(chat_id, text, id).await,
            None => self.create_message(chat_id, text).await.map(Delivery::Created),
        }
    }

    /// # Errors
    ///
    /// Any failure, including 404, is an error here.
    pub async fn create_message(&self, chat_id: u64, text: &str) -> Result<MessageId> {
        let payload = MessageRequest::discussion(chat_id, text);
        match self.call(Method::POST, self.endpoint().clone(), &payload).await? {
            Reply::Accepted(id) => {
                info!(%id, chat_id, "message created");
                Ok(id)
            }
            Reply::NotFound => Err(PachcaError::HttpStatus {
                status: StatusCode::NOT_FOUND,
                body: format!("{} not found", self.endpoint()),
            }
            .into()),
        }
    }

    /// # Errors
    ///
    /// Any failure other than 404 is an error; 404 yields [`Delivery::Stale`].
    pub async fn update_message(
        &self,
        chat_id: u64,
        text: &str,
        id: &MessageId,
    ) -> Result<Delivery> {
        let payload = MessageRequest::discussion(chat_id, text);
        let url = self.message_url(id);
        match self.call(Method::PUT, url, &payload).await? {
            Reply::Accepted(returned) => {
                if returned.to_string() != id.to_string() {
                    warn!(%id, %returned, "update answered with a different message id");
                }
                info!(%id, chat_id, "message updated");
                Ok(Delivery::Updated(id.clone()))
            }
            Reply::NotFound => {
                warn!(%id, "message not found, it will be sent again");
                Ok(Delivery::Stale)
            }
        }
    }

    fn message_url(&self, id: &MessageId) -> Url {
        let mut url = self.endpoint().clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&id.to_string());
        }
        url
    }
}
