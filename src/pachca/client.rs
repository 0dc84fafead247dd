use std::time::{Duration, Instant};

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;
use url::Url;
use uuid::Uuid;

use crate::Result;
use crate::error::{ConfigError, Error, PachcaError};
use crate::types::MessageId;

use super::models::{MessageEnvelope, MessageRequest, body_preview};

const CORRELATION_HEADER: &str = "x-correlation-id";

#[derive(Clone)]
pub struct PachcaClient {
    http: reqwest::Client,
    endpoint: Url,
    token: SecretString,
}

/// What a single request produced, before create/update semantics apply.
#[derive(Debug)]
pub(super) enum Reply {
    Accepted(MessageId),
    NotFound,
}

impl PachcaClient {
    /// Build a client for the messages endpoint at `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns an error if HTTPS is required but the URL uses HTTP, or if the
    /// underlying HTTP client fails to build.
    pub fn new(
        endpoint: Url,
        token: SecretString,
        timeout: Duration,
        connect_timeout: Duration,
        insecure_http: bool,
    ) -> Result<Self> {
        if endpoint.scheme() != "https" && !insecure_http {
            return Err(Error::Config(ConfigError::InvalidField {
                field: "pachca.api_url",
                message: "only https URLs are accepted without --insecure".to_string(),
            }));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(connect_timeout)
            .timeout(timeout)
            .user_agent(concat!("zabbix-pachca/", env!("CARGO_PKG_VERSION")));

        if !insecure_http {
            builder = builder.https_only(true);
        }

        let http = builder
            .build()
            .map_err(|err| PachcaError::Client { source: err })?;

        Ok(Self {
            http,
            endpoint,
            token,
        })
    }

    pub(super) const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub(super) async fn call(
        &self,
        method: Method,
        url: Url,
        payload: &MessageRequest<'_>,
    ) -> Result<Reply> {
        let correlation_id = Uuid::now_v7().to_string();
        let started = Instant::now();

        let response = self
            .http
            .request(method.clone(), url)
            .bearer_auth(self.token.expose_secret())
            .header(CORRELATION_HEADER, &correlation_id)
            .json(payload)
            .send()
            .await
            .map_err(PachcaError::from)?;

        let status = response.status();
        let body = response.bytes().await.map_err(PachcaError::from)?;

        debug!(
            %method,
            %correlation_id,
            %status,
            latency_ms = started.elapsed().as_millis(),
            "pachca call finished"
        );

        if status == StatusCode::NOT_FOUND {
            return Ok(Reply::NotFound);
        }
        if !status.is_success() {
            return Err(PachcaError::HttpStatus {
                status,
                body: body_preview(&body),
            }
            .into());
        }

        let envelope: MessageEnvelope =
            serde_json::from_slice(&body).map_err(|err| PachcaError::Json {
                message: format!(
                    "error decoding response body: {err}; body preview: {}",
                    body_preview(&body)
                ),
            })?;

        envelope
            .data
            .and_then(|data| data.id)
            .map(Reply::Accepted)
            .ok_or_else(|| PachcaError::MissingField { field: "data.id" }.into())
    }
}
