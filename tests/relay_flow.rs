#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::Path;
use std::time::Duration;

use secrecy::SecretString;
use serde_json::{Value, json};
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zabbix_pachca::config::Config;
use zabbix_pachca::pachca::PachcaClient;
use zabbix_pachca::relay::{Outcome, relay};
use zabbix_pachca::types::{Alert, MessageId};

const MESSAGES: &str = "/api/shared/v1/messages";
const CHAT: u64 = 42;

struct Harness {
    server: MockServer,
    _dir: TempDir,
    config: Config,
}

impl Harness {
    async fn start() -> Self {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            api_url: Url::parse(&format!("{}{MESSAGES}", server.uri())).unwrap(),
            zabbix_url: Url::parse("https://zabbix.example.com").unwrap(),
            cache_path: dir.path().join("pachca_cache/message_ids.json"),
            http_request_timeout: Duration::from_secs(2),
            http_connect_timeout: Duration::from_secs(1),
        };
        Self {
            server,
            _dir: dir,
            config,
        }
    }

    fn client(&self) -> PachcaClient {
        PachcaClient::new(
            self.config.api_url.clone(),
            SecretString::from("secret-token"),
            self.config.http_request_timeout,
            self.config.http_connect_timeout,
            true,
        )
        .unwrap()
    }

    fn seed_cache(&self, contents: &str) {
        let cache = &self.config.cache_path;
        fs::create_dir_all(cache.parent().unwrap()).unwrap();
        fs::write(cache, contents).unwrap();
    }

    fn cache_json(&self) -> Value {
        read_json(&self.config.cache_path)
    }

    async fn relay(&self, alert: &Alert) -> zabbix_pachca::Result<Outcome> {
        relay(&self.config, &self.client(), CHAT, alert).await
    }
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn problem(event_id: &str) -> Alert {
    Alert {
        subject: "Problem: Disk full on srv01".to_string(),
        body: "Host: srv01\nSeverity: High".to_string(),
        trigger_id: "20001".to_string(),
        event_id: event_id.to_string(),
        status: "PROBLEM".to_string(),
    }
}

fn resolution(event_id: &str) -> Alert {
    Alert {
        subject: "Resolved in 5m: Disk full on srv01".to_string(),
        body: "Problem has been resolved\nProblem duration: 5m".to_string(),
        trigger_id: "20001".to_string(),
        event_id: event_id.to_string(),
        status: "OK".to_string(),
    }
}

fn message(id: u64) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "data": { "id": id } }))
}

#[tokio::test]
async fn first_alert_creates_and_records_message() {
    let h = Harness::start().await;

    Mock::given(method("POST"))
        .and(path(MESSAGES))
        .and(body_string_contains("NEW PROBLEM"))
        .respond_with(message(9001))
        .expect(1)
        .mount(&h.server)
        .await;

    let outcome = h.relay(&problem("100")).await.unwrap();
    assert_eq!(outcome, Outcome::Created(MessageId::Numeric(9001)));
    assert_eq!(outcome.to_string(), "Message sent: 9001");
    assert_eq!(h.cache_json(), json!({ "100": 9001 }));
}

#[tokio::test]
async fn resolution_edits_cached_message() {
    let h = Harness::start().await;
    h.seed_cache(r#"{"100": 9001}"#);

    Mock::given(method("PUT"))
        .and(path(format!("{MESSAGES}/9001")))
        .and(body_string_contains("RESOLVED"))
        .and(body_string_contains("(resolved in 5m)"))
        .respond_with(message(9001))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .respond_with(message(1))
        .expect(0)
        .mount(&h.server)
        .await;

    let outcome = h.relay(&resolution("100")).await.unwrap();
    assert_eq!(outcome, Outcome::Updated(MessageId::Numeric(9001)));
    assert_eq!(h.cache_json(), json!({ "100": 9001 }));
}

#[tokio::test]
async fn vanished_message_is_sent_again() {
    let h = Harness::start().await;
    h.seed_cache(r#"{"100": 9001, "200": "17"}"#);

    Mock::given(method("PUT"))
        .and(path(format!("{MESSAGES}/9001")))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path(MESSAGES))
        .respond_with(message(9002))
        .expect(1)
        .mount(&h.server)
        .await;

    let outcome = h.relay(&resolution("100")).await.unwrap();
    assert_eq!(
        outcome,
        Outcome::Recreated {
            stale: MessageId::Numeric(9001),
            id: MessageId::Numeric(9002),
        }
    );
    assert_eq!(outcome.to_string(), "Message recreated: 9002 (was 9001)");
    assert_eq!(h.cache_json(), json!({ "100": 9002, "200": "17" }));
}

#[tokio::test]
async fn unusable_entry_does_not_hide_other_messages() {
    let h = Harness::start().await;
    h.seed_cache(r#"{"100": 9001, "200": null}"#);

    Mock::given(method("PUT"))
        .and(path(format!("{MESSAGES}/9001")))
        .respond_with(message(9001))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .respond_with(message(5))
        .expect(1)
        .mount(&h.server)
        .await;

    let created = h.relay(&problem("300")).await.unwrap();
    assert_eq!(created, Outcome::Created(MessageId::Numeric(5)));
    assert_eq!(h.cache_json(), json!({ "100": 9001, "300": 5 }));

    let updated = h.relay(&resolution("100")).await.unwrap();
    assert_eq!(updated, Outcome::Updated(MessageId::Numeric(9001)));
    assert_eq!(h.cache_json(), json!({ "100": 9001, "300": 5 }));
}

#[tokio::test]
async fn blank_cached_id_counts_as_a_miss() {
    let h = Harness::start().await;
    h.seed_cache(r#"{"100": ""}"#);

    Mock::given(method("PUT"))
        .respond_with(message(1))
        .expect(0)
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path(MESSAGES))
        .respond_with(message(9004))
        .expect(1)
        .mount(&h.server)
        .await;

    let outcome = h.relay(&resolution("100")).await.unwrap();
    assert_eq!(outcome, Outcome::Created(MessageId::Numeric(9004)));
    assert_eq!(h.cache_json(), json!({ "100": 9004 }));
}

#[tokio::test]
async fn fatal_error_leaves_cache_untouched() {
    let h = Harness::start().await;
    let seeded = "{\"100\": 9001,\n \"7\": 1}";
    h.seed_cache(seeded);

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .respond_with(message(1))
        .expect(0)
        .mount(&h.server)
        .await;

    let err = h.relay(&resolution("100")).await.unwrap_err();
    assert!(err.is_auth_failure());
    assert_eq!(fs::read_to_string(&h.config.cache_path).unwrap(), seeded);
}

#[tokio::test]
async fn failed_create_does_not_record_anything() {
    let h = Harness::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&h.server)
        .await;

    assert!(h.relay(&problem("100")).await.is_err());
    assert_eq!(h.cache_json(), json!({}));
}

#[tokio::test]
async fn corrupt_cache_counts_as_empty() {
    let h = Harness::start().await;
    h.seed_cache("{\"100\": 90");

    Mock::given(method("POST"))
        .respond_with(message(9003))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(message(1))
        .expect(0)
        .mount(&h.server)
        .await;

    let outcome = h.relay(&resolution("100")).await.unwrap();
    assert_eq!(outcome, Outcome::Created(MessageId::Numeric(9003)));
    assert_eq!(h.cache_json(), json!({ "100": 9003 }));
}

#[tokio::test]
async fn events_are_tracked_independently() {
    let h = Harness::start().await;

    Mock::given(method("POST"))
        .respond_with(message(11))
        .up_to_n_times(1)
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .respond_with(message(12))
        .mount(&h.server)
        .await;

    h.relay(&problem("100")).await.unwrap();
    h.relay(&problem("101")).await.unwrap();
    assert_eq!(h.cache_json(), json!({ "100": 11, "101": 12 }));
}
