use std::path::PathBuf;

use secrecy::SecretString;
use tracing::debug;
use zabbix_pachca::Result;
use zabbix_pachca::config::{Config, DEFAULT_CONFIG_PATH};
use zabbix_pachca::pachca::PachcaClient;
use zabbix_pachca::relay::{Outcome, relay};
use zabbix_pachca::telemetry::init_tracing;
use zabbix_pachca::types::Alert;

use super::cli::Cli;

pub async fn run(cli: Cli) -> Result<Outcome> {
    init_tracing(cli.log_filter.as_deref(), cli.json_logs)?;

    if !cli.extra.is_empty() {
        debug!(count = cli.extra.len(), "ignoring extra arguments");
    }

    let config_path = cli
        .config
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = Config::from_env_and_file(&config_path)?;

    let client = PachcaClient::new(
        config.api_url.clone(),
        SecretString::from(cli.token),
        config.http_request_timeout,
        config.http_connect_timeout,
        cli.insecure,
    )?;

    let alert = Alert {
        subject: cli.subject,
        body: cli.message,
        trigger_id: cli.trigger_id,
        event_id: cli.event_id,
        status: cli.status,
    };

    relay(&config, &client, cli.chat_id, &alert).await
}
