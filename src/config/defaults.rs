use std::path::PathBuf;
use std::time::Duration;

pub(super) fn default_api_url() -> String {
    "https://api.pachca.com/api/shared/v1/messages".to_string()
}

pub(super) fn default_cache_path() -> PathBuf {
    PathBuf::from("/var/lib/zabbix/pachca_cache/message_ids.json")
}

pub(super) const fn default_request_timeout() -> Duration {
    Duration::from_secs(10)
}

pub(super) const fn default_connect_timeout() -> Duration {
    Duration::from_secs(5)
}
