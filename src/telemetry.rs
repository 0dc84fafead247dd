use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt};

use crate::Result;
use crate::error::Error;

const DEFAULT_FILTER: &str = "warn";

/// Installe le subscriber global. Les logs partent toujours sur stderr :
/// stdout ne porte que la ligne de résultat que Zabbix garde pour l'alerte.
///
/// # Errors
///
/// Retourne une erreur si aucun filtre n'est utilisable, si la sortie JSON est
/// demandée sans la fonctionnalité `json-logs`, ou si un subscriber global est
/// déjà en place.
pub fn init_tracing(explicit_filter: Option<&str>, use_json: bool) -> Result<()> {
    let rust_log = std::env::var("RUST_LOG").ok();
    let filter = resolve_filter(explicit_filter, rust_log.as_deref())?;
    let registry = Registry::default().with(filter);

    if use_json {
        #[cfg(feature = "json-logs")]
        return tracing::subscriber::set_global_default(
            registry.with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .json()
                    .flatten_event(true),
            ),
        )
        .map_err(|err| Error::Telemetry(err.to_string()));

        #[cfg(not(feature = "json-logs"))]
        return Err(Error::Telemetry(
            "binary was built without the `json-logs` feature".to_string(),
        ));
    }

    tracing::subscriber::set_global_default(
        registry.with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        ),
    )
    .map_err(|err| Error::Telemetry(err.to_string()))
}

/// Premier filtre valide parmi `--log-filter`, `RUST_LOG`, puis le défaut.
fn resolve_filter(explicit: Option<&str>, rust_log: Option<&str>) -> Result<EnvFilter> {
    explicit
        .into_iter()
        .chain(rust_log)
        .chain([DEFAULT_FILTER])
        .find_map(|candidate| EnvFilter::try_new(candidate).ok())
        .ok_or_else(|| Error::Telemetry("invalid log filter".to_string()))
}

#[cfg(test)]
mod tests {
    use super::resolve_filter;

    #[test]
    fn explicit_filter_wins() {
        let filter = resolve_filter(Some("zabbix_pachca=debug"), Some("info")).unwrap();
        assert!(filter.to_string().starts_with("zabbix_pachca="));
    }

    #[test]
    fn invalid_candidates_fall_through_to_default() {
        let filter = resolve_filter(
            Some("zabbix_pachca=loud"),
            Some("zabbix_pachca=quiet"),
        )
        .unwrap();
        assert!(filter.to_string().eq_ignore_ascii_case("warn"));
    }
}
