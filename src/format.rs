//! Renders an [`Alert`] into the markdown text posted to Pachca.

use url::Url;

use crate::types::Alert;

const RESOLVED_STATUS: &str = "OK";
const RESOLVED_PHRASE: &str = "Problem has been resolved";
const DURATION_MARKER: &str = "Problem duration:";
const SUBJECT_NOISE: [&str; 2] = ["Resolved in", "Problem:"];

const RESOLVED_ICON: &str = "✅";
const RESOLVED_TITLE: &str = "RESOLVED";
const PROBLEM_ICON: &str = "🔴";
const PROBLEM_TITLE: &str = "NEW PROBLEM";

/// Either signal alone marks the alert as resolved.
#[must_use]
pub fn is_resolved(alert: &Alert) -> bool {
    alert.status == RESOLVED_STATUS || alert.body.contains(RESOLVED_PHRASE)
}

#[must_use]
pub fn render(alert: &Alert, zabbix_url: &Url) -> String {
    let subject = clean_subject(&alert.subject);
    let (icon, title, suffix) = if is_resolved(alert) {
        let suffix = resolution_duration(&alert.body)
            .map(|duration| format!(" (resolved in {duration})"))
            .unwrap_or_default();
        (RESOLVED_ICON, RESOLVED_TITLE, suffix)
    } else {
        (PROBLEM_ICON, PROBLEM_TITLE, String::new())
    };
    let link = event_link(zabbix_url, &alert.trigger_id, &alert.event_id);

    format!(
        "*{icon} {title}: {subject}{suffix}*\n\n*Details:*\n{body}\n[Open in Zabbix]({link})",
        body = alert.body,
    )
}

fn clean_subject(subject: &str) -> String {
    SUBJECT_NOISE
        .iter()
        .fold(subject.to_string(), |acc, noise| acc.replace(noise, ""))
        .trim()
        .to_string()
}

/// Value of the first `Problem duration:` line, if any.
fn resolution_duration(body: &str) -> Option<&str> {
    body.lines()
        .find(|line| line.contains(DURATION_MARKER))
        .and_then(|line| line.split_once(':'))
        .map(|(_, value)| value.trim())
}

/// `<zabbix>/tr_events.php?triggerid=..&eventid=..`, keeping any path prefix
/// the frontend is mounted under.
#[must_use]
pub fn event_link(zabbix_url: &Url, trigger_id: &str, event_id: &str) -> Url {
    let mut link = zabbix_url.clone();
    link.set_query(None);
    link.set_fragment(None);
    if let Ok(mut segments) = link.path_segments_mut() {
        segments.pop_if_empty().push("tr_events.php");
    }
    link.query_pairs_mut()
        .append_pair("triggerid", trigger_id)
        .append_pair("eventid", event_id);
    link
}
