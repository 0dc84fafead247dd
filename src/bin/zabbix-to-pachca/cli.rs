use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{ArgAction, Parser};

/// Zabbix invokes this once per alert with the media type's script parameters.
#[derive(Parser, Debug)]
#[command(author, version, about = "Forward a Zabbix alert to a Pachca chat", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Allow a plain HTTP Pachca endpoint.
    #[arg(long, action = ArgAction::SetTrue)]
    pub insecure: bool,

    /// Emit JSON logs (needs `--features json-logs`).
    #[arg(long, action = ArgAction::SetTrue)]
    pub json_logs: bool,

    /// Explicit log filter (e.g. "zabbix_pachca=debug").
    #[arg(long, value_name = "FILTER")]
    pub log_filter: Option<String>,

    /// Pachca bot access token.
    #[arg(value_name = "TOKEN")]
    pub token: String,

    /// Target chat id.
    #[arg(value_name = "CHAT_ID")]
    pub chat_id: u64,

    /// {ALERT.SUBJECT}
    #[arg(value_name = "SUBJECT", allow_hyphen_values = true)]
    pub subject: String,

    /// {ALERT.MESSAGE}
    #[arg(value_name = "MESSAGE", allow_hyphen_values = true)]
    pub message: String,

    /// {TRIGGER.ID}
    #[arg(value_name = "TRIGGER_ID", allow_hyphen_values = true)]
    pub trigger_id: String,

    /// {EVENT.ID}
    #[arg(value_name = "EVENT_ID", allow_hyphen_values = true)]
    pub event_id: String,

    /// {EVENT.STATUS}
    #[arg(value_name = "STATUS", allow_hyphen_values = true)]
    pub status: String,

    /// Ignored.
    #[arg(value_name = "EXTRA", hide = true, num_args = 0.., allow_hyphen_values = true)]
    pub extra: Vec<String>,
}

impl Cli {
    /// Parse `argv`. Usage problems map to exit status 1, help and version to 0.
    pub fn parse_args() -> Result<Self, ExitCode> {
        Self::try_parse().map_err(|err| {
            let _ = err.print();
            match err.kind() {
                ErrorKind::DisplayHelp
                | ErrorKind::DisplayVersion
                | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => ExitCode::SUCCESS,
                _ => ExitCode::from(1),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::Parser;

    const ARGS: [&str; 8] = [
        "zabbix-to-pachca",
        "token",
        "42",
        "Problem: Disk full",
        "Host: srv01",
        "20001",
        "100",
        "PROBLEM",
    ];

    #[test]
    fn seven_positionals_parse() {
        let cli = Cli::try_parse_from(ARGS).unwrap();
        assert_eq!(cli.chat_id, 42);
        assert_eq!(cli.event_id, "100");
        assert!(cli.extra.is_empty());
    }

    #[test]
    fn six_positionals_fail() {
        assert!(Cli::try_parse_from(ARGS[..7].iter().copied()).is_err());
    }

    #[test]
    fn bodies_may_start_with_a_dash() {
        let mut args = ARGS;
        args[4] = "- disk usage above 90%";
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.message, "- disk usage above 90%");
    }

    #[test]
    fn extra_arguments_are_tolerated() {
        let args: Vec<&str> = ARGS.iter().copied().chain(["spare"]).collect();
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.extra, vec!["spare".to_string()]);
    }
}
