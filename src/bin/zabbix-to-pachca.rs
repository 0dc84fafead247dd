#[path = "zabbix-to-pachca/app.rs"]
mod app;
#[path = "zabbix-to-pachca/cli.rs"]
mod cli;

use std::error::Error as StdError;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match cli::Cli::parse_args() {
        Ok(cli) => cli,
        Err(code) => return code,
    };
    match app::run(cli).await {
        Ok(outcome) => {
            println!("{outcome}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            report_error(&err);
            ExitCode::from(1)
        }
    }
}

fn report_error(err: &zabbix_pachca::error::Error) {
    eprintln!("Error: {err}");
    let mut source: Option<&dyn StdError> = err.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {cause}");
        source = cause.source();
    }
    if err.is_auth_failure() {
        eprintln!("  hint: check the bot token passed as the first argument");
    }
}
