//! `pco-tools` - interactive Planning Center Services utilities.

use std::process::ExitCode;

use pco_tools::app;
use pco_tools::config::AppConfig;
use pco_tools::logging;
use pco_tools::prompt::TerminalConsole;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    logging::init(config.verbose);

    let mut console = TerminalConsole::stdio();
    if let Err(e) = app::run(&config, &mut console).await {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
