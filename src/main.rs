use std::io;
use std::process::ExitCode;

use threadchat::client::OpenAiClient;
use threadchat::config::{Config, RunOptions};
use threadchat::conversation::ChatSession;
use threadchat::error::Result;
use threadchat::{cli, telemetry};

#[tokio::main]
async fn main() -> ExitCode {
    telemetry::init_tracing();

    let matches = cli::build_cli().get_matches();
    let options = cli::parse_run_options(&matches);

    match run(&options).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(options: &RunOptions) -> Result<()> {
    // Configuration must be complete before any remote call is made.
    let config = Config::load(options)?;
    let client = OpenAiClient::new(config.base_url.clone(), config.api_key.clone());

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut session = ChatSession::new(&client, &config, stdin.lock(), stdout.lock());
    session.run().await
}
