use clap::Parser;
use repo_enforcer_cli::{args::Cli, enforce, prompt::ConsolePrompt};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_env("REPO_ENFORCER_LOG")
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match enforce::execute(&cli, &ConsolePrompt).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("Error: {e}");
            std::process::exit(1);
        }
    }
}
