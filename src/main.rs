use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use readaloud_gateway::api::ApiServer;
use readaloud_gateway::config::CredentialProvider;
use readaloud_gateway::{Config, EnvCredentials};

/// Readaloud - speech gateway for the school site's read-aloud mini-apps
#[derive(Parser)]
#[command(name = "readaloud", version, about)]
struct Cli {
    /// Port to listen on
    #[arg(long, env = "READALOUD_PORT")]
    port: Option<u16>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,readaloud_gateway=info",
        1 => "info,readaloud_gateway=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load()?;
    if let Some(port) = cli.port {
        config.port = port;
    }

    let credentials = EnvCredentials;
    if credentials.speech_api_key().is_none() {
        tracing::warn!(
            "ELEVENLABS_API_KEY not set - speech endpoints will answer with errors"
        );
    }

    tracing::info!(port = config.port, "starting readaloud gateway");

    let server = ApiServer::new(config.port, config.speech.clone(), Arc::new(credentials));
    server.run().await?;

    Ok(())
}
