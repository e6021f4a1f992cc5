use std::{fs::File, path::Path, sync::Mutex};

use clap::{Parser, Subcommand};
use config::Config;
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    ExecutableCommand as _,
};
use qa_client::{config::API_URL_VAR, ApiConfig, ApiHost, Client};
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};
use tui::AppContext;

mod api;
mod config;
mod error;
mod fs_ext;
mod oneshot;
mod report;
mod tui;

#[derive(Parser)]
#[command(version, about = "AI quality assurance dashboard")]
pub struct Cli {
    /// Base url of the inference API.
    #[arg(long, env = API_URL_VAR)]
    api_url: Option<ApiHost>,
    #[command(subcommand)]
    mode: Option<RunMode>,
}

#[derive(Subcommand)]
enum RunMode {
    OneShot {
        #[command(subcommand)]
        command: oneshot::Command,
    },
    Tui,
}

fn setup_tracing(log_file: impl AsRef<Path>) -> anyhow::Result<()> {
    tracing_log::LogTracer::init()?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::FULL)
        .with_writer(Mutex::new(File::create(log_file)?))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    let config = Config::load()?;
    setup_tracing(&config.log_file)?;

    let api = match args.api_url {
        Some(host) => ApiConfig::new(host),
        None => config.api,
    };
    tracing::info!(host = %api.host, timeout = ?api.timeout, "configured API");

    let client = Client::new(&api)?;

    match args.mode.unwrap_or(RunMode::Tui) {
        RunMode::OneShot { command } => oneshot::run(&client, command).await?,
        RunMode::Tui => {
            color_eyre::install()
                .map_err(|error| anyhow::anyhow!("unable to install color_eyre: {error}"))?;
            tracing::info!("starting TUI");
            let app_context = AppContext::new(client);
            let terminal = ratatui::init();
            let result = match std::io::stdout().execute(EnableBracketedPaste) {
                Ok(_) => app_context.run(terminal).await,
                Err(error) => Err(error.into()),
            };
            if let Err(error) = std::io::stdout().execute(DisableBracketedPaste) {
                tracing::warn!(%error, "unable to disable bracketed paste");
            }
            ratatui::restore();
            result?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn api_url_flag_parses_host() {
        let cli = Cli::try_parse_from(["qa-dashboard", "--api-url", "http://gateway/qa", "tui"])
            .unwrap();

        assert_eq!(
            cli.api_url.map(|host| host.to_string()),
            Some("http://gateway/qa".to_string())
        );
        assert!(matches!(cli.mode, Some(RunMode::Tui)));
    }

    #[test]
    fn invalid_api_url_is_rejected() {
        let result = Cli::try_parse_from(["qa-dashboard", "--api-url", "not a url"]);

        assert!(result.is_err());
    }
}
