//! Wolfpack Player - terminal client binary.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wolfpack_player::config::{load_dotenv_from_repo_root, ClientConfig};
use wolfpack_player::infrastructure::http_client::HttpGameApi;
use wolfpack_player::runner::{self, RunnerDeps};
use wolfpack_player::ui::TerminalRenderer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv_from_repo_root();

    // stdout belongs to the terminal UI.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wolfpack_player=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Wolfpack Player");

    let config = ClientConfig::from_env()?;
    tracing::debug!(server = %config.server_url, ws = %config.ws_url, "Loaded configuration");

    let api = HttpGameApi::new(&config.server_url, config.request_timeout);

    runner::run(RunnerDeps {
        config,
        api: Arc::new(api),
        renderer: Arc::new(TerminalRenderer::new()),
    })
    .await
}
