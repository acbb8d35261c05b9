use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use tempo_server::{GameConfig, Registry};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let registry = Arc::new(Registry::new());
    let session = registry.create("white", "black", GameConfig::default());
    info!(id = %session.id(), fen = %session.snapshot().fen, "tempo ready");

    tokio::signal::ctrl_c().await?;
    registry.shutdown();
    info!("tempo shutting down");
    Ok(())
}
