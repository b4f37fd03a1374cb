//! CoreNode binary
//!
//! The TreeChain network-state simulator daemon.

use treechain_node::{CoreConfig, CoreNode};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "core_node=info,treechain=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting CoreNode");

    let config = CoreConfig::from_env();

    let node = CoreNode::new(config).await?;
    node.run().await?;

    Ok(())
}
