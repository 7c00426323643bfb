use clap::Parser;
use tracing::info;

use kube_sweeper::{config::Config, kubernetes::KubeClient, sweep::Sweeper, Result};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::parse();
    info!(?config, "starting sweep");

    let client = KubeClient::new().await?;
    let sweeper = Sweeper::new(client, config.thresholds(), config.dry_run);
    sweeper.run().await
}
