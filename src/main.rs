use clap::Parser;

use fixture_server::telemetry::init_telemetry;
use fixture_server::{Args, FixtureServer, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_telemetry();

    let args = Args::parse();
    let config = ServerConfig::from_args(&args)?;

    FixtureServer::new(config).serve().await
}
