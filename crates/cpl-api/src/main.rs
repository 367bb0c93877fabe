use cpl_api::setup;
use cpl_core::GatewayConfig;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = GatewayConfig::from_env()?;

    // Initialize the application (telemetry, backend clients, routes)
    let (_state, router) = setup::initialize_app(config.clone()).await?;

    // Start the server
    setup::server::start_server(&config, router).await?;

    Ok(())
}
