use anyhow::Result;
use kiyo_prime::{config, server};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Logging is not up yet, so configuration problems go to stderr
    let config = match config::load().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // RUST_LOG directives win over the configured level
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.server.logs.level)?,
    };

    tracing_subscriber::fmt().with_env_filter(filter).json().init();

    info!(
        "Starting Kiyo Prime server with {} predictor(s), log level {}",
        config.predictors.models.len(),
        config.server.logs.level
    );

    server::run(config).await?;

    Ok(())
}
