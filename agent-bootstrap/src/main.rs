//! Agent bootstrap - Loads configuration and initializes Vertex AI.
//!
//! Any failure here is fatal: the process exits non-zero before the agent
//! starts serving. Startup runs on a single thread so the `.env` file is
//! applied to the process environment before anything else is running.

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let (config, client) = match agent_config::bootstrap_default().await {
        Ok(started) => started,
        Err(e) => {
            error!(kind = e.kind(), "Startup failed: {}", e);
            return Err(e.into());
        }
    };

    let internal_name = config.internal_agent_name()?;
    info!(
        agent = %internal_name,
        config = %serde_json::to_string(&config)?,
        endpoint = %client.model_endpoint(config.model()),
        "Agent ready"
    );

    Ok(())
}
