//! Startup sequence: configuration first, then the platform.

use tracing::info;

use crate::config::{Config, ConfigLoader};
use crate::credentials::{AdcResolver, CredentialResolver};
use crate::env::Env;
use crate::platform::{PlatformInitializer, PlatformSettings, VertexClient, VertexPlatform};
use crate::Result;

/// Build the configuration and initialize the platform with it.
///
/// If the project cannot be resolved the platform is never touched.
pub async fn bootstrap<E: Env>(
    loader: &ConfigLoader<E>,
    resolver: &dyn CredentialResolver,
    platform: &dyn PlatformInitializer,
) -> Result<(Config, VertexClient)> {
    let config = loader.load(resolver).await?;
    info!(
        model = %config.model(),
        deployment_name = %config.deployment_name(),
        project = %config.project_id(),
        location = %config.location(),
        "Configuration loaded"
    );

    let client = platform.init(&PlatformSettings::from(&config))?;
    Ok((config, client))
}

/// [`bootstrap`] against the process environment, ADC and Vertex AI.
pub async fn bootstrap_default() -> Result<(Config, VertexClient)> {
    bootstrap(&ConfigLoader::new(), &AdcResolver::new(), &VertexPlatform::new()).await
}
