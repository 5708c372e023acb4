//! Vertex AI platform initialization.
//!
//! Instead of configuring a process-wide default context, initialization
//! returns a [`VertexClient`] that callers hold and pass to whatever needs it.

use tracing::info;
use validator::Validate;

use crate::config::Config;
use crate::{Error, Result};

const USER_AGENT: &str = concat!("agent-config/", env!("CARGO_PKG_VERSION"));
const GLOBAL_LOCATION: &str = "global";
const BUCKET_SCHEME: &str = "gs://";

/// Parameters handed to the platform at startup.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct PlatformSettings {
    #[validate(length(min = 1, message = "project must not be empty"))]
    pub project: String,
    #[validate(length(min = 1, message = "location must not be empty"))]
    pub location: String,
    pub staging_bucket: Option<String>,
}

impl From<&Config> for PlatformSettings {
    fn from(config: &Config) -> Self {
        Self {
            project: config.project_id().to_string(),
            location: config.location().to_string(),
            staging_bucket: config.staging_bucket().map(str::to_string),
        }
    }
}

impl PlatformSettings {
    /// Validate all fields, returning a [`Error::PlatformInit`] on the first problem.
    pub fn check(&self) -> Result<()> {
        self.validate()
            .map_err(|e| Error::PlatformInit(e.to_string()))?;

        let valid_location = self
            .location
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        if !valid_location {
            return Err(Error::PlatformInit(format!(
                "invalid location {:?}",
                self.location
            )));
        }

        if let Some(bucket) = &self.staging_bucket {
            let name = bucket.strip_prefix(BUCKET_SCHEME).ok_or_else(|| {
                Error::PlatformInit(format!(
                    "staging bucket must start with {}, got {:?}",
                    BUCKET_SCHEME, bucket
                ))
            })?;
            if name.trim_end_matches('/').is_empty() {
                return Err(Error::PlatformInit(format!(
                    "staging bucket {:?} has no bucket name",
                    bucket
                )));
            }
        }

        Ok(())
    }
}

/// Establishes the platform context for the rest of the process.
pub trait PlatformInitializer: Send + Sync {
    fn init(&self, settings: &PlatformSettings) -> Result<VertexClient>;
}

/// Initializer for Vertex AI.
#[derive(Debug, Default, Clone, Copy)]
pub struct VertexPlatform;

impl VertexPlatform {
    pub fn new() -> Self {
        Self
    }
}

impl PlatformInitializer for VertexPlatform {
    fn init(&self, settings: &PlatformSettings) -> Result<VertexClient> {
        settings.check()?;

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::PlatformInit(format!("failed to build HTTP client: {}", e)))?;

        let client = VertexClient {
            http,
            api_endpoint: api_endpoint(&settings.location),
            project: settings.project.clone(),
            location: settings.location.clone(),
            staging_bucket: settings.staging_bucket.clone(),
        };

        info!(
            project = %client.project,
            location = %client.location,
            staging_bucket = ?client.staging_bucket,
            endpoint = %client.api_endpoint,
            "Vertex AI initialized"
        );

        Ok(client)
    }
}

/// Handle to an initialized Vertex AI context.
#[derive(Debug, Clone)]
pub struct VertexClient {
    http: reqwest::Client,
    project: String,
    location: String,
    staging_bucket: Option<String>,
    api_endpoint: String,
}

impl VertexClient {
    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn staging_bucket(&self) -> Option<&str> {
        self.staging_bucket.as_deref()
    }

    /// Base URL of the regional API.
    pub fn api_endpoint(&self) -> &str {
        &self.api_endpoint
    }

    /// HTTP client shared by calls made through this context.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Resource URL of a Google publisher model in this project and location.
    pub fn model_endpoint(&self, model: &str) -> String {
        format!(
            "{}/v1/projects/{}/locations/{}/publishers/google/models/{}",
            self.api_endpoint, self.project, self.location, model
        )
    }
}

fn api_endpoint(location: &str) -> String {
    if location == GLOBAL_LOCATION {
        "https://aiplatform.googleapis.com".to_string()
    } else {
        format!("https://{}-aiplatform.googleapis.com", location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(location: &str, bucket: Option<&str>) -> PlatformSettings {
        PlatformSettings {
            project: "my-proj".to_string(),
            location: location.to_string(),
            staging_bucket: bucket.map(str::to_string),
        }
    }

    #[test]
    fn test_init_regional() {
        let client = VertexPlatform::new()
            .init(&settings("us-central1", Some("gs://lux-staging")))
            .unwrap();

        assert_eq!(client.project(), "my-proj");
        assert_eq!(client.location(), "us-central1");
        assert_eq!(client.staging_bucket(), Some("gs://lux-staging"));
        assert_eq!(client.api_endpoint(), "https://us-central1-aiplatform.googleapis.com");
        assert_eq!(
            client.model_endpoint("gemini-2.5-flash"),
            "https://us-central1-aiplatform.googleapis.com/v1/projects/my-proj/locations/us-central1/publishers/google/models/gemini-2.5-flash"
        );
    }

    #[test]
    fn test_init_global_without_bucket() {
        let client = VertexPlatform::new().init(&settings("global", None)).unwrap();
        assert_eq!(client.api_endpoint(), "https://aiplatform.googleapis.com");
        assert_eq!(client.staging_bucket(), None);
    }

    #[test]
    fn test_rejects_bad_settings() {
        let cases = [
            settings("", None),
            settings("US Central", None),
            settings("us-central1", Some("lux-staging")),
            settings("us-central1", Some("gs://")),
            PlatformSettings {
                project: String::new(),
                location: "us-central1".to_string(),
                staging_bucket: None,
            },
        ];

        for case in cases {
            let err = VertexPlatform::new().init(&case).unwrap_err();
            assert!(matches!(err, Error::PlatformInit(_)), "{case:?} should be rejected");
        }
    }
}
