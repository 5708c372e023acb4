//! Ambient credential discovery.
//!
//! The configuration builder only needs one thing from the credential system:
//! the default project of whatever identity the process runs as. That lookup
//! sits behind [`CredentialResolver`] so startup can be exercised without a
//! real Google Cloud environment.
//!
//! [`AdcResolver`] follows the Application Default Credentials search order:
//!
//! 1. the key file named by `GOOGLE_APPLICATION_CREDENTIALS`
//! 2. the gcloud well-known file (`application_default_credentials.json`)
//! 3. the GCE metadata server
//!
//! Once credentials are found, `GOOGLE_CLOUD_PROJECT` or `GCLOUD_PROJECT`
//! overrides whatever project they carry.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use crate::env::Env;
use crate::{Error, Result};

/// Default metadata server host on Compute Engine, GKE and Cloud Run.
pub const METADATA_HOST: &str = "metadata.google.internal";

const METADATA_PROJECT_PATH: &str = "/computeMetadata/v1/project/project-id";
const WELL_KNOWN_FILE: &str = "application_default_credentials.json";
const SERVICE_ACCOUNT: &str = "service_account";
const PROJECT_VARS: [&str; 2] = ["GOOGLE_CLOUD_PROJECT", "GCLOUD_PROJECT"];

/// Resolves the default project from ambient credentials.
#[async_trait]
pub trait CredentialResolver: Send + Sync {
    /// Return the default project of the ambient credentials.
    ///
    /// Fails with [`Error::MissingCredentials`] when no credentials are
    /// discoverable or they carry no project.
    async fn default_project(&self, env: &dyn Env) -> Result<String>;
}

/// Fields of a credentials JSON file that matter for project discovery.
#[derive(Debug, Deserialize)]
struct CredentialsFile {
    #[serde(rename = "type")]
    kind: Option<String>,
    project_id: Option<String>,
}

impl CredentialsFile {
    /// Only service account keys name a project; user credentials never do.
    fn project(&self) -> Option<String> {
        if self.kind.as_deref() != Some(SERVICE_ACCOUNT) {
            return None;
        }
        self.project_id.clone().filter(|p| !p.is_empty())
    }
}

/// Credentials located by one of the ADC sources.
#[derive(Debug)]
struct Found {
    source: &'static str,
    project: Option<String>,
}

/// Application Default Credentials resolver.
pub struct AdcResolver {
    http: reqwest::Client,
    metadata_timeout: Duration,
}

impl AdcResolver {
    /// Create a resolver with a short metadata server timeout.
    pub fn new() -> Self {
        Self::with_metadata_timeout(Duration::from_millis(500))
    }

    /// Create a resolver with a custom metadata server timeout.
    pub fn with_metadata_timeout(metadata_timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            metadata_timeout,
        }
    }

    /// Credentials from the file named by `GOOGLE_APPLICATION_CREDENTIALS`.
    ///
    /// An explicitly configured file that cannot be read is an error rather
    /// than a reason to keep searching. Pointing at the gcloud well-known file
    /// behaves exactly like the gcloud source.
    fn from_explicit_file(&self, env: &dyn Env) -> Result<Option<Found>> {
        let Some(path) = env.non_empty("GOOGLE_APPLICATION_CREDENTIALS") else {
            return Ok(None);
        };
        let path = PathBuf::from(path);

        if well_known_file(env).as_deref() == Some(path.as_path()) {
            return self.from_gcloud(env)?.map(Some).ok_or_else(|| {
                Error::MissingCredentials(format!(
                    "GOOGLE_APPLICATION_CREDENTIALS points to {} which does not exist",
                    path.display()
                ))
            });
        }

        let creds = read_credentials_file(&path).map_err(|e| {
            Error::MissingCredentials(format!(
                "GOOGLE_APPLICATION_CREDENTIALS points to {} which could not be loaded: {}",
                path.display(),
                e
            ))
        })?;

        debug!(path = %path.display(), kind = ?creds.kind, "Found explicit credentials file");
        Ok(Some(Found {
            source: "GOOGLE_APPLICATION_CREDENTIALS",
            project: creds.project(),
        }))
    }

    /// Credentials from the gcloud well-known file.
    fn from_gcloud(&self, env: &dyn Env) -> Result<Option<Found>> {
        let Some(path) = well_known_file(env) else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }

        let creds = read_credentials_file(&path).map_err(|e| {
            Error::MissingCredentials(format!(
                "gcloud credentials at {} could not be loaded: {}",
                path.display(),
                e
            ))
        })?;

        debug!(path = %path.display(), "Found gcloud application default credentials");
        Ok(Some(Found {
            source: "gcloud",
            project: creds.project().or_else(|| gcloud_project(env)),
        }))
    }

    /// Project from the GCE metadata server, if one answers.
    async fn from_metadata_server(&self, env: &dyn Env) -> Option<Found> {
        let skip = env
            .var("NO_GCE_CHECK")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "true" | "1"))
            .unwrap_or(false);
        if skip {
            debug!("Skipping metadata server check");
            return None;
        }

        let host = env
            .non_empty("GCE_METADATA_HOST")
            .unwrap_or_else(|| METADATA_HOST.to_string());
        let url = format!("http://{}{}", host, METADATA_PROJECT_PATH);

        let response = match self
            .http
            .get(&url)
            .header("Metadata-Flavor", "Google")
            .timeout(self.metadata_timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                debug!(url = %url, "Metadata server unavailable: {}", e);
                return None;
            }
        };

        let from_google = response
            .headers()
            .get("Metadata-Flavor")
            .and_then(|v| v.to_str().ok())
            .map(|v| v == "Google")
            .unwrap_or(false);
        if !response.status().is_success() || !from_google {
            debug!(
                status = %response.status(),
                "Metadata server returned an unusable response"
            );
            return None;
        }

        match response.text().await {
            Ok(body) => Some(Found {
                source: "metadata",
                project: Some(body.trim().to_string()).filter(|p| !p.is_empty()),
            }),
            Err(e) => {
                debug!("Failed to read metadata response: {}", e);
                None
            }
        }
    }

    async fn discover(&self, env: &dyn Env) -> Result<Option<Found>> {
        if let Some(found) = self.from_explicit_file(env)? {
            return Ok(Some(found));
        }
        if let Some(found) = self.from_gcloud(env)? {
            return Ok(Some(found));
        }
        Ok(self.from_metadata_server(env).await)
    }
}

impl Default for AdcResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialResolver for AdcResolver {
    async fn default_project(&self, env: &dyn Env) -> Result<String> {
        let Some(found) = self.discover(env).await? else {
            return Err(Error::MissingCredentials(
                "could not determine credentials; set GOOGLE_CLOUD_PROJECT \
                 or configure application default credentials"
                    .to_string(),
            ));
        };

        let project = explicit_project(env).or(found.project);
        match project {
            Some(project) => {
                info!(
                    source = found.source,
                    project = %project,
                    "Resolved project from ambient credentials"
                );
                Ok(project)
            }
            None => Err(Error::MissingCredentials(format!(
                "credentials from {} carry no project; set GOOGLE_CLOUD_PROJECT",
                found.source
            ))),
        }
    }
}

/// Project named explicitly in the environment, current variable first.
fn explicit_project(env: &dyn Env) -> Option<String> {
    PROJECT_VARS.iter().find_map(|key| env.non_empty(key))
}

fn read_credentials_file(path: &Path) -> Result<CredentialsFile> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// gcloud configuration directory: `CLOUDSDK_CONFIG` or the platform default.
fn gcloud_config_dir(env: &dyn Env) -> Option<PathBuf> {
    if let Some(dir) = env.non_empty("CLOUDSDK_CONFIG") {
        return Some(PathBuf::from(dir));
    }

    if cfg!(windows) {
        dirs::config_dir().map(|d| d.join("gcloud"))
    } else {
        dirs::home_dir().map(|d| d.join(".config").join("gcloud"))
    }
}

fn well_known_file(env: &dyn Env) -> Option<PathBuf> {
    gcloud_config_dir(env).map(|dir| dir.join(WELL_KNOWN_FILE))
}

/// Project configured for the gcloud CLI, if any.
fn gcloud_project(env: &dyn Env) -> Option<String> {
    if let Some(project) = env.non_empty("CLOUDSDK_CORE_PROJECT") {
        return Some(project);
    }

    let dir = gcloud_config_dir(env)?;
    let active = env
        .non_empty("CLOUDSDK_ACTIVE_CONFIG_NAME")
        .or_else(|| {
            fs::read_to_string(dir.join("active_config"))
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
        .unwrap_or_else(|| "default".to_string());

    let config_file = dir
        .join("configurations")
        .join(format!("config_{}", active));
    let contents = fs::read_to_string(config_file).ok()?;
    ini_value(&contents, "core", "project")
}

/// Read `key` from `[section]` of a gcloud properties file.
fn ini_value(contents: &str, section: &str, key: &str) -> Option<String> {
    let mut in_section = false;

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            in_section = name.trim() == section;
            continue;
        }

        if in_section {
            if let Some((k, v)) = line.split_once('=') {
                if k.trim() == key {
                    return Some(v.trim().to_string()).filter(|v| !v.is_empty());
                }
            }
        }
    }

    None
}
