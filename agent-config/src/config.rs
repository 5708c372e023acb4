//! Configuration management for the agent.

use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info};

use crate::credentials::CredentialResolver;
use crate::env::{Env, ProcessEnv};
use crate::env_file::load_env_file;
use crate::identifier::internal_agent_name;
use crate::{Error, Result};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_DEPLOYMENT_NAME: &str = "luxmap";
pub const DEFAULT_LOCATION: &str = "us-central1";
pub const DEFAULT_CRITIC_MODEL: &str = "gemini-2.5-pro";
pub const DEFAULT_MAX_SEARCH_ITERATIONS: u32 = 5;
pub const ENV_FILE_NAME: &str = ".env";

/// Agent configuration resolved from the environment.
///
/// Built once at startup by [`ConfigLoader`] and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    /// Model used by the agent
    model: String,
    /// Human-chosen deployment name
    deployment_name: String,
    /// Google Cloud project
    project_id: String,
    /// Google Cloud region
    location: String,
    /// Bucket for platform artifacts
    staging_bucket: Option<String>,
    /// Model for research and drafting steps
    worker_model: String,
    /// Model for evaluation and report composition
    critic_model: String,
    /// Upper bound on research refinement loops
    max_search_iterations: u32,
}

impl Config {
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn deployment_name(&self) -> &str {
        &self.deployment_name
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn staging_bucket(&self) -> Option<&str> {
        self.staging_bucket.as_deref()
    }

    pub fn worker_model(&self) -> &str {
        &self.worker_model
    }

    pub fn critic_model(&self) -> &str {
        &self.critic_model
    }

    pub fn max_search_iterations(&self) -> u32 {
        self.max_search_iterations
    }

    /// Deployment name as a bare identifier.
    pub fn internal_agent_name(&self) -> Result<String> {
        internal_agent_name(&self.deployment_name)
    }
}

/// Builds a [`Config`] in a fixed order: env file, variables, defaults, project.
pub struct ConfigLoader<E: Env = ProcessEnv> {
    env: E,
    env_file: PathBuf,
}

impl ConfigLoader<ProcessEnv> {
    /// Loader over the process environment and the default `.env` location.
    pub fn new() -> Self {
        Self::with_env(ProcessEnv)
    }
}

impl Default for ConfigLoader<ProcessEnv> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Env> ConfigLoader<E> {
    /// Loader over an arbitrary environment.
    pub fn with_env(env: E) -> Self {
        Self {
            env,
            env_file: default_env_file(),
        }
    }

    /// Read variables from `path` instead of the default `.env`.
    pub fn with_env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file = path.into();
        self
    }

    /// Load the env file, read variables, apply defaults and resolve the project.
    ///
    /// The resolver is only consulted when `GOOGLE_CLOUD_PROJECT` is unset or
    /// empty; its failure is returned as-is.
    pub async fn load(&self, resolver: &dyn CredentialResolver) -> Result<Config> {
        load_env_file(&self.env_file, &self.env)?;

        let model = self.var_or("MODEL", DEFAULT_MODEL);
        let deployment_name = self.var_or("AGENT_NAME", DEFAULT_DEPLOYMENT_NAME);
        let location = self.var_or("GOOGLE_CLOUD_LOCATION", DEFAULT_LOCATION);
        let staging_bucket = self.env.non_empty("GOOGLE_CLOUD_STAGING_BUCKET");
        let worker_model = self.var_or("WORKER_MODEL", &model);
        let critic_model = self.var_or("CRITIC_MODEL", DEFAULT_CRITIC_MODEL);
        let max_search_iterations = self.max_search_iterations()?;

        let project_id = match self.env.non_empty("GOOGLE_CLOUD_PROJECT") {
            Some(project) => {
                info!(project = %project, "Using project from GOOGLE_CLOUD_PROJECT");
                project
            }
            None => {
                debug!("GOOGLE_CLOUD_PROJECT not set, asking ambient credentials");
                resolver.default_project(&self.env).await?
            }
        };

        Ok(Config {
            model,
            deployment_name,
            project_id,
            location,
            staging_bucket,
            worker_model,
            critic_model,
            max_search_iterations,
        })
    }

    fn var_or(&self, key: &str, default: &str) -> String {
        self.env.var(key).unwrap_or_else(|| default.to_string())
    }

    fn max_search_iterations(&self) -> Result<u32> {
        let Some(raw) = self.env.var("MAX_SEARCH_ITERATIONS") else {
            return Ok(DEFAULT_MAX_SEARCH_ITERATIONS);
        };

        match raw.trim().parse::<u32>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(Error::Config(format!(
                "MAX_SEARCH_ITERATIONS must be a positive integer, got {:?}",
                raw
            ))),
        }
    }
}

/// `.env` in the directory of the running executable, or the working directory
/// when the executable path is unavailable.
fn default_env_file() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(ENV_FILE_NAME)))
        .unwrap_or_else(|| PathBuf::from(ENV_FILE_NAME))
}
