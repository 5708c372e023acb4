//! Configuration loading and Vertex AI startup for the Luxmap agent.
//!
//! This crate reads the agent's settings from the environment (optionally
//! seeded from a `.env` file), resolves the Google Cloud project, and
//! initializes the Vertex AI platform context.

pub mod bootstrap;
pub mod config;
pub mod credentials;
pub mod env;
pub mod env_file;
pub mod error;
pub mod identifier;
pub mod platform;

pub use bootstrap::{bootstrap, bootstrap_default};
pub use config::{Config, ConfigLoader};
pub use credentials::{AdcResolver, CredentialResolver};
pub use env::{Env, MemoryEnv, ProcessEnv};
pub use env_file::load_env_file;
pub use error::{Error, Result};
pub use identifier::internal_agent_name;
pub use platform::{PlatformInitializer, PlatformSettings, VertexClient, VertexPlatform};
