//! Sources of environment variables.
//!
//! Configuration never touches `std::env` directly; it goes through [`Env`] so
//! the same loading code runs against the real process environment at startup
//! and against an isolated map in tests.

use std::collections::HashMap;
use std::sync::Mutex;

/// A readable and writable set of environment variables.
pub trait Env: Send + Sync {
    /// Look up a variable. Unset (or non-UTF-8) variables are `None`.
    fn var(&self, key: &str) -> Option<String>;

    /// Set a variable, replacing any existing value.
    fn set_var(&self, key: &str, value: &str);

    /// Look up a variable, treating an empty value as unset.
    fn non_empty(&self, key: &str) -> Option<String> {
        self.var(key).filter(|value| !value.is_empty())
    }
}

/// The real process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl Env for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn set_var(&self, key: &str, value: &str) {
        std::env::set_var(key, value);
    }
}

/// An in-memory environment, isolated from the process.
#[derive(Debug, Default)]
pub struct MemoryEnv {
    vars: Mutex<HashMap<String, String>>,
}

impl MemoryEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an environment pre-populated with the given pairs.
    pub fn with_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: Mutex::new(
                vars.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

impl Env for MemoryEnv {
    fn var(&self, key: &str) -> Option<String> {
        let vars = self.vars.lock().unwrap_or_else(|e| e.into_inner());
        vars.get(key).cloned()
    }

    fn set_var(&self, key: &str, value: &str) {
        let mut vars = self.vars.lock().unwrap_or_else(|e| e.into_inner());
        vars.insert(key.to_string(), value.to_string());
    }
}
