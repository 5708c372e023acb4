//! Loading of `KEY=VALUE` files into an environment.

use std::path::Path;

use tracing::debug;

use crate::env::Env;
use crate::{Error, Result};

/// Load variables from `path` into `env` without overriding existing values.
///
/// A missing file is not an error. Parsing is delegated to `dotenvy`.
/// Returns the number of variables that were applied.
pub fn load_env_file(path: &Path, env: &dyn Env) -> Result<usize> {
    if !path.exists() {
        debug!(path = %path.display(), "No env file found");
        return Ok(0);
    }

    let iter = dotenvy::from_path_iter(path).map_err(|e| Error::EnvFile {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut applied = 0;
    for item in iter {
        let (key, value) = item.map_err(|e| Error::EnvFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        if env.var(&key).is_none() {
            env.set_var(&key, &value);
            applied += 1;
        }
    }

    debug!(path = %path.display(), applied, "Loaded env file");
    Ok(applied)
}
