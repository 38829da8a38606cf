//! Limits applied by the dumper.
//!
//! Loaded from `dump_config.json` with support for an environment variable
//! override.

use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;

pub const BUILTIN_DUMP_CONFIG: &str = include_str!("data/dump_config.json");

pub const CONFIG_PATH_ENV: &str = "VM_DUMP_CONFIG_PATH";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DumpConfig {
    /// Deepest composite the text dump expands.
    pub text_max_depth: usize,
    /// Deepest composite the JSON dump expands. Kept small so consumers
    /// can bound their parse depth.
    pub json_max_depth: usize,
    /// Escaped characters kept from a string before it is cut off.
    pub string_preview_chars: usize,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            text_max_depth: 128,
            json_max_depth: 32,
            string_preview_chars: 200,
        }
    }
}

impl DumpConfig {
    pub fn builtin() -> Self {
        Self::from_json_str(BUILTIN_DUMP_CONFIG).unwrap_or_default()
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_file(path: &Path) -> Result<Self, DumpConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| DumpConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = DumpConfig::from_json_str(&contents)?;
        Ok(config)
    }
}

#[derive(Debug, Error)]
pub enum DumpConfigError {
    #[error("failed to parse dump config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read dump config from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Loads the config named by `VM_DUMP_CONFIG_PATH`, falling back to the
/// builtin limits.
pub fn load_dump_config_from_env() -> DumpConfig {
    let Some(path) = env::var_os(CONFIG_PATH_ENV).map(PathBuf::from) else {
        tracing::debug!(target: "vm_dump::config", "dump_config.loaded=builtin");
        return DumpConfig::builtin();
    };

    match DumpConfig::from_file(&path) {
        Ok(config) => {
            tracing::info!(
                target: "vm_dump::config",
                path = %path.display(),
                "dump_config.loaded=file"
            );
            config
        }
        Err(err) => {
            tracing::warn!(
                target: "vm_dump::config",
                path = %path.display(),
                error = %err,
                "dump_config.load_failed"
            );
            DumpConfig::builtin()
        }
    }
}
