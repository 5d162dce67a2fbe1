//! State persistence configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// State persistence configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Enable state persistence.
    #[serde(default = "default_persistence_enabled")]
    pub enabled: bool,
    /// Path of the JSON state file.
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            enabled: default_persistence_enabled(),
            state_file: default_state_file(),
        }
    }
}

const fn default_persistence_enabled() -> bool {
    true
}

fn default_state_file() -> PathBuf {
    PathBuf::from("./data/oms_state.json")
}
