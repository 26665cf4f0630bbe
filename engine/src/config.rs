use std::{fs, path::Path, path::PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// What a bulk roll does to the turn cursor when combat is already running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollAllPolicy {
    /// Top of the new order acts next and turn history is dropped.
    #[default]
    RestartAtTop,
    /// Whoever was acting keeps the turn at their new position.
    PreserveActive,
}

fn default_store_dir() -> PathBuf {
    PathBuf::from("encounters")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TrackerConfig {
    /// Fixed dice seed; `None` draws from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub roll_all_while_active: RollAllPolicy,
    #[serde(default = "default_store_dir")]
    pub store_dir: PathBuf,
    /// `tracing` filter directive, e.g. `encounter_engine=debug`.
    #[serde(default)]
    pub log_filter: Option<String>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            seed: None,
            roll_all_while_active: RollAllPolicy::default(),
            store_dir: default_store_dir(),
            log_filter: None,
        }
    }
}

impl TrackerConfig {
    /// Loads YAML (`.yaml`/`.yml`) or JSON (`.json`) by extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&text)
                .with_context(|| format!("failed to parse config YAML: {}", path.display())),
            Some("json") => serde_json::from_str(&text)
                .with_context(|| format!("failed to parse config JSON: {}", path.display())),
            _ => bail!("unsupported config format: {}", path.display()),
        }
    }

    pub fn dice(&self) -> crate::Dice {
        match self.seed {
            Some(seed) => crate::Dice::from_seed(seed),
            None => crate::Dice::from_entropy(),
        }
    }
}
