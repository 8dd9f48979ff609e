use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use dirs::home_dir;

use crate::currency::{Currency, RateTable};
use crate::errors::{Result, TrackerError};
use crate::utils::persistence::{ensure_dir, write_atomic};

const DEFAULT_DIR_NAME: &str = ".finance_tracker";
const CONFIG_FILE: &str = "config.json";

/// User-level settings persisted next to the tracker data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub display_currency: Currency,
    /// Overrides the built-in rates, keyed by currency code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rates: Option<BTreeMap<String, f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            display_currency: Currency::default(),
            rates: None,
            data_dir: None,
        }
    }
}

impl TrackerConfig {
    /// The validated rate table, falling back to the built-in one.
    pub fn rate_table(&self) -> Result<RateTable> {
        match &self.rates {
            Some(rates) => {
                RateTable::from_codes(rates.iter().map(|(code, rate)| (code.as_str(), *rate)))
            }
            None => Ok(RateTable::standard().clone()),
        }
    }

    /// The configured data directory, or `~/.finance_tracker`.
    pub fn resolved_data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_base_dir(),
        }
    }
}

fn default_base_dir() -> Result<PathBuf> {
    home_dir()
        .map(|home| home.join(DEFAULT_DIR_NAME))
        .ok_or_else(|| TrackerError::Config("unable to resolve home directory".into()))
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn with_base_dir(base: impl Into<PathBuf>) -> Result<Self> {
        let base = base.into();
        ensure_dir(&base)?;
        Ok(Self {
            path: base.join(CONFIG_FILE),
        })
    }

    /// Returns defaults when no config file has been written yet.
    pub fn load(&self) -> Result<TrackerConfig> {
        if !self.path.exists() {
            return Ok(TrackerConfig::default());
        }
        let data = fs::read_to_string(&self.path)?;
        serde_json::from_str(&data).map_err(|err| {
            TrackerError::Config(format!("{}: {}", self.path.display(), err))
        })
    }

    pub fn save(&self, config: &TrackerConfig) -> Result<()> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
