use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{CascadeError, TreeCache};

pub const DEFAULT_SELECTOR: &str = "#capaEtapaEducativaContent select";

const SECONDS_PER_DAY: u64 = 86_400;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CascadeConfig {
    /// Matches the `<select>` elements of the cascade, in cascade order.
    #[serde(default = "default_selector")]
    pub selector: String,
    #[serde(default)]
    pub cache: Option<CacheConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    pub path: PathBuf,
    /// Cached result older than this is enumerated again, never expires when absent.
    #[serde(default = "default_max_age_days")]
    pub max_age_days: Option<u64>,
    #[serde(default)]
    pub reload: bool,
}

fn default_selector() -> String {
    DEFAULT_SELECTOR.to_string()
}

fn default_max_age_days() -> Option<u64> {
    Some(1)
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            selector: default_selector(),
            cache: None,
        }
    }
}

impl CascadeConfig {
    pub fn from_json(json: &str) -> Result<Self, CascadeError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CascadeError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

impl CacheConfig {
    pub fn create_cache(&self) -> TreeCache {
        let max_age = self
            .max_age_days
            .map(|days| Duration::from_secs(days.saturating_mul(SECONDS_PER_DAY)));
        TreeCache::new(&self.path)
            .max_age(max_age)
            .reload(self.reload)
    }
}
