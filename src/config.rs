use crate::error::PolyfillError;
use crate::resolver::DEFAULT_CONTAINER_TAG;

use std::fs::read_to_string;
use std::path::Path;

/// Quiet period after the last resize before the page is parsed again
pub const DEFAULT_RESIZE_DELAY_MS: u64 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub resize_delay_ms: u64,
    /// Reuse sources extracted by an earlier pass
    pub read_from_cache: bool,
    pub container_tag: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            resize_delay_ms: DEFAULT_RESIZE_DELAY_MS,
            read_from_cache: true,
            container_tag: DEFAULT_CONTAINER_TAG.to_owned(),
        }
    }
}

impl Config {
    /// Read a JSON config file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, PolyfillError> {
        let config: Config = serde_json::from_str(&read_to_string(path)?)?;
        debug!("Loaded config from {}: {:?}", path.to_string_lossy(), config);
        Ok(config)
    }
}
