use std::path::Path;

use anyhow::{Context, Result};

use super::types::Config;

/// Name of the config file looked up in the working directory.
pub const CONFIG_FILE: &str = ".ctrcli";

/// Load config from a `.ctrcli` file in the given directory.
///
/// A missing file yields the defaults; an unreadable or malformed one is an
/// error.
pub fn load(dir: &Path) -> Result<Config> {
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(Config::default());
    }
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config: Config = serde_yaml::from_str(&contents)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(config)
}
