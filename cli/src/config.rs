use std::path::PathBuf;

use anyhow::Result;
use serde::Deserialize;

/// Defaults read from `~/.gitlogstats.toml`. Command-line flags win.
#[derive(Debug, Default, Deserialize)]
pub struct StatsConfig {
    pub format: Option<String>,
    pub exclusions: Option<Vec<String>>,
    pub repos_dir: Option<PathBuf>,
    pub clean: Option<bool>,
    pub color: Option<bool>,
}

pub fn load() -> StatsConfig {
    try_load().unwrap_or_default()
}

fn try_load() -> Result<StatsConfig> {
    let home = std::env::var_os("HOME")
        .map(PathBuf::from)
        .ok_or_else(|| anyhow::anyhow!("HOME not set"))?;
    let config_path = home.join(".gitlogstats.toml");
    if !config_path.exists() {
        return Ok(StatsConfig::default());
    }
    let content = std::fs::read_to_string(&config_path)?;
    let config: StatsConfig = toml::from_str(&content)?;
    Ok(config)
}
