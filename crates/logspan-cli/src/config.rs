use anyhow::{Context, Result, anyhow};
use logspan_engine::WeekStart;
use logspan_types::DedupStrategy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Resolve the workspace data directory path based on priority:
/// 1. LOGSPAN_PATH environment variable (with tilde expansion)
/// 2. XDG data directory (recommended default)
/// 3. ~/.logspan (fallback for systems without XDG)
pub fn resolve_workspace_path() -> Result<PathBuf> {
    if let Ok(env_path) = std::env::var("LOGSPAN_PATH") {
        return Ok(expand_tilde(&env_path));
    }

    if let Some(data_dir) = dirs::data_dir() {
        return Ok(data_dir.join("logspan"));
    }

    if let Some(home) = std::env::var_os("HOME") {
        return Ok(PathBuf::from(home).join(".logspan"));
    }

    Err(anyhow!(
        "Could not determine workspace path: no HOME directory or XDG data directory found"
    ))
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = std::env::var_os("HOME")
    {
        return PathBuf::from(home).join(stripped);
    }
    PathBuf::from(path)
}

/// Picker defaults applied when the matching CLI flag is absent.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// IANA zone for calendar boundaries; `None` means UTC.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    /// 0-based month the fiscal year starts in (0 = January).
    #[serde(default)]
    pub fiscal_year_start_month: u32,

    #[serde(default)]
    pub week_start: WeekStart,

    #[serde(default)]
    pub default_dedup_strategy: DedupStrategy,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::default_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("invalid config at {}", path.display()))?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("cannot write {}", path.display()))?;
        Ok(())
    }

    pub fn default_path() -> Result<PathBuf> {
        Ok(resolve_workspace_path()?.join("config.toml"))
    }
}
