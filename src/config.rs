use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable naming a JSON palette file.
pub const CONFIG_ENV: &str = "COOLBOX_CONFIG";
/// Environment variable naming the icon directory.
pub const ICON_DIR_ENV: &str = "COOLBOX_ICON_DIR";
pub const DEFAULT_ICON_DIR: &str = "icons";

const BUILTIN_PALETTE: &str = include_str!("../assets/default_palette.json");

/// Errors that can occur while loading a palette configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read palette file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid palette data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Palette has no tools")]
    Empty,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// One tool as written in the palette file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolConfig {
    pub display_name: String,
    pub icon_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_tools: Vec<ToolConfig>,
}

/// The whole palette: tools in strip order plus the long-press delay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteConfig {
    #[serde(default = "default_long_press_ms")]
    pub long_press_ms: u64,
    pub tools: Vec<ToolConfig>,
}

fn default_long_press_ms() -> u64 {
    1000
}

impl PaletteConfig {
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        if config.tools.is_empty() {
            return Err(ConfigError::Empty);
        }
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// The palette shipped with the crate.
    pub fn builtin() -> ConfigResult<Self> {
        Self::from_json_str(BUILTIN_PALETTE)
    }

    /// Palette named by `COOLBOX_CONFIG`, or the built-in one.
    ///
    /// A broken file is logged and replaced by the built-in palette rather than failing startup.
    pub fn from_env() -> ConfigResult<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(&path).or_else(|err| {
                log::warn!("Ignoring {}: {err}", PathBuf::from(&path).display());
                Self::builtin()
            }),
            None => Self::builtin(),
        }
    }

    pub fn long_press(&self) -> Duration {
        Duration::from_millis(self.long_press_ms)
    }

    /// Every action id mentioned anywhere in the palette, in order, without duplicates.
    pub fn action_ids(&self) -> Vec<&str> {
        fn collect<'a>(tools: &'a [ToolConfig], out: &mut Vec<&'a str>) {
            for tool in tools {
                if let Some(id) = tool.action_id.as_deref().filter(|id| !id.is_empty()) {
                    if !out.contains(&id) {
                        out.push(id);
                    }
                }
                collect(&tool.sub_tools, out);
            }
        }

        let mut ids = Vec::new();
        collect(&self.tools, &mut ids);
        ids
    }
}

/// Icon directory named by `COOLBOX_ICON_DIR`, defaulting to `./icons`.
pub fn icon_dir_from_env() -> PathBuf {
    std::env::var_os(ICON_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ICON_DIR))
}
