//! Configuration loading and data folder resolution

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::{Error, Result};

/// Voice session settings, loaded from the `[voice]` table of config.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceSettings {
    /// Remote coaching agent identifier
    #[serde(default = "default_agent_id")]
    pub agent_id: String,

    /// Encoding rate of the remote service's audio stream (Hz).
    /// The playback context is pinned to this rate; a mismatch produces
    /// pitch/speed distortion.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Initial session volume, 0.0-1.0
    #[serde(default = "default_volume")]
    pub volume: f32,
}

fn default_agent_id() -> String {
    "agent_01jzcte6amegrvmax3k84bhwks".to_string()
}

fn default_sample_rate() -> u32 {
    16000
}

fn default_volume() -> f32 {
    0.8
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            agent_id: default_agent_id(),
            sample_rate: default_sample_rate(),
            volume: default_volume(),
        }
    }
}

/// Top-level config file contents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    #[serde(default)]
    pub voice: VoiceSettings,
}

impl Settings {
    /// Parse settings from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config(format!("invalid config file: {}", e)))
    }

    /// Load settings from the platform config file, or defaults when absent
    pub fn load() -> Self {
        match config_file_path() {
            Some(path) if path.exists() => match std::fs::read_to_string(&path) {
                Ok(text) => match Self::from_toml(&text) {
                    Ok(settings) => settings,
                    Err(e) => {
                        tracing::warn!("ignoring unreadable config {}: {}", path.display(), e);
                        Self::default()
                    }
                },
                Err(e) => {
                    tracing::warn!("failed to read config {}: {}", path.display(), e);
                    Self::default()
                }
            },
            _ => Self::default(),
        }
    }
}

/// Data folder resolution, in priority order:
/// 1. Explicit argument (highest priority)
/// 2. Environment variable
/// 3. `data_dir` key in the config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_data_dir(explicit: Option<&str>, env_var_name: &str) -> PathBuf {
    // Priority 1: explicit argument
    if let Some(path) = explicit {
        return PathBuf::from(path);
    }

    // Priority 2: environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        return PathBuf::from(path);
    }

    // Priority 3: config file
    if let Some(dir) = Settings::load().data_dir {
        return dir;
    }

    // Priority 4: OS-dependent default
    default_data_dir()
}

/// Platform config file path (~/.config/telos/config.toml or equivalent)
pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("telos").join("config.toml"))
}

/// OS-dependent default data folder
pub fn default_data_dir() -> PathBuf {
    if cfg!(target_os = "linux") {
        dirs::data_local_dir()
            .map(|d| d.join("telos"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/telos"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("telos"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/telos"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("telos"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\telos"))
    } else {
        PathBuf::from("./telos_data")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = VoiceSettings::default();
        assert_eq!(settings.sample_rate, 16000);
        assert_eq!(settings.volume, 0.8);
        assert!(!settings.agent_id.is_empty());
    }

    #[test]
    fn test_from_toml() {
        let settings = Settings::from_toml(
            r#"
            data_dir = "/tmp/telos-test"

            [voice]
            sample_rate = 24000
            volume = 0.5
            "#,
        )
        .unwrap();

        assert_eq!(settings.data_dir, Some(PathBuf::from("/tmp/telos-test")));
        assert_eq!(settings.voice.sample_rate, 24000);
        assert_eq!(settings.voice.volume, 0.5);
        // agent_id falls back to the default
        assert!(!settings.voice.agent_id.is_empty());
    }

    #[test]
    fn test_from_toml_rejects_garbage() {
        assert!(Settings::from_toml("not [valid").is_err());
    }

    #[test]
    fn test_explicit_argument_wins() {
        let dir = resolve_data_dir(Some("/explicit/path"), "TELOS_TEST_UNSET_VAR");
        assert_eq!(dir, PathBuf::from("/explicit/path"));
    }

    #[test]
    fn test_env_var_beats_default() {
        std::env::set_var("TELOS_TEST_DATA_DIR", "/from/env");
        let dir = resolve_data_dir(None, "TELOS_TEST_DATA_DIR");
        std::env::remove_var("TELOS_TEST_DATA_DIR");
        assert_eq!(dir, PathBuf::from("/from/env"));
    }
}
