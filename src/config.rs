use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
#[cfg(feature = "cli")]
use std::path::PathBuf;

use crate::defaults;
use crate::error::{Result, VocapError};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub audio: AudioConfig,
    pub waveform: WaveformConfig,
    pub export: ExportConfig,
}

/// Audio capture configuration
///
/// Capture is always downmixed to mono before encoding, so there is no
/// channel count to configure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AudioConfig {
    pub device: Option<String>,
    pub sample_rate: u32,
}

/// Waveform rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WaveformConfig {
    pub bars: usize,
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExportConfig {
    pub filename: String,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            device: None,
            sample_rate: defaults::SAMPLE_RATE,
        }
    }
}

impl Default for WaveformConfig {
    fn default() -> Self {
        Self {
            bars: defaults::WAVEFORM_BARS,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            filename: defaults::DOWNLOAD_FILENAME.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file is missing or contains invalid TOML.
    /// Missing fields use default values.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                VocapError::ConfigFileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                VocapError::Io(e)
            }
        })?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file, falling back to defaults only when
    /// the file does not exist. Invalid TOML is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(VocapError::ConfigFileNotFound { .. }) => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.audio.sample_rate == 0 {
            return Err(VocapError::ConfigInvalidValue {
                key: "audio.sample_rate".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if self.waveform.bars == 0 {
            return Err(VocapError::ConfigInvalidValue {
                key: "waveform.bars".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - VOCAP_AUDIO_DEVICE → audio.device
    /// - VOCAP_EXPORT_FILENAME → export.filename
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(device) = std::env::var("VOCAP_AUDIO_DEVICE")
            && !device.is_empty()
        {
            self.audio.device = Some(device);
        }

        if let Ok(filename) = std::env::var("VOCAP_EXPORT_FILENAME")
            && !filename.is_empty()
        {
            self.export.filename = filename;
        }

        self
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/vocap/config.toml on Linux
    #[cfg(feature = "cli")]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("vocap").join("config.toml"))
    }
}
