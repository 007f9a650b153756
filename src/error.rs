//! Error types for vocap.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VocapError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Capture errors
    #[error("Microphone unavailable: {message}")]
    CapturePermission { message: String },

    #[error("Audio device not found: {device}")]
    AudioDeviceNotFound { device: String },

    #[error("Audio capture failed: {message}")]
    AudioCapture { message: String },

    // Decode errors
    #[error("Failed to decode audio: {message}")]
    Decode { message: String },

    // Playback errors
    #[error("Playback rejected: {message}")]
    Playback { message: String },

    // Export errors
    #[error("Failed to export recording to {path}: {message}")]
    Export { path: String, message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, VocapError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_config_file_not_found_display() {
        let error = VocapError::ConfigFileNotFound {
            path: "/path/to/config.toml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found at /path/to/config.toml"
        );
    }

    #[test]
    fn test_capture_permission_display() {
        let error = VocapError::CapturePermission {
            message: "device busy".to_string(),
        };
        assert_eq!(error.to_string(), "Microphone unavailable: device busy");
    }

    #[test]
    fn test_audio_device_not_found_display() {
        let error = VocapError::AudioDeviceNotFound {
            device: "default".to_string(),
        };
        assert_eq!(error.to_string(), "Audio device not found: default");
    }

    #[test]
    fn test_decode_display() {
        let error = VocapError::Decode {
            message: "not a RIFF container".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to decode audio: not a RIFF container"
        );
    }

    #[test]
    fn test_playback_display() {
        let error = VocapError::Playback {
            message: "output device refused resume".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Playback rejected: output device refused resume"
        );
    }

    #[test]
    fn test_export_display() {
        let error = VocapError::Export {
            path: "/tmp/recording.wav".to_string(),
            message: "disk full".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to export recording to /tmp/recording.wav: disk full"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error: VocapError = io_error.into();
        assert!(error.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_toml_error() {
        let toml_str = "invalid = toml = syntax";
        let toml_error = toml::from_str::<toml::Value>(toml_str).unwrap_err();
        let error: VocapError = toml_error.into();
        assert!(error.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<VocapError>();
        assert_sync::<VocapError>();
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<i32> {
            Ok(42)
        }
        assert_eq!(returns_result().unwrap(), 42);
    }
}
