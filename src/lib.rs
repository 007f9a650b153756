//! vocap - Voice capture and review for the terminal
//!
//! Record from the microphone, scrub the waveform, play back and export.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod artifact;
pub mod audio;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod defaults;
pub mod error;
pub mod playback;
pub mod waveform;
pub mod widget;

// Core traits (capture → artifact → playback)
pub use audio::source::{CaptureSource, MockCaptureSource};
pub use playback::device::{MockPlaybackDevice, PlaybackDevice, PlaybackEvent};

// Artifact lifecycle
pub use artifact::{ArtifactId, AudioArtifact};
pub use audio::session::{LevelUpdate, RecordingSession};

// Review surface
pub use playback::controller::{PlaybackController, PlaybackState};
pub use waveform::{SeekRequest, WaveformView};
pub use widget::RecorderWidget;

// Error handling
pub use error::{Result, VocapError};

// Config
pub use config::Config;

/// Format a time in seconds as `m:ss` for display next to the playhead.
pub fn format_time(secs: f64) -> String {
    let secs = if secs.is_finite() { secs.max(0.0) } else { 0.0 };
    let whole = secs as u64;
    format!("{}:{:02}", whole / 60, whole % 60)
}

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_string_starts_with_cargo_version() {
        let ver = version_string();
        assert!(
            ver.starts_with(env!("CARGO_PKG_VERSION")),
            "version_string should start with CARGO_PKG_VERSION, got: {}",
            ver
        );
    }

    #[test]
    fn format_time_renders_minutes_and_seconds() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(7.9), "0:07");
        assert_eq!(format_time(65.0), "1:05");
        assert_eq!(format_time(600.0), "10:00");
    }

    #[test]
    fn format_time_guards_bad_inputs() {
        assert_eq!(format_time(-3.0), "0:00");
        assert_eq!(format_time(f64::NAN), "0:00");
        assert_eq!(format_time(f64::INFINITY), "0:00");
    }
}
