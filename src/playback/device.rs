//! Playback backend trait and its test double.

use crate::artifact::ArtifactId;
use crate::audio::wav::DecodedAudio;
use crate::error::{Result, VocapError};

/// Progress notifications from a playback backend.
///
/// Every event names the artifact it belongs to so consumers can drop
/// events from a clip that has since been discarded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackEvent {
    /// Periodic playhead position report while playing.
    Tick { artifact: ArtifactId, secs: f64 },
    /// The clip ran to its natural end.
    Ended { artifact: ArtifactId, end_secs: f64 },
}

impl PlaybackEvent {
    pub fn artifact(&self) -> ArtifactId {
        match *self {
            PlaybackEvent::Tick { artifact, .. } => artifact,
            PlaybackEvent::Ended { artifact, .. } => artifact,
        }
    }
}

/// Abstraction over an audio output backend.
///
/// The controller drives exactly one loaded clip at a time; `load` replaces
/// any previous clip and leaves the device paused at zero.
pub trait PlaybackDevice: Send {
    /// Prime the device with decoded samples, paused at the start.
    fn load(&mut self, artifact: ArtifactId, decoded: &DecodedAudio) -> Result<()>;

    /// Prime the device with a still-encoded byte blob, paused at the start.
    ///
    /// Fallback for artifacts whose bytes the WAV decoder rejected; backends
    /// with broader container support can still play them. `duration_secs`
    /// is the best known clip length (usually provisional).
    fn load_raw(&mut self, artifact: ArtifactId, bytes: &[u8], duration_secs: f64) -> Result<()>;

    /// Start or continue playing from the current position.
    fn resume(&mut self) -> Result<()>;

    /// Pause, keeping the current position.
    fn pause(&mut self) -> Result<()>;

    /// Move the playhead to `secs`. The caller clamps to the clip bounds.
    fn seek(&mut self, secs: f64) -> Result<()>;

    /// Drop the loaded clip and release the output.
    fn stop(&mut self) -> Result<()>;
}

/// In-memory playback device for tests.
///
/// Records every call and can be configured to fail `resume` or `seek`,
/// mirroring a browser-style device that rejects playback without a user
/// gesture.
#[derive(Debug, Default)]
pub struct MockPlaybackDevice {
    fail_resume: bool,
    fail_seek: bool,
    fail_load_raw: bool,
    loaded: Option<ArtifactId>,
    playing: bool,
    position_secs: f64,
    resume_calls: usize,
    pause_calls: usize,
    seek_calls: usize,
    stop_calls: usize,
}

impl MockPlaybackDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resume_failure(mut self) -> Self {
        self.fail_resume = true;
        self
    }

    pub fn with_seek_failure(mut self) -> Self {
        self.fail_seek = true;
        self
    }

    pub fn with_raw_load_failure(mut self) -> Self {
        self.fail_load_raw = true;
        self
    }

    pub fn loaded(&self) -> Option<ArtifactId> {
        self.loaded
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn position_secs(&self) -> f64 {
        self.position_secs
    }

    pub fn resume_calls(&self) -> usize {
        self.resume_calls
    }

    pub fn pause_calls(&self) -> usize {
        self.pause_calls
    }

    pub fn seek_calls(&self) -> usize {
        self.seek_calls
    }

    pub fn stop_calls(&self) -> usize {
        self.stop_calls
    }
}

impl PlaybackDevice for MockPlaybackDevice {
    fn load(&mut self, artifact: ArtifactId, _decoded: &DecodedAudio) -> Result<()> {
        self.loaded = Some(artifact);
        self.playing = false;
        self.position_secs = 0.0;
        Ok(())
    }

    fn load_raw(&mut self, artifact: ArtifactId, _bytes: &[u8], _duration_secs: f64) -> Result<()> {
        if self.fail_load_raw {
            return Err(VocapError::Playback {
                message: "unsupported container".to_string(),
            });
        }
        self.loaded = Some(artifact);
        self.playing = false;
        self.position_secs = 0.0;
        Ok(())
    }

    fn resume(&mut self) -> Result<()> {
        self.resume_calls += 1;
        if self.fail_resume {
            return Err(VocapError::Playback {
                message: "resume requires a user gesture".to_string(),
            });
        }
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.pause_calls += 1;
        self.playing = false;
        Ok(())
    }

    fn seek(&mut self, secs: f64) -> Result<()> {
        self.seek_calls += 1;
        if self.fail_seek {
            return Err(VocapError::Playback {
                message: "seek unsupported".to_string(),
            });
        }
        self.position_secs = secs;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.stop_calls += 1;
        self.loaded = None;
        self.playing = false;
        self.position_secs = 0.0;
        Ok(())
    }
}
