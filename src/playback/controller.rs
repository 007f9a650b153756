//! Play/pause/seek state machine over a playback backend.

use std::sync::Arc;

use crate::artifact::{ArtifactId, AudioArtifact};
use crate::audio::wav::DecodedAudio;
use crate::error::Result;

/// Where the controller is in the playback lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// No clip loaded.
    Stopped,
    Playing,
    Paused,
}

/// Drives one loaded clip through a `PlaybackDevice`.
///
/// Holds the current playhead time and the clip duration used for clamping.
/// The duration starts from the artifact (usually provisional) and is
/// re-clamped when decode later supplies the precise value.
pub struct PlaybackController<D> {
    device: D,
    state: PlaybackState,
    loaded: Option<ArtifactId>,
    current_time_secs: f64,
    duration_secs: f64,
}

impl<D: super::PlaybackDevice> PlaybackController<D> {
    pub fn new(device: D) -> Self {
        Self {
            device,
            state: PlaybackState::Stopped,
            loaded: None,
            current_time_secs: 0.0,
            duration_secs: 0.0,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn loaded(&self) -> Option<ArtifactId> {
        self.loaded
    }

    pub fn current_time_secs(&self) -> f64 {
        self.current_time_secs
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    /// Load a clip, replacing any previous one. Lands in `Paused` at zero.
    pub fn load(&mut self, artifact: &Arc<AudioArtifact>, decoded: &DecodedAudio) -> Result<()> {
        self.device.load(artifact.id(), decoded)?;
        self.state = PlaybackState::Paused;
        self.loaded = Some(artifact.id());
        self.current_time_secs = 0.0;
        self.duration_secs = decoded.precise_duration_secs;
        Ok(())
    }

    /// Load a clip from its raw bytes when no decoded samples exist.
    ///
    /// The artifact's best known duration (usually provisional) becomes the
    /// clamping bound until a later `set_duration` corrects it.
    pub fn load_raw(&mut self, artifact: &Arc<AudioArtifact>) -> Result<()> {
        self.device
            .load_raw(artifact.id(), artifact.bytes(), artifact.duration_secs())?;
        self.state = PlaybackState::Paused;
        self.loaded = Some(artifact.id());
        self.current_time_secs = 0.0;
        self.duration_secs = artifact.duration_secs();
        Ok(())
    }

    /// Flip between `Playing` and `Paused`.
    ///
    /// A rejected resume leaves the controller in `Paused`, so the reported
    /// state never disagrees with the device. No-op while `Stopped`.
    pub fn toggle_play_pause(&mut self) -> Result<()> {
        match self.state {
            PlaybackState::Stopped => Ok(()),
            PlaybackState::Paused => {
                self.device.resume()?;
                self.state = PlaybackState::Playing;
                Ok(())
            }
            PlaybackState::Playing => {
                self.device.pause()?;
                self.state = PlaybackState::Paused;
                Ok(())
            }
        }
    }

    /// Move the playhead to `secs`, clamped to the clip bounds.
    ///
    /// Non-finite targets are ignored. Seeking does not change the
    /// play/pause state.
    pub fn seek(&mut self, secs: f64) -> Result<()> {
        if self.state == PlaybackState::Stopped || !secs.is_finite() {
            return Ok(());
        }
        let secs = secs.clamp(0.0, self.duration_secs.max(0.0));
        self.device.seek(secs)?;
        self.current_time_secs = secs;
        Ok(())
    }

    /// Absorb a playhead progress report from the backend.
    ///
    /// Applied only while `Playing`: a monitor tick racing a pause or seek
    /// must not move the paused playhead.
    pub fn on_tick(&mut self, secs: f64) {
        if self.state == PlaybackState::Playing && secs.is_finite() {
            self.current_time_secs = secs.clamp(0.0, self.duration_secs.max(0.0));
        }
    }

    /// The clip ran out. Lands in `Paused` with the playhead pinned to the
    /// reported end position; where a later resume starts from is up to the
    /// device (the rodio backend re-queues the clip from the beginning).
    pub fn on_natural_end(&mut self, end_secs: f64) {
        if self.state != PlaybackState::Playing {
            return;
        }
        self.state = PlaybackState::Paused;
        if end_secs.is_finite() {
            self.current_time_secs = end_secs.clamp(0.0, self.duration_secs.max(0.0));
        }
    }

    /// Replace the clip duration, typically when decode corrects a
    /// provisional value. The playhead is re-clamped to the new bounds.
    pub fn set_duration(&mut self, duration_secs: f64) {
        if !duration_secs.is_finite() || duration_secs < 0.0 {
            return;
        }
        self.duration_secs = duration_secs;
        self.current_time_secs = self.current_time_secs.clamp(0.0, duration_secs);
    }

    /// Drop the loaded clip and return to `Stopped`.
    pub fn unload(&mut self) -> Result<()> {
        if self.state == PlaybackState::Stopped {
            return Ok(());
        }
        self.device.stop()?;
        self.state = PlaybackState::Stopped;
        self.loaded = None;
        self.current_time_secs = 0.0;
        self.duration_secs = 0.0;
        Ok(())
    }
}
