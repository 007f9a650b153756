//! Recording session management.
//!
//! A session owns a capture source for the duration of one recording and
//! finalizes the buffered samples into a single WAV artifact on stop.

use std::sync::Arc;
use std::time::Instant;

use crate::artifact::AudioArtifact;
use crate::audio::source::CaptureSource;
use crate::audio::wav;
use crate::defaults;
use crate::error::{Result, VocapError};

/// Advisory progress snapshot for UI feedback while recording.
///
/// `elapsed_seconds` is a whole-second wall-clock counter; it is not the
/// authoritative duration (decode is).
#[derive(Debug, Clone, Copy)]
pub struct LevelUpdate {
    pub elapsed_seconds: u32,
    /// RMS input level of the most recent sample block, `[0, 1]`.
    pub level: f32,
}

/// Manages a single recording session over a capture source.
pub struct RecordingSession<S: CaptureSource> {
    source: S,
    is_recording: bool,
    started_at: Option<Instant>,
    elapsed_seconds: u32,
    samples: Vec<i16>,
}

impl<S: CaptureSource> RecordingSession<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            is_recording: false,
            started_at: None,
            elapsed_seconds: 0,
            samples: Vec::new(),
        }
    }

    /// Acquire the microphone and begin capturing.
    ///
    /// # Errors
    /// Returns `VocapError::CapturePermission` when the device cannot be
    /// acquired; the session stays out of the recording state.
    pub fn start(&mut self) -> Result<()> {
        if self.is_recording {
            return Ok(());
        }

        self.source.start().map_err(|e| VocapError::CapturePermission {
            message: e.to_string(),
        })?;

        self.is_recording = true;
        self.started_at = Some(Instant::now());
        self.elapsed_seconds = 0;
        self.samples.clear();
        Ok(())
    }

    pub fn is_recording(&self) -> bool {
        self.is_recording
    }

    /// Current value of the advisory per-second counter.
    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }

    /// Drain buffered samples and refresh the elapsed counter.
    pub fn poll(&mut self) -> Result<LevelUpdate> {
        self.poll_at(Instant::now())
    }

    /// Like [`RecordingSession::poll`], with an explicit clock reading.
    pub fn poll_at(&mut self, now: Instant) -> Result<LevelUpdate> {
        if !self.is_recording {
            return Ok(LevelUpdate {
                elapsed_seconds: self.elapsed_seconds,
                level: 0.0,
            });
        }

        let chunk = self.source.read_samples()?;
        let level = wav::rms_level(&chunk);
        self.samples.extend_from_slice(&chunk);

        if let Some(started_at) = self.started_at {
            self.elapsed_seconds = now.saturating_duration_since(started_at).as_secs() as u32;
        }

        Ok(LevelUpdate {
            elapsed_seconds: self.elapsed_seconds,
            level,
        })
    }

    /// Stop capturing and finalize the artifact.
    ///
    /// The buffered chunks are concatenated into one WAV blob tagged
    /// `audio/wav`, with the wall-clock elapsed seconds as the provisional
    /// duration. Stopping an already-stopped session is a no-op returning
    /// `None`; the device is not stopped twice and no second artifact is
    /// produced.
    pub fn stop(&mut self) -> Result<Option<Arc<AudioArtifact>>> {
        self.stop_at(Instant::now())
    }

    /// Like [`RecordingSession::stop`], with an explicit clock reading.
    pub fn stop_at(&mut self, now: Instant) -> Result<Option<Arc<AudioArtifact>>> {
        if !self.is_recording {
            return Ok(None);
        }
        self.is_recording = false;

        // Drain whatever the device buffered since the last poll
        let tail = self.source.read_samples()?;
        self.samples.extend_from_slice(&tail);

        self.source.stop()?;

        let elapsed = self
            .started_at
            .map(|t| now.saturating_duration_since(t).as_secs())
            .unwrap_or(0);
        self.elapsed_seconds = elapsed as u32;

        let bytes = wav::encode_wav_bytes(
            &std::mem::take(&mut self.samples),
            self.source.sample_rate(),
            defaults::CHANNELS,
        )?;

        Ok(Some(AudioArtifact::new(bytes, elapsed as f64)))
    }

    /// Stop the device without producing an artifact.
    ///
    /// Used when the session is discarded mid-recording; the device handle
    /// must not stay open across re-records.
    pub fn abort(&mut self) -> Result<()> {
        if !self.is_recording {
            return Ok(());
        }
        self.is_recording = false;
        self.samples.clear();
        self.source.stop()
    }

    /// Access the underlying capture source.
    pub fn source(&self) -> &S {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::source::MockCaptureSource;
    use std::time::Duration;

    #[test]
    fn start_failure_surfaces_as_capture_permission() {
        let source = MockCaptureSource::new()
            .with_start_failure()
            .with_error_message("microphone denied");
        let mut session = RecordingSession::new(source);

        let result = session.start();
        assert!(matches!(result, Err(VocapError::CapturePermission { .. })));
        assert!(!session.is_recording());
    }

    #[test]
    fn stop_without_start_produces_no_artifact() {
        let mut session = RecordingSession::new(MockCaptureSource::new());
        assert!(session.stop().unwrap().is_none());
        assert_eq!(session.source().stop_calls(), 0);
    }

    #[test]
    fn double_stop_produces_one_artifact_and_one_device_stop() {
        let mut session = RecordingSession::new(MockCaptureSource::new());
        session.start().unwrap();

        let first = session.stop().unwrap();
        let second = session.stop().unwrap();

        assert!(first.is_some());
        assert!(second.is_none());
        assert_eq!(session.source().stop_calls(), 1);
    }

    #[test]
    fn elapsed_counter_ticks_whole_seconds() {
        let mut session = RecordingSession::new(MockCaptureSource::new());
        session.start().unwrap();
        let started = Instant::now();

        session.poll_at(started + Duration::from_millis(900)).unwrap();
        assert_eq!(session.elapsed_seconds(), 0);

        session.poll_at(started + Duration::from_millis(2100)).unwrap();
        assert!(session.elapsed_seconds() >= 2);
    }

    #[test]
    fn provisional_duration_is_wall_clock_elapsed_seconds() {
        let source = MockCaptureSource::new().with_samples(vec![100i16; 160]);
        let mut session = RecordingSession::new(source);
        session.start().unwrap();
        let started = Instant::now();

        let artifact = session
            .stop_at(started + Duration::from_secs(3))
            .unwrap()
            .expect("artifact");

        assert!(artifact.provisional_duration_secs() >= 3.0);
        assert_eq!(artifact.mime(), "audio/wav");
    }

    #[test]
    fn stopped_artifact_contains_buffered_samples() {
        let source = MockCaptureSource::new().with_samples(vec![500i16; 160]);
        let mut session = RecordingSession::new(source);
        session.start().unwrap();
        session.poll().unwrap();

        let artifact = session.stop().unwrap().expect("artifact");

        // One poll plus the stop-time drain: two blocks of 160 samples
        let decoded = artifact.decode().unwrap();
        assert_eq!(decoded.samples.len(), 320);
        assert!(decoded.samples.iter().all(|&s| s == 500));
    }

    #[test]
    fn poll_reports_input_level() {
        let source = MockCaptureSource::new().with_samples(vec![i16::MAX; 160]);
        let mut session = RecordingSession::new(source);
        session.start().unwrap();

        let update = session.poll().unwrap();
        assert!(update.level > 0.9);
    }

    #[test]
    fn abort_stops_device_and_discards_samples() {
        let source = MockCaptureSource::new().with_samples(vec![1i16; 160]);
        let mut session = RecordingSession::new(source);
        session.start().unwrap();
        session.poll().unwrap();

        session.abort().unwrap();
        assert!(!session.is_recording());
        assert_eq!(session.source().stop_calls(), 1);
        assert!(session.stop().unwrap().is_none());
    }

    #[test]
    fn restart_after_stop_is_allowed() {
        let mut session = RecordingSession::new(MockCaptureSource::new());
        session.start().unwrap();
        assert!(session.stop().unwrap().is_some());

        session.start().unwrap();
        assert!(session.is_recording());
        assert_eq!(session.elapsed_seconds(), 0);
    }
}
