//! The recorder widget: capture, decode, waveform, and playback wired
//! together.
//!
//! One widget owns one capture session and at most one recorded artifact.
//! Decode runs on a background thread and reports back over a channel, so
//! results are tagged with the artifact id and dropped when they arrive
//! after the artifact was replaced or discarded.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::artifact::AudioArtifact;
use crate::audio::session::{LevelUpdate, RecordingSession};
use crate::audio::source::CaptureSource;
use crate::defaults;
use crate::error::{Result, VocapError};
use crate::playback::controller::{PlaybackController, PlaybackState};
use crate::playback::device::{PlaybackDevice, PlaybackEvent};
use crate::waveform::WaveformView;

/// Capture to playback pipeline over one audio artifact.
pub struct RecorderWidget<S: CaptureSource, D: PlaybackDevice> {
    session: RecordingSession<S>,
    artifact: Option<Arc<AudioArtifact>>,
    waveform: Option<WaveformView>,
    controller: PlaybackController<D>,
    decode_tx: Sender<Arc<AudioArtifact>>,
    decode_rx: Receiver<Arc<AudioArtifact>>,
    playback_tx: Sender<PlaybackEvent>,
    playback_rx: Receiver<PlaybackEvent>,
    waveform_bars: usize,
}

impl<S: CaptureSource, D: PlaybackDevice> RecorderWidget<S, D> {
    pub fn new(source: S, device: D) -> Self {
        Self::with_playback_channel(source, device, unbounded())
    }

    /// Build a widget around an existing playback event channel, for
    /// backends that need the sender before the widget exists.
    pub fn with_playback_channel(
        source: S,
        device: D,
        (playback_tx, playback_rx): (Sender<PlaybackEvent>, Receiver<PlaybackEvent>),
    ) -> Self {
        let (decode_tx, decode_rx) = unbounded();
        Self {
            session: RecordingSession::new(source),
            artifact: None,
            waveform: None,
            controller: PlaybackController::new(device),
            decode_tx,
            decode_rx,
            playback_tx,
            playback_rx,
            waveform_bars: defaults::WAVEFORM_BARS,
        }
    }

    /// Override the number of peak buckets waveform views are built with.
    pub fn with_waveform_bars(mut self, bars: usize) -> Self {
        self.waveform_bars = bars.max(1);
        self
    }

    /// Sender for backend playback events. The rodio monitor thread feeds
    /// this; `pump` drains it.
    pub fn playback_sender(&self) -> Sender<PlaybackEvent> {
        self.playback_tx.clone()
    }

    pub fn is_recording(&self) -> bool {
        self.session.is_recording()
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.session.elapsed_seconds()
    }

    pub fn artifact(&self) -> Option<&Arc<AudioArtifact>> {
        self.artifact.as_ref()
    }

    pub fn waveform(&self) -> Option<&WaveformView> {
        self.waveform.as_ref()
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.controller.state()
    }

    pub fn current_time_secs(&self) -> f64 {
        self.controller.current_time_secs()
    }

    /// Duration to display: the playback clip when loaded, otherwise the
    /// artifact's best-known value.
    pub fn duration_secs(&self) -> f64 {
        if self.controller.loaded().is_some() {
            self.controller.duration_secs()
        } else {
            self.artifact.as_ref().map_or(0.0, |a| a.duration_secs())
        }
    }

    /// Begin a new recording, releasing any previous artifact first.
    pub fn start_recording(&mut self) -> Result<()> {
        self.adopt_artifact(None)?;
        self.session.start()
    }

    /// Drain captured samples and report the live input level.
    pub fn poll_recording(&mut self) -> Result<LevelUpdate> {
        self.session.poll()
    }

    /// Finish recording and hand the resulting artifact to the widget.
    pub fn stop_recording(&mut self) -> Result<Option<Arc<AudioArtifact>>> {
        let artifact = self.session.stop()?;
        if let Some(artifact) = &artifact {
            self.adopt_artifact(Some(Arc::clone(artifact)))?;
        }
        Ok(artifact)
    }

    /// Drop the current artifact and everything derived from it.
    pub fn discard(&mut self) -> Result<()> {
        if self.session.is_recording() {
            self.session.abort()?;
        }
        self.adopt_artifact(None)
    }

    /// Replace (or clear) the widget's artifact.
    ///
    /// Adopting starts a background decode; results for any earlier
    /// artifact become stale and are rejected when they surface in `pump`.
    pub fn adopt_artifact(&mut self, artifact: Option<Arc<AudioArtifact>>) -> Result<()> {
        self.controller.unload()?;
        self.waveform = None;
        self.artifact = artifact;

        if let Some(artifact) = &self.artifact {
            let worker = Arc::clone(artifact);
            let tx = self.decode_tx.clone();
            thread::spawn(move || {
                // populates the artifact's decode cache, success or not
                let _ = worker.decode();
                let _ = tx.send(worker);
            });
        }
        Ok(())
    }

    /// Drain pending decode results and playback events.
    pub fn pump(&mut self) -> Result<()> {
        while let Ok(decoded) = self.decode_rx.try_recv() {
            self.absorb_decode(decoded)?;
        }
        while let Ok(event) = self.playback_rx.try_recv() {
            self.absorb_playback_event(event);
        }
        Ok(())
    }

    /// Like `pump`, but waits up to `timeout` for at least one decode
    /// result to arrive before draining.
    pub fn pump_deadline(&mut self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        if let Ok(decoded) = self.decode_rx.recv_deadline(deadline) {
            self.absorb_decode(decoded)?;
        }
        self.pump()
    }

    fn absorb_decode(&mut self, decoded: Arc<AudioArtifact>) -> Result<()> {
        let current = match &self.artifact {
            Some(artifact) if artifact.id() == decoded.id() => Arc::clone(artifact),
            _ => {
                eprintln!("vocap: dropping stale decode result for {}", decoded.id());
                return Ok(());
            }
        };

        match current.decoded() {
            Some(audio) => {
                let drift = (audio.precise_duration_secs
                    - current.provisional_duration_secs())
                .abs();
                if drift > defaults::DURATION_DRIFT_WARN_SECS {
                    eprintln!(
                        "vocap: decoded duration {:.2}s differs from provisional {:.2}s",
                        audio.precise_duration_secs,
                        current.provisional_duration_secs()
                    );
                }
                self.waveform = Some(WaveformView::build_with_bars(
                    &current,
                    audio,
                    self.waveform_bars,
                ));
                self.controller.load(&current, audio)?;
            }
            None => {
                // decode failed, the error is cached on the artifact
                if let Err(e) = current.decode() {
                    eprintln!("vocap: {e}");
                }
                self.waveform = Some(WaveformView::placeholder(&current, self.waveform_bars));
                // degraded mode: hand the raw bytes to the device, which may
                // handle containers the WAV decoder rejected
                if let Err(e) = self.controller.load_raw(&current) {
                    eprintln!("vocap: {e}");
                }
            }
        }
        Ok(())
    }

    fn absorb_playback_event(&mut self, event: PlaybackEvent) {
        if Some(event.artifact()) != self.controller.loaded() {
            return;
        }
        match event {
            PlaybackEvent::Tick { secs, .. } => {
                self.controller.on_tick(secs);
            }
            PlaybackEvent::Ended { end_secs, .. } => {
                self.controller.on_natural_end(end_secs);
            }
        }
        if let Some(waveform) = &mut self.waveform {
            waveform.sync_playhead(self.controller.current_time_secs());
        }
    }

    /// Toggle playback. A rejected resume is reported and leaves the
    /// controller paused.
    pub fn toggle_play_pause(&mut self) {
        if let Err(e) = self.controller.toggle_play_pause() {
            eprintln!("vocap: {e}");
        }
    }

    /// Seek to an absolute time in the loaded clip.
    pub fn seek(&mut self, secs: f64) -> Result<()> {
        self.controller.seek(secs)?;
        if let Some(waveform) = &mut self.waveform {
            waveform.sync_playhead(self.controller.current_time_secs());
        }
        Ok(())
    }

    /// Seek from a pointer interaction on the waveform at normalized
    /// `position` in `[0, 1]`.
    pub fn seek_from_waveform(&mut self, position: f64) -> Result<()> {
        let request = match &self.waveform {
            Some(waveform) => waveform.seek_from_interaction(position),
            None => None,
        };
        let Some(request) = request else {
            return Ok(());
        };
        if Some(request.artifact) != self.artifact.as_ref().map(|a| a.id()) {
            return Ok(());
        }
        self.seek(request.time_secs)
    }

    /// One-line transport summary: play/pause glyph, playhead over duration,
    /// and the available affordances.
    pub fn controls_line(&self) -> String {
        let glyph = match self.playback_state() {
            PlaybackState::Playing => "⏸",
            PlaybackState::Paused => "▶",
            PlaybackState::Stopped => "●",
        };
        format!(
            "{} {} / {}  [d]ownload  [r]e-record",
            glyph,
            crate::format_time(self.current_time_secs()),
            crate::format_time(self.duration_secs()),
        )
    }

    /// Write the artifact's bytes to `path`, or to `recording.wav` in the
    /// current directory when no path is given.
    pub fn download(&self, path: Option<&Path>) -> Result<PathBuf> {
        let artifact = self.artifact.as_ref().ok_or_else(|| VocapError::Other(
            "nothing recorded yet".to_string(),
        ))?;
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(defaults::DOWNLOAD_FILENAME));
        std::fs::write(&path, artifact.bytes()).map_err(|e| VocapError::Export {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(path)
    }
}
