//! Rodio-backed playback device.
//!
//! Owns an output stream and one sink per loaded clip. A monitor thread
//! watches the sink and forwards playhead ticks and the natural-end event
//! over a channel, tagged with the clip's artifact id.

use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use crossbeam_channel::Sender;
use rodio::buffer::SamplesBuffer;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};

use crate::artifact::ArtifactId;
use crate::audio::wav::DecodedAudio;
use crate::error::{Result, VocapError};
use crate::playback::device::{PlaybackDevice, PlaybackEvent};

const MONITOR_INTERVAL: Duration = Duration::from_millis(100);

/// Rodio `OutputStream` is tied to its audio callback and is not `Send`.
/// We only ever keep it alive from the owning struct, never touch it from
/// another thread.
struct SendableOutputStream(#[allow(dead_code)] OutputStream);

unsafe impl Send for SendableOutputStream {}

enum ClipData {
    Pcm {
        channels: u16,
        sample_rate: u32,
        samples: Vec<i16>,
    },
    /// Raw bytes the WAV decoder rejected; rodio's own decoder gets a try.
    Encoded(Vec<u8>),
}

struct LoadedClip {
    artifact: ArtifactId,
    data: ClipData,
    duration_secs: f64,
}

pub struct RodioPlayback {
    _stream: SendableOutputStream,
    handle: OutputStreamHandle,
    sink: Option<Arc<Sink>>,
    clip: Option<LoadedClip>,
    events: Sender<PlaybackEvent>,
    monitor_cancel: Option<Arc<AtomicBool>>,
}

impl RodioPlayback {
    /// Open the default output device. Events produced by the monitor thread
    /// arrive on `events`.
    pub fn new(events: Sender<PlaybackEvent>) -> Result<Self> {
        let (stream, handle) = OutputStream::try_default().map_err(|e| VocapError::Playback {
            message: format!("no audio output available: {e}"),
        })?;
        Ok(Self {
            _stream: SendableOutputStream(stream),
            handle,
            sink: None,
            clip: None,
            events,
            monitor_cancel: None,
        })
    }

    fn cancel_monitor(&mut self) {
        if let Some(cancel) = self.monitor_cancel.take() {
            cancel.store(true, Ordering::Relaxed);
        }
    }

    fn spawn_monitor(&mut self, sink: Arc<Sink>, artifact: ArtifactId, duration_secs: f64) {
        self.cancel_monitor();
        let cancel = Arc::new(AtomicBool::new(false));
        self.monitor_cancel = Some(Arc::clone(&cancel));

        let events = self.events.clone();
        thread::spawn(move || {
            loop {
                thread::sleep(MONITOR_INTERVAL);
                if cancel.load(Ordering::Relaxed) {
                    break;
                }
                if sink.empty() {
                    let _ = events.send(PlaybackEvent::Ended {
                        artifact,
                        end_secs: duration_secs,
                    });
                    break;
                }
                if !sink.is_paused() {
                    let _ = events.send(PlaybackEvent::Tick {
                        artifact,
                        secs: sink.get_pos().as_secs_f64(),
                    });
                }
            }
        });
    }

    /// Queue the clip's samples into a fresh sink, paused at the start.
    fn queue_clip(&mut self) -> Result<Arc<Sink>> {
        let clip = self.clip.as_ref().ok_or_else(|| VocapError::Playback {
            message: "no clip loaded".to_string(),
        })?;

        let sink = Sink::try_new(&self.handle).map_err(|e| VocapError::Playback {
            message: format!("failed to open sink: {e}"),
        })?;
        sink.pause();
        match &clip.data {
            ClipData::Pcm {
                channels,
                sample_rate,
                samples,
            } => {
                sink.append(SamplesBuffer::new(*channels, *sample_rate, samples.clone()));
            }
            ClipData::Encoded(bytes) => {
                let decoder = Decoder::new(Cursor::new(bytes.clone())).map_err(|e| {
                    VocapError::Playback {
                        message: format!("unplayable clip: {e}"),
                    }
                })?;
                sink.append(decoder);
            }
        }

        let sink = Arc::new(sink);
        self.sink = Some(Arc::clone(&sink));
        self.spawn_monitor(Arc::clone(&sink), clip.artifact, clip.duration_secs);
        Ok(sink)
    }
}

impl PlaybackDevice for RodioPlayback {
    fn load(&mut self, artifact: ArtifactId, decoded: &DecodedAudio) -> Result<()> {
        self.stop()?;
        self.clip = Some(LoadedClip {
            artifact,
            data: ClipData::Pcm {
                channels: decoded.channels,
                sample_rate: decoded.sample_rate,
                samples: decoded.samples.clone(),
            },
            duration_secs: decoded.precise_duration_secs,
        });
        self.queue_clip()?;
        Ok(())
    }

    fn load_raw(&mut self, artifact: ArtifactId, bytes: &[u8], duration_secs: f64) -> Result<()> {
        self.stop()?;
        self.clip = Some(LoadedClip {
            artifact,
            data: ClipData::Encoded(bytes.to_vec()),
            duration_secs,
        });
        if let Err(e) = self.queue_clip() {
            self.clip = None;
            return Err(e);
        }
        Ok(())
    }

    fn resume(&mut self) -> Result<()> {
        // A drained sink means the clip ran to its end; re-queue so the
        // next play starts over.
        let sink = match self.sink.as_ref() {
            Some(sink) if !sink.empty() => Arc::clone(sink),
            _ => self.queue_clip()?,
        };
        sink.play();
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
        Ok(())
    }

    fn seek(&mut self, secs: f64) -> Result<()> {
        let sink = match self.sink.as_ref() {
            Some(sink) if !sink.empty() => Arc::clone(sink),
            _ => self.queue_clip()?,
        };
        sink.try_seek(Duration::from_secs_f64(secs.max(0.0)))
            .map_err(|e| VocapError::Playback {
                message: format!("seek failed: {e}"),
            })
    }

    fn stop(&mut self) -> Result<()> {
        self.cancel_monitor();
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.clip = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::AudioArtifact;
    use crate::audio::wav::decode_wav_bytes;

    // Needs a real output device.
    #[test]
    #[ignore]
    fn load_and_toggle_on_hardware() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut device = RodioPlayback::new(tx).unwrap();

        let bytes = crate::audio::wav::encode_wav_bytes(&[0i16; 8000], 16000, 1).unwrap();
        let artifact = AudioArtifact::new(bytes, 0.5);
        let decoded = decode_wav_bytes(artifact.bytes()).unwrap();

        device.load(artifact.id(), &decoded).unwrap();
        device.resume().unwrap();

        // the clip is half a second long, the end event should arrive
        let event = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(event.artifact(), artifact.id());
    }
}
