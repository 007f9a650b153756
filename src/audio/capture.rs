//! Real microphone capture using CPAL (Cross-Platform Audio Library).

use crate::audio::source::CaptureSource;
use crate::error::{Result, VocapError};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::{Arc, Mutex};

/// Run a closure with stderr temporarily redirected to /dev/null.
///
/// Suppresses noisy ALSA/JACK/PipeWire messages that CPAL triggers while
/// probing audio backends. The messages are harmless but confusing to users.
///
/// # Safety
/// Uses `libc::dup`/`libc::dup2` to save and restore file descriptor 2.
/// Safe as long as no other thread is concurrently manipulating fd 2.
fn with_suppressed_stderr<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    unsafe {
        let saved_fd = libc::dup(2);
        let devnull = libc::open(c"/dev/null".as_ptr(), libc::O_WRONLY);
        if saved_fd >= 0 && devnull >= 0 {
            libc::dup2(devnull, 2);
            libc::close(devnull);
        }

        let result = f();

        if saved_fd >= 0 {
            libc::dup2(saved_fd, 2);
            libc::close(saved_fd);
        }

        result
    }
}

/// Device name patterns that are never useful for voice input.
const FILTERED_PATTERNS: &[&str] = &["surround", "front:", "rear:", "hdmi", "s/pdif"];

fn should_filter_device(name: &str) -> bool {
    let lower = name.to_lowercase();
    FILTERED_PATTERNS.iter().any(|p| lower.contains(p))
}

/// List available audio input devices, filtering obviously unusable ones.
///
/// # Errors
/// Returns `VocapError::AudioCapture` if device enumeration fails.
pub fn list_devices() -> Result<Vec<String>> {
    let devices = with_suppressed_stderr(|| {
        cpal::default_host()
            .input_devices()
            .map(|iter| iter.collect::<Vec<_>>())
    })
    .map_err(|e| VocapError::AudioCapture {
        message: format!("Failed to enumerate input devices: {}", e),
    })?;

    Ok(devices
        .iter()
        .filter_map(|d| d.name().ok())
        .filter(|name| !should_filter_device(name))
        .collect())
}

/// Wrapper for cpal::Stream to make it Send.
///
/// SAFETY: the stream is only accessed through the Mutex in
/// `CpalCaptureSource`, one thread at a time.
struct SendableStream(cpal::Stream);

unsafe impl Send for SendableStream {}

/// Microphone capture at 16kHz mono i16.
///
/// Tries the preferred format first (i16/16kHz/mono), then f32 with
/// conversion, then the device's native config with software downmix and
/// resampling.
pub struct CpalCaptureSource {
    device: cpal::Device,
    stream: Arc<Mutex<Option<SendableStream>>>,
    buffer: Arc<Mutex<Vec<i16>>>,
    sample_rate: u32,
}

impl CpalCaptureSource {
    /// Open a capture source on the named device, or the system default,
    /// producing samples at `sample_rate`.
    ///
    /// # Errors
    /// Returns `AudioDeviceNotFound` when no matching input device exists.
    pub fn new(device_name: Option<&str>, sample_rate: u32) -> Result<Self> {
        let device = with_suppressed_stderr(|| {
            let host = cpal::default_host();

            if let Some(name) = device_name {
                let devices = host
                    .input_devices()
                    .map_err(|e| VocapError::AudioCapture {
                        message: format!("Failed to enumerate devices: {}", e),
                    })?;
                for dev in devices {
                    if let Ok(dev_name) = dev.name()
                        && dev_name == name
                    {
                        return Ok(dev);
                    }
                }
                Err(VocapError::AudioDeviceNotFound {
                    device: name.to_string(),
                })
            } else {
                host.default_input_device()
                    .ok_or_else(|| VocapError::AudioDeviceNotFound {
                        device: "default".to_string(),
                    })
            }
        })?;

        Ok(Self {
            device,
            stream: Arc::new(Mutex::new(None)),
            buffer: Arc::new(Mutex::new(Vec::new())),
            sample_rate,
        })
    }

    fn build_stream(&self) -> Result<cpal::Stream> {
        let preferred_config = cpal::StreamConfig {
            channels: 1,
            sample_rate: cpal::SampleRate(self.sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let err_callback = |err| {
            eprintln!("vocap: audio stream error: {}", err);
        };

        // i16/16kHz/mono; PipeWire/PulseAudio convert transparently
        let buffer = Arc::clone(&self.buffer);
        if let Ok(stream) = self.device.build_input_stream(
            &preferred_config,
            move |data: &[i16], _: &cpal::InputCallbackInfo| {
                if let Ok(mut buf) = buffer.lock() {
                    buf.extend_from_slice(data);
                }
            },
            err_callback,
            None,
        ) {
            return Ok(stream);
        }

        // f32/16kHz/mono, for devices that only expose float formats
        let buffer = Arc::clone(&self.buffer);
        if let Ok(stream) = self.device.build_input_stream(
            &preferred_config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                if let Ok(mut buf) = buffer.lock() {
                    buf.extend(
                        data.iter()
                            .map(|&s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16),
                    );
                }
            },
            err_callback,
            None,
        ) {
            return Ok(stream);
        }

        self.build_stream_native()
    }

    /// Capture at the device's native config, downmixing and resampling in
    /// software. Handles backends that reject non-native configs.
    fn build_stream_native(&self) -> Result<cpal::Stream> {
        use cpal::SampleFormat;

        let default_config =
            self.device
                .default_input_config()
                .map_err(|e| VocapError::AudioCapture {
                    message: format!("Failed to query default input config: {}", e),
                })?;

        let native_rate = default_config.sample_rate().0;
        let native_channels = default_config.channels() as usize;
        let target_rate = self.sample_rate;
        let stream_config: cpal::StreamConfig = default_config.clone().into();

        let err_callback = |err| {
            eprintln!("vocap: audio stream error: {}", err);
        };

        let buffer = Arc::clone(&self.buffer);
        match default_config.sample_format() {
            SampleFormat::I16 => self
                .device
                .build_input_stream(
                    &stream_config,
                    move |data: &[i16], _: &cpal::InputCallbackInfo| {
                        let converted =
                            convert_to_target(data, native_channels, native_rate, target_rate);
                        if let Ok(mut buf) = buffer.lock() {
                            buf.extend_from_slice(&converted);
                        }
                    },
                    err_callback,
                    None,
                )
                .map_err(|e| VocapError::AudioCapture {
                    message: format!("Failed to build native i16 stream: {}", e),
                }),
            SampleFormat::F32 => self
                .device
                .build_input_stream(
                    &stream_config,
                    move |data: &[f32], _: &cpal::InputCallbackInfo| {
                        let i16_data: Vec<i16> = data
                            .iter()
                            .map(|&s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
                            .collect();
                        let converted =
                            convert_to_target(&i16_data, native_channels, native_rate, target_rate);
                        if let Ok(mut buf) = buffer.lock() {
                            buf.extend_from_slice(&converted);
                        }
                    },
                    err_callback,
                    None,
                )
                .map_err(|e| VocapError::AudioCapture {
                    message: format!("Failed to build native f32 stream: {}", e),
                }),
            fmt => Err(VocapError::AudioCapture {
                message: format!("Unsupported native sample format: {:?}", fmt),
            }),
        }
    }
}

/// Mix multi-channel audio to mono and resample to the target rate.
fn convert_to_target(samples: &[i16], channels: usize, source_rate: u32, target_rate: u32) -> Vec<i16> {
    let mono: Vec<i16> = if channels <= 1 {
        samples.to_vec()
    } else {
        samples
            .chunks_exact(channels)
            .map(|frame| {
                let sum: i32 = frame.iter().map(|&s| s as i32).sum();
                (sum / channels as i32) as i16
            })
            .collect()
    };

    if source_rate == target_rate {
        mono
    } else {
        resample(&mono, source_rate, target_rate)
    }
}

/// Simple linear interpolation resampling.
fn resample(samples: &[i16], from_rate: u32, to_rate: u32) -> Vec<i16> {
    if from_rate == to_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let output_len = (samples.len() as f64 / ratio).ceil() as usize;

    (0..output_len)
        .map(|i| {
            let source_pos = i as f64 * ratio;
            let source_idx = source_pos.floor() as usize;
            let fraction = source_pos - source_idx as f64;

            if source_idx + 1 >= samples.len() {
                samples[samples.len() - 1]
            } else {
                let left = samples[source_idx] as f64;
                let right = samples[source_idx + 1] as f64;
                (left + (right - left) * fraction) as i16
            }
        })
        .collect()
}

impl CaptureSource for CpalCaptureSource {
    fn start(&mut self) -> Result<()> {
        {
            let stream_guard = self.stream.lock().map_err(|e| VocapError::AudioCapture {
                message: format!("Failed to lock stream: {}", e),
            })?;
            if stream_guard.is_some() {
                return Ok(()); // Already started
            }
        }

        let stream = self.build_stream()?;
        stream.play().map_err(|e| VocapError::AudioCapture {
            message: format!("Failed to start audio stream: {}", e),
        })?;

        let mut stream_guard = self.stream.lock().map_err(|e| VocapError::AudioCapture {
            message: format!("Failed to lock stream: {}", e),
        })?;
        *stream_guard = Some(SendableStream(stream));
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        let mut stream_guard = self.stream.lock().map_err(|e| VocapError::AudioCapture {
            message: format!("Failed to lock stream: {}", e),
        })?;

        // Dropping the stream closes the hardware handle; a second stop finds
        // nothing to close.
        if let Some(sendable_stream) = stream_guard.take() {
            sendable_stream
                .0
                .pause()
                .map_err(|e| VocapError::AudioCapture {
                    message: format!("Failed to stop audio stream: {}", e),
                })?;
        }
        Ok(())
    }

    fn read_samples(&mut self) -> Result<Vec<i16>> {
        let mut buffer = self.buffer.lock().map_err(|e| VocapError::AudioCapture {
            message: format!("Failed to lock audio buffer: {}", e),
        })?;

        let samples = std::mem::take(&mut *buffer);
        Ok(samples)
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults;

    #[test]
    fn test_should_filter_device() {
        assert!(should_filter_device("surround51"));
        assert!(should_filter_device("front:CARD=PCH"));
        assert!(should_filter_device("HDMI Output"));
        assert!(!should_filter_device("pipewire"));
        assert!(!should_filter_device("Built-in Audio"));
    }

    #[test]
    fn test_create_with_invalid_device_name() {
        let source = CpalCaptureSource::new(Some("NonExistentDevice12345"), defaults::SAMPLE_RATE);
        match source {
            Err(VocapError::AudioDeviceNotFound { device }) => {
                assert_eq!(device, "NonExistentDevice12345");
            }
            // Hosts without any audio backend fail enumeration instead
            Err(VocapError::AudioCapture { .. }) => {}
            _ => panic!("Expected a device lookup failure"),
        }
    }

    #[test]
    fn configured_sample_rate_is_reported() {
        // tolerates hosts without a default input device
        if let Ok(source) = CpalCaptureSource::new(None, 48000) {
            assert_eq!(source.sample_rate(), 48000);
        }
    }

    #[test]
    fn convert_stereo_downmixes_by_averaging() {
        let stereo = vec![100i16, 200, 300, -300];
        let mono = convert_to_target(&stereo, 2, 16000, 16000);
        assert_eq!(mono, vec![150i16, 0]);
    }

    #[test]
    fn resample_identity_same_rate() {
        let samples = vec![100i16, 200, 300];
        assert_eq!(resample(&samples, 16000, 16000), samples);
    }

    #[test]
    fn resample_halves_count_when_downsampling() {
        let samples = vec![0i16; 3200];
        assert_eq!(resample(&samples, 16000, 8000).len(), 1600);
    }

    #[test]
    fn resample_interpolates_when_upsampling() {
        let resampled = resample(&[0i16, 1000, 2000], 8000, 16000);
        assert_eq!(resampled.len(), 6);
        assert_eq!(resampled[0], 0);
        assert!(resampled[1] > 0 && resampled[1] < 1000);
        assert_eq!(resampled[2], 1000);
    }

    #[test]
    fn resample_handles_empty_and_single() {
        assert!(resample(&[], 16000, 8000).is_empty());
        assert_eq!(resample(&[100i16], 16000, 8000), vec![100]);
    }

    #[test]
    #[ignore] // Requires audio hardware
    fn test_capture_start_read_stop() {
        let mut source = CpalCaptureSource::new(None, defaults::SAMPLE_RATE)
            .expect("Failed to create capture source");
        source.start().expect("Failed to start");
        std::thread::sleep(std::time::Duration::from_millis(100));
        let _ = source.read_samples().expect("Failed to read");
        source.stop().expect("Failed to stop");
    }
}
