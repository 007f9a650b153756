//! Capture source abstraction.
//!
//! The trait allows swapping implementations (real microphone vs mock).

use crate::defaults;
use crate::error::{Result, VocapError};

/// A device that produces raw PCM audio while recording.
pub trait CaptureSource: Send {
    /// Acquire the device and start capturing.
    ///
    /// # Errors
    /// Fails when the microphone cannot be acquired (busy, denied,
    /// unsupported). The caller must not treat the session as recording.
    fn start(&mut self) -> Result<()>;

    /// Stop capturing and release the hardware stream.
    fn stop(&mut self) -> Result<()>;

    /// Drain the samples buffered since the last read.
    fn read_samples(&mut self) -> Result<Vec<i16>>;

    /// Sample rate of the produced PCM data.
    fn sample_rate(&self) -> u32 {
        defaults::SAMPLE_RATE
    }
}

/// Mock capture source for testing.
#[derive(Debug, Clone)]
pub struct MockCaptureSource {
    is_started: bool,
    samples: Vec<i16>,
    should_fail_start: bool,
    should_fail_stop: bool,
    error_message: String,
    stop_calls: u32,
}

impl MockCaptureSource {
    pub fn new() -> Self {
        Self {
            is_started: false,
            samples: vec![0i16; 160],
            should_fail_start: false,
            should_fail_stop: false,
            error_message: "mock capture error".to_string(),
            stop_calls: 0,
        }
    }

    /// Configure the mock to return specific samples on every read.
    pub fn with_samples(mut self, samples: Vec<i16>) -> Self {
        self.samples = samples;
        self
    }

    /// Configure the mock to fail on start.
    pub fn with_start_failure(mut self) -> Self {
        self.should_fail_start = true;
        self
    }

    /// Configure the mock to fail on stop.
    pub fn with_stop_failure(mut self) -> Self {
        self.should_fail_stop = true;
        self
    }

    /// Configure the error message for failures.
    pub fn with_error_message(mut self, message: &str) -> Self {
        self.error_message = message.to_string();
        self
    }

    pub fn is_started(&self) -> bool {
        self.is_started
    }

    /// How many times `stop()` was invoked on the device.
    pub fn stop_calls(&self) -> u32 {
        self.stop_calls
    }
}

impl Default for MockCaptureSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureSource for MockCaptureSource {
    fn start(&mut self) -> Result<()> {
        if self.should_fail_start {
            Err(VocapError::AudioCapture {
                message: self.error_message.clone(),
            })
        } else {
            self.is_started = true;
            Ok(())
        }
    }

    fn stop(&mut self) -> Result<()> {
        self.stop_calls += 1;
        if self.should_fail_stop {
            Err(VocapError::AudioCapture {
                message: self.error_message.clone(),
            })
        } else {
            self.is_started = false;
            Ok(())
        }
    }

    fn read_samples(&mut self) -> Result<Vec<i16>> {
        Ok(self.samples.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_returns_configured_samples() {
        let test_samples = vec![100i16, 200, 300];
        let mut source = MockCaptureSource::new().with_samples(test_samples.clone());

        assert_eq!(source.read_samples().unwrap(), test_samples);
    }

    #[test]
    fn mock_start_stop_state_management() {
        let mut source = MockCaptureSource::new();
        assert!(!source.is_started());

        source.start().unwrap();
        assert!(source.is_started());

        source.stop().unwrap();
        assert!(!source.is_started());
        assert_eq!(source.stop_calls(), 1);
    }

    #[test]
    fn mock_start_failure_keeps_source_stopped() {
        let mut source = MockCaptureSource::new()
            .with_start_failure()
            .with_error_message("device busy");

        let result = source.start();
        assert!(!source.is_started());
        match result {
            Err(VocapError::AudioCapture { message }) => assert_eq!(message, "device busy"),
            _ => panic!("Expected AudioCapture error"),
        }
    }

    #[test]
    fn mock_stop_failure_counts_the_call() {
        let mut source = MockCaptureSource::new().with_stop_failure();
        source.start().unwrap();

        assert!(source.stop().is_err());
        assert_eq!(source.stop_calls(), 1);
    }

    #[test]
    fn trait_is_object_safe() {
        let mut source: Box<dyn CaptureSource> =
            Box::new(MockCaptureSource::new().with_samples(vec![1i16, 2, 3]));

        assert!(source.start().is_ok());
        assert_eq!(source.read_samples().unwrap(), vec![1i16, 2, 3]);
        assert!(source.stop().is_ok());
    }

    #[test]
    fn default_sample_rate_is_16khz() {
        let source = MockCaptureSource::new();
        assert_eq!(source.sample_rate(), 16000);
    }
}
