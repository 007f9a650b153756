//! Audio capture and WAV coding.

#[cfg(feature = "cpal-audio")]
pub mod capture;
pub mod session;
pub mod source;
pub mod wav;
