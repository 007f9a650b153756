//! Playback of recorded artifacts.
//!
//! `PlaybackController` owns the play/pause/seek state machine over a
//! `PlaybackDevice` backend. The rodio backend lives behind the `playback`
//! feature; tests drive the controller through `MockPlaybackDevice`.

pub mod controller;
pub mod device;
#[cfg(feature = "playback")]
pub mod rodio;

pub use controller::{PlaybackController, PlaybackState};
pub use device::{MockPlaybackDevice, PlaybackDevice, PlaybackEvent};
#[cfg(feature = "playback")]
pub use rodio::RodioPlayback;
