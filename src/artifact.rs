//! Finalized recording artifacts.
//!
//! An [`AudioArtifact`] is the immutable result of a completed recording: one
//! WAV-encoded byte blob plus duration metadata. It is shared by reference
//! (`Arc`) between the widget, the decoder, and the waveform view, and is
//! never mutated after creation. Decoding runs at most once per artifact and
//! its outcome is cached here.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use crate::audio::wav::{DecodedAudio, decode_wav_bytes};
use crate::defaults;
use crate::error::{Result, VocapError};

/// Identity of a distinct artifact.
///
/// Completion messages (decode results, playback ticks) carry the id of the
/// artifact they originated from so stale results for a superseded artifact
/// can be rejected instead of blindly applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArtifactId(u64);

static NEXT_ARTIFACT_ID: AtomicU64 = AtomicU64::new(1);

impl ArtifactId {
    fn next() -> Self {
        Self(NEXT_ARTIFACT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "artifact#{}", self.0)
    }
}

/// The immutable result of a completed recording.
pub struct AudioArtifact {
    id: ArtifactId,
    bytes: Arc<[u8]>,
    mime: &'static str,
    provisional_duration_secs: f64,
    decoded: OnceLock<std::result::Result<DecodedAudio, String>>,
}

impl AudioArtifact {
    /// Wrap a finished WAV blob into an artifact.
    ///
    /// `provisional_duration_secs` is the wall-clock estimate of the
    /// recording length, valid until corrected by [`AudioArtifact::decode`].
    pub fn new(bytes: Vec<u8>, provisional_duration_secs: f64) -> Arc<Self> {
        Arc::new(Self {
            id: ArtifactId::next(),
            bytes: bytes.into(),
            mime: defaults::ARTIFACT_MIME,
            provisional_duration_secs,
            decoded: OnceLock::new(),
        })
    }

    pub fn id(&self) -> ArtifactId {
        self.id
    }

    /// The raw encoded bytes of the recording.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// MIME type of the blob. Fixed at creation, always `audio/wav`.
    pub fn mime(&self) -> &'static str {
        self.mime
    }

    /// Wall-clock estimate of the recording length in seconds.
    pub fn provisional_duration_secs(&self) -> f64 {
        self.provisional_duration_secs
    }

    /// Decode the blob, computing the sample-accurate duration.
    ///
    /// The first call performs the decode; every later call (including
    /// concurrent ones, which block on the first) returns the cached result.
    /// A failed decode is cached too; malformed bytes stay malformed.
    ///
    /// # Errors
    /// Returns `VocapError::Decode` if the bytes are not a decodable WAV
    /// container. The artifact then keeps its provisional duration.
    pub fn decode(&self) -> Result<&DecodedAudio> {
        let outcome = self
            .decoded
            .get_or_init(|| decode_wav_bytes(&self.bytes).map_err(|e| e.to_string()));
        match outcome {
            Ok(audio) => Ok(audio),
            Err(message) => Err(VocapError::Decode {
                message: message.clone(),
            }),
        }
    }

    /// The cached decode result, if a successful decode already happened.
    pub fn decoded(&self) -> Option<&DecodedAudio> {
        self.decoded.get().and_then(|r| r.as_ref().ok())
    }

    /// Best known duration: sample-accurate when decoded, provisional until
    /// then (or forever, when the blob is undecodable).
    pub fn duration_secs(&self) -> f64 {
        self.decoded()
            .map(|d| d.precise_duration_secs)
            .unwrap_or(self.provisional_duration_secs)
    }
}

impl fmt::Debug for AudioArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioArtifact")
            .field("id", &self.id)
            .field("mime", &self.mime)
            .field("bytes", &self.bytes.len())
            .field("provisional_duration_secs", &self.provisional_duration_secs)
            .field("decoded", &self.decoded.get().is_some())
            .finish()
    }
}
