//! Scrubbable waveform view of a recorded artifact.
//!
//! A `WaveformView` is a derived visual index: min/max peak buckets computed
//! from the decoded samples, normalized to the clip's loudest sample. It is
//! regenerable and never authoritative: discard and rebuild it whenever the
//! artifact changes. Pointer interaction maps to seek *requests* handed to
//! the playback controller; playhead updates driven by the controller flow
//! the other way and never loop back into a seek.

use crate::artifact::{ArtifactId, AudioArtifact};
use crate::audio::wav::DecodedAudio;
use crate::defaults;

/// A request to move the playhead, produced by pointer interaction.
///
/// Carries the originating artifact's identity so requests that outlive
/// their artifact can be rejected downstream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeekRequest {
    pub artifact: ArtifactId,
    pub time_secs: f64,
}

/// Derived peak index over one artifact, plus the visual playhead cursor.
#[derive(Debug, Clone)]
pub struct WaveformView {
    artifact: ArtifactId,
    duration_secs: f64,
    /// Per-bucket (min, max) sample extremes, normalized to `[-1, 1]`.
    peaks: Vec<(f32, f32)>,
    playhead_secs: f64,
}

impl WaveformView {
    /// Build the peak index from a decoded artifact.
    pub fn build(artifact: &AudioArtifact, decoded: &DecodedAudio) -> Self {
        Self::build_with_bars(artifact, decoded, defaults::WAVEFORM_BARS)
    }

    pub fn build_with_bars(
        artifact: &AudioArtifact,
        decoded: &DecodedAudio,
        bars: usize,
    ) -> Self {
        Self {
            artifact: artifact.id(),
            duration_secs: decoded.precise_duration_secs,
            peaks: compute_peaks(&decoded.samples, decoded.channels, bars),
            playhead_secs: 0.0,
        }
    }

    /// Flat view for an artifact whose bytes failed to decode.
    ///
    /// Scrubbing accuracy degrades to the provisional duration, but seek
    /// mapping and the playhead still work.
    pub fn placeholder(artifact: &AudioArtifact, bars: usize) -> Self {
        Self {
            artifact: artifact.id(),
            duration_secs: artifact.duration_secs(),
            peaks: vec![(0.0, 0.0); bars],
            playhead_secs: 0.0,
        }
    }

    /// Identity of the artifact this view was built from.
    pub fn artifact(&self) -> ArtifactId {
        self.artifact
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    pub fn peaks(&self) -> &[(f32, f32)] {
        &self.peaks
    }

    pub fn playhead_secs(&self) -> f64 {
        self.playhead_secs
    }

    /// Map a pointer interaction at normalized `position` in `[0, 1]` to a
    /// seek request at `position * duration`.
    ///
    /// Returns `None` for non-finite positions or an empty clip. Never
    /// mutates playback state itself.
    pub fn seek_from_interaction(&self, position: f64) -> Option<SeekRequest> {
        if !position.is_finite() || self.duration_secs <= 0.0 {
            return None;
        }
        let position = position.clamp(0.0, 1.0);
        Some(SeekRequest {
            artifact: self.artifact,
            time_secs: position * self.duration_secs,
        })
    }

    /// Move the visual cursor to a controller-reported time.
    ///
    /// One-way: this never emits a seek request back to the controller.
    pub fn sync_playhead(&mut self, secs: f64) {
        if secs.is_finite() {
            self.playhead_secs = secs.clamp(0.0, self.duration_secs.max(0.0));
        }
    }

    /// Render the peaks as one terminal row of bar glyphs, with the playhead
    /// column marked.
    pub fn render(&self) -> String {
        const GLYPHS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

        let playhead_col = if self.duration_secs > 0.0 {
            let frac = (self.playhead_secs / self.duration_secs).clamp(0.0, 1.0);
            ((frac * self.peaks.len() as f64) as usize).min(self.peaks.len().saturating_sub(1))
        } else {
            0
        };

        self.peaks
            .iter()
            .enumerate()
            .map(|(i, &(min, max))| {
                if i == playhead_col {
                    return '┃';
                }
                let amplitude = max.max(-min).clamp(0.0, 1.0);
                let level = ((amplitude * GLYPHS.len() as f32) as usize)
                    .min(GLYPHS.len() - 1);
                GLYPHS[level]
            })
            .collect()
    }
}

/// Bucket interleaved samples into `bars` (min, max) pairs, normalized to the
/// clip's loudest sample.
fn compute_peaks(samples: &[i16], channels: u16, bars: usize) -> Vec<(f32, f32)> {
    let channels = channels.max(1) as usize;
    let frames = samples.len() / channels;
    if frames == 0 || bars == 0 {
        return vec![(0.0, 0.0); bars];
    }

    let clip_max = samples
        .iter()
        .map(|&s| (s as i32).abs())
        .max()
        .unwrap_or(0)
        .max(1) as f32;

    (0..bars)
        .map(|bar| {
            let start = bar * frames / bars;
            let end = (((bar + 1) * frames / bars).max(start + 1)).min(frames);

            let mut min = i16::MAX;
            let mut max = i16::MIN;
            for frame in start..end {
                for ch in 0..channels {
                    let s = samples[frame * channels + ch];
                    min = min.min(s);
                    max = max.max(s);
                }
            }
            (min as f32 / clip_max, max as f32 / clip_max)
        })
        .collect()
}

/// Render an input level bar for the live meter shown while recording.
pub fn format_level_bar(level: f32, width: usize) -> String {
    let full = (level / defaults::METER_FULL_SCALE).clamp(0.0, 1.0);
    let filled = (full * width as f32) as usize;

    let mut bar = String::with_capacity(width);
    for i in 0..width {
        bar.push(if i < filled { '█' } else { '░' });
    }
    bar
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::wav::decode_wav_bytes;

    fn make_artifact(samples: &[i16]) -> std::sync::Arc<AudioArtifact> {
        let bytes = crate::audio::wav::encode_wav_bytes(samples, 16000, 1).unwrap();
        AudioArtifact::new(bytes, 1.0)
    }

    fn make_view(samples: &[i16], bars: usize) -> WaveformView {
        let artifact = make_artifact(samples);
        let decoded = decode_wav_bytes(artifact.bytes()).unwrap();
        WaveformView::build_with_bars(&artifact, &decoded, bars)
    }

    #[test]
    fn build_produces_requested_bar_count() {
        let view = make_view(&vec![100i16; 16000], 32);
        assert_eq!(view.peaks().len(), 32);
    }

    #[test]
    fn peaks_are_normalized_to_loudest_sample() {
        let mut samples = vec![0i16; 1000];
        samples[500] = 8000;
        let view = make_view(&samples, 10);

        let global_max = view
            .peaks()
            .iter()
            .map(|&(_, max)| max)
            .fold(0.0f32, f32::max);
        assert!((global_max - 1.0).abs() < 0.001);
    }

    #[test]
    fn peaks_track_negative_extremes() {
        let samples = vec![-5000i16; 1600];
        let view = make_view(&samples, 4);
        assert!(view.peaks().iter().all(|&(min, _)| min < -0.9));
    }

    #[test]
    fn seek_from_interaction_maps_position_times_duration() {
        let view = make_view(&vec![0i16; 16000], 16); // 1.0s clip
        let request = view.seek_from_interaction(0.5).unwrap();
        assert!((request.time_secs - 0.5).abs() < 1e-9);
        assert_eq!(request.artifact, view.artifact());
    }

    #[test]
    fn seek_from_interaction_clamps_position() {
        let view = make_view(&vec![0i16; 16000], 16);
        assert_eq!(view.seek_from_interaction(2.0).unwrap().time_secs, 1.0);
        assert_eq!(view.seek_from_interaction(-1.0).unwrap().time_secs, 0.0);
    }

    #[test]
    fn seek_from_interaction_rejects_non_finite() {
        let view = make_view(&vec![0i16; 16000], 16);
        assert!(view.seek_from_interaction(f64::NAN).is_none());
        assert!(view.seek_from_interaction(f64::INFINITY).is_none());
    }

    #[test]
    fn seek_from_interaction_rejects_empty_clip() {
        let artifact = make_artifact(&[]);
        let view = WaveformView::placeholder(&artifact, 16);
        // placeholder inherits the provisional duration here, so force zero
        let zero = WaveformView {
            duration_secs: 0.0,
            ..view
        };
        assert!(zero.seek_from_interaction(0.5).is_none());
    }

    #[test]
    fn sync_playhead_clamps_and_ignores_non_finite() {
        let mut view = make_view(&vec![0i16; 16000], 16);

        view.sync_playhead(0.25);
        assert_eq!(view.playhead_secs(), 0.25);

        view.sync_playhead(5.0);
        assert_eq!(view.playhead_secs(), 1.0);

        view.sync_playhead(f64::NAN);
        assert_eq!(view.playhead_secs(), 1.0);

        view.sync_playhead(-3.0);
        assert_eq!(view.playhead_secs(), 0.0);
    }

    #[test]
    fn placeholder_uses_provisional_duration_and_flat_peaks() {
        let artifact = AudioArtifact::new(vec![0u8; 8], 4.0);
        let view = WaveformView::placeholder(&artifact, 12);
        assert_eq!(view.duration_secs(), 4.0);
        assert_eq!(view.peaks().len(), 12);
        assert!(view.peaks().iter().all(|&(min, max)| min == 0.0 && max == 0.0));
    }

    #[test]
    fn render_marks_playhead_column() {
        let mut view = make_view(&vec![1000i16; 16000], 16);
        view.sync_playhead(0.0);
        let row = view.render();
        assert_eq!(row.chars().count(), 16);
        assert_eq!(row.chars().next(), Some('┃'));
    }

    #[test]
    fn format_level_bar_scales_with_level() {
        let silent = format_level_bar(0.0, 20);
        assert!(!silent.contains('█'));

        let loud = format_level_bar(1.0, 20);
        assert!(!loud.contains('░'));
        assert_eq!(loud.chars().count(), 20);
    }
}
