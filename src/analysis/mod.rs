//! Feature extraction and score mapping
//!
//! Runs the fixed analysis pipeline over a decoded mono waveform at 22.05 kHz:
//! tempo, onset strength, spectral centroid, RMS energy, harmonic/percussive
//! balance, and spectral bandwidth. Each raw feature (except tempo) is mapped
//! onto a bounded 0-100 score with a fixed linear clamp:
//!
//! ```text
//! score = clamp(0, 100, (raw - offset) / scale * 100)
//! ```
//!
//! The offset/scale constants define the service's compatibility contract and
//! must not be retuned independently of clients.

pub mod features;
pub mod hpss;
pub mod stft;
pub mod tempo;

use crate::audio::{AudioDecoder, Resampler, ANALYSIS_SAMPLE_RATE};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use stft::{Stft, HOP_SIZE};
use tracing::{debug, info};

/// Clamp constants: (offset, scale) per bounded score
const RHYTHM_MAPPING: (f32, f32) = (0.2, 0.8);
const BRIGHTNESS_MAPPING: (f32, f32) = (1000.0, 4000.0);
const ENERGY_MAPPING: (f32, f32) = (0.01, 0.24);
const RICHNESS_MAPPING: (f32, f32) = (1000.0, 2000.0);

/// Six named scores for one analyzed upload.
///
/// `tempo_bpm` is unbounded positive; the other five are clamped to [0, 100].
/// Produced once per request; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub tempo_bpm: f32,
    pub rhythmic_strength: f32,
    pub timbre_brightness: f32,
    pub energy_level: f32,
    pub harmonic_vs_percussive: f32,
    pub timbre_richness: f32,
}

/// Map a raw feature value onto [0, 100] with the fixed linear clamp.
fn clamp_score(raw: f32, (offset, scale): (f32, f32)) -> f32 {
    (((raw - offset) / scale) * 100.0).clamp(0.0, 100.0)
}

/// Map the harmonic/percussive RMS ratio onto [0, 100] via
/// `ratio / (ratio + 1) * 200`, clamped.
///
/// Balanced or harmonic-dominant audio (ratio >= 1) saturates at 100; the
/// score falls below 100 only when percussive energy dominates.
fn dominance_score(ratio: f32) -> f32 {
    (ratio / (ratio + 1.0) * 200.0).clamp(0.0, 100.0)
}

/// Run the full feature-extraction pipeline on an audio file.
///
/// Decode -> resample to 22.05 kHz mono -> STFT -> features -> HPSS -> tempo
/// -> score mapping. Any failure at any step collapses into a single
/// `Error::Analysis`; there are no partial results.
pub fn analyze_file(path: &Path) -> Result<AnalysisResult> {
    if !path.exists() {
        return Err(Error::Analysis(format!(
            "File does not exist: {}",
            path.display()
        )));
    }

    let (raw_samples, source_rate) = AudioDecoder::decode_mono(path)
        .map_err(|e| Error::Analysis(format!("Decode failed: {}", e)))?;

    let samples = Resampler::resample(&raw_samples, source_rate)
        .map_err(|e| Error::Analysis(format!("Resample failed: {}", e)))?;

    let stft = Stft::analysis_default();
    let spectrogram = stft.magnitudes(&samples);
    if spectrogram.is_empty() {
        return Err(Error::Analysis(format!(
            "Audio too short for analysis: {} samples",
            samples.len()
        )));
    }

    // Onset strength and tempo share the onset envelope
    let envelope = features::onset_envelope(&spectrogram);
    let envelope_rate = ANALYSIS_SAMPLE_RATE as f32 / HOP_SIZE as f32;
    let tempo_bpm = tempo::estimate_bpm(&envelope, envelope_rate);
    let onset_strength = features::mean(&envelope);

    let centroid = features::mean(&features::spectral_centroid(
        &spectrogram,
        &stft,
        ANALYSIS_SAMPLE_RATE,
    ));
    let bandwidth = features::mean(&features::spectral_bandwidth(
        &spectrogram,
        &stft,
        ANALYSIS_SAMPLE_RATE,
    ));
    let rms = features::mean(&features::rms_frames(&samples));

    // Harmonic/percussive balance from masked-spectrogram RMS
    let (harmonic, percussive) = hpss::separate(&spectrogram);
    let harmonic_rms = hpss::spectrogram_rms(&harmonic);
    let percussive_rms = hpss::spectrogram_rms(&percussive);
    let ratio = if percussive_rms > 0.0 {
        harmonic_rms / percussive_rms
    } else {
        1.0
    };

    debug!(
        onset_strength,
        centroid, bandwidth, rms, ratio, "Raw feature values"
    );

    let result = AnalysisResult {
        tempo_bpm,
        rhythmic_strength: clamp_score(onset_strength, RHYTHM_MAPPING),
        timbre_brightness: clamp_score(centroid, BRIGHTNESS_MAPPING),
        energy_level: clamp_score(rms, ENERGY_MAPPING),
        harmonic_vs_percussive: dominance_score(ratio),
        timbre_richness: clamp_score(bandwidth, RICHNESS_MAPPING),
    };

    info!(
        tempo_bpm = result.tempo_bpm,
        rhythmic_strength = result.rhythmic_strength,
        timbre_brightness = result.timbre_brightness,
        energy_level = result.energy_level,
        harmonic_vs_percussive = result.harmonic_vs_percussive,
        timbre_richness = result.timbre_richness,
        "Analysis complete"
    );

    Ok(result)
}
