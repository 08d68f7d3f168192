//! Harmonic/percussive source separation
//!
//! Median-filtering HPSS on the magnitude spectrogram: harmonic content is
//! smooth along time, percussive content is smooth along frequency. Soft
//! Wiener masks (power 2) split the spectrogram; the caller compares the
//! per-frame RMS of the two masked spectrograms.

use crate::analysis::stft::Spectrogram;

/// Median filter kernel length for both axes
const KERNEL_SIZE: usize = 31;

/// Separate a magnitude spectrogram into harmonic and percussive components.
///
/// Returns `(harmonic, percussive)` masked magnitude spectrograms with the
/// same shape as the input.
pub fn separate(spectrogram: &Spectrogram) -> (Spectrogram, Spectrogram) {
    if spectrogram.is_empty() {
        return (Vec::new(), Vec::new());
    }

    let num_frames = spectrogram.len();
    let num_bins = spectrogram[0].len();

    // Harmonic-enhanced: median along the time axis per bin
    let mut harmonic_ref = vec![vec![0.0f32; num_bins]; num_frames];
    let mut column = vec![0.0f32; num_frames];
    for bin in 0..num_bins {
        for (t, frame) in spectrogram.iter().enumerate() {
            column[t] = frame[bin];
        }
        let filtered = median_filter(&column, KERNEL_SIZE);
        for (t, value) in filtered.into_iter().enumerate() {
            harmonic_ref[t][bin] = value;
        }
    }

    // Percussive-enhanced: median along the frequency axis per frame
    let percussive_ref: Vec<Vec<f32>> = spectrogram
        .iter()
        .map(|frame| median_filter(frame, KERNEL_SIZE))
        .collect();

    // Soft Wiener masks with power 2
    let mut harmonic = vec![vec![0.0f32; num_bins]; num_frames];
    let mut percussive = vec![vec![0.0f32; num_bins]; num_frames];

    for t in 0..num_frames {
        for k in 0..num_bins {
            let h2 = harmonic_ref[t][k] * harmonic_ref[t][k];
            let p2 = percussive_ref[t][k] * percussive_ref[t][k];
            let total = h2 + p2;
            if total > f32::EPSILON {
                let magnitude = spectrogram[t][k];
                harmonic[t][k] = magnitude * (h2 / total);
                percussive[t][k] = magnitude * (p2 / total);
            }
        }
    }

    (harmonic, percussive)
}

/// Mean per-frame RMS of a magnitude spectrogram.
///
/// Per-frame RMS is the root of the mean squared bin magnitude; the absolute
/// scale is arbitrary but identical for both HPSS components, so their ratio
/// is well defined.
pub fn spectrogram_rms(spectrogram: &Spectrogram) -> f32 {
    if spectrogram.is_empty() {
        return 0.0;
    }

    let frame_rms: f32 = spectrogram
        .iter()
        .map(|frame| {
            let power = frame.iter().map(|m| m * m).sum::<f32>() / frame.len() as f32;
            power.sqrt()
        })
        .sum();

    frame_rms / spectrogram.len() as f32
}

/// Sliding median filter with edge clamping (window centered on each element).
fn median_filter(values: &[f32], kernel_size: usize) -> Vec<f32> {
    if values.is_empty() {
        return Vec::new();
    }

    let half = kernel_size / 2;
    let mut window = Vec::with_capacity(kernel_size);

    (0..values.len())
        .map(|i| {
            let start = i.saturating_sub(half);
            let end = (i + half + 1).min(values.len());
            window.clear();
            window.extend_from_slice(&values[start..end]);
            window.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            window[window.len() / 2]
        })
        .collect()
}
