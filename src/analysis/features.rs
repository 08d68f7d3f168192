//! Frame-level spectral and energy features
//!
//! Onset envelope, spectral centroid, spectral bandwidth, and waveform RMS.
//! Each raw feature is the mean of its per-frame values; score mapping happens
//! in the parent module.

use crate::analysis::stft::{Spectrogram, Stft, FRAME_SIZE, HOP_SIZE};

/// Onset envelope: per-frame half-wave-rectified log-magnitude spectral flux,
/// averaged over bins.
///
/// Log-scale differencing keeps the flux robust across absolute level changes;
/// half-wave rectification keeps only energy increases (note onsets).
pub fn onset_envelope(spectrogram: &Spectrogram) -> Vec<f32> {
    if spectrogram.is_empty() {
        return Vec::new();
    }

    let num_bins = spectrogram[0].len();
    let mut envelope = Vec::with_capacity(spectrogram.len());
    let mut prev_magnitudes = vec![0.0f32; num_bins];

    for magnitudes in spectrogram {
        let flux_sum: f32 = magnitudes
            .iter()
            .zip(prev_magnitudes.iter())
            .map(|(current, prev)| {
                let log_current = (current + 1e-10_f32).ln();
                let log_prev = (prev + 1e-10_f32).ln();
                (log_current - log_prev).max(0.0)
            })
            .sum();
        envelope.push(flux_sum / num_bins as f32);

        prev_magnitudes.copy_from_slice(magnitudes);
    }

    envelope
}

/// Mean of a slice; 0.0 for empty input.
pub fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f32>() / values.len() as f32
}

/// Per-frame spectral centroid in Hz (magnitude-weighted mean frequency).
///
/// Frames with no energy contribute a centroid of 0.
pub fn spectral_centroid(spectrogram: &Spectrogram, stft: &Stft, sample_rate: u32) -> Vec<f32> {
    spectrogram
        .iter()
        .map(|magnitudes| {
            let total: f32 = magnitudes.iter().sum();
            if total <= f32::EPSILON {
                return 0.0;
            }
            let weighted: f32 = magnitudes
                .iter()
                .enumerate()
                .map(|(bin, &m)| stft.bin_frequency(bin, sample_rate) * m)
                .sum();
            weighted / total
        })
        .collect()
}

/// Per-frame spectral bandwidth in Hz (magnitude-weighted standard deviation
/// of frequency around the frame centroid).
pub fn spectral_bandwidth(spectrogram: &Spectrogram, stft: &Stft, sample_rate: u32) -> Vec<f32> {
    let centroids = spectral_centroid(spectrogram, stft, sample_rate);

    spectrogram
        .iter()
        .zip(centroids.iter())
        .map(|(magnitudes, &centroid)| {
            let total: f32 = magnitudes.iter().sum();
            if total <= f32::EPSILON {
                return 0.0;
            }
            let variance: f32 = magnitudes
                .iter()
                .enumerate()
                .map(|(bin, &m)| {
                    let dev = stft.bin_frequency(bin, sample_rate) - centroid;
                    m * dev * dev
                })
                .sum::<f32>()
                / total;
            variance.sqrt()
        })
        .collect()
}

/// Per-frame RMS of the waveform, framed identically to the STFT (2048/512).
pub fn rms_frames(samples: &[f32]) -> Vec<f32> {
    rms_frames_sized(samples, FRAME_SIZE, HOP_SIZE)
}

/// Per-frame RMS of an arbitrary waveform framing.
pub fn rms_frames_sized(samples: &[f32], frame_size: usize, hop_size: usize) -> Vec<f32> {
    if samples.len() < frame_size {
        return Vec::new();
    }

    let num_frames = (samples.len() - frame_size) / hop_size + 1;
    let mut frames = Vec::with_capacity(num_frames);

    for frame_idx in 0..num_frames {
        let start = frame_idx * hop_size;
        let frame = &samples[start..start + frame_size];
        let power = frame.iter().map(|s| s * s).sum::<f32>() / frame_size as f32;
        frames.push(power.sqrt());
    }

    frames
}
