//! Short-time Fourier transform
//!
//! Shared magnitude-spectrogram computation for all spectral features:
//! Hann window, frame size 2048, hop 512, rustfft forward transform.

use num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

/// STFT frame size in samples
pub const FRAME_SIZE: usize = 2048;

/// STFT hop size in samples
pub const HOP_SIZE: usize = 512;

/// Magnitude spectrogram: one magnitude vector (FRAME_SIZE/2 + 1 bins) per frame.
pub type Spectrogram = Vec<Vec<f32>>;

/// Short-time Fourier transform with a Hann window.
pub struct Stft {
    frame_size: usize,
    hop_size: usize,
    window: Vec<f32>,
    fft: Arc<dyn Fft<f32>>,
}

impl Stft {
    pub fn new(frame_size: usize, hop_size: usize) -> Self {
        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(frame_size);

        // Hann window
        let window: Vec<f32> = (0..frame_size)
            .map(|i| {
                let t = i as f32 / (frame_size - 1) as f32;
                0.5 * (1.0 - (2.0 * std::f32::consts::PI * t).cos())
            })
            .collect();

        Self {
            frame_size,
            hop_size,
            window,
            fft,
        }
    }

    /// Default configuration used by the analysis pipeline (2048/512).
    pub fn analysis_default() -> Self {
        Self::new(FRAME_SIZE, HOP_SIZE)
    }

    /// Number of frequency bins per frame (positive half of the spectrum).
    pub fn num_bins(&self) -> usize {
        self.frame_size / 2 + 1
    }

    /// Compute the magnitude spectrogram of a mono waveform.
    ///
    /// Returns one frame per hop; the last partial frame is dropped. An input
    /// shorter than one frame yields an empty spectrogram.
    pub fn magnitudes(&self, samples: &[f32]) -> Spectrogram {
        if samples.len() < self.frame_size {
            return Vec::new();
        }

        let num_frames = (samples.len() - self.frame_size) / self.hop_size + 1;
        let mut spectrogram = Vec::with_capacity(num_frames);

        for frame_idx in 0..num_frames {
            let start = frame_idx * self.hop_size;
            let end = start + self.frame_size;

            // Window and prepare for FFT
            let mut buffer: Vec<Complex<f32>> = samples[start..end]
                .iter()
                .zip(self.window.iter())
                .map(|(s, w)| Complex::new(s * w, 0.0))
                .collect();

            self.fft.process(&mut buffer);

            // Positive half of the spectrum only
            let magnitudes: Vec<f32> = buffer[..self.num_bins()]
                .iter()
                .map(|c| (c.re * c.re + c.im * c.im).sqrt())
                .collect();

            spectrogram.push(magnitudes);
        }

        spectrogram
    }

    /// Center frequency in Hz of a given bin at a given sample rate.
    pub fn bin_frequency(&self, bin: usize, sample_rate: u32) -> f32 {
        bin as f32 * sample_rate as f32 / self.frame_size as f32
    }
}
