//! Audio decode and resample stages
//!
//! Turns an uploaded file of any supported format into a mono f32 waveform at
//! the fixed analysis sample rate.

pub mod decoder;
pub mod resampler;

pub use decoder::AudioDecoder;
pub use resampler::{Resampler, ANALYSIS_SAMPLE_RATE};
