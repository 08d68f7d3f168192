//! Audio resampling using rubato
//!
//! Converts mono audio to the fixed 22.05 kHz analysis sample rate. The rate
//! is fixed to bound memory and CPU cost regardless of the source rate, and
//! the score clamp constants were tuned against features computed at it.

use crate::error::{Error, Result};
use rubato::{FastFixedIn, Resampler as RubatoResampler};
use tracing::debug;

/// Fixed sample rate for all feature extraction
pub const ANALYSIS_SAMPLE_RATE: u32 = 22050;

/// Mono audio resampler using rubato for sample rate conversion.
pub struct Resampler;

impl Resampler {
    /// Resample mono audio to the analysis sample rate (22.05 kHz).
    ///
    /// # Arguments
    /// - `input`: mono audio samples
    /// - `input_rate`: source sample rate
    ///
    /// # Returns
    /// Mono samples at 22.05 kHz
    ///
    /// # Notes
    /// If the input is already at 22.05 kHz, returns a copy without resampling.
    pub fn resample(input: &[f32], input_rate: u32) -> Result<Vec<f32>> {
        let output_rate = ANALYSIS_SAMPLE_RATE;

        if input_rate == output_rate {
            debug!("Sample rate already at {}Hz, skipping resample", output_rate);
            return Ok(input.to_vec());
        }

        if input.is_empty() {
            return Err(Error::Decode("Cannot resample empty audio".to_string()));
        }

        debug!("Resampling from {}Hz to {}Hz", input_rate, output_rate);

        // FastFixedIn for a good quality/performance tradeoff; the whole
        // waveform is processed as one chunk.
        let mut resampler = FastFixedIn::<f32>::new(
            output_rate as f64 / input_rate as f64,
            1.0, // no runtime ratio changes
            rubato::PolynomialDegree::Septic,
            input.len(),
            1, // mono
        )
        .map_err(|e| Error::Decode(format!("Failed to create resampler: {}", e)))?;

        let mut output = resampler
            .process(&[input.to_vec()], None)
            .map_err(|e| Error::Decode(format!("Resampling failed: {}", e)))?;

        let resampled = output.remove(0);

        debug!(
            "Resampled {} input samples to {} output samples",
            input.len(),
            resampled.len()
        );

        Ok(resampled)
    }
}
