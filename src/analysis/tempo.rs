//! Tempo estimation from the onset envelope
//!
//! Autocorrelation of the onset envelope via FFT (Wiener-Khinchin), then a
//! peak pick over the lag range corresponding to 30-300 BPM.

use num_complex::Complex;
use rustfft::FftPlanner;

/// Lowest tempo considered, in BPM
const MIN_BPM: f32 = 30.0;

/// Highest tempo considered, in BPM
const MAX_BPM: f32 = 300.0;

/// Estimate tempo in BPM from an onset envelope.
///
/// `envelope_rate` is the envelope's frame rate in Hz (sample rate / hop
/// size). Returns 0.0 when the envelope is too short to cover the slowest
/// tempo period or when no positive autocorrelation peak exists in range.
pub fn estimate_bpm(envelope: &[f32], envelope_rate: f32) -> f32 {
    let max_period_s = 60.0 / MIN_BPM;
    let min_period_s = 60.0 / MAX_BPM;
    let min_lag = (min_period_s * envelope_rate).round() as usize;
    let max_lag = (max_period_s * envelope_rate).round() as usize;

    if min_lag == 0 || max_lag >= envelope.len() || min_lag >= max_lag {
        return 0.0;
    }

    // Mean-removal keeps the DC pedestal from dominating the correlation
    let mean = envelope.iter().sum::<f32>() / envelope.len() as f32;
    let centered: Vec<f32> = envelope.iter().map(|v| v - mean).collect();

    let acf = autocorrelate(&centered);

    // Peak pick within the tempo lag range
    let search = &acf[min_lag..=max_lag];
    let (peak_local_idx, &peak_value) = match search
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    {
        Some(peak) => peak,
        None => return 0.0,
    };

    if peak_value <= 0.0 {
        return 0.0;
    }

    let peak_lag = min_lag + peak_local_idx;
    envelope_rate * 60.0 / peak_lag as f32
}

/// Linear autocorrelation via FFT (Wiener-Khinchin theorem).
fn autocorrelate(values: &[f32]) -> Vec<f32> {
    // Zero-padding to twice the length gives linear (not circular) correlation
    let fft_len = (values.len() * 2).next_power_of_two();

    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(fft_len);
    let ifft = planner.plan_fft_inverse(fft_len);

    let mut buffer: Vec<Complex<f32>> = values
        .iter()
        .map(|&v| Complex::new(v, 0.0))
        .chain(std::iter::repeat(Complex::new(0.0, 0.0)))
        .take(fft_len)
        .collect();

    fft.process(&mut buffer);

    // Power spectrum
    for c in buffer.iter_mut() {
        let power = c.re * c.re + c.im * c.im;
        *c = Complex::new(power, 0.0);
    }

    ifft.process(&mut buffer);

    let scale = 1.0 / fft_len as f32;
    buffer
        .iter()
        .map(|c| c.re * scale)
        .take(values.len())
        .collect()
}
