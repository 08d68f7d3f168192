//! Audio decoder using symphonia
//!
//! Decodes various audio formats (MP3, FLAC, AAC, Vorbis, WAV) to a mono
//! f32 waveform. The upload handler always writes temp files with a `.wav`
//! suffix regardless of the real payload format, so the decoder relies on
//! symphonia's content probing rather than the file extension.

use crate::error::{Error, Result};
use std::path::Path;
use symphonia::core::audio::{AudioBuffer, AudioBufferRef, Signal};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::conv::IntoSample;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::sample::Sample;
use tracing::{debug, warn};

/// Audio decoder producing a mono waveform.
///
/// Multi-channel sources are downmixed by averaging all channels per frame.
pub struct AudioDecoder;

impl AudioDecoder {
    /// Decode an entire audio file to mono PCM samples.
    ///
    /// # Returns
    /// - `samples`: mono f32 samples in [-1.0, 1.0]
    /// - `sample_rate`: source sample rate (before resampling)
    ///
    /// # Errors
    /// - Failed to open file
    /// - Unsupported or corrupt audio format
    /// - Decode produced no samples
    pub fn decode_mono(path: &Path) -> Result<(Vec<f32>, u32)> {
        debug!("Decoding file: {}", path.display());

        let file = std::fs::File::open(path)
            .map_err(|e| Error::Decode(format!("Failed to open file {}: {}", path.display(), e)))?;

        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        // Content probing is authoritative; the extension hint is best-effort
        // and usually wrong for uploads (fixed .wav suffix).
        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let format_opts = FormatOptions::default();
        let metadata_opts = MetadataOptions::default();

        let probed = symphonia::default::get_probe()
            .format(&hint, mss, &format_opts, &metadata_opts)
            .map_err(|e| Error::Decode(format!("Failed to probe format: {}", e)))?;

        let mut format = probed.format;

        // Get the default audio track
        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| Error::Decode("No audio track found".to_string()))?;

        let track_id = track.id;
        let codec_params = track.codec_params.clone();

        let sample_rate = codec_params
            .sample_rate
            .ok_or_else(|| Error::Decode("Sample rate not found".to_string()))?;

        debug!("Source sample rate: {} Hz", sample_rate);

        let decoder_opts = DecoderOptions::default();
        let mut decoder = symphonia::default::get_codecs()
            .make(&codec_params, &decoder_opts)
            .map_err(|e| Error::Decode(format!("Failed to create decoder: {}", e)))?;

        let mut samples = Vec::new();

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(symphonia::core::errors::Error::IoError(ref e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    debug!("Reached end of file");
                    break;
                }
                Err(e) => {
                    warn!("Error reading packet: {}", e);
                    break;
                }
            };

            if packet.track_id() != track_id {
                continue;
            }

            match decoder.decode(&packet) {
                Ok(decoded) => Self::downmix_to_mono(&decoded, &mut samples),
                Err(e) => {
                    warn!("Decode error: {}", e);
                    continue;
                }
            }
        }

        if samples.is_empty() {
            return Err(Error::Decode("Decode produced no samples".to_string()));
        }

        debug!("Decoded {} mono samples", samples.len());

        Ok((samples, sample_rate))
    }

    /// Downmix a decoded buffer of any sample format to mono f32.
    fn downmix_to_mono(decoded: &AudioBufferRef, output: &mut Vec<f32>) {
        match decoded {
            AudioBufferRef::F32(buf) => Self::downmix_planar(buf, output),
            AudioBufferRef::F64(buf) => Self::downmix_planar(buf, output),
            AudioBufferRef::S32(buf) => Self::downmix_planar(buf, output),
            AudioBufferRef::S24(buf) => Self::downmix_planar(buf, output),
            AudioBufferRef::S16(buf) => Self::downmix_planar(buf, output),
            AudioBufferRef::S8(buf) => Self::downmix_planar(buf, output),
            AudioBufferRef::U32(buf) => Self::downmix_planar(buf, output),
            AudioBufferRef::U24(buf) => Self::downmix_planar(buf, output),
            AudioBufferRef::U16(buf) => Self::downmix_planar(buf, output),
            AudioBufferRef::U8(buf) => Self::downmix_planar(buf, output),
        }
    }

    /// Average all channels of a planar buffer into mono f32 samples.
    ///
    /// `IntoSample<f32>` normalizes integer formats to [-1.0, 1.0].
    fn downmix_planar<S>(buf: &AudioBuffer<S>, output: &mut Vec<f32>)
    where
        S: Sample + IntoSample<f32>,
    {
        let num_channels = buf.spec().channels.count();
        let num_frames = buf.frames();
        output.reserve(num_frames);

        for frame_idx in 0..num_frames {
            let mut acc = 0.0f32;
            for ch_idx in 0..num_channels {
                let sample: f32 = buf.chan(ch_idx)[frame_idx].into_sample();
                acc += sample;
            }
            output.push(acc / num_channels as f32);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use symphonia::core::audio::SignalSpec;

    fn stereo_buffer(left: &[f32], right: &[f32]) -> AudioBuffer<f32> {
        let spec = SignalSpec::new(
            44100,
            symphonia::core::audio::Channels::FRONT_LEFT
                | symphonia::core::audio::Channels::FRONT_RIGHT,
        );
        let mut buf = AudioBuffer::<f32>::new(left.len() as u64, spec);
        buf.render_reserved(Some(left.len()));
        buf.chan_mut(0).copy_from_slice(left);
        buf.chan_mut(1).copy_from_slice(right);
        buf
    }

    #[test]
    fn test_downmix_stereo_averages_channels() {
        let buf = stereo_buffer(&[1.0, 0.0, -1.0], &[0.0, 0.0, -1.0]);
        let mut output = Vec::new();
        AudioDecoder::downmix_planar(&buf, &mut output);
        assert_eq!(output, vec![0.5, 0.0, -1.0]);
    }

    #[test]
    fn test_decode_missing_file() {
        let result = AudioDecoder::decode_mono(Path::new("/nonexistent/audio.wav"));
        assert!(result.is_err());
    }

    // Full-format decode coverage lives in tests/analysis_tests.rs with
    // synthesized WAV fixtures.
}
