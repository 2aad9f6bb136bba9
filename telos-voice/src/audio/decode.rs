//! Fragment decoding against a fixed-rate output context
//!
//! Streamed voice fragments arrive as raw PCM16 mono frames at the service's
//! configured encoding rate; cached prompts may arrive in a container format
//! (WAV, MP3, OGG, ...). The decoder probes for a container first and falls
//! back to PCM16, then resamples to the context's fixed rate — the step that
//! prevents pitch/speed distortion when the source rate differs.

use std::io::Cursor;

use rubato::{FastFixedIn, PolynomialDegree, Resampler};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, trace};

use crate::audio::types::{AudioFragment, DecodedAudio};
use crate::error::{Error, Result};

/// Decodes fragments to mono f32 at a fixed target rate
#[derive(Debug, Clone, Copy)]
pub struct FragmentDecoder {
    target_rate: u32,
}

impl FragmentDecoder {
    pub fn new(target_rate: u32) -> Self {
        Self { target_rate }
    }

    pub fn target_rate(&self) -> u32 {
        self.target_rate
    }

    /// Decode one fragment to mono f32 at the target rate.
    ///
    /// # Errors
    /// Malformed or empty fragments fail with [`Error::Decode`]; callers
    /// drop the fragment and continue draining.
    pub fn decode(&self, fragment: &AudioFragment) -> Result<DecodedAudio> {
        if fragment.is_empty() {
            return Err(Error::Decode("empty fragment".to_string()));
        }

        let (samples, native_rate) = match self.decode_container(fragment.as_bytes()) {
            Ok(decoded) => decoded,
            Err(probe_err) => {
                trace!("container probe failed ({}); trying raw PCM16", probe_err);
                (decode_pcm16(fragment.as_bytes())?, self.target_rate)
            }
        };

        if samples.is_empty() {
            return Err(Error::Decode("fragment decoded to no audio".to_string()));
        }

        let samples = if native_rate == self.target_rate {
            samples
        } else {
            debug!(
                "resampling fragment from {}Hz to {}Hz",
                native_rate, self.target_rate
            );
            resample_mono(&samples, native_rate, self.target_rate)?
        };

        Ok(DecodedAudio::new(samples, self.target_rate))
    }

    /// Probe and decode a containerized fragment, downmixing to mono
    fn decode_container(&self, bytes: &[u8]) -> Result<(Vec<f32>, u32)> {
        let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes.to_vec())), Default::default());

        let probed = symphonia::default::get_probe()
            .format(
                &Hint::new(),
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| Error::Decode(format!("unrecognized container: {}", e)))?;

        let mut format = probed.format;
        let track = format
            .default_track()
            .ok_or_else(|| Error::Decode("no audio track in fragment".to_string()))?;
        let track_id = track.id;
        let codec_params = track.codec_params.clone();
        let native_rate = codec_params
            .sample_rate
            .ok_or_else(|| Error::Decode("fragment has no sample rate".to_string()))?;

        let mut decoder = symphonia::default::get_codecs()
            .make(&codec_params, &DecoderOptions::default())
            .map_err(|e| Error::Decode(format!("unsupported codec: {}", e)))?;

        let mut mono = Vec::new();
        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break; // end of fragment
                }
                Err(e) => return Err(Error::Decode(format!("packet read failed: {}", e))),
            };

            if packet.track_id() != track_id {
                continue;
            }

            let decoded = match decoder.decode(&packet) {
                Ok(decoded) => decoded,
                // Per symphonia's contract, decode errors are recoverable;
                // skip the bad packet and keep going.
                Err(SymphoniaError::DecodeError(e)) => {
                    trace!("skipping undecodable packet: {}", e);
                    continue;
                }
                Err(e) => return Err(Error::Decode(format!("decode failed: {}", e))),
            };

            let spec = *decoded.spec();
            let channels = spec.channels.count();
            let mut buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
            buf.copy_interleaved_ref(decoded);

            if channels <= 1 {
                mono.extend_from_slice(buf.samples());
            } else {
                // Downmix interleaved frames by averaging channels
                for frame in buf.samples().chunks_exact(channels) {
                    mono.push(frame.iter().sum::<f32>() / channels as f32);
                }
            }
        }

        Ok((mono, native_rate))
    }
}

/// Interpret bytes as raw little-endian PCM16 mono
fn decode_pcm16(bytes: &[u8]) -> Result<Vec<f32>> {
    if bytes.len() < 2 || bytes.len() % 2 != 0 {
        return Err(Error::Decode(format!(
            "fragment is not PCM16 ({} bytes)",
            bytes.len()
        )));
    }
    Ok(bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as f32 / 32768.0)
        .collect())
}

/// Resample mono samples between rates
pub(crate) fn resample_mono(input: &[f32], input_rate: u32, output_rate: u32) -> Result<Vec<f32>> {
    if input.is_empty() {
        return Ok(Vec::new());
    }

    let mut resampler = FastFixedIn::<f32>::new(
        output_rate as f64 / input_rate as f64,
        1.0,
        PolynomialDegree::Septic,
        input.len(),
        1,
    )
    .map_err(|e| Error::Decode(format!("failed to create resampler: {}", e)))?;

    let mut output = resampler
        .process(&[input.to_vec()], None)
        .map_err(|e| Error::Decode(format!("resampling failed: {}", e)))?;

    Ok(output.remove(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_fragment_fails() {
        let decoder = FragmentDecoder::new(16000);
        assert!(decoder.decode(&AudioFragment::new(Vec::new())).is_err());
    }

    #[test]
    fn test_pcm16_fallback() {
        // Two samples: i16::MAX and i16::MIN
        let bytes = vec![0xff, 0x7f, 0x00, 0x80];
        let decoder = FragmentDecoder::new(16000);
        let audio = decoder.decode(&AudioFragment::new(bytes)).unwrap();

        assert_eq!(audio.sample_rate, 16000);
        assert_eq!(audio.samples.len(), 2);
        assert!((audio.samples[0] - (i16::MAX as f32 / 32768.0)).abs() < 1e-6);
        assert!((audio.samples[1] - (-1.0)).abs() < 1e-6);
    }

    #[test]
    fn test_odd_length_garbage_fails() {
        let decoder = FragmentDecoder::new(16000);
        assert!(decoder.decode(&AudioFragment::new(vec![1, 2, 3])).is_err());
    }

    #[test]
    fn test_resample_ratio() {
        let input: Vec<f32> = (0..24000)
            .map(|i| (i as f32 / 24000.0 * 440.0 * std::f32::consts::TAU).sin())
            .collect();
        let output = resample_mono(&input, 24000, 16000).unwrap();

        // One second in, roughly one second out at the new rate
        let expected = 16000usize;
        assert!(
            output.len().abs_diff(expected) < 100,
            "expected ~{} samples, got {}",
            expected,
            output.len()
        );
    }
}
