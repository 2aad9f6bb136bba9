//! Fragment decoder integration tests
//!
//! Feed the decoder real containerized audio (WAV fixtures synthesized with
//! hound) alongside the raw PCM16 stream format, and check that everything
//! comes out mono f32 at the context rate.

use std::io::Cursor;

use telos_voice::audio::decode::FragmentDecoder;
use telos_voice::audio::types::AudioFragment;

const TARGET_RATE: u32 = 16000;

/// Synthesize an in-memory WAV of `seconds` of a 440 Hz tone
fn wav_fixture(sample_rate: u32, channels: u16, seconds: f32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        let frames = (sample_rate as f32 * seconds) as u32;
        for i in 0..frames {
            let t = i as f32 / sample_rate as f32;
            let sample = ((t * 440.0 * std::f32::consts::TAU).sin() * 0.5 * 32767.0) as i16;
            for _ in 0..channels {
                writer.write_sample(sample).unwrap();
            }
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

#[test]
fn wav_at_the_context_rate_passes_straight_through() {
    let decoder = FragmentDecoder::new(TARGET_RATE);
    let fragment = AudioFragment::new(wav_fixture(TARGET_RATE, 1, 0.5));

    let audio = decoder.decode(&fragment).unwrap();

    assert_eq!(audio.sample_rate, TARGET_RATE);
    let expected = (TARGET_RATE as f32 * 0.5) as usize;
    assert!(
        audio.samples.len().abs_diff(expected) < 16,
        "expected ~{} samples, got {}",
        expected,
        audio.samples.len()
    );
    assert!(audio.samples.iter().any(|s| s.abs() > 0.1), "tone went silent");
}

#[test]
fn stereo_wav_is_downmixed_and_resampled() {
    let decoder = FragmentDecoder::new(TARGET_RATE);
    let fragment = AudioFragment::new(wav_fixture(44100, 2, 0.5));

    let audio = decoder.decode(&fragment).unwrap();

    assert_eq!(audio.sample_rate, TARGET_RATE);
    // Half a second of audio regardless of the source rate and layout
    let expected = (TARGET_RATE as f32 * 0.5) as usize;
    assert!(
        audio.samples.len().abs_diff(expected) < 200,
        "expected ~{} samples, got {}",
        expected,
        audio.samples.len()
    );
    assert!(audio.duration_ms().abs_diff(500) < 20);
}

#[test]
fn raw_pcm16_stream_frames_decode_at_the_context_rate() {
    let decoder = FragmentDecoder::new(TARGET_RATE);

    // 100ms of a tone as the streaming service sends it: bare PCM16 mono
    // little-endian at the context rate, no container.
    let frames = TARGET_RATE / 10;
    let bytes: Vec<u8> = (0..frames)
        .flat_map(|i| {
            let t = i as f32 / TARGET_RATE as f32;
            let sample = ((t * 440.0 * std::f32::consts::TAU).sin() * 0.5 * 32767.0) as i16;
            sample.to_le_bytes()
        })
        .collect();

    let audio = decoder.decode(&AudioFragment::new(bytes)).unwrap();

    assert_eq!(audio.sample_rate, TARGET_RATE);
    assert_eq!(audio.samples.len(), frames as usize);
    assert!(audio.samples.iter().all(|s| (-1.0..=1.0).contains(s)));
}

#[test]
fn garbage_bytes_are_rejected_not_misplayed() {
    let decoder = FragmentDecoder::new(TARGET_RATE);

    // Odd length: neither a recognizable container nor valid PCM16.
    let fragment = AudioFragment::new(vec![0xde, 0xad, 0xbe]);
    assert!(decoder.decode(&fragment).is_err());
}
