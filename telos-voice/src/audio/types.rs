//! Audio data types

// Re-export the shared playback state so callers don't need telos-common
// in scope for the common case.
pub use telos_common::events::PlaybackState;

/// One chunk of encoded agent audio delivered by the remote service.
///
/// Opaque bytes with an implicit arrival order; the fragment has no identity
/// beyond its position in the playback queue. Owned exclusively by the queue
/// from enqueue until it is decoded or discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFragment {
    bytes: Vec<u8>,
}

impl AudioFragment {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl From<Vec<u8>> for AudioFragment {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<&[u8]> for AudioFragment {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes.to_vec())
    }
}

/// A decoded, playable fragment: mono f32 samples at a known rate.
///
/// The voice stream is mono; stereo or multi-channel sources are downmixed
/// at decode time.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl DecodedAudio {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Playback duration in milliseconds
    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 {
            return 0;
        }
        (self.samples.len() as u64 * 1000) / self.sample_rate as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_from_bytes() {
        let fragment = AudioFragment::from(vec![1u8, 2, 3]);
        assert_eq!(fragment.len(), 3);
        assert!(!fragment.is_empty());
        assert_eq!(fragment.as_bytes(), &[1, 2, 3]);
    }

    #[test]
    fn test_duration_ms() {
        let audio = DecodedAudio::new(vec![0.0; 16000], 16000);
        assert_eq!(audio.duration_ms(), 1000);

        let empty = DecodedAudio::new(Vec::new(), 0);
        assert_eq!(empty.duration_ms(), 0);
    }
}
