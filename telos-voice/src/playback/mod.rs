//! Playback sequencing for streamed agent audio

pub mod sequencer;

pub use sequencer::PlaybackSequencer;
