//! Platform audio boundary
//!
//! The sequencer touches the platform through five primitives (open a
//! fixed-rate context, decode, start playback, stop a unit, close), expressed
//! as the traits in [`backend`]. [`decode`] holds the shared fragment
//! decoder; [`device`] is the real cpal-backed implementation (cargo feature
//! `device`).

pub mod backend;
pub mod decode;
#[cfg(feature = "device")]
pub mod device;
pub mod types;

pub use backend::{AudioBackend, OutputContext, PlayingUnit};
pub use decode::FragmentDecoder;
pub use types::{AudioFragment, DecodedAudio, PlaybackState};
