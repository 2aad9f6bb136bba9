//! # TELOS Voice Engine (telos-voice)
//!
//! Engine behind the voice coaching experience: a remote conversation agent
//! streams audio fragments and transcript text; this crate plays the audio
//! back gaplessly, in strict arrival order, and tracks the session.
//!
//! **Architecture:** a `SessionCoordinator` drives an abstract `VoiceClient`
//! (the remote conversation SDK behind a trait) and owns one
//! `PlaybackSequencer` per connected session. The sequencer serializes
//! decode + playback of streamed fragments against an output context pinned
//! to the remote service's encoding rate, through the platform-agnostic
//! traits in [`audio::backend`].

pub mod audio;
pub mod config;
pub mod error;
pub mod playback;
pub mod session;

pub use error::{Error, Result};
pub use playback::PlaybackSequencer;
pub use session::{ClientEvent, SessionCoordinator, SessionOptions, VoiceClient};
