//! Voice coaching sessions
//!
//! [`client`] defines the capability interface over the remote conversation
//! SDK; [`coordinator`] drives it and owns playback for the connected
//! lifetime; [`transcript`] accumulates the conversation log.

pub mod client;
pub mod coordinator;
pub mod transcript;

pub use client::{ClientEvent, SessionOptions, VoiceClient};
pub use coordinator::SessionCoordinator;
pub use transcript::{Transcript, TranscriptEntry};
