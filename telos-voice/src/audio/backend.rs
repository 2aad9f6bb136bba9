//! Platform audio capability traits
//!
//! Everything the sequencer needs from a platform's audio output API. A
//! conforming implementation provides exactly five operations: create a
//! fixed-rate output context, decode a fragment against it, resume a
//! suspended context, begin playback of a decoded unit, and close the
//! context. Tests substitute a recording fake; production uses the cpal
//! implementation in [`crate::audio::device`].

use std::sync::Arc;

use async_trait::async_trait;

use crate::audio::types::{AudioFragment, DecodedAudio};
use crate::error::Result;

/// Factory for output contexts
#[async_trait]
pub trait AudioBackend: Send + Sync {
    /// Acquire one output context pinned to `sample_rate`.
    ///
    /// The context is the single exclusively-owned output resource of a
    /// playback session; no other component may touch it.
    async fn open_context(&self, sample_rate: u32) -> Result<Arc<dyn OutputContext>>;
}

/// One output device/context at a fixed sample rate
#[async_trait]
pub trait OutputContext: Send + Sync {
    /// The fixed rate this context was opened at (Hz)
    fn sample_rate(&self) -> u32;

    /// Decode a fragment against this context's fixed rate.
    ///
    /// Decoding is the suspension point of the pipeline; implementations run
    /// actual decode work off the caller's task where it would block.
    async fn decode(&self, fragment: &AudioFragment) -> Result<DecodedAudio>;

    /// Resume the context if the platform suspended it (autoplay policy and
    /// the like). A no-op on platforms whose streams never suspend.
    async fn resume(&self) -> Result<()>;

    /// Begin playback of a decoded unit. Returns immediately with a handle;
    /// the unit plays until it finishes or is stopped.
    async fn start(&self, audio: DecodedAudio) -> Result<Arc<dyn PlayingUnit>>;

    /// Release the context. Infallible by contract: a context that cannot be
    /// closed cleanly logs and is abandoned.
    async fn close(&self);
}

/// A unit of audio currently being rendered
#[async_trait]
pub trait PlayingUnit: Send + Sync {
    /// Resolves when the unit finishes playing or is stopped. The sequencer
    /// awaits this as its sole trigger for starting the next fragment.
    async fn completed(&self);

    /// Halt the unit immediately. Must cause `completed` to resolve.
    async fn stop(&self) -> Result<()>;
}
