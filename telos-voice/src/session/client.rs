//! Voice client capability interface
//!
//! The remote conversation service is consumed through this trait so the SDK
//! can be mocked in tests and swapped per deployment. The control surface is
//! exactly what the engine needs: start a session, end it, adjust volume,
//! and a one-way event stream back.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::audio::types::AudioFragment;
use crate::error::Result;

/// Options for starting a conversation with the remote agent
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    /// Remote agent identifier
    pub agent_id: String,

    /// Coaching prompt seeding the conversation, if any
    pub initial_prompt: Option<String>,

    /// Starting volume, 0.0-1.0
    pub volume: f32,
}

/// Events emitted by the remote voice client.
///
/// Each agent utterance segment carries its display text together with the
/// opaque audio payload; the coordinator routes the text to the transcript
/// and the audio to the playback sequencer.
#[derive(Debug, Clone)]
pub enum ClientEvent {
    /// The conversation is established
    Connected { conversation_id: String },

    /// One segment of agent speech
    AgentUtterance {
        text: String,
        audio: AudioFragment,
    },

    /// A transcription of the user's speech
    UserTranscript { text: String },

    /// The conversation ended remotely
    Disconnected { reason: Option<String> },

    /// The client hit an error it cannot recover from
    Error { message: String },
}

/// Abstract remote voice conversation client
#[async_trait]
pub trait VoiceClient: Send + Sync {
    /// Install the channel the client delivers its events on. Called once
    /// per session, before `start_session`.
    fn set_event_sink(&self, sink: mpsc::Sender<ClientEvent>);

    /// Open a conversation with the agent; returns the conversation id
    async fn start_session(&self, options: &SessionOptions) -> Result<String>;

    /// Close the conversation
    async fn end_session(&self) -> Result<()>;

    /// Adjust remote playback volume (0.0-1.0)
    async fn set_volume(&self, volume: f32) -> Result<()>;
}
