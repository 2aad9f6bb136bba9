//! Voice session coordinator
//!
//! Drives the abstract [`VoiceClient`] through one conversation and owns a
//! playback session for the connected lifetime. Client events are pumped into
//! the transcript and the playback sequencer; user actions (`start`, `end`,
//! `set_volume`) come in from the UI layer.
//!
//! Every end, error, and disconnect path forces the sequencer to stop and
//! releases the output context. The web client was inconsistent about this;
//! here teardown on the way out is unconditional.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use telos_common::events::{ConnectionState, EventBus, TelosEvent, TranscriptRole};

use crate::audio::backend::AudioBackend;
use crate::config::SessionConfig;
use crate::error::{Error, Result};
use crate::playback::PlaybackSequencer;
use crate::session::client::{ClientEvent, SessionOptions, VoiceClient};
use crate::session::transcript::{Transcript, TranscriptEntry};

/// Capacity of the client event channel. The pump drains continuously; this
/// only needs to absorb bursts of utterance segments.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// One voice coaching session coordinator.
///
/// Lives across conversations: `start` opens one, `end` (or a remote
/// disconnect/error) closes it, and `start` may then be called again.
pub struct SessionCoordinator {
    inner: Arc<Inner>,
}

struct Inner {
    client: Arc<dyn VoiceClient>,
    sequencer: PlaybackSequencer,
    events: Arc<EventBus>,
    config: SessionConfig,

    state: Mutex<ConnectionState>,
    transcript: Mutex<Transcript>,
    volume: Mutex<f32>,
    conversation_id: Mutex<Option<String>>,

    /// Bumped on every `start`. A pump task outliving its session (the client
    /// dropped its sender late, say) compares its epoch before touching
    /// anything, so it can never tear down a newer session.
    epoch: AtomicU64,
}

impl SessionCoordinator {
    pub fn new(
        client: Arc<dyn VoiceClient>,
        backend: Arc<dyn AudioBackend>,
        config: SessionConfig,
        events: Arc<EventBus>,
    ) -> Self {
        let sequencer =
            PlaybackSequencer::new(backend, config.sequencer(), Arc::clone(&events));
        let volume = config.initial_volume;
        Self {
            inner: Arc::new(Inner {
                client,
                sequencer,
                events,
                config,
                state: Mutex::new(ConnectionState::Disconnected),
                transcript: Mutex::new(Transcript::new()),
                volume: Mutex::new(volume),
                conversation_id: Mutex::new(None),
                epoch: AtomicU64::new(0),
            }),
        }
    }

    /// Open a conversation with the remote agent.
    ///
    /// Valid only from `Disconnected`. Transitions to `Connecting`
    /// immediately; `Connected` is entered when the client reports the
    /// conversation established. On client failure the coordinator reverts to
    /// `Disconnected` and the error is returned.
    ///
    /// # Errors
    /// [`Error::InvalidState`] when a session is already starting or active;
    /// otherwise whatever the client's `start_session` returns.
    pub async fn start(&self) -> Result<String> {
        // Claim the Disconnected -> Connecting transition atomically so two
        // concurrent starts cannot both open a conversation.
        {
            let mut state = self.inner.state.lock().unwrap();
            if *state != ConnectionState::Disconnected {
                return Err(Error::InvalidState(format!(
                    "cannot start a voice session while {}",
                    state
                )));
            }
            *state = ConnectionState::Connecting;
        }
        let epoch = self.inner.epoch.fetch_add(1, Ordering::AcqRel) + 1;
        self.inner.events.emit_lossy(TelosEvent::SessionStateChanged {
            old_state: ConnectionState::Disconnected,
            new_state: ConnectionState::Connecting,
            timestamp: Utc::now(),
        });

        self.inner.transcript.lock().unwrap().clear();
        self.inner
            .append(TranscriptRole::System, "Starting voice coaching session...");

        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        self.inner.client.set_event_sink(tx);

        let options = SessionOptions {
            agent_id: self.inner.config.agent_id.clone(),
            initial_prompt: self.inner.config.initial_prompt.clone(),
            volume: *self.inner.volume.lock().unwrap(),
        };

        match self.inner.client.start_session(&options).await {
            Ok(conversation_id) => {
                info!(conversation_id = %conversation_id, "voice session starting");
                *self.inner.conversation_id.lock().unwrap() = Some(conversation_id.clone());

                self.inner.sequencer.initialize().await;

                let inner = Arc::clone(&self.inner);
                tokio::spawn(async move {
                    Inner::pump(inner, rx, epoch).await;
                });

                Ok(conversation_id)
            }
            Err(e) => {
                warn!("voice session failed to start: {}", e);
                self.inner.append(
                    TranscriptRole::System,
                    format!("Failed to start voice session: {}", e),
                );
                Inner::set_state(&self.inner, ConnectionState::Disconnected);
                Err(e)
            }
        }
    }

    /// End the conversation.
    ///
    /// Playback resources are released whether or not the client ends
    /// cleanly; a client error here is logged, never propagated. No-op when
    /// already disconnected.
    pub async fn end(&self) {
        if self.state() == ConnectionState::Disconnected {
            return;
        }

        let epoch = self.inner.epoch.load(Ordering::Acquire);
        if let Err(e) = self.inner.client.end_session().await {
            warn!("voice client did not end cleanly: {}", e);
        }
        Inner::finish_session(&self.inner, epoch, "Voice coaching session ended.").await;
    }

    /// Set the session volume, clamped to 0.0-1.0.
    ///
    /// Forwarded to the client; a client refusal is logged and swallowed, and
    /// the coordinator's volume still updates so the next session starts at
    /// the user's chosen level.
    pub async fn set_volume(&self, volume: f32) {
        let new_volume = volume.clamp(0.0, 1.0);
        let old_volume = {
            let mut current = self.inner.volume.lock().unwrap();
            let old = *current;
            *current = new_volume;
            old
        };

        if let Err(e) = self.inner.client.set_volume(new_volume).await {
            warn!("voice client rejected volume change: {}", e);
        }

        self.inner.events.emit_lossy(TelosEvent::VolumeChanged {
            old_volume,
            new_volume,
            timestamp: Utc::now(),
        });
    }

    /// Current connection state
    pub fn state(&self) -> ConnectionState {
        *self.inner.state.lock().unwrap()
    }

    /// Current session volume (0.0-1.0)
    pub fn volume(&self) -> f32 {
        *self.inner.volume.lock().unwrap()
    }

    /// Conversation id of the active session, if any
    pub fn conversation_id(&self) -> Option<String> {
        self.inner.conversation_id.lock().unwrap().clone()
    }

    /// Snapshot of the session transcript so far
    pub fn transcript(&self) -> Vec<TranscriptEntry> {
        self.inner.transcript.lock().unwrap().snapshot()
    }

    /// Current playback state of the owned sequencer
    pub fn playback_state(&self) -> telos_common::events::PlaybackState {
        self.inner.sequencer.state()
    }
}

impl Inner {
    /// Consume client events until the conversation ends.
    ///
    /// The pump task exits when the client reports a disconnect or error, or
    /// when the client drops its sender. All exits release playback.
    async fn pump(inner: Arc<Inner>, mut rx: mpsc::Receiver<ClientEvent>, epoch: u64) {
        while let Some(event) = rx.recv().await {
            if inner.epoch.load(Ordering::Acquire) != epoch {
                debug!("stale session pump exiting");
                return;
            }
            match event {
                ClientEvent::Connected { conversation_id } => {
                    info!(conversation_id = %conversation_id, "voice session connected");
                    *inner.conversation_id.lock().unwrap() = Some(conversation_id);
                    Self::set_state(&inner, ConnectionState::Connected);
                    inner.append(
                        TranscriptRole::System,
                        "Connected to your TELOS voice coach! How can I help you today?",
                    );
                }
                ClientEvent::AgentUtterance { text, audio } => {
                    debug!(bytes = audio.len(), "agent utterance segment");
                    inner.append(TranscriptRole::Agent, text);
                    inner.sequencer.enqueue(audio);
                }
                ClientEvent::UserTranscript { text } => {
                    inner.append(TranscriptRole::User, text);
                }
                ClientEvent::Disconnected { reason } => {
                    if let Some(reason) = reason {
                        debug!("voice session disconnected: {}", reason);
                    }
                    Self::finish_session(&inner, epoch, "Voice coaching session ended.").await;
                    return;
                }
                ClientEvent::Error { message } => {
                    warn!("voice client error: {}", message);
                    inner.append(TranscriptRole::System, format!("Error: {}", message));
                    Self::finish_session(&inner, epoch, "Voice coaching session ended.").await;
                    return;
                }
            }
        }

        // Client dropped its sender without saying goodbye.
        Self::finish_session(&inner, epoch, "Voice coaching session ended.").await;
    }

    /// Shut the session down: halt and release playback, forget the
    /// conversation, transition to Disconnected. Idempotent; runs on every
    /// end, error, and disconnect path without exception. A stale epoch means
    /// a newer session owns the playback resources now, so do nothing.
    async fn finish_session(inner: &Arc<Inner>, epoch: u64, note: &str) {
        if inner.epoch.load(Ordering::Acquire) != epoch
            || *inner.state.lock().unwrap() == ConnectionState::Disconnected
        {
            return;
        }
        inner.sequencer.teardown().await;
        inner.conversation_id.lock().unwrap().take();

        if Self::set_state(inner, ConnectionState::Disconnected) {
            inner.append(TranscriptRole::System, note);
        }
    }

    fn append(&self, role: TranscriptRole, text: impl Into<String>) {
        let entry = TranscriptEntry::new(role, text);
        self.events.emit_lossy(TelosEvent::TranscriptAppended {
            role: entry.role,
            text: entry.text.clone(),
            timestamp: entry.timestamp,
        });
        self.transcript.lock().unwrap().push(entry);
    }

    /// Transition the connection state, emitting an event. Returns whether
    /// the state actually changed.
    fn set_state(inner: &Arc<Inner>, new_state: ConnectionState) -> bool {
        let old_state = {
            let mut state = inner.state.lock().unwrap();
            if *state == new_state {
                return false;
            }
            let old = *state;
            *state = new_state;
            old
        };
        inner.events.emit_lossy(TelosEvent::SessionStateChanged {
            old_state,
            new_state,
            timestamp: Utc::now(),
        });
        true
    }
}
