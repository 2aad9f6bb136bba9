//! Event types and EventBus for the TELOS engine
//!
//! One-to-many broadcasting over `tokio::sync::broadcast`. Components emit
//! `TelosEvent`s on state transitions; UI layers subscribe and render. Events
//! serialize with a `type` tag so a frontend can dispatch on them directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::model::TelosSection;

/// Playback state of the audio sequencer
///
/// Derived, not stored: Idle means the queue is empty and nothing is
/// sounding; Playing means exactly one fragment is being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    Idle,
    Playing,
}

impl std::fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaybackState::Idle => write!(f, "idle"),
            PlaybackState::Playing => write!(f, "playing"),
        }
    }
}

/// Connection state of a voice coaching session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionState::Disconnected => write!(f, "disconnected"),
            ConnectionState::Connecting => write!(f, "connecting"),
            ConnectionState::Connected => write!(f, "connected"),
        }
    }
}

/// Who authored a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptRole {
    User,
    Agent,
    System,
}

/// TELOS event types
///
/// All events carry a UTC timestamp and use this central enum for type safety
/// and exhaustive matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TelosEvent {
    /// Voice session connection state changed
    SessionStateChanged {
        old_state: ConnectionState,
        new_state: ConnectionState,
        timestamp: DateTime<Utc>,
    },

    /// Audio sequencer transitioned Idle ↔ Playing
    PlaybackStateChanged {
        old_state: PlaybackState,
        new_state: PlaybackState,
        timestamp: DateTime<Utc>,
    },

    /// An agent audio fragment was appended to the playback queue
    FragmentEnqueued {
        /// Queue length after the append
        queue_len: usize,
        timestamp: DateTime<Utc>,
    },

    /// A fragment was discarded without being played
    ///
    /// Losing one fragment never aborts the session; this event is the only
    /// trace the drop leaves beyond the log.
    FragmentDropped {
        reason: String,
        timestamp: DateTime<Utc>,
    },

    /// A line was appended to the session transcript
    TranscriptAppended {
        role: TranscriptRole,
        text: String,
        timestamp: DateTime<Utc>,
    },

    /// Session volume changed
    VolumeChanged {
        /// Previous volume (0.0-1.0)
        old_volume: f32,
        /// New volume (0.0-1.0)
        new_volume: f32,
        timestamp: DateTime<Utc>,
    },

    /// The user finished a questionnaire section
    SectionCompleted {
        section: TelosSection,
        timestamp: DateTime<Utc>,
    },

    /// The active questionnaire section changed
    SectionChanged {
        old_section: TelosSection,
        new_section: TelosSection,
        timestamp: DateTime<Utc>,
    },
}

/// Broadcast bus for TelosEvents
///
/// Cheap to clone receivers; events emitted before a subscription are not
/// replayed.
pub struct EventBus {
    tx: broadcast::Sender<TelosEvent>,
    capacity: usize,
}

impl EventBus {
    /// Create a new EventBus buffering up to `capacity` events per subscriber
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<TelosEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)`, or `Err` when nobody is listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: TelosEvent,
    ) -> Result<usize, broadcast::error::SendError<TelosEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring the no-subscribers case
    ///
    /// Engine components use this form: a session with no UI attached is
    /// still a valid session.
    pub fn emit_lossy(&self, event: TelosEvent) {
        let _ = self.tx.send(event);
    }

    /// Number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eventbus_new() {
        let bus = EventBus::new(100);
        assert_eq!(bus.capacity(), 100);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_eventbus_subscribe() {
        let bus = EventBus::new(100);
        let _rx = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);

        let _rx2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);
    }

    #[tokio::test]
    async fn test_emit_no_subscribers() {
        let bus = EventBus::new(100);
        let event = TelosEvent::PlaybackStateChanged {
            old_state: PlaybackState::Idle,
            new_state: PlaybackState::Playing,
            timestamp: Utc::now(),
        };

        // Should return error when no subscribers
        assert!(bus.emit(event).is_err());
    }

    #[tokio::test]
    async fn test_emit_with_subscriber() {
        let bus = EventBus::new(100);
        let mut rx = bus.subscribe();

        bus.emit_lossy(TelosEvent::SessionStateChanged {
            old_state: ConnectionState::Disconnected,
            new_state: ConnectionState::Connecting,
            timestamp: Utc::now(),
        });

        let received = rx.recv().await.unwrap();
        match received {
            TelosEvent::SessionStateChanged {
                old_state,
                new_state,
                ..
            } => {
                assert_eq!(old_state, ConnectionState::Disconnected);
                assert_eq!(new_state, ConnectionState::Connecting);
            }
            other => panic!("Wrong event type received: {:?}", other),
        }
    }

    #[test]
    fn test_emit_lossy_without_subscribers_does_not_panic() {
        let bus = EventBus::new(10);
        bus.emit_lossy(TelosEvent::FragmentDropped {
            reason: "decode failed".to_string(),
            timestamp: Utc::now(),
        });
    }

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = TelosEvent::VolumeChanged {
            old_volume: 0.8,
            new_volume: 0.5,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"VolumeChanged\""));
    }
}
