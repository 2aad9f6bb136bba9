//! Audio playback sequencer
//!
//! Serializes streamed audio fragments into gapless local playback: fragments
//! play strictly in arrival order, one at a time, each started only when its
//! predecessor finishes. A single drain task consumes the queue; `enqueue`
//! never blocks; `stop` cancels everything immediately from the caller's
//! point of view.
//!
//! Failure policy: nothing here propagates as a hard failure. A sequencer
//! that cannot acquire an output context degrades to a no-op, a fragment
//! that cannot be decoded is dropped, and a unit that refuses to halt is
//! logged and abandoned. Losing audio must never abort a coaching session.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::{debug, info, trace, warn};

use telos_common::events::{EventBus, PlaybackState, TelosEvent};

use crate::audio::backend::{AudioBackend, OutputContext, PlayingUnit};
use crate::audio::types::AudioFragment;
use crate::config::SequencerConfig;

/// The output context bound to one voice conversation.
///
/// Exactly one session exists per conversation; a new conversation requires
/// tearing the prior one down fully before another may be created.
struct PlaybackSession {
    context: Arc<dyn OutputContext>,
}

/// Sequential playback of audio fragments against a fixed-rate context
pub struct PlaybackSequencer {
    inner: Arc<Inner>,
}

struct Inner {
    backend: Arc<dyn AudioBackend>,
    config: SequencerConfig,
    events: Arc<EventBus>,

    /// None until `initialize`, after `teardown`, or when context creation
    /// failed (the degraded no-op state).
    session: Mutex<Option<PlaybackSession>>,

    /// The playback queue. Mutated only by `enqueue` (append) and the drain
    /// task (pop-front); the mutex is never held across an await.
    queue: Mutex<VecDeque<AudioFragment>>,

    /// The at-most-one unit currently being rendered
    current: Mutex<Option<Arc<dyn PlayingUnit>>>,

    /// Guards the single drain task
    drain_active: AtomicBool,

    /// Bumped by `stop` and `teardown`; a drain cycle that observes a bump
    /// after decoding suppresses playback of that fragment.
    generation: AtomicU64,

    state: Mutex<PlaybackState>,
}

impl PlaybackSequencer {
    pub fn new(
        backend: Arc<dyn AudioBackend>,
        config: SequencerConfig,
        events: Arc<EventBus>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                backend,
                config,
                events,
                session: Mutex::new(None),
                queue: Mutex::new(VecDeque::new()),
                current: Mutex::new(None),
                drain_active: AtomicBool::new(false),
                generation: AtomicU64::new(0),
                state: Mutex::new(PlaybackState::Idle),
            }),
        }
    }

    /// Acquire the output context for a new playback session.
    ///
    /// Never fails outward: if the platform cannot create the context the
    /// sequencer logs and stays degraded, and subsequent `enqueue` calls are
    /// no-ops. Any prior session is torn down fully first.
    pub async fn initialize(&self) {
        self.teardown().await;

        match self
            .inner
            .backend
            .open_context(self.inner.config.sample_rate)
            .await
        {
            Ok(context) => {
                info!(
                    sample_rate = self.inner.config.sample_rate,
                    "audio output context ready"
                );
                *self.inner.session.lock().unwrap() = Some(PlaybackSession { context });
            }
            Err(e) => {
                warn!(
                    "could not create audio output context: {}; \
                     voice playback disabled for this session",
                    e
                );
            }
        }
    }

    /// Append a fragment to the queue tail and make sure the drain task is
    /// running. Never blocks; the decode/playback happens asynchronously.
    ///
    /// Dropped silently when the sequencer is uninitialized or degraded.
    pub fn enqueue(&self, fragment: AudioFragment) {
        if self.inner.session.lock().unwrap().is_none() {
            trace!("no output context; dropping fragment");
            return;
        }

        let queue_len = {
            let mut queue = self.inner.queue.lock().unwrap();
            queue.push_back(fragment);
            queue.len()
        };
        self.inner.events.emit_lossy(TelosEvent::FragmentEnqueued {
            queue_len,
            timestamp: Utc::now(),
        });

        self.spawn_drain_if_idle();
    }

    /// Empty the queue and halt any in-flight playback, forcing Idle.
    ///
    /// The queue is cleared synchronously before any suspension point, so no
    /// queued fragment can start after `stop` returns. Idempotent; platform
    /// stop failures are logged and swallowed.
    pub async fn stop(&self) {
        let cleared = {
            let mut queue = self.inner.queue.lock().unwrap();
            let n = queue.len();
            queue.clear();
            n
        };
        if cleared > 0 {
            debug!("discarded {} queued fragments", cleared);
        }
        self.inner.generation.fetch_add(1, Ordering::AcqRel);

        let unit = self.inner.current.lock().unwrap().take();
        if let Some(unit) = unit {
            if let Err(e) = unit.stop().await {
                warn!("could not halt in-flight playback: {}", e);
            }
        }

        Inner::set_state(&self.inner, PlaybackState::Idle);
    }

    /// Release the output context entirely. `enqueue` becomes a no-op until
    /// the next `initialize`.
    pub async fn teardown(&self) {
        self.stop().await;

        let session = self.inner.session.lock().unwrap().take();
        if let Some(session) = session {
            session.context.close().await;
            info!("audio output context released");
        }
    }

    /// Current derived playback state
    pub fn state(&self) -> PlaybackState {
        *self.inner.state.lock().unwrap()
    }

    /// Number of fragments waiting in the queue (excludes the in-flight one)
    pub fn queued(&self) -> usize {
        self.inner.queue.lock().unwrap().len()
    }

    /// Whether an output context is currently held
    pub fn is_initialized(&self) -> bool {
        self.inner.session.lock().unwrap().is_some()
    }

    fn spawn_drain_if_idle(&self) {
        if self
            .inner
            .drain_active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            let inner = Arc::clone(&self.inner);
            tokio::spawn(async move {
                Inner::drain(inner).await;
            });
        }
    }
}

impl Inner {
    /// The drain loop: pop the head fragment, decode it, play it to
    /// completion, repeat. Completing one unit is the sole trigger for
    /// starting the next.
    async fn drain(inner: Arc<Inner>) {
        loop {
            let fragment = inner.queue.lock().unwrap().pop_front();

            let Some(fragment) = fragment else {
                // Publish Idle before releasing the drain flag: any successor
                // task (spawned once the flag clears) publishes Playing
                // strictly after this, keeping the observed order sane.
                Self::set_state(&inner, PlaybackState::Idle);
                inner.drain_active.store(false, Ordering::Release);
                // A fragment may have slipped in between the empty pop and
                // the flag clear; reclaim the drain if so.
                if !inner.queue.lock().unwrap().is_empty()
                    && inner
                        .drain_active
                        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                        .is_ok()
                {
                    continue;
                }
                return;
            };

            let context = {
                let session = inner.session.lock().unwrap();
                match session.as_ref() {
                    Some(session) => Arc::clone(&session.context),
                    None => {
                        // Torn down with fragments still queued; discard them.
                        inner.queue.lock().unwrap().clear();
                        continue;
                    }
                }
            };

            Self::set_state(&inner, PlaybackState::Playing);
            let generation = inner.generation.load(Ordering::Acquire);

            let decoded = match context.decode(&fragment).await {
                Ok(decoded) => decoded,
                Err(e) => {
                    warn!("dropping undecodable fragment: {}", e);
                    inner.drop_fragment(format!("decode failed: {}", e));
                    continue;
                }
            };

            // stop() arrived while decoding: the decode finished silently,
            // playback is suppressed.
            if inner.generation.load(Ordering::Acquire) != generation {
                debug!("stopped during decode; fragment discarded");
                continue;
            }

            if let Err(e) = context.resume().await {
                warn!("output context did not resume: {}", e);
                inner.drop_fragment(format!("resume failed: {}", e));
                continue;
            }

            let unit = match context.start(decoded).await {
                Ok(unit) => unit,
                Err(e) => {
                    warn!("could not start playback: {}", e);
                    inner.drop_fragment(format!("playback start failed: {}", e));
                    continue;
                }
            };

            {
                let mut current = inner.current.lock().unwrap();
                if inner.generation.load(Ordering::Acquire) != generation {
                    // stop() raced with the start call and missed this unit;
                    // silence it ourselves.
                    drop(current);
                    if let Err(e) = unit.stop().await {
                        warn!("could not halt in-flight playback: {}", e);
                    }
                    continue;
                }
                *current = Some(Arc::clone(&unit));
            }

            unit.completed().await;
            inner.current.lock().unwrap().take();
        }
    }

    fn drop_fragment(&self, reason: String) {
        self.events.emit_lossy(TelosEvent::FragmentDropped {
            reason,
            timestamp: Utc::now(),
        });
    }

    fn set_state(inner: &Arc<Inner>, new_state: PlaybackState) {
        let mut state = inner.state.lock().unwrap();
        if *state != new_state {
            let old_state = *state;
            *state = new_state;
            inner.events.emit_lossy(TelosEvent::PlaybackStateChanged {
                old_state,
                new_state,
                timestamp: Utc::now(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;

    /// Minimal backend whose units complete instantly
    struct InstantBackend {
        opens: AtomicUsize,
        closes: Arc<AtomicUsize>,
    }

    struct InstantContext {
        sample_rate: u32,
        closes: Arc<AtomicUsize>,
    }

    struct InstantUnit;

    #[async_trait]
    impl AudioBackend for InstantBackend {
        async fn open_context(&self, sample_rate: u32) -> Result<Arc<dyn OutputContext>> {
            self.opens.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(InstantContext {
                sample_rate,
                closes: Arc::clone(&self.closes),
            }))
        }
    }

    #[async_trait]
    impl OutputContext for InstantContext {
        fn sample_rate(&self) -> u32 {
            self.sample_rate
        }

        async fn decode(
            &self,
            fragment: &AudioFragment,
        ) -> Result<crate::audio::types::DecodedAudio> {
            if fragment.is_empty() {
                return Err(Error::Decode("empty".to_string()));
            }
            Ok(crate::audio::types::DecodedAudio::new(
                vec![0.0; 16],
                self.sample_rate,
            ))
        }

        async fn resume(&self) -> Result<()> {
            Ok(())
        }

        async fn start(
            &self,
            _audio: crate::audio::types::DecodedAudio,
        ) -> Result<Arc<dyn PlayingUnit>> {
            Ok(Arc::new(InstantUnit))
        }

        async fn close(&self) {
            self.closes.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl PlayingUnit for InstantUnit {
        async fn completed(&self) {}

        async fn stop(&self) -> Result<()> {
            Ok(())
        }
    }

    fn instant_sequencer() -> (PlaybackSequencer, Arc<AtomicUsize>) {
        let closes = Arc::new(AtomicUsize::new(0));
        let backend = Arc::new(InstantBackend {
            opens: AtomicUsize::new(0),
            closes: Arc::clone(&closes),
        });
        let sequencer = PlaybackSequencer::new(
            backend,
            SequencerConfig::default(),
            Arc::new(EventBus::new(64)),
        );
        (sequencer, closes)
    }

    #[tokio::test]
    async fn test_enqueue_before_initialize_is_noop() {
        let (sequencer, _) = instant_sequencer();
        sequencer.enqueue(AudioFragment::from(vec![1u8, 2]));
        assert_eq!(sequencer.queued(), 0);
        assert_eq!(sequencer.state(), PlaybackState::Idle);
    }

    #[tokio::test]
    async fn test_reinitialize_closes_previous_context() {
        let (sequencer, closes) = instant_sequencer();
        sequencer.initialize().await;
        sequencer.initialize().await;
        assert_eq!(closes.load(Ordering::SeqCst), 1);
        assert!(sequencer.is_initialized());
    }

    #[tokio::test]
    async fn test_teardown_is_idempotent() {
        let (sequencer, closes) = instant_sequencer();
        sequencer.initialize().await;
        sequencer.teardown().await;
        sequencer.teardown().await;
        assert_eq!(closes.load(Ordering::SeqCst), 1);
        assert!(!sequencer.is_initialized());
    }
}
