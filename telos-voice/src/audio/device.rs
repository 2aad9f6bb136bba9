//! Audio device output using cpal (cargo feature `device`)
//!
//! Real implementation of the platform audio traits: one cpal output stream
//! per context, fed from a lock-free ring of mono frames. The stream lives on
//! a dedicated thread because `cpal::Stream` is not `Send`; the thread just
//! keeps it alive until the context closes.
//!
//! A playing unit is a window of frames in the ring; it completes when the
//! stream callback has consumed past its end, and stopping it flushes
//! everything still buffered.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, SampleRate, StreamConfig};
use ringbuf::{
    traits::{Consumer, Producer, Split},
    HeapProd, HeapRb,
};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::audio::backend::{AudioBackend, OutputContext, PlayingUnit};
use crate::audio::decode::{resample_mono, FragmentDecoder};
use crate::audio::types::{AudioFragment, DecodedAudio};
use crate::error::{Error, Result};

/// Ring capacity in mono frames. Voice fragments are short; this absorbs a
/// generous backlog at any realistic device rate.
const RING_CAPACITY_FRAMES: usize = 48_000 * 30;

/// How often the keep-alive thread checks for shutdown
const SHUTDOWN_POLL: Duration = Duration::from_millis(50);

/// How often a unit polls for its completion point
const COMPLETION_POLL: Duration = Duration::from_millis(10);

/// cpal-backed [`AudioBackend`]
#[derive(Debug, Clone, Default)]
pub struct DeviceBackend {
    /// Output device to use; `None` picks the platform default
    device_name: Option<String>,
}

impl DeviceBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_device(name: impl Into<String>) -> Self {
        Self {
            device_name: Some(name.into()),
        }
    }

    /// Names of the available output devices
    pub fn list_devices() -> Result<Vec<String>> {
        let host = cpal::default_host();
        let devices = host
            .output_devices()
            .map_err(|e| Error::Backend(format!("could not enumerate devices: {}", e)))?
            .filter_map(|device| device.name().ok())
            .collect();
        Ok(devices)
    }
}

#[async_trait]
impl AudioBackend for DeviceBackend {
    async fn open_context(&self, sample_rate: u32) -> Result<Arc<dyn OutputContext>> {
        let context = DeviceContext::open(self.device_name.clone(), sample_rate).await?;
        Ok(context as Arc<dyn OutputContext>)
    }
}

/// State shared between the context, its units, and the stream callback
#[derive(Default)]
struct Shared {
    /// Mono frames the callback has consumed (played or flushed)
    consumed: AtomicU64,
    /// When set, the callback discards everything buffered before filling
    flush: AtomicBool,
    /// Tells the keep-alive thread to drop the stream and exit
    shutdown: AtomicBool,
    /// Set by the stream error callback; the context reports it on `resume`
    stream_failed: AtomicBool,
}

/// One cpal output stream pinned to a context rate
struct DeviceContext {
    decoder: FragmentDecoder,
    /// The fixed rate this context presents to the sequencer
    sample_rate: u32,
    /// The rate the device actually runs at; units are resampled on `start`
    /// when it differs
    device_rate: u32,
    producer: Mutex<HeapProd<f32>>,
    /// Mono frames handed to the ring so far
    submitted: AtomicU64,
    shared: Arc<Shared>,
}

impl DeviceContext {
    async fn open(device_name: Option<String>, sample_rate: u32) -> Result<Arc<Self>> {
        let shared = Arc::new(Shared::default());
        let (result_tx, result_rx) = oneshot::channel();

        let thread_shared = Arc::clone(&shared);
        std::thread::Builder::new()
            .name("telos-audio-output".to_string())
            .spawn(move || {
                stream_thread(device_name, sample_rate, thread_shared, result_tx);
            })
            .map_err(|e| Error::Backend(format!("could not spawn audio thread: {}", e)))?;

        let (device_rate, producer) = result_rx
            .await
            .map_err(|_| Error::Backend("audio thread died during setup".to_string()))??;

        info!(
            requested_rate = sample_rate,
            device_rate, "audio device stream running"
        );

        Ok(Arc::new(Self {
            decoder: FragmentDecoder::new(sample_rate),
            sample_rate,
            device_rate,
            producer: Mutex::new(producer),
            submitted: AtomicU64::new(0),
            shared,
        }))
    }
}

#[async_trait]
impl OutputContext for DeviceContext {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    async fn decode(&self, fragment: &AudioFragment) -> Result<DecodedAudio> {
        let decoder = self.decoder;
        let fragment = fragment.clone();
        tokio::task::spawn_blocking(move || decoder.decode(&fragment))
            .await
            .map_err(|e| Error::Decode(format!("decode task failed: {}", e)))?
    }

    async fn resume(&self) -> Result<()> {
        // cpal streams don't suspend the way a browser context does; the only
        // unrecoverable condition is a failed stream.
        if self.shared.stream_failed.load(Ordering::Acquire) {
            return Err(Error::Output("audio stream failed".to_string()));
        }
        Ok(())
    }

    async fn start(&self, audio: DecodedAudio) -> Result<Arc<dyn PlayingUnit>> {
        let samples = if audio.sample_rate == self.device_rate {
            audio.samples
        } else {
            resample_mono(&audio.samples, audio.sample_rate, self.device_rate)?
        };

        let end_target = {
            let mut producer = self.producer.lock().unwrap();
            let pushed = producer.push_slice(&samples);
            if pushed < samples.len() {
                warn!(
                    "output ring full; unit truncated by {} frames",
                    samples.len() - pushed
                );
            }
            self.submitted.fetch_add(pushed as u64, Ordering::AcqRel) + pushed as u64
        };

        Ok(Arc::new(DeviceUnit {
            end_target,
            shared: Arc::clone(&self.shared),
            stopped: AtomicBool::new(false),
        }))
    }

    async fn close(&self) {
        self.shared.flush.store(true, Ordering::Release);
        self.shared.shutdown.store(true, Ordering::Release);
        debug!("audio device stream shutting down");
    }
}

/// A window of frames in the ring, playing until consumed or flushed
struct DeviceUnit {
    /// Total consumed-frame count at which this unit is done
    end_target: u64,
    shared: Arc<Shared>,
    stopped: AtomicBool,
}

#[async_trait]
impl PlayingUnit for DeviceUnit {
    async fn completed(&self) {
        let mut tick = tokio::time::interval(COMPLETION_POLL);
        loop {
            if self.stopped.load(Ordering::Acquire)
                || self.shared.stream_failed.load(Ordering::Acquire)
                || self.shared.consumed.load(Ordering::Acquire) >= self.end_target
            {
                return;
            }
            tick.tick().await;
        }
    }

    async fn stop(&self) -> Result<()> {
        self.stopped.store(true, Ordering::Release);
        // The callback drains the ring on its next run; from the caller's
        // point of view the unit is silenced now.
        self.shared.flush.store(true, Ordering::Release);
        Ok(())
    }
}

/// Keep-alive thread: builds the stream, reports the outcome, then parks
/// until shutdown. The stream must be created and dropped on this thread.
fn stream_thread(
    device_name: Option<String>,
    sample_rate: u32,
    shared: Arc<Shared>,
    result_tx: oneshot::Sender<Result<(u32, HeapProd<f32>)>>,
) {
    match build_stream(device_name, sample_rate, &shared) {
        Ok((stream, device_rate, producer)) => {
            if result_tx.send(Ok((device_rate, producer))).is_err() {
                return; // context creation was abandoned
            }
            while !shared.shutdown.load(Ordering::Acquire) {
                std::thread::sleep(SHUTDOWN_POLL);
            }
            drop(stream);
        }
        Err(e) => {
            let _ = result_tx.send(Err(e));
        }
    }
}

fn build_stream(
    device_name: Option<String>,
    sample_rate: u32,
    shared: &Arc<Shared>,
) -> Result<(cpal::Stream, u32, HeapProd<f32>)> {
    let host = cpal::default_host();

    let device = match device_name {
        Some(name) => {
            let mut devices = host
                .output_devices()
                .map_err(|e| Error::Backend(format!("could not enumerate devices: {}", e)))?;
            match devices.find(|d| d.name().ok().as_deref() == Some(name.as_str())) {
                Some(device) => device,
                None => {
                    warn!("output device '{}' not found; using default", name);
                    default_output_device(&host)?
                }
            }
        }
        None => default_output_device(&host)?,
    };

    let config = best_config(&device, sample_rate)?;
    let channels = config.channels as usize;
    let device_rate = config.sample_rate.0;

    let (producer, mut consumer) = HeapRb::<f32>::new(RING_CAPACITY_FRAMES).split();

    let callback_shared = Arc::clone(shared);
    let error_shared = Arc::clone(shared);

    let stream = device
        .build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                if callback_shared.flush.swap(false, Ordering::AcqRel) {
                    let mut flushed = 0u64;
                    while consumer.try_pop().is_some() {
                        flushed += 1;
                    }
                    callback_shared.consumed.fetch_add(flushed, Ordering::Release);
                }

                let mut played = 0u64;
                for frame in data.chunks_mut(channels) {
                    let sample = match consumer.try_pop() {
                        Some(sample) => {
                            played += 1;
                            sample
                        }
                        None => 0.0,
                    };
                    for slot in frame {
                        *slot = sample;
                    }
                }
                callback_shared.consumed.fetch_add(played, Ordering::Release);
            },
            move |e| {
                warn!("audio stream error: {}", e);
                error_shared.stream_failed.store(true, Ordering::Release);
            },
            None,
        )
        .map_err(|e| Error::Backend(format!("could not build output stream: {}", e)))?;

    stream
        .play()
        .map_err(|e| Error::Backend(format!("could not start output stream: {}", e)))?;

    Ok((stream, device_rate, producer))
}

fn default_output_device(host: &cpal::Host) -> Result<Device> {
    host.default_output_device()
        .ok_or_else(|| Error::Backend("no default output device".to_string()))
}

/// Pick a stream config as close to the requested rate as the device allows.
///
/// Prefers an f32 config that supports the requested rate exactly (so no
/// resampling is needed); otherwise falls back to the device default, and
/// `start` resamples each unit.
fn best_config(device: &Device, sample_rate: u32) -> Result<StreamConfig> {
    let supported = device
        .supported_output_configs()
        .map_err(|e| Error::Backend(format!("could not read device configs: {}", e)))?;

    let exact = supported.into_iter().find(|range| {
        range.sample_format() == SampleFormat::F32
            && range.min_sample_rate().0 <= sample_rate
            && range.max_sample_rate().0 >= sample_rate
    });

    if let Some(range) = exact {
        return Ok(range.with_sample_rate(SampleRate(sample_rate)).config());
    }

    let default = device
        .default_output_config()
        .map_err(|e| Error::Backend(format!("could not read default config: {}", e)))?;
    if default.sample_format() != SampleFormat::F32 {
        return Err(Error::Backend(format!(
            "device default format {:?} is not f32",
            default.sample_format()
        )));
    }

    debug!(
        "device does not support {}Hz; running at {}Hz with resampling",
        sample_rate,
        default.sample_rate().0
    );
    Ok(default.config())
}
