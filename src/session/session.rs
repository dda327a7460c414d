use super::config::CallConfig;
use super::stats::CallStats;
use crate::audio::pcm;
use crate::audio::{CaptureBackend, CaptureConfig, CaptureFrame, MicrophoneBackend};
use crate::live::{self, ConnectionState, LiveClient, LiveReceiver};
use crate::playback::{ChunkScheduler, DeviceSink};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Notifications published to the UI layer over a broadcast channel, so
/// multiple observers can subscribe and unsubscribe independently.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Transport handshake completed
    Connected,
    /// Socket closed (by either side); the session is over
    Disconnected,
    /// RMS amplitude of the latest capture frame, for the visualizer
    Level(f32),
}

/// One live call: microphone capture wired to the transport on the way out,
/// transport wired to the playback scheduler on the way in.
///
/// The two pipeline tasks are independent; neither assumes anything about the
/// other's timing. `shutdown` is the only cancellation primitive.
pub struct CallSession {
    config: CallConfig,
    started_at: DateTime<Utc>,
    state_rx: watch::Receiver<ConnectionState>,
    level_rx: watch::Receiver<f32>,
    frames_captured: Arc<AtomicUsize>,
    frames_sent: Arc<AtomicUsize>,
    chunks_scheduled: Arc<AtomicUsize>,
    mic: MicrophoneBackend,
    outbound_task: Option<JoinHandle<()>>,
    inbound_task: Option<JoinHandle<()>>,
}

impl CallSession {
    /// Acquire resources and start both pipeline tasks.
    ///
    /// Acquisition order is playback device, transport, microphone; a failure
    /// at any step releases what was already acquired and propagates, so a
    /// failed start leaves nothing running.
    pub async fn start(
        config: CallConfig,
        api_key: &str,
        system_instruction: &str,
        events: broadcast::Sender<SessionEvent>,
    ) -> Result<Self> {
        info!("Starting call {}", config.call_id);

        let sink = DeviceSink::open()
            .await
            .context("Failed to open playback device")?;

        let (state_tx, state_rx) = watch::channel(ConnectionState::Connecting);

        let (client, receiver) =
            match live::connect(&config.live, api_key, config.voice, system_instruction).await {
                Ok(pair) => pair,
                Err(e) => {
                    let _ = sink.close().await;
                    return Err(e);
                }
            };

        let _ = state_tx.send(ConnectionState::Connected);
        let _ = events.send(SessionEvent::Connected);

        let mut mic = MicrophoneBackend::new(CaptureConfig {
            frame_size: config.capture_buffer,
            ..Default::default()
        });

        let frames = match mic.start().await {
            Ok(rx) => rx,
            Err(e) => {
                let mut client = client;
                client.close().await;
                drop(receiver);
                let _ = sink.close().await;
                return Err(e);
            }
        };

        let (level_tx, level_rx) = watch::channel(0.0f32);
        let frames_captured = Arc::new(AtomicUsize::new(0));
        let frames_sent = Arc::new(AtomicUsize::new(0));
        let chunks_scheduled = Arc::new(AtomicUsize::new(0));

        let outbound_task = tokio::spawn(outbound_loop(
            frames,
            client,
            config.send_sample_rate,
            level_tx,
            events.clone(),
            Arc::clone(&frames_captured),
            Arc::clone(&frames_sent),
        ));

        let scheduler = ChunkScheduler::new(sink, config.playback_sample_rate);
        let inbound_task = tokio::spawn(inbound_loop(
            receiver,
            scheduler,
            state_tx,
            events,
            Arc::clone(&chunks_scheduled),
        ));

        info!("Call {} started", config.call_id);

        Ok(Self {
            config,
            started_at: Utc::now(),
            state_rx,
            level_rx,
            frames_captured,
            frames_sent,
            chunks_scheduled,
            mic,
            outbound_task: Some(outbound_task),
            inbound_task: Some(inbound_task),
        })
    }

    /// Tear down in reverse-acquisition order: microphone, transport,
    /// playback device. Safe to call from any state.
    pub async fn shutdown(mut self) -> Result<()> {
        info!("Shutting down call {}", self.config.call_id);

        if let Err(e) = self.mic.stop().await {
            error!("Microphone shutdown failed: {:#}", e);
        }

        // Stopping the microphone closes the frame channel; the outbound task
        // drains, closes the socket, and the inbound task follows the close.
        if let Some(task) = self.outbound_task.take() {
            if task.await.is_err() {
                error!("Outbound task panicked");
            }
        }

        if let Some(task) = self.inbound_task.take() {
            if task.await.is_err() {
                error!("Inbound task panicked");
            }
        }

        info!("Call {} shut down", self.config.call_id);

        Ok(())
    }

    pub fn call_id(&self) -> &str {
        &self.config.call_id
    }

    pub fn state(&self) -> ConnectionState {
        *self.state_rx.borrow()
    }

    /// Current call statistics
    pub fn stats(&self) -> CallStats {
        let duration = Utc::now().signed_duration_since(self.started_at);

        CallStats {
            call_id: self.config.call_id.clone(),
            state: self.state(),
            started_at: self.started_at,
            duration_secs: duration.num_milliseconds() as f64 / 1000.0,
            frames_captured: self.frames_captured.load(Ordering::Relaxed),
            frames_sent: self.frames_sent.load(Ordering::Relaxed),
            chunks_scheduled: self.chunks_scheduled.load(Ordering::Relaxed),
            level: *self.level_rx.borrow(),
        }
    }
}

/// Per-frame outbound processing: level metering always, transmission only
/// while the connection is open. Frames while disconnected are dropped, not
/// buffered, so a reconnecting session never replays stale audio.
async fn outbound_loop(
    mut frames: mpsc::Receiver<CaptureFrame>,
    mut client: LiveClient,
    send_rate: u32,
    level_tx: watch::Sender<f32>,
    events: broadcast::Sender<SessionEvent>,
    captured: Arc<AtomicUsize>,
    sent: Arc<AtomicUsize>,
) {
    while let Some(frame) = frames.recv().await {
        captured.fetch_add(1, Ordering::Relaxed);

        let level = pcm::rms(&frame.samples);
        let _ = level_tx.send(level);
        let _ = events.send(SessionEvent::Level(level));

        if !client.is_open() {
            continue;
        }

        let resampled = pcm::resample_linear(&frame.samples, frame.sample_rate, send_rate);
        let payload = pcm::encode_base64(&pcm::encode_pcm16(&resampled));

        if let Err(e) = client.send_audio(payload).await {
            warn!("Failed to encode outbound frame: {:#}", e);
            continue;
        }

        sent.fetch_add(1, Ordering::Relaxed);
    }

    client.close().await;

    info!("Outbound audio task stopped");
}

/// Inbound processing: every audio fragment is scheduled in arrival order;
/// a bad fragment is dropped without touching the playback cursor.
async fn inbound_loop(
    mut receiver: LiveReceiver,
    mut scheduler: ChunkScheduler<DeviceSink>,
    state_tx: watch::Sender<ConnectionState>,
    events: broadcast::Sender<SessionEvent>,
    chunks: Arc<AtomicUsize>,
) {
    while let Some(message) = receiver.next_message().await {
        for payload in message.audio_payloads() {
            match scheduler.enqueue_base64(payload) {
                Ok(_) => {
                    chunks.fetch_add(1, Ordering::Relaxed);
                }
                Err(e) => warn!("Dropping bad audio chunk: {:#}", e),
            }
        }
    }

    let _ = state_tx.send(ConnectionState::Disconnected);
    let _ = events.send(SessionEvent::Disconnected);

    if let Err(e) = scheduler.into_sink().close().await {
        warn!("Playback device shutdown failed: {:#}", e);
    }

    info!("Inbound audio task stopped");
}
