// Microphone capture backend built on cpal
//
// cpal streams are not Send, so the stream lives on a dedicated OS thread and
// frames cross into tokio through a bounded mpsc channel. The audio callback
// never blocks: when the channel is full the frame is dropped.

use anyhow::{anyhow, bail, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::SampleFormat;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

use super::capture::{CaptureBackend, CaptureConfig, CaptureFrame};

/// Microphone capture backend (default input device, downmixed to mono)
pub struct MicrophoneBackend {
    config: CaptureConfig,
    shutdown_tx: Option<std::sync::mpsc::Sender<()>>,
    thread: Option<std::thread::JoinHandle<()>>,
    capturing: bool,
}

impl MicrophoneBackend {
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            config,
            shutdown_tx: None,
            thread: None,
            capturing: false,
        }
    }
}

#[async_trait::async_trait]
impl CaptureBackend for MicrophoneBackend {
    async fn start(&mut self) -> Result<mpsc::Receiver<CaptureFrame>> {
        if self.capturing {
            bail!("Microphone capture already started");
        }

        let (frame_tx, frame_rx) = mpsc::channel(self.config.channel_capacity);
        let (ready_tx, ready_rx) = oneshot::channel::<Result<u32>>();
        let (shutdown_tx, shutdown_rx) = std::sync::mpsc::channel::<()>();
        let frame_size = self.config.frame_size;

        let thread = std::thread::spawn(move || {
            let stream = match build_input_stream(frame_tx, frame_size) {
                Ok((stream, rate)) => {
                    let _ = ready_tx.send(Ok(rate));
                    stream
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                    return;
                }
            };

            // Park until the session tears down; the stream keeps running
            // in its own callback thread until dropped here.
            let _ = shutdown_rx.recv();
            drop(stream);
        });

        // Wait for the device to be acquired; an acquisition failure must be
        // reported synchronously with no dangling handle.
        let sample_rate = match ready_rx.await {
            Ok(Ok(rate)) => rate,
            Ok(Err(e)) => {
                let _ = thread.join();
                return Err(e).context("Failed to acquire microphone");
            }
            Err(_) => {
                let _ = thread.join();
                bail!("Microphone thread exited before reporting readiness");
            }
        };

        info!(
            "Microphone capture started ({}Hz, {}-sample frames)",
            sample_rate, frame_size
        );

        self.shutdown_tx = Some(shutdown_tx);
        self.thread = Some(thread);
        self.capturing = true;

        Ok(frame_rx)
    }

    async fn stop(&mut self) -> Result<()> {
        if !self.capturing {
            return Ok(());
        }

        info!("Stopping microphone capture");

        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }

        if let Some(thread) = self.thread.take() {
            tokio::task::spawn_blocking(move || {
                if thread.join().is_err() {
                    error!("Microphone thread panicked during shutdown");
                }
            })
            .await
            .context("Failed to join microphone thread")?;
        }

        self.capturing = false;

        info!("Microphone capture stopped");

        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing
    }

    fn name(&self) -> &str {
        "cpal microphone"
    }
}

impl Drop for MicrophoneBackend {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

fn build_input_stream(
    frame_tx: mpsc::Sender<CaptureFrame>,
    frame_size: usize,
) -> Result<(cpal::Stream, u32)> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or_else(|| anyhow!("No input device available"))?;

    let device_name = device.name().unwrap_or_else(|_| "unknown".to_string());
    let supported = device
        .default_input_config()
        .context("Failed to query input config")?;

    let sample_rate = supported.sample_rate().0;
    let channels = supported.channels() as usize;
    let sample_format = supported.sample_format();
    let stream_config: cpal::StreamConfig = supported.into();

    info!(
        "Using input device '{}' ({}Hz, {} channels, {:?})",
        device_name, sample_rate, channels, sample_format
    );

    let mut framer = Framer::new(frame_tx, frame_size, sample_rate, channels);

    let err_fn = |err| error!("Microphone stream error: {}", err);

    let stream = match sample_format {
        SampleFormat::F32 => device.build_input_stream(
            &stream_config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| framer.push(data),
            err_fn,
            None,
        )?,
        SampleFormat::I16 => device.build_input_stream(
            &stream_config,
            move |data: &[i16], _: &cpal::InputCallbackInfo| {
                let floats: Vec<f32> =
                    data.iter().map(|&s| s as f32 / 32768.0).collect();
                framer.push(&floats);
            },
            err_fn,
            None,
        )?,
        other => bail!("Unsupported input sample format: {:?}", other),
    };

    stream.play().context("Failed to start input stream")?;

    Ok((stream, sample_rate))
}

/// Accumulates interleaved device samples into fixed-size mono frames.
struct Framer {
    frame_tx: mpsc::Sender<CaptureFrame>,
    frame_size: usize,
    sample_rate: u32,
    channels: usize,
    pending: Vec<f32>,
}

impl Framer {
    fn new(
        frame_tx: mpsc::Sender<CaptureFrame>,
        frame_size: usize,
        sample_rate: u32,
        channels: usize,
    ) -> Self {
        Self {
            frame_tx,
            frame_size,
            sample_rate,
            channels,
            pending: Vec::with_capacity(frame_size * 2),
        }
    }

    fn push(&mut self, interleaved: &[f32]) {
        if self.channels <= 1 {
            self.pending.extend_from_slice(interleaved);
        } else {
            for frame in interleaved.chunks_exact(self.channels) {
                let sum: f32 = frame.iter().sum();
                self.pending.push(sum / self.channels as f32);
            }
        }

        while self.pending.len() >= self.frame_size {
            let samples: Vec<f32> = self.pending.drain(..self.frame_size).collect();
            let frame = CaptureFrame {
                samples,
                sample_rate: self.sample_rate,
            };

            match self.frame_tx.try_send(frame) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    debug!("Capture channel full, dropping frame");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    warn!("Capture channel closed, dropping frame");
                }
            }
        }
    }
}
