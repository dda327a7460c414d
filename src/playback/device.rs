// Speaker output built on cpal
//
// Mirrors the microphone backend's threading: the cpal stream is not Send, so
// it lives on its own thread while the sink handle shares a queue with it. The
// output callback is the device clock: it counts frames written, fills silence
// until a scheduled buffer's start frame is due, then plays buffers in order.

use anyhow::{anyhow, bail, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::SampleFormat;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;
use tracing::{error, info};

use super::scheduler::PlaybackSink;
use crate::audio::pcm;

struct Scheduled {
    start_frame: u64,
    samples: Vec<f32>,
    pos: usize,
}

#[derive(Default)]
struct Timeline {
    frames_played: u64,
    queue: VecDeque<Scheduled>,
}

/// Playback sink bound to the default output device.
pub struct DeviceSink {
    timeline: Arc<Mutex<Timeline>>,
    device_rate: u32,
    shutdown_tx: Option<std::sync::mpsc::Sender<()>>,
    thread: Option<std::thread::JoinHandle<()>>,
}

impl DeviceSink {
    /// Open the default output device and start its stream.
    pub async fn open() -> Result<Self> {
        let timeline = Arc::new(Mutex::new(Timeline::default()));
        let (ready_tx, ready_rx) = oneshot::channel::<Result<u32>>();
        let (shutdown_tx, shutdown_rx) = std::sync::mpsc::channel::<()>();

        let timeline_for_thread = Arc::clone(&timeline);
        let thread = std::thread::spawn(move || {
            let stream = match build_output_stream(timeline_for_thread) {
                Ok((stream, rate)) => {
                    let _ = ready_tx.send(Ok(rate));
                    stream
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                    return;
                }
            };

            let _ = shutdown_rx.recv();
            drop(stream);
        });

        let device_rate = match ready_rx.await {
            Ok(Ok(rate)) => rate,
            Ok(Err(e)) => {
                let _ = thread.join();
                return Err(e).context("Failed to open output device");
            }
            Err(_) => {
                let _ = thread.join();
                bail!("Playback thread exited before reporting readiness");
            }
        };

        info!("Playback device opened ({}Hz)", device_rate);

        Ok(Self {
            timeline,
            device_rate,
            shutdown_tx: Some(shutdown_tx),
            thread: Some(thread),
        })
    }

    /// Stop the output stream and release the device.
    pub async fn close(mut self) -> Result<()> {
        info!("Closing playback device");

        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }

        if let Some(thread) = self.thread.take() {
            tokio::task::spawn_blocking(move || {
                if thread.join().is_err() {
                    error!("Playback thread panicked during shutdown");
                }
            })
            .await
            .context("Failed to join playback thread")?;
        }

        Ok(())
    }
}

impl Drop for DeviceSink {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl PlaybackSink for DeviceSink {
    fn now(&self) -> f64 {
        let timeline = self.timeline.lock().unwrap_or_else(|e| e.into_inner());
        timeline.frames_played as f64 / self.device_rate as f64
    }

    fn schedule(&self, samples: Vec<f32>, source_rate: u32, start: f64) {
        let resampled = pcm::resample_linear(&samples, source_rate, self.device_rate);
        let start_frame = (start * self.device_rate as f64).round() as u64;

        let mut timeline = self.timeline.lock().unwrap_or_else(|e| e.into_inner());
        timeline.queue.push_back(Scheduled {
            start_frame,
            samples: resampled,
            pos: 0,
        });
    }
}

fn build_output_stream(timeline: Arc<Mutex<Timeline>>) -> Result<(cpal::Stream, u32)> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| anyhow!("No output device available"))?;

    let device_name = device.name().unwrap_or_else(|_| "unknown".to_string());
    let supported = device
        .default_output_config()
        .context("Failed to query output config")?;

    let sample_rate = supported.sample_rate().0;
    let channels = supported.channels() as usize;
    let sample_format = supported.sample_format();
    let stream_config: cpal::StreamConfig = supported.into();

    info!(
        "Using output device '{}' ({}Hz, {} channels, {:?})",
        device_name, sample_rate, channels, sample_format
    );

    let err_fn = |err| error!("Playback stream error: {}", err);

    let stream = match sample_format {
        SampleFormat::F32 => device.build_output_stream(
            &stream_config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                fill_output(&timeline, data, channels)
            },
            err_fn,
            None,
        )?,
        SampleFormat::I16 => device.build_output_stream(
            &stream_config,
            move |data: &mut [i16], _: &cpal::OutputCallbackInfo| {
                let mut floats = vec![0.0f32; data.len()];
                fill_output(&timeline, &mut floats, channels);
                for (out, f) in data.iter_mut().zip(floats.iter()) {
                    *out = (f.clamp(-1.0, 1.0) * 32767.0) as i16;
                }
            },
            err_fn,
            None,
        )?,
        other => bail!("Unsupported output sample format: {:?}", other),
    };

    stream.play().context("Failed to start output stream")?;

    Ok((stream, sample_rate))
}

/// Fill one callback buffer from the timeline: silence until a buffer is due,
/// then its samples fanned out across all channels.
fn fill_output(timeline: &Arc<Mutex<Timeline>>, data: &mut [f32], channels: usize) {
    let mut guard = timeline.lock().unwrap_or_else(|e| e.into_inner());
    let timeline = &mut *guard;

    for frame in data.chunks_mut(channels.max(1)) {
        let mut value = 0.0f32;

        while let Some(front) = timeline.queue.front_mut() {
            if front.start_frame > timeline.frames_played {
                break;
            }
            if front.pos < front.samples.len() {
                value = front.samples[front.pos];
                front.pos += 1;
                break;
            }
            timeline.queue.pop_front();
        }

        for out in frame.iter_mut() {
            *out = value;
        }

        timeline.frames_played += 1;
    }
}
