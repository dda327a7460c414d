use anyhow::Result;
use tokio::sync::mpsc;

/// One block of freshly captured microphone audio (mono float samples at the
/// device's native rate). Frames are transient: processed and released within
/// one outbound-task iteration, never buffered across iterations.
#[derive(Debug, Clone)]
pub struct CaptureFrame {
    /// Mono samples in [-1.0, 1.0]
    pub samples: Vec<f32>,
    /// Sample rate the device delivered these samples at
    pub sample_rate: u32,
}

/// Configuration for a capture backend
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Samples per frame handed to the pipeline
    pub frame_size: usize,
    /// Bound on the frame channel; frames beyond it are dropped, not queued
    pub channel_capacity: usize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            frame_size: 4096,
            channel_capacity: 16,
        }
    }
}

/// Audio capture backend trait
///
/// The production implementation is the cpal microphone backend. The trait
/// keeps the session pipeline independent of any particular audio host.
#[async_trait::async_trait]
pub trait CaptureBackend: Send + Sync {
    /// Start capturing audio
    ///
    /// Returns a channel receiver that will receive capture frames. Must fail
    /// without leaving anything running if the device cannot be acquired.
    async fn start(&mut self) -> Result<mpsc::Receiver<CaptureFrame>>;

    /// Stop capturing audio. Idempotent.
    async fn stop(&mut self) -> Result<()>;

    /// Check if backend is currently capturing
    fn is_capturing(&self) -> bool;

    /// Get backend name for logging
    fn name(&self) -> &str;
}
