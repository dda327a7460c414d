use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::live::ConnectionState;

/// Snapshot of a live call, served by the status endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallStats {
    /// Call identifier
    pub call_id: String,

    /// Current connection state
    pub state: ConnectionState,

    /// When the call started
    pub started_at: DateTime<Utc>,

    /// Total duration in seconds
    pub duration_secs: f64,

    /// Capture frames taken from the microphone so far
    pub frames_captured: usize,

    /// Capture frames actually transmitted (frames while disconnected are
    /// dropped, not queued)
    pub frames_sent: usize,

    /// Inbound audio chunks scheduled for playback
    pub chunks_scheduled: usize,

    /// Most recent RMS amplitude of the microphone, for the visualizer
    pub level: f32,
}
