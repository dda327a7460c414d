use crate::live::{LiveConfig, Voice};

/// Configuration for one live call
#[derive(Debug, Clone)]
pub struct CallConfig {
    /// Unique call identifier (e.g., "call-7f9a...")
    pub call_id: String,

    /// Voice the agent speaks with
    pub voice: Voice,

    /// Outbound target rate the service expects
    pub send_sample_rate: u32,

    /// Rate of inbound synthesized audio
    pub playback_sample_rate: u32,

    /// Samples per capture callback frame
    pub capture_buffer: usize,

    /// Live service endpoint and model
    pub live: LiveConfig,
}

impl Default for CallConfig {
    fn default() -> Self {
        Self {
            call_id: format!("call-{}", uuid::Uuid::new_v4()),
            voice: Voice::default(),
            send_sample_rate: 16000,
            playback_sample_rate: 24000,
            capture_buffer: 4096,
            live: LiveConfig {
                url: crate::config::DEFAULT_LIVE_URL.to_string(),
                model: crate::config::DEFAULT_LIVE_MODEL.to_string(),
            },
        }
    }
}
