use super::config::CallConfig;
use super::session::{CallSession, SessionEvent};
use super::stats::CallStats;
use crate::config::Config;
use crate::live::{LiveConfig, Voice};
use crate::profile::{build_system_prompt, ProfileStore};
use anyhow::{bail, Result};
use tokio::sync::{broadcast, Mutex};
use tracing::{info, warn};

/// Owns at most one live call at a time.
///
/// The microphone, socket, and output device are each exclusive resources, so
/// the controller holds a single session slot and rejects a second start while
/// one is active. The caller must stop the current call before starting the
/// next. The access key is taken per start request, handed to the session, and
/// never persisted.
pub struct SessionController {
    config: Config,
    profile_store: ProfileStore,
    active: Mutex<Option<CallSession>>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionController {
    pub fn new(config: Config, profile_store: ProfileStore) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            config,
            profile_store,
            active: Mutex::new(None),
            events,
        }
    }

    /// Subscribe to session notifications (connect, disconnect, level).
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn profile_store(&self) -> &ProfileStore {
        &self.profile_store
    }

    pub async fn is_active(&self) -> bool {
        self.active.lock().await.is_some()
    }

    /// Start a call with the current profile's system instruction.
    ///
    /// Fails when a call is already active or when a device/socket cannot be
    /// acquired; a failed start leaves the slot empty.
    pub async fn start_call(&self, api_key: &str, voice: Option<Voice>) -> Result<String> {
        let mut slot = self.active.lock().await;

        if slot.is_some() {
            bail!("A call is already active; stop it before starting another");
        }

        let profile = self.profile_store.load()?;
        let system_instruction = build_system_prompt(&profile);

        let voice = voice.unwrap_or_else(|| self.default_voice());
        let call_config = CallConfig {
            voice,
            send_sample_rate: self.config.audio.send_sample_rate,
            playback_sample_rate: self.config.audio.playback_sample_rate,
            capture_buffer: self.config.audio.capture_buffer,
            live: LiveConfig {
                url: self.config.live.url.clone(),
                model: self.config.live.model.clone(),
            },
            ..Default::default()
        };

        let session =
            CallSession::start(call_config, api_key, &system_instruction, self.events.clone())
                .await?;

        let call_id = session.call_id().to_string();
        *slot = Some(session);

        info!("Call {} active", call_id);

        Ok(call_id)
    }

    /// Stop the active call, if any. Idempotent: stopping with no call, or
    /// stopping twice, is a clean no-op.
    pub async fn stop_call(&self) -> Result<()> {
        let session = self.active.lock().await.take();

        match session {
            Some(session) => session.shutdown().await,
            None => Ok(()),
        }
    }

    /// Stats for the active call, or `None` when idle.
    pub async fn stats(&self) -> Option<CallStats> {
        self.active.lock().await.as_ref().map(|s| s.stats())
    }

    fn default_voice(&self) -> Voice {
        match Voice::parse(&self.config.live.voice) {
            Some(voice) => voice,
            None => {
                warn!(
                    "Unknown voice '{}' in config, using {:?}",
                    self.config.live.voice,
                    Voice::default()
                );
                Voice::default()
            }
        }
    }
}
