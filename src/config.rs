use anyhow::Result;
use serde::Deserialize;

pub const DEFAULT_LIVE_URL: &str =
    "wss://generativelanguage.googleapis.com/ws/google.ai.generativelanguage.v1alpha.GenerativeService.BidiGenerateContent";
pub const DEFAULT_LIVE_MODEL: &str = "models/gemini-2.5-flash-native-audio-preview-12-2025";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub live: LiveSettings,
    pub audio: AudioSettings,
    pub profile: ProfileSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LiveSettings {
    pub url: String,
    pub model: String,
    pub voice: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    pub capture_buffer: usize,
    pub send_sample_rate: u32,
    pub playback_sample_rate: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProfileSettings {
    pub path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            live: LiveSettings::default(),
            audio: AudioSettings::default(),
            profile: ProfileSettings::default(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "frontdesk".to_string(),
            http: HttpConfig::default(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8787,
        }
    }
}

impl Default for LiveSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_LIVE_URL.to_string(),
            model: DEFAULT_LIVE_MODEL.to_string(),
            voice: "Aoede".to_string(),
        }
    }
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            capture_buffer: 4096,
            send_sample_rate: 16000,
            playback_sample_rate: 24000,
        }
    }
}

impl Default for ProfileSettings {
    fn default() -> Self {
        Self {
            path: "data/profile.json".to_string(),
        }
    }
}

impl Config {
    /// Load configuration: built-in defaults overlaid by an optional file.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
