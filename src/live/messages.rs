use serde::{Deserialize, Serialize};

/// Prebuilt voices offered by the live service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Voice {
    Aoede,
    Charon,
    Fenrir,
    Kore,
    Puck,
}

impl Voice {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "Aoede" => Some(Self::Aoede),
            "Charon" => Some(Self::Charon),
            "Fenrir" => Some(Self::Fenrir),
            "Kore" => Some(Self::Kore),
            "Puck" => Some(Self::Puck),
            _ => None,
        }
    }
}

impl Default for Voice {
    fn default() -> Self {
        Self::Aoede
    }
}

const DEFAULT_INSTRUCTION: &str = "You are a helpful assistant.";

// ============================================================================
// Outbound messages (snake_case on the wire)
// ============================================================================

/// Handshake sent once, immediately after the socket opens. Declares the
/// model, requested response modality, voice, and the system instruction.
#[derive(Debug, Serialize)]
pub struct SetupMessage {
    pub setup: Setup,
}

#[derive(Debug, Serialize)]
pub struct Setup {
    pub model: String,
    pub generation_config: GenerationConfig,
    pub system_instruction: SystemInstruction,
}

#[derive(Debug, Serialize)]
pub struct GenerationConfig {
    pub response_modalities: Vec<String>,
    pub speech_config: SpeechConfig,
}

#[derive(Debug, Serialize)]
pub struct SpeechConfig {
    pub voice_config: VoiceConfig,
}

#[derive(Debug, Serialize)]
pub struct VoiceConfig {
    pub prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Debug, Serialize)]
pub struct PrebuiltVoiceConfig {
    pub voice_name: Voice,
}

#[derive(Debug, Serialize)]
pub struct SystemInstruction {
    pub parts: Vec<TextPart>,
}

#[derive(Debug, Serialize)]
pub struct TextPart {
    pub text: String,
}

impl SetupMessage {
    pub fn new(model: &str, voice: Voice, system_instruction: &str) -> Self {
        let text = if system_instruction.trim().is_empty() {
            DEFAULT_INSTRUCTION.to_string()
        } else {
            system_instruction.to_string()
        };

        Self {
            setup: Setup {
                model: model.to_string(),
                generation_config: GenerationConfig {
                    response_modalities: vec!["AUDIO".to_string()],
                    speech_config: SpeechConfig {
                        voice_config: VoiceConfig {
                            prebuilt_voice_config: PrebuiltVoiceConfig { voice_name: voice },
                        },
                    },
                },
                system_instruction: SystemInstruction {
                    parts: vec![TextPart { text }],
                },
            },
        }
    }
}

/// One captured frame, sent while connected. Carries base64 PCM16 at the
/// outbound target rate.
#[derive(Debug, Serialize)]
pub struct RealtimeInputMessage {
    pub realtime_input: RealtimeInput,
}

#[derive(Debug, Serialize)]
pub struct RealtimeInput {
    pub media_chunks: Vec<MediaChunk>,
}

#[derive(Debug, Serialize)]
pub struct MediaChunk {
    pub mime_type: String,
    pub data: String,
}

impl RealtimeInputMessage {
    pub fn audio(base64_pcm: String) -> Self {
        Self {
            realtime_input: RealtimeInput {
                media_chunks: vec![MediaChunk {
                    mime_type: "audio/pcm".to_string(),
                    data: base64_pcm,
                }],
            },
        }
    }
}

// ============================================================================
// Inbound messages (camelCase on the wire)
// ============================================================================

/// A message from the service. The core only cares about embedded audio
/// fragments; everything else is carried through and ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerMessage {
    #[serde(default)]
    pub server_content: Option<ServerContent>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerContent {
    #[serde(default)]
    pub model_turn: Option<ModelTurn>,
    #[serde(default)]
    pub turn_complete: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelTurn {
    #[serde(default)]
    pub parts: Vec<ContentPart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPart {
    #[serde(default)]
    pub inline_data: Option<InlineData>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    #[serde(default)]
    pub mime_type: Option<String>,
    pub data: String,
}

impl ServerMessage {
    /// Base64 audio fragments in arrival order; empty for non-audio messages.
    pub fn audio_payloads(&self) -> Vec<&str> {
        self.server_content
            .iter()
            .flat_map(|content| content.model_turn.iter())
            .flat_map(|turn| turn.parts.iter())
            .filter_map(|part| part.inline_data.as_ref())
            .map(|blob| blob.data.as_str())
            .collect()
    }
}
