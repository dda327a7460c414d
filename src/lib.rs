pub mod audio;
pub mod config;
pub mod http;
pub mod live;
pub mod playback;
pub mod profile;
pub mod session;

pub use audio::{CaptureBackend, CaptureConfig, CaptureFrame, MicrophoneBackend};
pub use config::Config;
pub use http::{create_router, AppState};
pub use live::{ConnectionState, LiveClient, LiveConfig, LiveReceiver, ServerMessage, Voice};
pub use playback::{ChunkScheduler, DeviceSink, PlaybackSink};
pub use profile::{build_system_prompt, BusinessProfile, ProfileStore, ProfileUpdate};
pub use session::{CallConfig, CallSession, CallStats, SessionController, SessionEvent};
