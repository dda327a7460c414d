pub mod client;
pub mod messages;

pub use client::{connect, ConnectionState, LiveClient, LiveConfig, LiveReceiver};
pub use messages::{RealtimeInputMessage, ServerMessage, SetupMessage, Voice};
