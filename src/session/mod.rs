//! Live call management
//!
//! This module provides the `CallSession` abstraction that wires together:
//! - Microphone capture and per-frame level metering
//! - Outbound resample/encode/transmit processing
//! - Inbound decode and gapless playback scheduling
//! - Session statistics and state management
//!
//! plus the `SessionController`, which owns the single active call.

mod config;
mod controller;
mod session;
mod stats;

pub use config::CallConfig;
pub use controller::SessionController;
pub use session::{CallSession, SessionEvent};
pub use stats::CallStats;
