//! HTTP control API for the browser front end
//!
//! This module provides a REST API for driving the voice session:
//! - POST /call/start - Connect and start streaming
//! - POST /call/stop - Tear the call down
//! - GET /call/status - Query call state and level
//! - GET/PUT /profile - Read or patch the business profile
//! - POST /profile/reset - Restore the default profile
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
