pub mod capture;
pub mod microphone;
pub mod pcm;

pub use capture::{CaptureBackend, CaptureConfig, CaptureFrame};
pub use microphone::MicrophoneBackend;
