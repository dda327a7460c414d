pub mod device;
pub mod scheduler;

pub use device::DeviceSink;
pub use scheduler::{ChunkScheduler, PlaybackSink};
