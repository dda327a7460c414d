// Gapless scheduling of inbound audio chunks
//
// Chunks arrive at network-determined intervals but must play back-to-back.
// The scheduler keeps a single cursor on the output clock marking the next
// free slot: a chunk is scheduled at max(cursor, now) and the cursor advances
// by the chunk's duration. The cursor is owned by the one task that feeds the
// scheduler, so each update is a single atomic step per chunk.

use anyhow::{Context, Result};
use tracing::debug;

use crate::audio::pcm;

/// Destination for scheduled audio, abstracting the output device.
///
/// `now` is the device clock in seconds; `schedule` queues mono samples at
/// `source_rate` to start playing at `start` seconds on that clock.
pub trait PlaybackSink: Send {
    fn now(&self) -> f64;
    fn schedule(&self, samples: Vec<f32>, source_rate: u32, start: f64);
}

/// Schedules decoded audio chunks for gapless, non-overlapping playback.
pub struct ChunkScheduler<S: PlaybackSink> {
    sink: S,
    sample_rate: u32,
    cursor: f64,
}

impl<S: PlaybackSink> ChunkScheduler<S> {
    pub fn new(sink: S, sample_rate: u32) -> Self {
        Self {
            sink,
            sample_rate,
            cursor: 0.0,
        }
    }

    /// Decode one base64 PCM16 chunk and schedule it at the cursor.
    ///
    /// Returns the scheduled start time in seconds. A chunk arriving after the
    /// clock has passed the cursor resumes immediately at `now` rather than
    /// queuing overdue audio. Empty chunks are a no-op.
    pub fn enqueue_base64(&mut self, data: &str) -> Result<f64> {
        let bytes = pcm::decode_base64(data).context("Invalid base64 audio payload")?;
        let samples = pcm::decode_pcm16(&bytes);

        let now = self.sink.now();
        if self.cursor < now {
            self.cursor = now;
        }

        let start = self.cursor;
        if samples.is_empty() {
            return Ok(start);
        }

        let duration = samples.len() as f64 / self.sample_rate as f64;

        debug!(
            "Scheduling {} samples at {:.3}s ({:.3}s long, clock {:.3}s)",
            samples.len(),
            start,
            duration,
            now
        );

        self.sink.schedule(samples, self.sample_rate, start);
        self.cursor = start + duration;

        Ok(start)
    }

    /// Next free slot on the output timeline, in seconds.
    pub fn cursor(&self) -> f64 {
        self.cursor
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
