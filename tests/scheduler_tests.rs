// Playback cursor invariants, exercised through a fake sink with a
// controllable clock.

use frontdesk::audio::pcm;
use frontdesk::playback::{ChunkScheduler, PlaybackSink};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct FakeSink {
    clock: Arc<Mutex<f64>>,
    scheduled: Arc<Mutex<Vec<(f64, usize)>>>,
}

impl FakeSink {
    fn set_clock(&self, now: f64) {
        *self.clock.lock().unwrap() = now;
    }

    fn starts(&self) -> Vec<f64> {
        self.scheduled.lock().unwrap().iter().map(|s| s.0).collect()
    }
}

impl PlaybackSink for FakeSink {
    fn now(&self) -> f64 {
        *self.clock.lock().unwrap()
    }

    fn schedule(&self, samples: Vec<f32>, _source_rate: u32, start: f64) {
        self.scheduled.lock().unwrap().push((start, samples.len()));
    }
}

/// Base64 PCM16 chunk of `seconds` of silence at 24kHz.
fn chunk(seconds: f64) -> String {
    let samples = vec![0.0f32; (seconds * 24000.0).round() as usize];
    pcm::encode_base64(&pcm::encode_pcm16(&samples))
}

#[test]
fn test_back_to_back_chunks_have_zero_gap() {
    let sink = FakeSink::default();
    let mut scheduler = ChunkScheduler::new(sink.clone(), 24000);

    // Two 0.5s chunks arriving immediately after one another.
    scheduler.enqueue_base64(&chunk(0.5)).unwrap();
    scheduler.enqueue_base64(&chunk(0.5)).unwrap();

    let starts = sink.starts();
    assert_eq!(starts.len(), 2);
    assert_eq!(starts[0], 0.0);
    assert!((starts[1] - 0.5).abs() < 1e-9, "second chunk must start where the first ends");
    assert!((scheduler.cursor() - 1.0).abs() < 1e-9);
}

#[test]
fn test_stale_cursor_resumes_at_now() {
    let sink = FakeSink::default();
    let mut scheduler = ChunkScheduler::new(sink.clone(), 24000);

    scheduler.enqueue_base64(&chunk(0.25)).unwrap();

    // The stream starves; the device clock runs past the cursor.
    sink.set_clock(3.0);
    let start = scheduler.enqueue_base64(&chunk(0.25)).unwrap();

    assert_eq!(start, 3.0, "overdue chunk must resume at the device clock");
    assert!((scheduler.cursor() - 3.25).abs() < 1e-9);
}

#[test]
fn test_cursor_never_in_the_past() {
    let sink = FakeSink::default();
    let mut scheduler = ChunkScheduler::new(sink.clone(), 24000);

    let arrival_clocks = [0.0, 0.1, 0.9, 2.5, 2.6];
    for &now in &arrival_clocks {
        sink.set_clock(now);
        let start = scheduler.enqueue_base64(&chunk(0.5)).unwrap();
        assert!(start >= now, "chunk scheduled at {} before clock {}", start, now);
    }

    // No two scheduled buffers overlap.
    let starts = sink.starts();
    for pair in starts.windows(2) {
        assert!(pair[1] >= pair[0] + 0.5 - 1e-9);
    }
}

#[test]
fn test_malformed_chunk_leaves_cursor_untouched() {
    let sink = FakeSink::default();
    let mut scheduler = ChunkScheduler::new(sink.clone(), 24000);

    scheduler.enqueue_base64(&chunk(0.5)).unwrap();
    let cursor = scheduler.cursor();

    assert!(scheduler.enqueue_base64("not base64!!!").is_err());
    assert_eq!(scheduler.cursor(), cursor);

    // The next valid chunk still lands back-to-back.
    let start = scheduler.enqueue_base64(&chunk(0.5)).unwrap();
    assert!((start - 0.5).abs() < 1e-9);
}

#[test]
fn test_empty_chunk_is_a_noop() {
    let sink = FakeSink::default();
    let mut scheduler = ChunkScheduler::new(sink.clone(), 24000);

    scheduler.enqueue_base64("").unwrap();

    assert!(sink.starts().is_empty());
    assert_eq!(scheduler.cursor(), 0.0);
}
