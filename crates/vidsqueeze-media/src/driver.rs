// crates/vidsqueeze-media/src/driver.rs
//
// The capture loop: pull frames from a playback surface, hand them to a
// recorder, and report the playback clock and encoder output as SessionEvents.
//
// Message order for one job:
//   TimeAdvanced* / ChunkAvailable*  (interleaved, in playback order)
//   ChunkAvailable?                  (final bytes from recorder.finish())
//   PlaybackEnded                    (exactly once, after the final chunk)
// or, on any error, a single CaptureFailed and nothing after it.
//
// TimeAdvanced is only sent for elapsed < duration. The end of the timeline
// is always reported as PlaybackEnded, so the session sees every chunk before
// it seals the buffer.
//
// Stop flag:
//   Checked before every frame. A raised flag ends the job with `Cancelled`.
//   A disconnected result channel counts as a stop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::Sender;
use tracing::{debug, info, warn};
use uuid::Uuid;

use vidsqueeze_core::config::{CaptureConfig, Pacing};
use vidsqueeze_core::error::CompressError;
use vidsqueeze_core::media_types::SessionEvent;

// ── Seams ─────────────────────────────────────────────────────────────────────

/// One presented frame and its playback time in seconds from the first frame.
pub struct PlaybackTick<F> {
    pub elapsed: f64,
    pub frame:   F,
}

/// A source played in presentation order.
pub trait PlaybackSurface {
    type Frame;

    /// Next frame, or `None` once the stream has ended.
    fn advance(&mut self) -> anyhow::Result<Option<PlaybackTick<Self::Frame>>>;
}

/// An encoder + muxer fed with presented frames.
pub trait CaptureRecorder<F> {
    fn record(&mut self, frame: F, elapsed: f64) -> anyhow::Result<()>;

    /// Encoded bytes produced since the previous call. May be empty.
    fn take_chunk(&mut self) -> anyhow::Result<Vec<u8>>;

    /// Flush the encoder and close the container; returns the last bytes.
    fn finish(&mut self) -> anyhow::Result<Vec<u8>>;
}

// ── Driver ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CaptureStats {
    pub frames: u64,
    pub chunks: u64,
    pub bytes:  u64,
    /// Playback time of the last presented frame.
    pub last_elapsed: f64,
}

/// Run `playback` to the end, feeding every frame to `recorder`.
///
/// Sends progress and chunks on `tx` as they happen and `PlaybackEnded` on
/// success. On error nothing more is sent; the caller reports the error.
pub fn drive_capture<P, R>(
    playback: &mut P,
    recorder: &mut R,
    job_id:   Uuid,
    duration: f64,
    config:   &CaptureConfig,
    stop:     &AtomicBool,
    tx:       &Sender<SessionEvent>,
) -> Result<CaptureStats, CompressError>
where
    P: PlaybackSurface,
    R: CaptureRecorder<P::Frame>,
{
    let started       = Instant::now();
    let timeslice     = config.timeslice_secs.max(f64::EPSILON);
    let mut next_emit = timeslice;
    let mut stats     = CaptureStats::default();

    loop {
        if stop.load(Ordering::Relaxed) {
            return Err(CompressError::Cancelled);
        }

        let tick = match playback.advance() {
            Ok(Some(tick)) => tick,
            Ok(None)       => break,
            Err(e)         => return Err(CompressError::Playback(format!("{e:#}"))),
        };
        let elapsed = tick.elapsed;

        if config.pacing == Pacing::Realtime {
            pace(started, elapsed);
        }

        recorder.record(tick.frame, elapsed)
            .map_err(|e| CompressError::Encode(format!("{e:#}")))?;
        stats.frames      += 1;
        stats.last_elapsed = elapsed;

        if elapsed < duration {
            send(tx, SessionEvent::TimeAdvanced { job_id, elapsed })?;
        }

        if elapsed >= next_emit {
            let chunk = recorder.take_chunk()
                .map_err(|e| CompressError::Encode(format!("{e:#}")))?;
            emit_chunk(tx, job_id, chunk, &mut stats)?;
            while next_emit <= elapsed {
                next_emit += timeslice;
            }
        }
    }

    let tail = recorder.finish()
        .map_err(|e| CompressError::Encode(format!("{e:#}")))?;
    emit_chunk(tx, job_id, tail, &mut stats)?;
    send(tx, SessionEvent::PlaybackEnded { job_id })?;

    debug!(
        "[capture] job {job_id} drained in {:.2}s wall clock",
        started.elapsed().as_secs_f64(),
    );
    Ok(stats)
}

/// Open the pipeline with `open`, drive it, and report the outcome on `tx`.
/// Exactly one `CaptureFailed` is sent for any failure, including `open`.
pub fn run_capture_job<P, R, O>(
    job_id:   Uuid,
    duration: f64,
    config:   &CaptureConfig,
    stop:     &AtomicBool,
    tx:       &Sender<SessionEvent>,
    open:     O,
) where
    P: PlaybackSurface,
    R: CaptureRecorder<P::Frame>,
    O: FnOnce() -> Result<(P, R), CompressError>,
{
    let result = open().and_then(|(mut playback, mut recorder)| {
        drive_capture(&mut playback, &mut recorder, job_id, duration, config, stop, tx)
    });

    match result {
        Ok(stats) => info!(
            "[capture] job {job_id} done: {} frames, {} chunks, {} bytes, {:.2}s",
            stats.frames, stats.chunks, stats.bytes, stats.last_elapsed,
        ),
        Err(error) => {
            if error == CompressError::Cancelled {
                debug!("[capture] job {job_id} stopped");
            } else {
                warn!("[capture] job {job_id} failed: {error}");
            }
            let _ = tx.send(SessionEvent::CaptureFailed { job_id, error });
        }
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Sleep until `elapsed` seconds of playback have passed since `started`.
fn pace(started: Instant, elapsed: f64) {
    if !elapsed.is_finite() || elapsed <= 0.0 {
        return;
    }
    let due = started + Duration::from_secs_f64(elapsed);
    let now = Instant::now();
    if due > now {
        thread::sleep(due - now);
    }
}

fn emit_chunk(
    tx:     &Sender<SessionEvent>,
    job_id: Uuid,
    data:   Vec<u8>,
    stats:  &mut CaptureStats,
) -> Result<(), CompressError> {
    if data.is_empty() {
        return Ok(());
    }
    stats.chunks += 1;
    stats.bytes  += data.len() as u64;
    send(tx, SessionEvent::ChunkAvailable { job_id, data })
}

fn send(tx: &Sender<SessionEvent>, event: SessionEvent) -> Result<(), CompressError> {
    tx.send(event).map_err(|_| CompressError::Cancelled)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
