// crates/vidsqueeze-media/src/worker.rs
//
// CaptureWorker: owns the result channel and spawns the probe / capture
// threads. All public API the Compressor calls lives here.
//
// One thread per probe and one per capture job; each thread owns its FFmpeg
// objects outright and talks back only through `tx`. A capture thread opens
// its own pipeline, so a failure to arm it arrives as
// `CaptureFailed { CaptureInitialization }` on the same channel as progress.

use std::sync::{Arc, atomic::{AtomicBool, Ordering}};
use std::thread;

use crossbeam_channel::{bounded, Receiver, Sender};
use tracing::{debug, warn};
use uuid::Uuid;

use vidsqueeze_core::asset::SourceAsset;
use vidsqueeze_core::config::CaptureConfig;
use vidsqueeze_core::error::CompressError;
use vidsqueeze_core::media_types::{CaptureRequest, Dimensions, SessionEvent};
use vidsqueeze_core::session::CaptureHandle;

use crate::capture::WebmRecorder;
use crate::driver::run_capture_job;
use crate::playback::FfmpegPlayback;
use crate::probe::probe_bytes;

/// Result channel capacity. Capture threads block when it is full, which
/// throttles them to the rate the owner drains it.
const CHANNEL_CAPACITY: usize = 512;

// ── CaptureLease ──────────────────────────────────────────────────────────────

/// The session's handle on one capture thread. Stopping (or dropping) the
/// lease raises the thread's stop flag; the thread exits before its next frame.
pub struct CaptureLease {
    job_id: Uuid,
    stop:   Arc<AtomicBool>,
}

impl CaptureLease {
    pub fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }
}

impl CaptureHandle for CaptureLease {
    fn stop(&self) {
        if !self.stop.swap(true, Ordering::Relaxed) {
            debug!("[worker] job {} released", self.job_id);
        }
    }
}

impl Drop for CaptureLease {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

// ── CaptureWorker ─────────────────────────────────────────────────────────────

pub struct CaptureWorker {
    /// Probe results and capture messages, in arrival order.
    pub rx:   Receiver<SessionEvent>,
    tx:       Sender<SessionEvent>,
    shutdown: Arc<AtomicBool>,
}

impl Default for CaptureWorker {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureWorker {
    pub fn new() -> Self {
        let (tx, rx) = bounded(CHANNEL_CAPACITY);
        Self { rx, tx, shutdown: Arc::new(AtomicBool::new(false)) }
    }

    /// Probe `asset` on a background thread; answers with `MetadataReady` or
    /// `ProbeFailed`.
    pub fn probe(&self, asset: Arc<SourceAsset>) {
        let tx = self.tx.clone();
        let sd = self.shutdown.clone();
        thread::spawn(move || {
            if sd.load(Ordering::Relaxed) { return; }
            let asset_id = asset.id();
            let event = match asset.probe_with(probe_bytes) {
                Ok(info)   => SessionEvent::MetadataReady { asset_id, info },
                Err(error) => {
                    warn!("[worker] probe '{}' failed: {error}", asset.name());
                    SessionEvent::ProbeFailed { asset_id, error }
                }
            };
            let _ = tx.send(event);
        });
    }

    /// Spawn the capture thread for `request`.
    pub fn start_capture(&self, request: &CaptureRequest, config: &CaptureConfig) -> CaptureLease {
        let job_id   = request.job_id;
        let asset    = Arc::clone(&request.asset);
        let target   = request.target;
        let duration = request.duration;
        let config   = config.clone();
        let stop     = Arc::new(AtomicBool::new(false));
        let tx       = self.tx.clone();
        let sd       = self.shutdown.clone();

        let thread_stop = Arc::clone(&stop);
        thread::spawn(move || {
            if sd.load(Ordering::Relaxed) {
                let _ = tx.send(SessionEvent::CaptureFailed {
                    job_id,
                    error: CompressError::CaptureInitialization("worker shutting down".into()),
                });
                return;
            }
            run_capture_job(job_id, duration, &config, &thread_stop, &tx, || {
                open_pipeline(&asset, target, &config)
            });
        });

        CaptureLease { job_id, stop }
    }

    /// Ask every thread to stop at its next check.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }
}

impl Drop for CaptureWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn open_pipeline(
    asset:  &SourceAsset,
    target: Dimensions,
    config: &CaptureConfig,
) -> Result<(FfmpegPlayback, WebmRecorder), CompressError> {
    let init_err = |e: anyhow::Error| CompressError::CaptureInitialization(format!("{e:#}"));
    crate::init().map_err(init_err)?;
    let playback = FfmpegPlayback::open(asset, target).map_err(init_err)?;
    let recorder = WebmRecorder::open(target, config.timeslice_secs).map_err(init_err)?;
    Ok((playback, recorder))
}
