// crates/vidsqueeze-media/src/compressor.rs
//
// Compressor: the one object a frontend needs.
//
// Owns the EncodeSession, the CaptureWorker feeding it, the CaptureConfig and
// the latest successful artifact. The session is only touched on the caller's
// thread: `poll` (non-blocking, once per UI frame) or `wait` (blocking,
// headless) drain the worker channel into `EncodeSession::apply`.
//
// Artifact policy:
//   `artifact()` is the output of the most recent *successful* capture of the
//   current asset. It is hidden while a new capture runs. If that run fails
//   (including an empty capture) the previous artifact is offered again;
//   selecting another asset or resetting clears it.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::RecvTimeoutError;
use tracing::{info, warn};
use uuid::Uuid;

use vidsqueeze_core::asset::SourceAsset;
use vidsqueeze_core::config::CaptureConfig;
use vidsqueeze_core::error::CompressError;
use vidsqueeze_core::media_types::{Dimensions, MediaInfo, SessionEvent};
use vidsqueeze_core::output::OutputArtifact;
use vidsqueeze_core::session::{CaptureHandle, EncodeSession, SessionPhase};

use crate::worker::CaptureWorker;

pub struct Compressor {
    session:    EncodeSession,
    worker:     CaptureWorker,
    config:     CaptureConfig,
    latest:     Option<Arc<OutputArtifact>>,
    last_error: Option<CompressError>,
}

impl Compressor {
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            session:    EncodeSession::new(),
            worker:     CaptureWorker::new(),
            config,
            latest:     None,
            last_error: None,
        }
    }

    // ── Read access ───────────────────────────────────────────────────────────

    pub fn config(&self)     -> &CaptureConfig               { &self.config }
    pub fn session(&self)    -> &EncodeSession               { &self.session }
    pub fn phase(&self)      -> SessionPhase                 { self.session.phase() }
    pub fn progress(&self)   -> f64                          { self.session.progress() }
    pub fn asset(&self)      -> Option<&Arc<SourceAsset>>    { self.session.asset() }
    pub fn media_info(&self) -> Option<MediaInfo>            { self.session.media_info() }
    pub fn target_size(&self) -> Option<Dimensions>          { self.session.target_size() }
    pub fn last_error(&self) -> Option<&CompressError>       { self.last_error.as_ref() }

    /// An asset is selected but its probe has not answered yet.
    pub fn is_probing(&self) -> bool {
        self.phase() == SessionPhase::Idle && self.asset().is_some()
    }

    /// Latest successful artifact, or `None` while a capture is running.
    pub fn artifact(&self) -> Option<&Arc<OutputArtifact>> {
        match self.phase() {
            SessionPhase::Capturing => None,
            _                       => self.latest.as_ref(),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.is_probing() || self.phase() == SessionPhase::Capturing
    }

    // ── Commands ──────────────────────────────────────────────────────────────

    /// Select a file from disk. Non-video files are rejected before any read.
    pub fn select_file(&mut self, path: &Path) -> Result<(), CompressError> {
        let asset = SourceAsset::from_path(path).map_err(|e| self.record(e))?;
        self.select(asset)
    }

    /// Replace the current asset and probe it in the background.
    pub fn select(&mut self, asset: SourceAsset) -> Result<(), CompressError> {
        let asset = Arc::new(asset);
        self.session.load(Arc::clone(&asset)).map_err(|e| self.record(e))?;
        if let Some(size) = self.config.target_size {
            self.session.set_target_size(Some(size)).map_err(|e| self.record(e))?;
        }
        self.latest     = None;
        self.last_error = None;

        info!("[session] selected '{}' ({}, {} bytes)", asset.name(), asset.mime(), asset.len());
        if asset.info().is_none() {
            self.worker.probe(asset);
        }
        Ok(())
    }

    /// `None` restores the probed dimensions.
    pub fn set_target_size(&mut self, size: Option<Dimensions>) -> Result<(), CompressError> {
        self.session.set_target_size(size).map_err(|e| self.record(e))
    }

    pub fn start(&mut self) -> Result<Uuid, CompressError> {
        let worker = &self.worker;
        let config = &self.config;
        let result = self.session.start(|request| {
            Ok(Box::new(worker.start_capture(request, config)) as Box<dyn CaptureHandle>)
        });
        match result {
            Ok(job_id) => {
                self.last_error = None;
                Ok(job_id)
            }
            Err(e) => Err(self.record(e)),
        }
    }

    /// Stop the running capture. Returns false when nothing was running.
    pub fn cancel(&mut self) -> bool {
        let cancelled = self.session.cancel();
        if cancelled {
            self.last_error = Some(CompressError::Cancelled);
        }
        cancelled
    }

    /// Drop the asset, any capture and the latest artifact.
    pub fn reset(&mut self) {
        self.session.reset();
        self.latest     = None;
        self.last_error = None;
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Apply every pending worker message. Returns the failures they caused,
    /// in order.
    pub fn poll(&mut self) -> Vec<CompressError> {
        let mut errors = Vec::new();
        while let Ok(event) = self.worker.rx.try_recv() {
            if let Err(e) = self.handle(event) {
                errors.push(e);
            }
        }
        errors
    }

    /// Apply worker messages until nothing is in flight (no probe pending, no
    /// capture running) or `timeout` passes. Returns the first failure.
    pub fn wait(&mut self, timeout: Duration) -> Result<SessionPhase, CompressError> {
        let deadline = Instant::now() + timeout;
        while self.is_busy() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.worker.rx.recv_timeout(remaining) {
                Ok(event) => self.handle(event)?,
                Err(RecvTimeoutError::Timeout) => {
                    warn!("[session] wait timed out in {:?}", self.phase());
                    break;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        Ok(self.phase())
    }

    // ── Internals ─────────────────────────────────────────────────────────────

    fn handle(&mut self, event: SessionEvent) -> Result<(), CompressError> {
        let result = self.session.apply(event);
        if let Some(artifact) = self.session.artifact() {
            let fresh = self.latest.as_ref().map_or(true, |l| !Arc::ptr_eq(l, artifact));
            if fresh {
                self.latest = Some(Arc::clone(artifact));
            }
        }
        result.map_err(|e| self.record(e))
    }

    fn record(&mut self, error: CompressError) -> CompressError {
        self.last_error = Some(error.clone());
        error
    }
}

impl Default for Compressor {
    fn default() -> Self {
        Self::new(CaptureConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn text_file_is_rejected_without_an_asset() {
        let mut c = Compressor::default();
        let err = c.select_file(&PathBuf::from("/tmp/notes.txt")).unwrap_err();
        assert!(matches!(err, CompressError::InvalidFileType { ref mime } if mime == "text/plain"));
        assert!(c.asset().is_none());
        assert_eq!(c.phase(), SessionPhase::Idle);
        assert_eq!(c.last_error(), Some(&err));
    }

    #[test]
    fn empty_video_never_leaves_idle() {
        let mut c = Compressor::default();
        c.select(SourceAsset::new("empty.mp4", "video/mp4", Vec::<u8>::new()).unwrap()).unwrap();
        assert!(c.is_probing());

        let err = c.wait(Duration::from_secs(10)).unwrap_err();
        assert!(matches!(err, CompressError::UnsupportedMedia(_)));
        assert_eq!(c.phase(), SessionPhase::Idle);
        assert!(c.asset().is_none());
        assert_eq!(c.start().unwrap_err(), CompressError::NotReady);
    }

    #[test]
    fn start_before_selection_is_not_ready() {
        let mut c = Compressor::default();
        assert_eq!(c.start().unwrap_err(), CompressError::NotReady);
        assert!(!c.cancel());
        assert!(c.artifact().is_none());
    }

    #[test]
    fn unparseable_video_fails_to_arm() {
        // Metadata is cached up front, so the capture thread is what
        // discovers the bytes cannot be played.
        let asset = SourceAsset::new("junk.mp4", "video/mp4", vec![0u8; 64]).unwrap();
        asset.probe_with(|_, _| Ok(MediaInfo::new(64, 36, 1.0).unwrap())).unwrap();

        let mut c = Compressor::default();
        c.select(asset).unwrap();
        assert_eq!(c.phase(), SessionPhase::Ready);
        c.start().unwrap();

        let err = c.wait(Duration::from_secs(10)).unwrap_err();
        assert!(matches!(err, CompressError::CaptureInitialization(_)));
        assert_eq!(c.phase(), SessionPhase::Failed);
        assert!(c.artifact().is_none());
    }

    #[test]
    fn config_target_size_is_applied_on_select() {
        let cfg = CaptureConfig { target_size: Some(Dimensions::new(320, 180)), ..Default::default() };
        let asset = SourceAsset::new("a.mp4", "video/mp4", vec![1u8]).unwrap();
        asset.probe_with(|_, _| Ok(MediaInfo::new(1920, 1080, 5.0).unwrap())).unwrap();

        let mut c = Compressor::new(cfg);
        c.select(asset).unwrap();
        assert_eq!(c.target_size(), Some(Dimensions::new(320, 180)));
        c.set_target_size(None).unwrap();
        assert_eq!(c.target_size(), Some(Dimensions::new(1920, 1080)));
    }

    struct NoopHandle;
    impl CaptureHandle for NoopHandle {
        fn stop(&self) {}
    }

    fn arm(c: &mut Compressor) -> Uuid {
        c.session.start(|_| Ok(Box::new(NoopHandle) as Box<dyn CaptureHandle>)).unwrap()
    }

    #[test]
    fn previous_artifact_is_hidden_during_a_retry() {
        let asset = SourceAsset::new("a.mp4", "video/mp4", vec![1u8]).unwrap();
        asset.probe_with(|_, _| Ok(MediaInfo::new(64, 36, 2.0).unwrap())).unwrap();
        let mut c = Compressor::default();
        c.select(asset).unwrap();

        let first = arm(&mut c);
        c.handle(SessionEvent::ChunkAvailable { job_id: first, data: vec![1, 2, 3] }).unwrap();
        c.handle(SessionEvent::PlaybackEnded { job_id: first }).unwrap();
        assert_eq!(c.artifact().map(|a| a.bytes().to_vec()), Some(vec![1, 2, 3]));

        let retry = arm(&mut c);
        assert_eq!(c.phase(), SessionPhase::Capturing);
        assert!(c.artifact().is_none());

        // An empty retry fails without replacing the earlier output.
        let err = c.handle(SessionEvent::PlaybackEnded { job_id: retry }).unwrap_err();
        assert_eq!(err, CompressError::EmptyCapture);
        assert_eq!(c.artifact().map(|a| a.bytes().to_vec()), Some(vec![1, 2, 3]));

        c.reset();
        assert!(c.artifact().is_none());
    }
}
