// crates/vidsqueeze-core/src/session.rs
//
// EncodeSession: the playback-driven capture state machine.
//
//   Idle ──MetadataReady──▶ Ready ──start()──▶ Capturing ──PlaybackEnded──▶ Completed
//                             │                    │
//                             └──arm error──▶ Failed ◀──CaptureFailed / cancel()
//
// The whole lifecycle lives in one `SessionState` enum, so a capture buffer
// cannot exist outside `Capturing` and an artifact cannot exist outside
// `Completed`. All mutation goes through `load`, `start`, `cancel` and
// `apply`; `apply` consumes `SessionEvent` messages in arrival order.
//
// Capture resources:
//   `start` asks the caller to arm the platform pipeline and keeps the returned
//   `CaptureHandle` inside the `Capturing` variant. The handle is stopped when
//   the session leaves `Capturing` for any reason, including being dropped.
//
// End of stream:
//   `PlaybackEnded`, or a `TimeAdvanced` whose elapsed time reaches the probed
//   duration. Either one seals the chunks and runs the output assembler.
//
// Stale messages:
//   Capture messages carry the job id handed out by `start`. Messages from any
//   other job (cancelled, failed, superseded by a retry) are ignored.

use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::asset::SourceAsset;
use crate::chunks::ChunkAccumulator;
use crate::error::CompressError;
use crate::media_types::{CaptureRequest, Dimensions, MediaInfo, SessionEvent};
use crate::output::{self, OutputArtifact};
use crate::progress::ProgressEstimator;

// ── Capture handle ────────────────────────────────────────────────────────────

/// The armed playback surface + encoder of one capture, as seen by the session.
pub trait CaptureHandle: Send {
    /// Stop playback and encoding. May be called more than once.
    fn stop(&self);
}

/// Stops the wrapped handle when dropped.
struct HandleGuard(Box<dyn CaptureHandle>);

impl Drop for HandleGuard {
    fn drop(&mut self) {
        self.0.stop();
    }
}

// ── State ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Ready,
    Capturing,
    Completed,
    Failed,
}

/// A running capture. Only reachable through `SessionState::Capturing`.
pub struct ActiveCapture {
    asset:   Arc<SourceAsset>,
    info:    MediaInfo,
    job_id:  Uuid,
    chunks:  ChunkAccumulator,
    _handle: HandleGuard,
}

impl ActiveCapture {
    pub fn job_id(&self)      -> Uuid       { self.job_id }
    pub fn chunk_count(&self) -> usize      { self.chunks.len() }
    pub fn total_bytes(&self) -> usize      { self.chunks.total_bytes() }
}

enum SessionState {
    /// No asset, or an asset whose probe has not reported yet.
    Idle      { pending: Option<Arc<SourceAsset>> },
    Ready     { asset: Arc<SourceAsset>, info: MediaInfo },
    Capturing(ActiveCapture),
    Completed { asset: Arc<SourceAsset>, info: MediaInfo, artifact: Arc<OutputArtifact> },
    Failed    { asset: Arc<SourceAsset>, info: MediaInfo, error: CompressError },
}

impl SessionState {
    fn phase(&self) -> SessionPhase {
        match self {
            SessionState::Idle { .. }      => SessionPhase::Idle,
            SessionState::Ready { .. }     => SessionPhase::Ready,
            SessionState::Capturing(_)     => SessionPhase::Capturing,
            SessionState::Completed { .. } => SessionPhase::Completed,
            SessionState::Failed { .. }    => SessionPhase::Failed,
        }
    }
}

// ── Session ───────────────────────────────────────────────────────────────────

pub struct EncodeSession {
    state:           SessionState,
    progress:        ProgressEstimator,
    /// `None` = capture at the probed source dimensions.
    target_override: Option<Dimensions>,
}

impl Default for EncodeSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EncodeSession {
    pub fn new() -> Self {
        Self {
            state:           SessionState::Idle { pending: None },
            progress:        ProgressEstimator::new(),
            target_override: None,
        }
    }

    // ── Read access ───────────────────────────────────────────────────────────

    pub fn phase(&self) -> SessionPhase { self.state.phase() }

    /// Progress sample in [0, 100]; exactly 100 only once `Completed`.
    pub fn progress(&self) -> f64 { self.progress.current() }

    pub fn asset(&self) -> Option<&Arc<SourceAsset>> {
        match &self.state {
            SessionState::Idle { pending }        => pending.as_ref(),
            SessionState::Ready { asset, .. }
            | SessionState::Completed { asset, .. }
            | SessionState::Failed { asset, .. }  => Some(asset),
            SessionState::Capturing(cap)          => Some(&cap.asset),
        }
    }

    pub fn media_info(&self) -> Option<MediaInfo> {
        match &self.state {
            SessionState::Idle { .. }            => None,
            SessionState::Ready { info, .. }
            | SessionState::Completed { info, .. }
            | SessionState::Failed { info, .. }  => Some(*info),
            SessionState::Capturing(cap)         => Some(cap.info),
        }
    }

    pub fn capture(&self) -> Option<&ActiveCapture> {
        match &self.state {
            SessionState::Capturing(cap) => Some(cap),
            _ => None,
        }
    }

    pub fn artifact(&self) -> Option<&Arc<OutputArtifact>> {
        match &self.state {
            SessionState::Completed { artifact, .. } => Some(artifact),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&CompressError> {
        match &self.state {
            SessionState::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Dimensions the next capture will use: the override, else the probed size.
    pub fn target_size(&self) -> Option<Dimensions> {
        self.target_override
            .or_else(|| self.media_info().map(|i| i.dimensions()))
    }

    // ── Commands ──────────────────────────────────────────────────────────────

    /// Override (or with `None`, restore) the output dimensions. Not validated
    /// against codec constraints. Rejected while capturing.
    pub fn set_target_size(&mut self, size: Option<Dimensions>) -> Result<(), CompressError> {
        if self.phase() == SessionPhase::Capturing {
            return Err(CompressError::AlreadyCapturing);
        }
        self.target_override = size;
        Ok(())
    }

    /// Replace the current asset. An already-probed asset goes straight to
    /// `Ready`; otherwise the session waits in `Idle` for `MetadataReady`.
    pub fn load(&mut self, asset: Arc<SourceAsset>) -> Result<(), CompressError> {
        if self.phase() == SessionPhase::Capturing {
            warn!("[session] load '{}' rejected: capture running", asset.name());
            return Err(CompressError::AlreadyCapturing);
        }
        self.progress.reset();
        self.target_override = None;
        self.state = match asset.info() {
            Some(info) => SessionState::Ready { asset, info },
            None       => SessionState::Idle { pending: Some(asset) },
        };
        Ok(())
    }

    /// Drop the asset and any capture, back to an empty `Idle`.
    pub fn reset(&mut self) {
        self.state = SessionState::Idle { pending: None };
        self.progress.reset();
        self.target_override = None;
    }

    /// `Ready → Capturing`.
    ///
    /// `arm` receives the capture request and must start the platform
    /// pipeline. It is not called when the request is rejected. From
    /// `Completed` or `Failed` a fresh `Ready` is entered first (new job id,
    /// progress back to 0). If `arm` fails the session moves to `Failed`.
    pub fn start<F>(&mut self, arm: F) -> Result<Uuid, CompressError>
    where
        F: FnOnce(&CaptureRequest) -> Result<Box<dyn CaptureHandle>, CompressError>,
    {
        let (asset, info) = match &self.state {
            SessionState::Capturing(cap) => {
                warn!("[session] start rejected: job {} still capturing", cap.job_id);
                return Err(CompressError::AlreadyCapturing);
            }
            SessionState::Idle { .. } => return Err(CompressError::NotReady),
            SessionState::Ready { asset, info }
            | SessionState::Completed { asset, info, .. }
            | SessionState::Failed { asset, info, .. } => (Arc::clone(asset), *info),
        };

        self.state = SessionState::Ready { asset: Arc::clone(&asset), info };
        self.progress.reset();

        let request = CaptureRequest {
            job_id:   Uuid::new_v4(),
            asset:    Arc::clone(&asset),
            target:   self.target_override.unwrap_or_else(|| info.dimensions()),
            duration: info.duration(),
        };

        match arm(&request) {
            Ok(handle) => {
                info!(
                    "[session] job {} capturing '{}' at {} ({:.2}s)",
                    request.job_id, asset.name(), request.target, request.duration,
                );
                self.state = SessionState::Capturing(ActiveCapture {
                    asset,
                    info,
                    job_id:  request.job_id,
                    chunks:  ChunkAccumulator::new(),
                    _handle: HandleGuard(handle),
                });
                Ok(request.job_id)
            }
            Err(error) => {
                warn!("[session] job {} failed to arm: {error}", request.job_id);
                self.state = SessionState::Failed { asset, info, error: error.clone() };
                Err(error)
            }
        }
    }

    /// `Capturing → Failed(Cancelled)`. Returns false when nothing was running.
    pub fn cancel(&mut self) -> bool {
        match self.take_capture(None) {
            Some(cap) => {
                info!("[session] job {} cancelled", cap.job_id);
                self.fail(cap, CompressError::Cancelled);
                true
            }
            None => false,
        }
    }

    /// Apply one message. `Err` reports a failure caused by this message; the
    /// session has already moved to its failure state when it is returned.
    pub fn apply(&mut self, event: SessionEvent) -> Result<(), CompressError> {
        match event {
            SessionEvent::MetadataReady { asset_id, info } => {
                match self.take_pending(asset_id) {
                    Some(asset) => {
                        info!(
                            "[session] '{}' ready: {} {:.2}s",
                            asset.name(), info.dimensions(), info.duration(),
                        );
                        self.state = SessionState::Ready { asset, info };
                    }
                    None => debug!("[session] metadata for stale asset {asset_id} ignored"),
                }
                Ok(())
            }

            SessionEvent::ProbeFailed { asset_id, error } => {
                match self.take_pending(asset_id) {
                    Some(asset) => {
                        warn!("[session] probe of '{}' failed: {error}", asset.name());
                        self.state = SessionState::Idle { pending: None };
                        Err(error)
                    }
                    None => Ok(()),
                }
            }

            SessionEvent::TimeAdvanced { job_id, elapsed } => {
                let duration = match &self.state {
                    SessionState::Capturing(cap) if cap.job_id == job_id => cap.info.duration(),
                    _ => return Ok(()),
                };
                if elapsed >= duration {
                    return match self.take_capture(Some(job_id)) {
                        Some(cap) => self.complete(cap),
                        None      => Ok(()),
                    };
                }
                self.progress.sample(elapsed, Some(duration));
                Ok(())
            }

            SessionEvent::ChunkAvailable { job_id, data } => {
                if let SessionState::Capturing(cap) = &mut self.state {
                    if cap.job_id == job_id {
                        cap.chunks.append(data);
                        return Ok(());
                    }
                }
                debug!("[session] chunk for stale job {job_id} dropped");
                Ok(())
            }

            SessionEvent::PlaybackEnded { job_id } => {
                match self.take_capture(Some(job_id)) {
                    Some(cap) => self.complete(cap),
                    None      => Ok(()),
                }
            }

            SessionEvent::CaptureFailed { job_id, error } => {
                match self.take_capture(Some(job_id)) {
                    Some(cap) => {
                        warn!("[session] job {job_id} failed: {error}");
                        Err(self.fail(cap, error))
                    }
                    None => Ok(()),
                }
            }
        }
    }

    // ── Internals ─────────────────────────────────────────────────────────────

    fn take_pending(&mut self, asset_id: Uuid) -> Option<Arc<SourceAsset>> {
        match &self.state {
            SessionState::Idle { pending: Some(asset) } if asset.id() == asset_id => {}
            _ => return None,
        }
        match std::mem::replace(&mut self.state, SessionState::Idle { pending: None }) {
            SessionState::Idle { pending } => pending,
            other => { self.state = other; None }
        }
    }

    /// Move the running capture out of the state. With `Some(job_id)` only a
    /// capture with that id is taken. The state is left as a placeholder
    /// `Idle` that the caller must overwrite.
    fn take_capture(&mut self, job_id: Option<Uuid>) -> Option<ActiveCapture> {
        match &self.state {
            SessionState::Capturing(cap) if job_id.map_or(true, |id| id == cap.job_id) => {}
            _ => return None,
        }
        match std::mem::replace(&mut self.state, SessionState::Idle { pending: None }) {
            SessionState::Capturing(cap) => Some(cap),
            other => { self.state = other; None }
        }
    }

    fn complete(&mut self, cap: ActiveCapture) -> Result<(), CompressError> {
        let ActiveCapture { asset, info, job_id, chunks, _handle: handle, .. } = cap;
        drop(handle);

        match output::assemble(chunks.seal()) {
            Ok(artifact) => {
                self.progress.complete();
                info!(
                    "[session] job {job_id} completed: {} chunks, {} bytes",
                    artifact.chunk_count(), artifact.len(),
                );
                self.state = SessionState::Completed { asset, info, artifact: Arc::new(artifact) };
                Ok(())
            }
            Err(error) => {
                warn!("[session] job {job_id} ended without output: {error}");
                self.state = SessionState::Failed { asset, info, error: error.clone() };
                Err(error)
            }
        }
    }

    /// Discard the capture's chunks and record `error`. Returns the error.
    fn fail(&mut self, cap: ActiveCapture, error: CompressError) -> CompressError {
        let ActiveCapture { asset, info, _handle: handle, .. } = cap;
        drop(handle);
        self.state = SessionState::Failed { asset, info, error: error.clone() };
        error
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingHandle(Arc<AtomicUsize>);

    impl CaptureHandle for CountingHandle {
        fn stop(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn probed_asset(duration: f64) -> Arc<SourceAsset> {
        let asset = SourceAsset::new("clip.mp4", "video/mp4", vec![0u8; 16]).unwrap();
        asset.probe_with(|_, _| Ok(MediaInfo::new(1280, 720, duration).unwrap())).unwrap();
        Arc::new(asset)
    }

    /// Session in `Capturing` for a 10 s source; returns (session, job, stop count).
    fn capturing(duration: f64) -> (EncodeSession, Uuid, Arc<AtomicUsize>) {
        let mut s = EncodeSession::new();
        s.load(probed_asset(duration)).unwrap();
        let stops = Arc::new(AtomicUsize::new(0));
        let handle_stops = Arc::clone(&stops);
        let job = s.start(move |_| Ok(Box::new(CountingHandle(handle_stops)) as Box<dyn CaptureHandle>))
            .unwrap();
        (s, job, stops)
    }

    fn chunk(s: &mut EncodeSession, job_id: Uuid, data: &[u8]) {
        s.apply(SessionEvent::ChunkAvailable { job_id, data: data.to_vec() }).unwrap();
    }

    #[test]
    fn metadata_moves_idle_to_ready() {
        let asset = Arc::new(SourceAsset::new("a.mov", "video/quicktime", vec![1u8]).unwrap());
        let mut s = EncodeSession::new();
        s.load(Arc::clone(&asset)).unwrap();
        assert_eq!(s.phase(), SessionPhase::Idle);

        let info = MediaInfo::new(320, 240, 4.0).unwrap();
        s.apply(SessionEvent::MetadataReady { asset_id: asset.id(), info }).unwrap();
        assert_eq!(s.phase(), SessionPhase::Ready);
        assert_eq!(s.target_size(), Some(Dimensions::new(320, 240)));
    }

    #[test]
    fn metadata_for_other_asset_is_ignored() {
        let asset = Arc::new(SourceAsset::new("a.mov", "video/quicktime", vec![1u8]).unwrap());
        let mut s = EncodeSession::new();
        s.load(asset).unwrap();
        let info = MediaInfo::new(320, 240, 4.0).unwrap();
        s.apply(SessionEvent::MetadataReady { asset_id: Uuid::new_v4(), info }).unwrap();
        assert_eq!(s.phase(), SessionPhase::Idle);
        assert!(s.asset().is_some());
    }

    #[test]
    fn probe_failure_stays_idle() {
        let asset = Arc::new(SourceAsset::new("empty.mp4", "video/mp4", Vec::<u8>::new()).unwrap());
        let mut s = EncodeSession::new();
        s.load(Arc::clone(&asset)).unwrap();
        let err = s.apply(SessionEvent::ProbeFailed {
            asset_id: asset.id(),
            error:    CompressError::UnsupportedMedia("empty input".into()),
        }).unwrap_err();
        assert!(matches!(err, CompressError::UnsupportedMedia(_)));
        assert_eq!(s.phase(), SessionPhase::Idle);
        assert!(s.asset().is_none());
        assert_eq!(s.start(|_| unreachable!()).unwrap_err(), CompressError::NotReady);
    }

    #[test]
    fn quarter_ticks_complete_the_capture() {
        let (mut s, job, stops) = capturing(10.0);
        let mut samples = Vec::new();
        for t in [0.0, 2.5, 5.0, 7.5, 10.0] {
            chunk(&mut s, job, &[t as u8]);
            s.apply(SessionEvent::TimeAdvanced { job_id: job, elapsed: t }).unwrap();
            samples.push(s.progress());
        }
        assert_eq!(samples, vec![0.0, 25.0, 50.0, 75.0, 100.0]);
        assert_eq!(s.phase(), SessionPhase::Completed);

        let art = s.artifact().unwrap();
        assert_eq!(art.chunk_count(), 5);
        assert_eq!(art.bytes(), &[0u8, 2, 5, 7, 10]);
        assert_eq!(art.mime(), "video/webm");
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn playback_end_completes_below_duration() {
        let (mut s, job, _) = capturing(10.0);
        s.apply(SessionEvent::TimeAdvanced { job_id: job, elapsed: 9.96 }).unwrap();
        assert!(s.progress() < 100.0);
        chunk(&mut s, job, b"tail");
        s.apply(SessionEvent::PlaybackEnded { job_id: job }).unwrap();
        assert_eq!(s.phase(), SessionPhase::Completed);
        assert_eq!(s.progress(), 100.0);
    }

    #[test]
    fn second_start_is_rejected_without_side_effects() {
        let (mut s, job, stops) = capturing(10.0);
        chunk(&mut s, job, b"abc");
        s.apply(SessionEvent::TimeAdvanced { job_id: job, elapsed: 5.0 }).unwrap();

        let err = s.start(|_| panic!("must not arm a second capture")).unwrap_err();
        assert_eq!(err, CompressError::AlreadyCapturing);
        assert_eq!(s.phase(), SessionPhase::Capturing);
        assert_eq!(s.capture().map(|c| c.job_id()), Some(job));
        assert_eq!(s.capture().map(|c| c.chunk_count()), Some(1));
        assert_eq!(s.progress(), 50.0);
        assert_eq!(stops.load(Ordering::SeqCst), 0);

        assert_eq!(s.load(probed_asset(5.0)).unwrap_err(), CompressError::AlreadyCapturing);
        assert_eq!(s.set_target_size(None).unwrap_err(), CompressError::AlreadyCapturing);
    }

    #[test]
    fn empty_capture_fails() {
        let (mut s, job, stops) = capturing(10.0);
        s.apply(SessionEvent::TimeAdvanced { job_id: job, elapsed: 1.0 }).unwrap();
        let err = s.apply(SessionEvent::PlaybackEnded { job_id: job }).unwrap_err();
        assert_eq!(err, CompressError::EmptyCapture);
        assert_eq!(s.phase(), SessionPhase::Failed);
        assert!(s.artifact().is_none());
        assert!(s.progress() < 100.0);
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn empty_retry_does_not_touch_previous_artifact() {
        let (mut s, job, _) = capturing(10.0);
        chunk(&mut s, job, b"first");
        s.apply(SessionEvent::PlaybackEnded { job_id: job }).unwrap();
        let first = Arc::clone(s.artifact().unwrap());

        let retry = s.start(|_| Ok(Box::new(CountingHandle(Arc::default())) as Box<dyn CaptureHandle>))
            .unwrap();
        assert_ne!(retry, job);
        assert_eq!(s.progress(), 0.0);
        assert!(s.apply(SessionEvent::PlaybackEnded { job_id: retry }).is_err());
        assert_eq!(first.bytes(), b"first");
    }

    #[test]
    fn arm_failure_moves_to_failed() {
        let mut s = EncodeSession::new();
        s.load(probed_asset(10.0)).unwrap();
        let err = s.start(|_| Err(CompressError::CaptureInitialization("no VP8 encoder".into())))
            .unwrap_err();
        assert!(matches!(err, CompressError::CaptureInitialization(_)));
        assert_eq!(s.phase(), SessionPhase::Failed);
        assert_eq!(s.error(), Some(&err));
        assert!(s.artifact().is_none());
    }

    #[test]
    fn capture_failure_discards_chunks() {
        let (mut s, job, stops) = capturing(10.0);
        chunk(&mut s, job, b"partial");
        let err = s.apply(SessionEvent::CaptureFailed {
            job_id: job,
            error:  CompressError::Playback("corrupt packet".into()),
        }).unwrap_err();
        assert!(matches!(err, CompressError::Playback(_)));
        assert_eq!(s.phase(), SessionPhase::Failed);
        assert!(s.capture().is_none());
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn stale_job_messages_are_ignored() {
        let (mut s, old_job, _) = capturing(10.0);
        assert!(s.cancel());
        let new_job = s.start(|_| Ok(Box::new(CountingHandle(Arc::default())) as Box<dyn CaptureHandle>))
            .unwrap();

        s.apply(SessionEvent::ChunkAvailable { job_id: old_job, data: b"old".to_vec() }).unwrap();
        s.apply(SessionEvent::TimeAdvanced { job_id: old_job, elapsed: 9.0 }).unwrap();
        s.apply(SessionEvent::PlaybackEnded { job_id: old_job }).unwrap();
        s.apply(SessionEvent::CaptureFailed { job_id: old_job, error: CompressError::Cancelled }).unwrap();

        assert_eq!(s.phase(), SessionPhase::Capturing);
        assert_eq!(s.capture().map(|c| c.job_id()), Some(new_job));
        assert_eq!(s.capture().map(|c| c.chunk_count()), Some(0));
        assert_eq!(s.progress(), 0.0);
    }

    #[test]
    fn cancel_stops_handle() {
        let (mut s, job, stops) = capturing(10.0);
        chunk(&mut s, job, b"x");
        assert!(s.cancel());
        assert_eq!(s.error(), Some(&CompressError::Cancelled));
        assert_eq!(stops.load(Ordering::SeqCst), 1);
        assert!(!s.cancel());
    }

    #[test]
    fn dropping_the_session_stops_the_capture() {
        let (s, _, stops) = capturing(10.0);
        drop(s);
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn progress_never_regresses() {
        let (mut s, job, _) = capturing(10.0);
        let mut last = 0.0;
        for t in [1.0, 4.0, 3.5, 4.2, 2.0, 8.0] {
            s.apply(SessionEvent::TimeAdvanced { job_id: job, elapsed: t }).unwrap();
            assert!(s.progress() >= last);
            last = s.progress();
        }
        assert_eq!(last, crate::progress::percentage(8.0, Some(10.0)));
    }

    #[test]
    fn override_sets_request_target() {
        let mut s = EncodeSession::new();
        s.load(probed_asset(10.0)).unwrap();
        s.set_target_size(Some(Dimensions::new(640, 360))).unwrap();
        let mut seen = None;
        s.start(|req| {
            seen = Some((req.target, req.duration));
            Ok(Box::new(CountingHandle(Arc::default())) as Box<dyn CaptureHandle>)
        }).unwrap();
        assert_eq!(seen, Some((Dimensions::new(640, 360), 10.0)));
    }

    #[test]
    fn loading_a_new_asset_clears_override() {
        let mut s = EncodeSession::new();
        s.load(probed_asset(10.0)).unwrap();
        s.set_target_size(Some(Dimensions::new(2, 2))).unwrap();
        s.load(probed_asset(3.0)).unwrap();
        assert_eq!(s.target_size(), Some(Dimensions::new(1280, 720)));
        s.reset();
        assert_eq!(s.phase(), SessionPhase::Idle);
        assert!(s.target_size().is_none());
    }
}
