// crates/vidsqueeze-core/src/media_types.rs
//
// Types that flow across the channel between vidsqueeze-media and the session.
// Plain data only: no egui, no ffmpeg.

use std::sync::Arc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::asset::SourceAsset;
use crate::error::CompressError;

// ── Fixed output format ───────────────────────────────────────────────────────

/// Container / mime tag of every artifact, whatever the source was.
pub const OUTPUT_MIME: &str = "video/webm";

/// Target video bitrate of the capture encoder, in bits per second.
pub const OUTPUT_BITRATE: u64 = 1_000_000;

/// Suggested filename handed to the download collaborator.
pub const OUTPUT_FILE_NAME: &str = "compressed_video.webm";

// ── Geometry / metadata ───────────────────────────────────────────────────────

/// Pixel dimensions of a video frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width:  u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Both sides non-zero.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Probed intrinsic metadata of a source asset.
///
/// Fields are private so a `MediaInfo` can only exist fully populated:
/// both dimensions and the duration are strictly positive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MediaInfo {
    dimensions: Dimensions,
    duration:   f64,
}

impl MediaInfo {
    /// Returns `None` unless width, height and duration are all > 0 (and the
    /// duration is finite).
    ///
    /// ```
    /// use vidsqueeze_core::media_types::MediaInfo;
    /// assert!(MediaInfo::new(1280, 720, 10.0).is_some());
    /// assert!(MediaInfo::new(1280, 0, 10.0).is_none());
    /// assert!(MediaInfo::new(1280, 720, 0.0).is_none());
    /// assert!(MediaInfo::new(1280, 720, f64::NAN).is_none());
    /// ```
    pub fn new(width: u32, height: u32, duration: f64) -> Option<Self> {
        let dimensions = Dimensions::new(width, height);
        if !dimensions.is_valid() || !duration.is_finite() || duration <= 0.0 {
            return None;
        }
        Some(Self { dimensions, duration })
    }

    pub fn dimensions(&self) -> Dimensions { self.dimensions }
    pub fn width(&self)      -> u32        { self.dimensions.width }
    pub fn height(&self)     -> u32        { self.dimensions.height }
    /// Seconds.
    pub fn duration(&self)   -> f64        { self.duration }
}

// ── Capture request ───────────────────────────────────────────────────────────

/// Everything the platform capture pipeline needs to arm one capture.
/// Built by `EncodeSession::start` on `Ready → Capturing`.
#[derive(Clone, Debug)]
pub struct CaptureRequest {
    /// Tags every message the capture produces.
    pub job_id:   Uuid,
    pub asset:    Arc<SourceAsset>,
    /// Probed dimensions, or the caller's override.
    pub target:   Dimensions,
    /// Probed duration in seconds.
    pub duration: f64,
}

// ── Session messages ──────────────────────────────────────────────────────────

/// Messages delivered to `EncodeSession::apply`, in arrival order.
///
/// Probe messages are keyed by asset id; capture messages by the job id that
/// `EncodeSession::start` handed to the pipeline.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    MetadataReady  { asset_id: Uuid, info: MediaInfo },
    ProbeFailed    { asset_id: Uuid, error: CompressError },
    TimeAdvanced   { job_id: Uuid, elapsed: f64 },
    ChunkAvailable { job_id: Uuid, data: Vec<u8> },
    /// Playback reached end-of-stream and the recorder has emitted its last chunk.
    PlaybackEnded  { job_id: Uuid },
    CaptureFailed  { job_id: Uuid, error: CompressError },
}
