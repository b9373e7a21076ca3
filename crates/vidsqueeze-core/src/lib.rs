// crates/vidsqueeze-core/src/lib.rs
//
// Pure data and the capture state machine. No ffmpeg, no egui.
// vidsqueeze-media drives it; vidsqueeze-ui renders it.

pub mod asset;
pub mod chunks;
pub mod commands;
pub mod config;
pub mod error;
pub mod helpers;
pub mod media_types;
pub mod output;
pub mod progress;
pub mod session;

pub use asset::SourceAsset;
pub use error::CompressError;
pub use media_types::{Dimensions, MediaInfo, SessionEvent};
pub use output::OutputArtifact;
pub use session::{CaptureHandle, EncodeSession, SessionPhase};
