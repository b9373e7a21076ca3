// crates/vidsqueeze-core/src/error.rs
//
// The single error type surfaced by the compression pipeline.
//
// Every variant is terminal for the session it occurs in. `Clone` because the
// error is stored inside `SessionState::Failed` and also returned to the caller.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompressError {
    /// The selected file is not declared as a video.
    #[error("please select a valid video file (got '{mime}')")]
    InvalidFileType { mime: String },

    /// The byte stream could not be parsed as a playable media container.
    #[error("unsupported media: {0}")]
    UnsupportedMedia(String),

    /// The playback surface or encoder could not be armed.
    #[error("could not start capture: {0}")]
    CaptureInitialization(String),

    /// Capture stopped without the encoder emitting any data.
    #[error("capture produced no output")]
    EmptyCapture,

    /// Demux / decode failure while playing the source.
    #[error("playback failed: {0}")]
    Playback(String),

    /// Encoder / muxer failure while capturing.
    #[error("encoding failed: {0}")]
    Encode(String),

    #[error("cancelled")]
    Cancelled,

    /// A capture is already running; the running capture is untouched.
    #[error("a capture is already running for this video")]
    AlreadyCapturing,

    /// Start requested before the source metadata was probed.
    #[error("please upload a video first")]
    NotReady,

    #[error("could not read '{path}': {msg}")]
    Io { path: String, msg: String },
}

impl CompressError {
    /// Errors the user can fix by picking another file, as opposed to
    /// pipeline failures.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            CompressError::InvalidFileType { .. }
                | CompressError::UnsupportedMedia(_)
                | CompressError::Io { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_errors_are_classified() {
        assert!(CompressError::InvalidFileType { mime: "text/plain".into() }.is_input_error());
        assert!(CompressError::UnsupportedMedia("empty".into()).is_input_error());
        assert!(!CompressError::EmptyCapture.is_input_error());
        assert!(!CompressError::Cancelled.is_input_error());
    }

    #[test]
    fn messages_carry_context() {
        let e = CompressError::InvalidFileType { mime: "text/plain".into() };
        assert!(e.to_string().contains("text/plain"));
        let e = CompressError::CaptureInitialization("VP8 encoder not found".into());
        assert_eq!(e.to_string(), "could not start capture: VP8 encoder not found");
    }
}
