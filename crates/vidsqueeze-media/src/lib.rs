// crates/vidsqueeze-media/src/lib.rs
//
// No egui dependency. Drives vidsqueeze-core's EncodeSession through channels.
//
// Layout:
//   probe.rs       MetadataProbe (dimensions + duration)
//   playback.rs    hidden playback surface (demux + decode + scale)
//   capture.rs     WebM/VP8 capture recorder
//   driver.rs      playback → recorder loop, generic over both
//   worker.rs      background probe / capture threads
//   compressor.rs  facade the UI talks to

pub mod capture;
pub mod compressor;
pub mod driver;
pub mod playback;
pub mod probe;
mod spool;
pub mod worker;

use std::sync::OnceLock;

pub use compressor::Compressor;
pub use worker::{CaptureLease, CaptureWorker};
pub use vidsqueeze_core::media_types::SessionEvent;

static FFMPEG_INIT: OnceLock<Result<(), String>> = OnceLock::new();

/// Initialise FFmpeg once per process. Later calls return the first result.
pub fn init() -> anyhow::Result<()> {
    FFMPEG_INIT
        .get_or_init(|| {
            ffmpeg_the_third::init().map_err(|e| e.to_string())?;
            ffmpeg_the_third::util::log::set_level(ffmpeg_the_third::util::log::Level::Error);
            tracing::debug!("[media] ffmpeg initialised");
            Ok(())
        })
        .clone()
        .map_err(|e| anyhow::anyhow!("FFmpeg init failed: {e}"))
}

/// Classify the result of a codec `receive_frame` / `receive_packet` call.
///
/// `Ok(true)`: output was produced. `Ok(false)`: the codec wants more input
/// (EAGAIN) or has been fully drained (EOF). Anything else is a real failure.
pub(crate) fn received(
    result: Result<(), ffmpeg_the_third::Error>,
) -> Result<bool, ffmpeg_the_third::Error> {
    use ffmpeg_the_third::util::error::EAGAIN;
    use ffmpeg_the_third::Error;

    match result {
        Ok(())                                         => Ok(true),
        Err(Error::Other { errno }) if errno == EAGAIN => Ok(false),
        Err(Error::Eof)                                => Ok(false),
        Err(e)                                         => Err(e),
    }
}
