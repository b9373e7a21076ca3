// crates/vidsqueeze-media/src/probe.rs
//
// In-process FFmpeg probing: intrinsic dimensions and duration.
//
// The container header and stream parameters are read; nothing is decoded.
// When neither the container nor the stream records a duration (live WebM),
// the video packets are scanned for their timestamp span. Every failure maps
// to `UnsupportedMedia`.

use std::path::Path;
use anyhow::{anyhow, Context, Result};

use ffmpeg_the_third as ffmpeg;
use ffmpeg::format::input;
use ffmpeg::media::Type;

use vidsqueeze_core::error::CompressError;
use vidsqueeze_core::media_types::MediaInfo;

use crate::spool::spool_bytes;

/// Probe raw bytes declared as `mime`. Signature matches
/// `SourceAsset::probe_with`.
pub fn probe_bytes(bytes: &[u8], mime: &str) -> Result<MediaInfo, CompressError> {
    if bytes.is_empty() {
        return Err(CompressError::UnsupportedMedia("empty input".into()));
    }
    let unsupported = |e: anyhow::Error| CompressError::UnsupportedMedia(format!("{e:#}"));

    crate::init().map_err(unsupported)?;
    let spool = spool_bytes(bytes, mime).map_err(unsupported)?;
    let info  = read_info(spool.path()).map_err(unsupported)?;
    tracing::info!(
        "[probe] {} {:.2}s ← {} bytes ({mime})",
        info.dimensions(), info.duration(), bytes.len(),
    );
    Ok(info)
}

fn read_info(path: &Path) -> Result<MediaInfo> {
    let mut ictx = input(path).context("not a readable media container")?;

    let (index, tb, width, height, stream_duration) = {
        let stream = ictx.streams().best(Type::Video)
            .ok_or_else(|| anyhow!("no video stream"))?;
        let params = stream.parameters();
        (
            stream.index(),
            stream.time_base(),
            params.width().max(0) as u32,
            params.height().max(0) as u32,
            stream.duration(),
        )
    };

    // Container duration first, unless FFmpeg only guessed it from the bitrate.
    let guessed = unsafe {
        (*ictx.as_ptr()).duration_estimation_method
            == ffmpeg::ffi::AVDurationEstimationMethod::AVFMT_DURATION_FROM_BITRATE
    };
    let mut duration = if guessed {
        f64::NAN
    } else {
        ictx.duration() as f64 / ffmpeg::ffi::AV_TIME_BASE as f64
    };
    if duration.is_nan() || duration <= 0.0 {
        duration = stream_duration as f64 * f64::from(tb);
    }
    // Live WebM (what browsers and our own recorder write) has no duration
    // element at all; measure the packet timeline instead.
    if duration.is_nan() || duration <= 0.0 {
        duration = scan_duration(&mut ictx, index)? * f64::from(tb);
    }

    MediaInfo::new(width, height, duration)
        .ok_or_else(|| anyhow!("incomplete metadata: {width}x{height}, {duration:.3}s"))
}

/// Span of the video stream's packet timestamps, in stream time-base units.
fn scan_duration(ictx: &mut ffmpeg::format::context::Input, index: usize) -> Result<f64> {
    let mut first: Option<i64> = None;
    let mut end = i64::MIN;
    for result in ictx.packets() {
        let (stream, packet) = result.context("read packet")?;
        if stream.index() != index {
            continue;
        }
        let Some(ts) = packet.pts().or_else(|| packet.dts()) else { continue };
        first = Some(first.map_or(ts, |f| f.min(ts)));
        end   = end.max(ts + packet.duration().max(0));
    }
    let first = first.ok_or_else(|| anyhow!("no timestamped video packets"))?;
    tracing::debug!("[probe] duration from packet scan: {} ticks", end - first);
    Ok((end - first) as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vidsqueeze_core::asset::SourceAsset;
    use vidsqueeze_core::media_types::Dimensions;

    #[test]
    fn empty_bytes_are_unsupported() {
        let err = probe_bytes(&[], "video/mp4").unwrap_err();
        assert_eq!(err, CompressError::UnsupportedMedia("empty input".into()));
    }

    #[test]
    fn garbage_bytes_are_unsupported() {
        let err = probe_bytes(b"definitely not a video container", "video/mp4").unwrap_err();
        assert!(matches!(err, CompressError::UnsupportedMedia(_)));
    }

    #[test]
    fn failed_probe_leaves_asset_unprobed() {
        let asset = SourceAsset::new("x.mp4", "video/mp4", Vec::<u8>::new()).unwrap();
        assert!(asset.probe_with(probe_bytes).is_err());
        assert!(asset.info().is_none());
    }

    #[test]
    fn live_webm_is_probed_from_its_packets() {
        let clip = crate::capture::solid_clip(Dimensions::new(64, 48), 30);
        let info = probe_bytes(&clip, "video/webm").unwrap();
        assert_eq!(info.dimensions(), Dimensions::new(64, 48));
        // 30 frames, one every 100 ms: last timestamp at 2.9 s.
        assert!(info.duration() > 2.5 && info.duration() < 3.5, "{}", info.duration());
    }
}
