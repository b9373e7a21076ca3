// crates/vidsqueeze-media/src/playback.rs
//
// FfmpegPlayback: the hidden playback surface a capture is driven by.
//
// Opens the spooled source, decodes the best video stream sequentially (no
// seeking) and presents every frame scaled to the capture's target size in
// YUV420P, ready for the encoder. Audio is never decoded.
//
// Elapsed time:
//   best-effort timestamp of each frame minus the first frame's, in seconds.
//   Frames without a timestamp reuse the previous frame's time.
//
// Display vs coded size:
//   The scaler input is the stream's display size (codec parameters), not the
//   decoded frame's coded size, so macroblock padding rows never reach the
//   output.

use anyhow::{anyhow, Context, Result};
use tempfile::NamedTempFile;

use ffmpeg_the_third as ffmpeg;
use ffmpeg::format::{input, Pixel};
use ffmpeg::media::Type;
use ffmpeg::software::scaling::{Context as ScaleCtx, Flags as ScaleFlags};
use ffmpeg::util::frame::video::Video as VideoFrame;
use ffmpeg::util::rational::Rational;
use ffmpeg::Packet;

use vidsqueeze_core::asset::SourceAsset;
use vidsqueeze_core::media_types::Dimensions;

use crate::driver::{PlaybackSurface, PlaybackTick};
use crate::spool::spool_bytes;

pub struct FfmpegPlayback {
    ictx:       ffmpeg::format::context::Input,
    decoder:    ffmpeg::decoder::video::Video,
    video_idx:  usize,
    time_base:  Rational,
    display:    Dimensions,
    target:     Dimensions,
    /// Created on the first frame, once the decoded pixel format is known.
    scaler:     Option<ScaleCtx>,
    first_ts:   Option<i64>,
    last_secs:  f64,
    eof_sent:   bool,
    // Dropped last: the demuxer reads from this file.
    _spool:     NamedTempFile,
}

impl FfmpegPlayback {
    pub fn open(asset: &SourceAsset, target: Dimensions) -> Result<Self> {
        let spool = spool_bytes(asset.bytes(), asset.mime())?;
        let ictx  = input(spool.path())
            .with_context(|| format!("open '{}' for playback", asset.name()))?;

        let (video_idx, time_base, display, dec_ctx) = {
            let stream = ictx.streams().best(Type::Video)
                .ok_or_else(|| anyhow!("no video stream in '{}'", asset.name()))?;
            let params  = stream.parameters();
            let display = Dimensions::new(params.width().max(0) as u32, params.height().max(0) as u32);
            let dec_ctx = ffmpeg::codec::context::Context::from_parameters(params)
                .context("video decoder context")?;
            (stream.index(), stream.time_base(), display, dec_ctx)
        };

        let decoder = dec_ctx.decoder().video().context("open video decoder")?;

        // Fall back to the decoder's size if the container omits it.
        let display = if display.is_valid() {
            display
        } else {
            Dimensions::new(decoder.width(), decoder.height())
        };

        tracing::debug!(
            "[capture] playback '{}' {display} → {target}, tb {time_base}",
            asset.name(),
        );

        Ok(Self {
            ictx, decoder, video_idx, time_base, display, target,
            scaler:    None,
            first_ts:  None,
            last_secs: 0.0,
            eof_sent:  false,
            _spool:    spool,
        })
    }

    fn next_video_packet(&mut self) -> Result<Option<Packet>> {
        for result in self.ictx.packets() {
            let (stream, packet) = result.context("read packet")?;
            if stream.index() == self.video_idx {
                return Ok(Some(packet));
            }
        }
        Ok(None)
    }

    fn present(&mut self, decoded: VideoFrame) -> Result<PlaybackTick<VideoFrame>> {
        let elapsed = match decoded.timestamp().or_else(|| decoded.pts()) {
            Some(ts) => {
                let first = *self.first_ts.get_or_insert(ts);
                (ts - first) as f64 * f64::from(self.time_base)
            }
            None => self.last_secs,
        };
        self.last_secs = elapsed;

        if self.scaler.is_none() {
            let scaler = ScaleCtx::get(
                decoded.format(), self.display.width, self.display.height,
                Pixel::YUV420P,   self.target.width,  self.target.height,
                ScaleFlags::BILINEAR,
            ).context("create scaler")?;
            self.scaler = Some(scaler);
        }
        let scaler = self.scaler.as_mut().ok_or_else(|| anyhow!("scaler missing"))?;

        let mut out = VideoFrame::empty();
        scaler.run(&decoded, &mut out).context("scale video frame")?;
        // swscale copies the source SAR; the output is always square pixels.
        unsafe {
            (*out.as_mut_ptr()).sample_aspect_ratio = ffmpeg::ffi::AVRational { num: 1, den: 1 };
        }

        Ok(PlaybackTick { elapsed, frame: out })
    }
}

impl PlaybackSurface for FfmpegPlayback {
    type Frame = VideoFrame;

    fn advance(&mut self) -> Result<Option<PlaybackTick<VideoFrame>>> {
        loop {
            let mut decoded = VideoFrame::empty();
            let got = crate::received(self.decoder.receive_frame(&mut decoded))
                .context("receive frame from decoder")?;
            if got {
                return self.present(decoded).map(Some);
            }
            if self.eof_sent {
                return Ok(None);
            }
            match self.next_video_packet()? {
                Some(packet) => self.decoder.send_packet(&packet)
                    .context("send packet to decoder")?,
                None => {
                    // Drain frames still buffered in the decoder.
                    self.decoder.send_eof().context("send EOF to decoder")?;
                    self.eof_sent = true;
                }
            }
        }
    }
}
