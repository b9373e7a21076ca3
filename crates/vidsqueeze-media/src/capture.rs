// crates/vidsqueeze-media/src/capture.rs
//
// WebmRecorder: VP8 encoder + WebM muxer fed with presented frames.
//
// Output:
//   Stream 0: VP8 video (libvpx, YUV420P, fixed OUTPUT_BITRATE)
//   No audio stream.
//
// PTS strategy:
//   Encoder time base is 1/1000 and each frame's PTS is its playback time in
//   milliseconds, so the output timeline is the source's timeline. PTS is
//   forced strictly increasing; a repeated or regressed timestamp is nudged
//   one millisecond past the previous frame.
//
// Chunking:
//   The muxer writes to a private temp file in live mode, which never seeks
//   back to patch earlier bytes. `take_chunk` flushes the AVIO buffer and
//   reads whatever was appended since the last call, so concatenating every
//   chunk in order reproduces the file byte for byte.
//
// Encoder ownership:
//   The encoder is created standalone and its parameters copied into the
//   stream's codecpar over FFI, as there is no safe setter for an opened
//   encoder.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use tempfile::TempPath;

use ffmpeg_the_third as ffmpeg;
use ffmpeg::codec::{self, Id as CodecId};
use ffmpeg::encoder;
use ffmpeg::format::{output as open_output, Pixel};
use ffmpeg::util::frame::video::Video as VideoFrame;
use ffmpeg::util::rational::Rational;
use ffmpeg::Packet;

use vidsqueeze_core::media_types::{Dimensions, OUTPUT_BITRATE};

use crate::driver::CaptureRecorder;

/// Millisecond time base shared by the encoder and the frame PTS.
const ENCODER_TB: (i32, i32) = (1, 1000);

pub struct WebmRecorder {
    octx:      ffmpeg::format::context::Output,
    encoder:   encoder::video::Video,
    enc_tb:    Rational,
    ost_tb:    Rational,
    reader:    File,
    read_pos:  u64,
    last_pts:  Option<i64>,
    finished:  bool,
    // Dropped last: removes the temp file once muxer and reader are closed.
    _path:     TempPath,
}

impl WebmRecorder {
    /// Arm the encoder for `target`-sized frames. `timeslice_secs` caps how
    /// long the muxer may hold a cluster before writing it out.
    pub fn open(target: Dimensions, timeslice_secs: f64) -> Result<Self> {
        let path: TempPath = tempfile::Builder::new()
            .prefix("vidsqueeze-out-")
            .suffix(".webm")
            .tempfile()
            .context("create capture file")?
            .into_temp_path();
        let out_path: PathBuf = path.to_path_buf();

        let mut octx = open_output(&out_path)
            .with_context(|| format!("open output '{}'", out_path.display()))?;

        let enc_tb = Rational::new(ENCODER_TB.0, ENCODER_TB.1);

        let vp8 = encoder::find(CodecId::VP8)
            .ok_or_else(|| anyhow!("VP8 encoder not found (is libvpx available?)"))?;

        {
            let mut ost = octx.add_stream(vp8).context("add video stream")?;
            ost.set_time_base(enc_tb);
        }

        let enc_ctx = codec::context::Context::new_with_codec(vp8);
        let mut enc = enc_ctx.encoder().video().context("create video encoder context")?;
        enc.set_width(target.width);
        enc.set_height(target.height);
        enc.set_format(Pixel::YUV420P);
        enc.set_time_base(enc_tb);
        enc.set_bit_rate(OUTPUT_BITRATE as usize);

        let mut opts = ffmpeg::Dictionary::new();
        opts.set("deadline",      "realtime");
        opts.set("cpu-used",      "8");
        opts.set("lag-in-frames", "0");

        let mut encoder = enc.open_as_with(vp8, opts)
            .with_context(|| format!("open VP8 encoder at {target}"))?;
        encoder.set_aspect_ratio(Rational::new(1, 1));

        unsafe {
            let ret = ffmpeg::ffi::avcodec_parameters_from_context(
                (**(*octx.as_mut_ptr()).streams.add(0)).codecpar,
                encoder.as_ptr() as *mut ffmpeg::ffi::AVCodecContext,
            );
            if ret < 0 {
                return Err(anyhow!("avcodec_parameters_from_context failed: {ret}"));
            }
        }

        let cluster_ms = ((timeslice_secs * 1000.0).round() as i64).max(1);
        let mut mux_opts = ffmpeg::Dictionary::new();
        mux_opts.set("live", "1");
        mux_opts.set("cluster_time_limit", &cluster_ms.to_string());
        octx.write_header_with(mux_opts).context("write WebM header")?;

        let ost_tb = octx.stream(0)
            .map(|s| s.time_base())
            .ok_or_else(|| anyhow!("output stream vanished"))?;

        let reader = File::open(&out_path).context("reopen capture file")?;

        tracing::debug!(
            "[capture] VP8 {target} @ {OUTPUT_BITRATE} bit/s → {}",
            out_path.display(),
        );

        Ok(Self {
            octx, encoder, enc_tb, ost_tb, reader,
            read_pos: 0,
            last_pts: None,
            finished: false,
            _path:    path,
        })
    }

    fn next_pts(&mut self, elapsed: f64) -> i64 {
        let ms  = if elapsed.is_finite() { (elapsed * 1000.0).round() as i64 } else { 0 };
        let pts = match self.last_pts {
            Some(last) if ms <= last => last + 1,
            _ => ms,
        };
        self.last_pts = Some(pts);
        pts
    }

    fn write_packets(&mut self) -> Result<()> {
        let mut pkt = Packet::empty();
        while crate::received(self.encoder.receive_packet(&mut pkt))
            .context("receive packet from encoder")?
        {
            pkt.set_stream(0);
            pkt.rescale_ts(self.enc_tb, self.ost_tb);
            pkt.write_interleaved(&mut self.octx).context("write video packet")?;
        }
        Ok(())
    }

    /// Flush muxer output to disk and return bytes appended since last time.
    fn read_appended(&mut self) -> Result<Vec<u8>> {
        unsafe {
            let pb = (*self.octx.as_mut_ptr()).pb;
            if !pb.is_null() {
                ffmpeg::ffi::avio_flush(pb);
            }
        }
        self.reader.seek(SeekFrom::Start(self.read_pos)).context("seek capture file")?;
        let mut buf = Vec::new();
        self.reader.read_to_end(&mut buf).context("read capture file")?;
        self.read_pos += buf.len() as u64;
        Ok(buf)
    }
}

impl CaptureRecorder<VideoFrame> for WebmRecorder {
    fn record(&mut self, mut frame: VideoFrame, elapsed: f64) -> Result<()> {
        if self.finished {
            return Err(anyhow!("recorder already finished"));
        }
        let pts = self.next_pts(elapsed);
        frame.set_pts(Some(pts));
        self.encoder.send_frame(&frame).context("send frame to encoder")?;
        self.write_packets()
    }

    fn take_chunk(&mut self) -> Result<Vec<u8>> {
        self.read_appended()
    }

    fn finish(&mut self) -> Result<Vec<u8>> {
        if self.finished {
            return Ok(Vec::new());
        }
        self.finished = true;
        self.encoder.send_eof().context("send EOF to encoder")?;
        self.write_packets()?;
        self.octx.write_trailer().context("write WebM trailer")?;
        self.read_appended()
    }
}

/// Encode `frames` flat-grey frames at 10 fps into a live WebM clip, taking a
/// chunk every five frames.
#[cfg(test)]
pub(crate) fn solid_clip(size: Dimensions, frames: u32) -> Vec<u8> {
    record_solid(size, frames).0.concat()
}

/// Chunks in emission order, plus the recorder's file as written to disk.
#[cfg(test)]
fn record_solid(size: Dimensions, frames: u32) -> (Vec<Vec<u8>>, Vec<u8>) {
    crate::init().unwrap();
    let mut rec = WebmRecorder::open(size, 0.5).unwrap();
    let mut chunks = Vec::new();
    for i in 0..frames {
        let mut frame = VideoFrame::new(Pixel::YUV420P, size.width, size.height);
        frame.data_mut(0).fill((16 + i * 7 % 200) as u8);
        frame.data_mut(1).fill(128);
        frame.data_mut(2).fill(128);
        rec.record(frame, f64::from(i) / 10.0).unwrap();
        if i % 5 == 4 {
            chunks.push(rec.take_chunk().unwrap());
        }
    }
    chunks.push(rec.finish().unwrap());
    let on_disk = std::fs::read(&rec._path).unwrap();
    chunks.retain(|c| !c.is_empty());
    (chunks, on_disk)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunks_concatenate_to_the_written_file() {
        let (chunks, on_disk) = record_solid(Dimensions::new(64, 48), 30);
        assert!(chunks.len() > 1, "only {} chunk(s)", chunks.len());
        assert_eq!(chunks.concat(), on_disk);
        // EBML magic: the first chunk starts the container.
        assert_eq!(&chunks[0][..4], &[0x1a, 0x45, 0xdf, 0xa3]);
    }

    #[test]
    fn timestamps_never_repeat() {
        crate::init().unwrap();
        let mut rec = WebmRecorder::open(Dimensions::new(32, 24), 1.0).unwrap();
        assert_eq!(rec.next_pts(0.0), 0);
        assert_eq!(rec.next_pts(0.0), 1);
        assert_eq!(rec.next_pts(-1.0), 2);
        assert_eq!(rec.next_pts(0.25), 250);
        assert_eq!(rec.next_pts(f64::NAN), 251);
    }

    #[test]
    fn record_after_finish_is_rejected() {
        crate::init().unwrap();
        let size = Dimensions::new(32, 24);
        let mut rec = WebmRecorder::open(size, 1.0).unwrap();
        rec.finish().unwrap();
        let frame = VideoFrame::new(Pixel::YUV420P, size.width, size.height);
        assert!(rec.record(frame, 0.0).is_err());
        assert!(rec.finish().unwrap().is_empty());
    }
}
