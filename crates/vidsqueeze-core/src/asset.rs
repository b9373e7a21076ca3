// crates/vidsqueeze-core/src/asset.rs
//
// SourceAsset: the selected input video. Immutable once created; the probed
// metadata is filled in exactly once and cached for the asset's lifetime.

use std::path::Path;
use std::sync::{Arc, OnceLock};
use uuid::Uuid;

use crate::error::CompressError;
use crate::media_types::MediaInfo;

pub struct SourceAsset {
    id:    Uuid,
    name:  String,
    mime:  String,
    bytes: Arc<[u8]>,
    info:  OnceLock<MediaInfo>,
}

impl SourceAsset {
    /// Wrap raw bytes declared as `mime`.
    ///
    /// Anything not declared `video/*` is rejected before any probing happens,
    /// so no asset exists for it.
    pub fn new(
        name:  impl Into<String>,
        mime:  impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Result<Self, CompressError> {
        let mime = mime.into().trim().to_ascii_lowercase();
        if !is_video_mime(&mime) {
            return Err(CompressError::InvalidFileType { mime });
        }
        Ok(Self {
            id:    Uuid::new_v4(),
            name:  name.into(),
            mime,
            bytes: bytes.into(),
            info:  OnceLock::new(),
        })
    }

    /// Read a file from disk, declaring its mime type from the extension the
    /// way a browser file picker does. The type check runs before the read.
    pub fn from_path(path: &Path) -> Result<Self, CompressError> {
        let mime = mime_for_path(path);
        if !is_video_mime(mime) {
            return Err(CompressError::InvalidFileType { mime: mime.to_string() });
        }
        let bytes = std::fs::read(path).map_err(|e| CompressError::Io {
            path: path.display().to_string(),
            msg:  e.to_string(),
        })?;
        let name = path.file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        Self::new(name, mime, bytes)
    }

    pub fn id(&self)    -> Uuid    { self.id }
    pub fn name(&self)  -> &str    { &self.name }
    pub fn mime(&self)  -> &str    { &self.mime }
    pub fn bytes(&self) -> &[u8]   { &self.bytes }
    pub fn len(&self)   -> usize   { self.bytes.len() }
    pub fn is_empty(&self) -> bool { self.bytes.is_empty() }

    /// Cached metadata, `None` until the asset has been probed successfully.
    pub fn info(&self) -> Option<MediaInfo> {
        self.info.get().copied()
    }

    /// Run `probe` against the bytes unless a result is already cached.
    ///
    /// Failures are not cached, so a failed probe may be retried.
    pub fn probe_with<F>(&self, probe: F) -> Result<MediaInfo, CompressError>
    where
        F: FnOnce(&[u8], &str) -> Result<MediaInfo, CompressError>,
    {
        if let Some(info) = self.info.get() {
            return Ok(*info);
        }
        let info = probe(&self.bytes, &self.mime)?;
        Ok(*self.info.get_or_init(|| info))
    }
}

impl std::fmt::Debug for SourceAsset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceAsset")
            .field("id",    &self.id)
            .field("name",  &self.name)
            .field("mime",  &self.mime)
            .field("bytes", &self.bytes.len())
            .field("info",  &self.info.get())
            .finish()
    }
}

// ── Mime helpers ──────────────────────────────────────────────────────────────

pub fn is_video_mime(mime: &str) -> bool {
    mime.starts_with("video/")
}

/// Declared mime type for a file, from its extension.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path.extension()
        .unwrap_or_default()
        .to_string_lossy()
        .to_lowercase();

    match ext.as_str() {
        "mp4"          => "video/mp4",
        "m4v"          => "video/x-m4v",
        "mov" | "qt"   => "video/quicktime",
        "webm"         => "video/webm",
        "mkv"          => "video/x-matroska",
        "avi"          => "video/x-msvideo",
        "ogv"          => "video/ogg",
        "mpg" | "mpeg" => "video/mpeg",
        "ts"  | "m2ts" => "video/mp2t",
        "3gp"          => "video/3gpp",
        "flv"          => "video/x-flv",
        "wmv"          => "video/x-ms-wmv",
        "txt"          => "text/plain",
        "mp3"          => "audio/mpeg",
        "wav"          => "audio/wav",
        "png"          => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        _              => "application/octet-stream",
    }
}

/// File extension that lets FFmpeg's demuxer probe bytes declared as `mime`.
pub fn extension_for_mime(mime: &str) -> &'static str {
    match mime {
        "video/mp4"        => "mp4",
        "video/x-m4v"      => "m4v",
        "video/quicktime"  => "mov",
        "video/webm"       => "webm",
        "video/x-matroska" => "mkv",
        "video/x-msvideo"  => "avi",
        "video/ogg"        => "ogv",
        "video/mpeg"       => "mpg",
        "video/mp2t"       => "ts",
        "video/3gpp"       => "3gp",
        "video/x-flv"      => "flv",
        "video/x-ms-wmv"   => "wmv",
        _                  => "bin",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn text_plain_is_rejected() {
        let err = SourceAsset::new("notes.txt", "text/plain", b"hello".to_vec()).unwrap_err();
        assert_eq!(err, CompressError::InvalidFileType { mime: "text/plain".into() });
    }

    #[test]
    fn video_mime_is_normalised() {
        let asset = SourceAsset::new("clip.mp4", " Video/MP4 ", vec![1u8, 2, 3]).unwrap();
        assert_eq!(asset.mime(), "video/mp4");
        assert_eq!(asset.len(), 3);
        assert!(asset.info().is_none());
    }

    #[test]
    fn from_path_rejects_before_reading() {
        // The file does not exist; the type check must fire first.
        let err = SourceAsset::from_path(&PathBuf::from("/nonexistent/readme.txt")).unwrap_err();
        assert!(matches!(err, CompressError::InvalidFileType { .. }));
    }

    #[test]
    fn from_path_reports_io_errors() {
        let err = SourceAsset::from_path(&PathBuf::from("/nonexistent/clip.mp4")).unwrap_err();
        assert!(matches!(err, CompressError::Io { .. }));
    }

    #[test]
    fn from_path_reads_bytes_and_name() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("holiday.MOV");
        std::fs::write(&path, b"not really a movie").unwrap();
        let asset = SourceAsset::from_path(&path).unwrap();
        assert_eq!(asset.name(), "holiday.MOV");
        assert_eq!(asset.mime(), "video/quicktime");
        assert_eq!(asset.bytes(), b"not really a movie");
    }

    #[test]
    fn probe_result_is_cached() {
        let asset = SourceAsset::new("a.webm", "video/webm", vec![0u8; 4]).unwrap();
        let mut calls = 0;
        let first = asset.probe_with(|_, _| { calls += 1; Ok(MediaInfo::new(640, 360, 3.0).unwrap()) });
        assert!(first.is_ok());
        let second = asset.probe_with(|_, _| panic!("must not re-probe"));
        assert_eq!(first, second);
        assert_eq!(calls, 1);
        assert_eq!(asset.info().map(|i| i.width()), Some(640));
    }

    #[test]
    fn failed_probe_is_not_cached() {
        let asset = SourceAsset::new("a.webm", "video/webm", Vec::<u8>::new()).unwrap();
        let err = asset.probe_with(|_, _| Err(CompressError::UnsupportedMedia("empty".into())));
        assert!(err.is_err());
        assert!(asset.info().is_none());
    }

    #[test]
    fn extension_round_trips_common_types() {
        for ext in ["mp4", "mov", "webm", "mkv", "avi"] {
            let mime = mime_for_path(&PathBuf::from(format!("x.{ext}")));
            assert!(is_video_mime(mime), "{ext}");
            assert_ne!(extension_for_mime(mime), "bin", "{ext}");
        }
    }
}
