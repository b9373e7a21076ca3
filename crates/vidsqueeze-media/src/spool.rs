// crates/vidsqueeze-media/src/spool.rs
//
// FFmpeg's demuxer reads from a path, the asset lives in memory. Spool the
// bytes to a private temp file whose extension matches the declared mime so
// format probing gets the same hint a browser gets. The file is removed when
// the returned handle is dropped.

use std::io::Write;
use anyhow::{Context, Result};
use tempfile::NamedTempFile;

use vidsqueeze_core::asset::extension_for_mime;

pub(crate) fn spool_bytes(bytes: &[u8], mime: &str) -> Result<NamedTempFile> {
    let suffix = format!(".{}", extension_for_mime(mime));
    let mut file = tempfile::Builder::new()
        .prefix("vidsqueeze-src-")
        .suffix(&suffix)
        .tempfile()
        .context("create spool file")?;
    file.write_all(bytes).context("write spool file")?;
    file.flush().context("flush spool file")?;
    Ok(file)
}
