// crates/vidsqueeze-core/src/output.rs
//
// OutputAssembler: sealed chunks → one downloadable artifact.
//
// The artifact is always tagged OUTPUT_MIME with the fixed OUTPUT_FILE_NAME,
// independent of the source's declared type or filename.

use crate::chunks::ChunkBuffer;
use crate::error::CompressError;
use crate::media_types::{OUTPUT_FILE_NAME, OUTPUT_MIME};

/// Finished re-encoded output. Immutable; a later run produces a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputArtifact {
    bytes:       Vec<u8>,
    chunk_count: usize,
}

impl OutputArtifact {
    pub fn bytes(&self)       -> &[u8]        { &self.bytes }
    pub fn len(&self)         -> usize        { self.bytes.len() }
    pub fn is_empty(&self)    -> bool         { self.bytes.is_empty() }
    pub fn chunk_count(&self) -> usize        { self.chunk_count }
    pub fn mime(&self)        -> &'static str { OUTPUT_MIME }
    pub fn file_name(&self)   -> &'static str { OUTPUT_FILE_NAME }
}

/// Concatenate `buffer` in order. Fails with `EmptyCapture` when the capture
/// emitted nothing.
pub fn assemble(buffer: ChunkBuffer) -> Result<OutputArtifact, CompressError> {
    if buffer.is_empty() {
        return Err(CompressError::EmptyCapture);
    }
    let mut bytes = Vec::with_capacity(buffer.total_bytes());
    for chunk in buffer.iter() {
        bytes.extend_from_slice(chunk);
    }
    Ok(OutputArtifact { bytes, chunk_count: buffer.len() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunks::ChunkAccumulator;

    #[test]
    fn concatenates_in_order() {
        let mut acc = ChunkAccumulator::new();
        acc.append(b"\x1a\x45".to_vec());
        acc.append(b"\xdf\xa3".to_vec());
        acc.append(b"cluster".to_vec());
        let art = assemble(acc.seal()).unwrap();
        assert_eq!(art.bytes(), b"\x1a\x45\xdf\xa3cluster");
        assert_eq!(art.chunk_count(), 3);
        assert_eq!(art.mime(), "video/webm");
        assert_eq!(art.file_name(), "compressed_video.webm");
    }

    #[test]
    fn empty_buffer_is_an_error() {
        let err = assemble(ChunkAccumulator::new().seal()).unwrap_err();
        assert_eq!(err, CompressError::EmptyCapture);
    }
}
