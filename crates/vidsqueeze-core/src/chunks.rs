// crates/vidsqueeze-core/src/chunks.rs
//
// Encoder output collection.
//
//   ChunkAccumulator: append side, alive while a capture runs.
//   ChunkBuffer:      sealed side, read-only, handed to the output assembler.
//
// `seal` consumes the accumulator, so appending to a sealed buffer does not
// compile. Chunks are kept exactly as emitted: no reordering, no dedup, no
// size cap (memory grows with duration × bitrate).

#[derive(Debug, Default)]
pub struct ChunkAccumulator {
    chunks: Vec<Vec<u8>>,
    bytes:  usize,
}

impl ChunkAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `chunk` after every previously appended chunk.
    /// Zero-length chunks are dropped; returns whether the chunk was kept.
    pub fn append(&mut self, chunk: Vec<u8>) -> bool {
        if chunk.is_empty() {
            return false;
        }
        self.bytes += chunk.len();
        self.chunks.push(chunk);
        true
    }

    pub fn len(&self) -> usize          { self.chunks.len() }
    pub fn is_empty(&self) -> bool      { self.chunks.is_empty() }
    pub fn total_bytes(&self) -> usize  { self.bytes }

    /// Stop accepting chunks and return them in append order.
    pub fn seal(self) -> ChunkBuffer {
        ChunkBuffer { chunks: self.chunks, bytes: self.bytes }
    }
}

/// Sealed, ordered encoder output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkBuffer {
    chunks: Vec<Vec<u8>>,
    bytes:  usize,
}

impl ChunkBuffer {
    pub fn len(&self) -> usize         { self.chunks.len() }
    pub fn is_empty(&self) -> bool     { self.chunks.is_empty() }
    pub fn total_bytes(&self) -> usize { self.bytes }

    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.chunks.iter().map(Vec::as_slice)
    }
}
