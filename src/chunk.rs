//! Chunks of BGZF files and chunk merging.
//!
//! Chunk boundaries are noodles [`VirtualPosition`]s: a compressed block
//! offset plus an offset within the decompressed block, ordered as one
//! 64-bit value. [`VirtualPosition::MAX`] stands for "until the end of the
//! file".

use noodles::bgzf::VirtualPosition;

use crate::storage::ByteRange;

/// Largest possible BGZF block, compressed or not.
pub const MAX_BLOCK_SIZE: u64 = 1 << 16;

/// A contiguous span of a BGZF file, `[start, end)` in virtual offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    pub start: VirtualPosition,
    pub end: VirtualPosition,
}

impl Chunk {
    pub fn new(start: VirtualPosition, end: VirtualPosition) -> Self {
        Self { start, end }
    }

    /// Compressed byte range that must be fetched to read every record of
    /// the chunk.
    ///
    /// An end that points inside a block needs that whole block, which is at
    /// most [`MAX_BLOCK_SIZE`] bytes long.
    pub fn byte_range(&self) -> ByteRange {
        let end = if self.end == VirtualPosition::MAX {
            None
        } else if self.end.uncompressed() == 0 {
            Some(self.end.compressed())
        } else {
            Some(self.end.compressed() + MAX_BLOCK_SIZE)
        };
        ByteRange {
            start: self.start.compressed(),
            end,
        }
    }
}

/// Merge chunks whose compressed gap is at most `block_size_limit` bytes.
///
/// The result is sorted by start offset and any two consecutive chunks are
/// separated by more than `block_size_limit` compressed bytes.
pub fn merge(mut chunks: Vec<Chunk>, block_size_limit: u64) -> Vec<Chunk> {
    if chunks.is_empty() {
        return chunks;
    }

    chunks.sort_by_key(|c| (c.start, c.end));

    let mut merged = Vec::with_capacity(chunks.len());
    let mut current = chunks[0];

    for chunk in chunks.into_iter().skip(1) {
        let gap = chunk
            .start
            .compressed()
            .saturating_sub(current.end.compressed());

        if gap <= block_size_limit {
            current.end = current.end.max(chunk.end);
        } else {
            merged.push(current);
            current = chunk;
        }
    }
    merged.push(current);

    merged
}
