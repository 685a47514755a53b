//! Decoders for genomic index and header formats.
//!
//! This module turns index files (BAI, CSI) into the chunks that a region
//! query needs, and resolves reference names to the numeric ids those indexes
//! use.
//!
//! # Supported Formats
//!
//! - [`csi`] - CSI indexes (`.csi`), BGZF-compressed
//! - [`bai`] - BAM indexes (`.bai`), uncompressed
//! - [`bcf`] - reference ids from a BCF header
//! - [`bam`] - reference ids from a BAM header
//!
//! Every field is read individually and bounds-checked; a short stream is an
//! I/O error and anything structurally wrong is a format error.

pub mod bai;
pub mod bam;
pub mod bcf;
pub mod csi;

use noodles::bgzf::{self, VirtualPosition};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::binning::{self, CandidateBins};
use crate::chunk::Chunk;
use crate::types::Region;
use crate::{Error, Result};

/// Binary layout of an index file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexFlavor {
    Bai,
    Csi,
}

impl IndexFlavor {
    /// Flavor implied by an index object name, if any.
    pub fn from_name(name: &str) -> Option<Self> {
        if name.ends_with(".bai") {
            Some(IndexFlavor::Bai)
        } else if name.ends_with(".csi") {
            Some(IndexFlavor::Csi)
        } else {
            None
        }
    }

    /// Decode an index stream and collect the chunks relevant to `region`.
    ///
    /// The first chunk is always the header chunk; the others follow in file
    /// order, unmerged.
    pub async fn decode<R>(self, reader: R, region: &Region) -> Result<Vec<Chunk>>
    where
        R: AsyncRead + Unpin,
    {
        match self {
            IndexFlavor::Bai => bai::read(reader, region).await,
            IndexFlavor::Csi => csi::read(bgzf::r#async::Reader::new(reader), region).await,
        }
    }
}

/// Little-endian field reader over an index or header stream.
pub(crate) struct IndexReader<R> {
    inner: R,
}

impl<R> IndexReader<R>
where
    R: AsyncRead + Unpin,
{
    pub(crate) fn new(inner: R) -> Self {
        Self { inner }
    }

    pub(crate) fn into_inner(self) -> R {
        self.inner
    }

    /// Read `expected.len()` bytes and compare them with `expected`.
    pub(crate) async fn check_magic(&mut self, expected: &[u8]) -> Result<()> {
        let mut found = vec![0; expected.len()];
        self.inner
            .read_exact(&mut found)
            .await
            .map_err(|e| Error::io("reading magic", e))?;

        if found != expected {
            return Err(Error::WrongMagic {
                expected: expected.to_vec(),
                found,
            });
        }
        Ok(())
    }

    pub(crate) async fn read_i32(&mut self, op: &'static str) -> Result<i32> {
        self.inner.read_i32_le().await.map_err(|e| Error::io(op, e))
    }

    pub(crate) async fn read_u32(&mut self, op: &'static str) -> Result<u32> {
        self.inner.read_u32_le().await.map_err(|e| Error::io(op, e))
    }

    pub(crate) async fn read_u64(&mut self, op: &'static str) -> Result<u64> {
        self.inner.read_u64_le().await.map_err(|e| Error::io(op, e))
    }

    /// Read a signed 32-bit count, rejecting negative values.
    pub(crate) async fn read_count(&mut self, op: &'static str) -> Result<usize> {
        let n = self.read_i32(op).await?;
        usize::try_from(n).map_err(|_| Error::malformed(op, format!("negative count {}", n)))
    }

    pub(crate) async fn read_bytes(&mut self, len: usize, op: &'static str) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        let n = (&mut self.inner)
            .take(len as u64)
            .read_to_end(&mut buf)
            .await
            .map_err(|e| Error::io(op, e))?;
        if n < len {
            return Err(Error::io(
                op,
                std::io::Error::from(std::io::ErrorKind::UnexpectedEof),
            ));
        }
        Ok(buf)
    }

    /// Discard exactly `len` bytes.
    pub(crate) async fn skip(&mut self, len: u64, op: &'static str) -> Result<()> {
        let n = tokio::io::copy(&mut (&mut self.inner).take(len), &mut tokio::io::sink())
            .await
            .map_err(|e| Error::io(op, e))?;
        if n < len {
            return Err(Error::io(
                op,
                std::io::Error::from(std::io::ErrorKind::UnexpectedEof),
            ));
        }
        Ok(())
    }

    pub(crate) async fn read_chunk(&mut self) -> Result<Chunk> {
        let start = self.read_u64("reading chunk start").await?;
        let end = self.read_u64("reading chunk end").await?;
        Ok(Chunk::new(
            VirtualPosition::from(start),
            VirtualPosition::from(end),
        ))
    }
}

/// Running state of one decode pass.
///
/// Tracks the header chunk, which ends where the first data chunk of the
/// whole index starts, and the chunks selected for the query.
pub(crate) struct ChunkCollector<'a> {
    region: &'a Region,
    candidates: CandidateBins,
    metadata_bin: u32,
    header: Chunk,
    chunks: Vec<Chunk>,
}

impl<'a> ChunkCollector<'a> {
    pub(crate) fn new(region: &'a Region, min_shift: i32, depth: i32) -> Self {
        Self {
            region,
            candidates: binning::bins_for_range(region.start, region.end, min_shift, depth),
            metadata_bin: binning::metadata_bin_id(depth),
            header: Chunk::new(VirtualPosition::MIN, VirtualPosition::MAX),
            chunks: Vec::new(),
        }
    }

    pub(crate) fn is_metadata_bin(&self, bin_id: u32) -> bool {
        bin_id == self.metadata_bin
    }

    /// Whether chunks of this bin should be kept.
    pub(crate) fn wants_bin(&self, reference_id: i32, bin_id: u32) -> bool {
        binning::region_contains_bin(self.region, reference_id, bin_id, &self.candidates)
    }

    /// Account for one data chunk of a non-metadata bin.
    pub(crate) fn add(&mut self, chunk: Chunk, bin_offset: u64, wanted: bool) {
        self.header.end = self.header.end.min(chunk.start);
        if wanted && u64::from(chunk.end) >= bin_offset {
            self.chunks.push(chunk);
        }
    }

    pub(crate) fn finish(self) -> Vec<Chunk> {
        let mut result = Vec::with_capacity(self.chunks.len() + 1);
        result.push(self.header);
        result.extend(self.chunks);
        result
    }
}
