//! BAM index (BAI) decoding.
//!
//! BAI uses the fixed binning scheme of 16 kb leaf bins over six levels and
//! stores no per-bin offset. Each reference ends with a linear index that
//! this decoder has no use for.

use tokio::io::AsyncRead;

use super::{ChunkCollector, IndexReader};
use crate::chunk::Chunk;
use crate::types::Region;
use crate::Result;

const MAGIC: &[u8] = b"BAI\x01";

pub const MIN_SHIFT: i32 = 14;
pub const DEPTH: i32 = 5;

/// Read a BAI stream and return the header chunk followed by every chunk
/// that may hold records for `region`.
pub async fn read<R>(reader: R, region: &Region) -> Result<Vec<Chunk>>
where
    R: AsyncRead + Unpin,
{
    let mut reader = IndexReader::new(reader);
    reader.check_magic(MAGIC).await?;

    let mut collector = ChunkCollector::new(region, MIN_SHIFT, DEPTH);

    let n_ref = reader.read_count("reading reference count").await?;
    for reference_id in 0..n_ref {
        let reference_id = reference_id as i32;
        let n_bin = reader.read_count("reading bin count").await?;

        for _ in 0..n_bin {
            let bin_id = reader.read_u32("reading bin id").await?;
            let n_chunk = reader.read_count("reading chunk count").await?;

            if collector.is_metadata_bin(bin_id) {
                reader.skip(n_chunk as u64 * 16, "skipping metadata bin").await?;
                continue;
            }

            let wanted = collector.wants_bin(reference_id, bin_id);
            for _ in 0..n_chunk {
                let chunk = reader.read_chunk().await?;
                collector.add(chunk, 0, wanted);
            }
        }

        let n_intv = reader.read_count("reading linear index size").await?;
        reader
            .skip(n_intv as u64 * 8, "skipping linear index")
            .await?;
    }

    Ok(collector.finish())
}
