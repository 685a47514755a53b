//! CSI coordinate-sorted index decoding.

use tokio::io::AsyncRead;

use super::{ChunkCollector, IndexReader};
use crate::binning;
use crate::chunk::Chunk;
use crate::types::Region;
use crate::{Error, Result};

const MAGIC: &[u8] = b"CSI\x01";

/// Read a decompressed CSI stream and return the header chunk followed by
/// every chunk that may hold records for `region`.
pub async fn read<R>(reader: R, region: &Region) -> Result<Vec<Chunk>>
where
    R: AsyncRead + Unpin,
{
    let mut reader = IndexReader::new(reader);
    reader.check_magic(MAGIC).await?;

    let min_shift = reader.read_i32("reading min_shift").await?;
    let depth = reader.read_i32("reading depth").await?;
    if !binning::valid_parameters(min_shift, depth) {
        return Err(Error::malformed(
            "binning parameters",
            format!("min_shift {} depth {}", min_shift, depth),
        ));
    }

    let aux_len = reader.read_count("reading auxiliary data length").await?;
    reader
        .skip(aux_len as u64, "skipping auxiliary data")
        .await?;

    let mut collector = ChunkCollector::new(region, min_shift, depth);

    let n_ref = reader.read_count("reading reference count").await?;
    for reference_id in 0..n_ref {
        let reference_id = reference_id as i32;
        let n_bin = reader.read_count("reading bin count").await?;

        for _ in 0..n_bin {
            let bin_id = reader.read_u32("reading bin id").await?;
            let offset = reader.read_u64("reading bin offset").await?;
            let n_chunk = reader.read_count("reading chunk count").await?;

            if collector.is_metadata_bin(bin_id) {
                reader.skip(n_chunk as u64 * 16, "skipping metadata bin").await?;
                continue;
            }

            let wanted = collector.wants_bin(reference_id, bin_id);
            for _ in 0..n_chunk {
                let chunk = reader.read_chunk().await?;
                collector.add(chunk, offset, wanted);
            }
        }
    }

    Ok(collector.finish())
}
