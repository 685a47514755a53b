//! Reference ids from the binary header of a BAM file.

use noodles::bgzf;
use tokio::io::AsyncRead;

use super::IndexReader;
use crate::{Error, Result};

const MAGIC: &[u8] = b"BAM\x01";

/// Longest reference name accepted, NUL included.
const MAX_NAME_LEN: usize = 1 << 16;

/// Find the position of `reference_name` in the reference dictionary of a
/// BGZF-compressed BAM stream.
pub async fn reference_id<R>(reader: R, reference_name: &str) -> Result<i32>
where
    R: AsyncRead + Unpin,
{
    let mut reader = IndexReader::new(bgzf::r#async::Reader::new(reader));
    reader.check_magic(MAGIC).await?;

    let l_text = reader.read_count("reading header text length").await?;
    reader.skip(l_text as u64, "skipping header text").await?;

    let n_ref = reader.read_count("reading reference count").await?;
    for id in 0..n_ref {
        let l_name = reader.read_count("reading reference name length").await?;
        if l_name > MAX_NAME_LEN {
            return Err(Error::malformed(
                "reference name length",
                format!("{} exceeds {}", l_name, MAX_NAME_LEN),
            ));
        }
        let name = reader.read_bytes(l_name, "reading reference name").await?;
        reader.read_i32("reading reference length").await?;

        let name = name.strip_suffix(b"\0").unwrap_or(&name);
        if name == reference_name.as_bytes() {
            return i32::try_from(id)
                .map_err(|_| Error::malformed("reference count", format!("{} overflows", id)));
        }
    }

    Err(Error::NotFound(format!(
        "reference name not found: {}",
        reference_name
    )))
}
