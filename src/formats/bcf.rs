//! Reference ids from the text header of a BCF file.

use noodles::bgzf;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};

use super::IndexReader;
use crate::{Error, Result};

const MAGIC: &[u8] = b"BCF\x02\x02";
const CONTIG_PREFIX: &str = "##contig";

/// Find the index reference id of `reference_name` in a BGZF-compressed BCF
/// stream.
///
/// The id is the `IDX` field of the matching contig line when present, and
/// its 0-based position among the contig lines otherwise.
pub async fn reference_id<R>(reader: R, reference_name: &str) -> Result<i32>
where
    R: AsyncRead + Unpin,
{
    let mut reader = IndexReader::new(bgzf::r#async::Reader::new(reader));
    reader.check_magic(MAGIC).await?;
    let length = reader.read_u32("reading header length").await?;

    let mut lines = BufReader::new(reader.into_inner().take(u64::from(length))).lines();
    let mut position = 0;
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| Error::io("scanning header", e))?
    {
        if line.starts_with(CONTIG_PREFIX) {
            if contig_field(&line, "ID") == Some(reference_name) {
                return resolve_id(&line, position);
            }
            position += 1;
        } else if position > 0 {
            break;
        }
    }

    Err(Error::NotFound(format!(
        "reference name not found: {}",
        reference_name
    )))
}

/// Value of `name=` in a structured header line such as
/// `##contig=<ID=chr1,length=248956422>`.
///
/// Only whole fields match: `ID` does not match inside `IDX=`.
fn contig_field<'a>(line: &'a str, name: &str) -> Option<&'a str> {
    let mut rest = line;
    loop {
        let start = rest.find(name)?;
        let whole = start == 0 || matches!(rest.as_bytes()[start - 1], b',' | b'<');
        rest = &rest[start + name.len()..];
        if !whole {
            continue;
        }
        let Some(value) = rest.strip_prefix('=') else {
            continue;
        };
        let end = value.find([',', '>']).unwrap_or(value.len());
        return Some(&value[..end]);
    }
}

fn resolve_id(line: &str, position: i32) -> Result<i32> {
    match contig_field(line, "IDX") {
        Some(idx) => idx.parse().map_err(|e| {
            Error::malformed("contig IDX", format!("{:?} in {}: {}", idx, line, e))
        }),
        None => Ok(position),
    }
}
