use serde::{Deserialize, Serialize};

use crate::chunk::Chunk;
use crate::storage::ByteRange;

/// Indexed data formats the resolver understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
pub enum Format {
    Bam,
    Bcf,
}

impl Format {
    /// Plausible index object names for a data object, most likely first.
    pub fn index_names(&self, object: &str) -> Vec<String> {
        match self {
            Format::Bam => vec![
                format!("{}.bai", object),
                format!("{}.bai", object.strip_suffix(".bam").unwrap_or(object)),
                format!("{}.csi", object),
            ],
            Format::Bcf => {
                let stem = object
                    .strip_suffix(".bcf.gz")
                    .or_else(|| object.strip_suffix(".bcf"))
                    .unwrap_or(object);
                vec![format!("{}.csi", object), format!("{}.csi", stem)]
            }
        }
    }
}

/// A query region in index coordinates.
///
/// `start` is inclusive and 0-based, `end` is exclusive with `0` meaning
/// unbounded. A negative `reference_id` selects every reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub reference_id: i32,
    pub start: u32,
    pub end: u32,
}

impl Region {
    pub fn new(reference_id: i32, start: u32, end: u32) -> Self {
        Self {
            reference_id,
            start,
            end,
        }
    }

    /// Every bin of every reference.
    pub fn all() -> Self {
        Self::new(-1, 0, 0)
    }

    /// True when the region places no coordinate constraint on bins.
    pub fn is_unconstrained(&self) -> bool {
        self.start == 0 && self.end == 0
    }
}

/// Region query as supplied by a client
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RegionQuery {
    #[serde(rename = "referenceName")]
    pub reference_name: Option<String>,
    pub start: Option<u64>,
    pub end: Option<u64>,
}

/// Resolved byte ranges for one query
#[derive(Debug, Serialize)]
pub struct ResolvedRanges {
    pub format: Format,
    pub ranges: Vec<RangeEntry>,
}

#[derive(Debug, Serialize)]
pub struct RangeEntry {
    pub start: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<u64>,
    #[serde(rename = "virtualStart")]
    pub virtual_start: u64,
    #[serde(rename = "virtualEnd")]
    pub virtual_end: u64,
}

impl From<&Chunk> for RangeEntry {
    fn from(chunk: &Chunk) -> Self {
        let ByteRange { start, end } = chunk.byte_range();
        Self {
            start,
            end,
            virtual_start: u64::from(chunk.start),
            virtual_end: u64::from(chunk.end),
        }
    }
}

impl ResolvedRanges {
    pub fn new(format: Format, chunks: &[Chunk]) -> Self {
        Self {
            format,
            ranges: chunks.iter().map(RangeEntry::from).collect(),
        }
    }
}
