use clap::Parser;
use std::path::PathBuf;

use crate::types::{Format, RegionQuery};

#[derive(Debug, Clone, Parser)]
#[command(name = "htsget-resolve")]
#[command(about = "Resolve a genomic region to the BGZF byte ranges that cover it")]
pub struct Config {
    /// Data object to query, relative to the data directory
    pub id: String,

    /// Format of the data object
    #[arg(short, long, value_enum, default_value = "bcf")]
    pub format: Format,

    /// Reference sequence name; omit to select every reference
    #[arg(short, long)]
    pub reference_name: Option<String>,

    /// 0-based inclusive start position
    #[arg(short, long)]
    pub start: Option<u64>,

    /// 0-based exclusive end position
    #[arg(short, long)]
    pub end: Option<u64>,

    /// Directory containing data and index files
    #[arg(long, env = "HTSGET_DATA_DIR", default_value = "./data")]
    pub data_dir: PathBuf,

    /// Largest compressed gap in bytes bridged when merging ranges.
    ///
    /// A maximum gap between ranges, not a cap on range size: a single
    /// merged range may be much larger.
    #[arg(long, env = "HTSGET_BLOCK_SIZE_LIMIT", default_value = "65536")]
    pub block_size_limit: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,
}

impl Config {
    pub fn region_query(&self) -> RegionQuery {
        RegionQuery {
            reference_name: self.reference_name.clone(),
            start: self.start,
            end: self.end,
        }
    }
}
