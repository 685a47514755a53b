pub mod binning;
pub mod chunk;
pub mod config;
pub mod error;
pub mod formats;
pub mod request;
pub mod resolve;
pub mod storage;
pub mod types;

pub use chunk::Chunk;
pub use config::Config;
pub use error::{Error, ErrorKind, Result};
pub use request::ChunksRequest;
pub use resolve::Resolver;
pub use types::{Format, Region};
