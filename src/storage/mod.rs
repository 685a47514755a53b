//! Storage backend abstraction for index and data objects.
//!
//! The resolver only ever needs to open an object by name and stream its
//! bytes. Backends decide how names map onto their namespace.
//!
//! # Implementations
//!
//! - [`LocalStorage`] - Local filesystem storage
//! - [`MemoryStorage`] - In-memory objects, for tests and embedding
//!
//! # Example
//!
//! ```no_run
//! use htsget_resolve::storage::{LocalStorage, Storage};
//! use std::path::PathBuf;
//!
//! # async fn run() -> htsget_resolve::Result<()> {
//! let storage = LocalStorage::new(PathBuf::from("./data"));
//! let index = storage.open("sample.bcf.gz.csi").await?;
//! # Ok(())
//! # }
//! ```

mod local;
mod memory;

pub use local::LocalStorage;
pub use memory::MemoryStorage;

use crate::Result;
use async_trait::async_trait;
use tokio::io::AsyncRead;

/// Byte range within a file; `end` is exclusive and `None` means "to the end"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: Option<u64>,
}

/// Stream over the bytes of one stored object
pub type ObjectReader = Box<dyn AsyncRead + Send + Unpin>;

/// Storage backend trait for opening stored objects by name
#[async_trait]
pub trait Storage: Send + Sync {
    /// Open an object for reading.
    ///
    /// A missing object is [`Error::NotFound`](crate::Error::NotFound).
    async fn open(&self, name: &str) -> Result<ObjectReader>;
}
