//! Index lookup for a single query: open the first available index, decode
//! it and merge the resulting chunks.

use std::future::Future;

use crate::chunk::{self, Chunk};
use crate::formats::IndexFlavor;
use crate::storage::{ObjectReader, Storage};
use crate::types::Region;
use crate::{Error, Result};

/// One chunk resolution against a set of candidate index objects
#[derive(Debug, Clone)]
pub struct ChunksRequest {
    /// Index object names, tried in order
    pub index_names: Vec<String>,
    /// Largest compressed gap, in bytes, bridged when merging chunks.
    ///
    /// This bounds the distance between merged chunks, not the size of a
    /// merged chunk: a whole-reference query can yield one range far larger
    /// than the limit.
    pub block_size_limit: u64,
    pub region: Region,
}

impl ChunksRequest {
    pub fn new(index_names: Vec<String>, block_size_limit: u64, region: Region) -> Self {
        Self {
            index_names,
            block_size_limit,
            region,
        }
    }

    /// Resolve the merged chunk list for the region.
    pub async fn handle(&self, storage: &dyn Storage) -> Result<Vec<Chunk>> {
        let (name, flavor, index) = self.open_index(storage).await?;

        let chunks = flavor
            .decode(index, &self.region)
            .await
            .map_err(|e| Error::ReadingIndex(Box::new(e)))?;
        tracing::debug!(
            index = %name,
            chunks = chunks.len(),
            "decoded index"
        );

        Ok(chunk::merge(chunks, self.block_size_limit))
    }

    /// Like [`handle`](Self::handle), but gives up with [`Error::Cancelled`]
    /// as soon as `cancel` completes. Reads in flight are dropped.
    pub async fn handle_until<F>(&self, storage: &dyn Storage, cancel: F) -> Result<Vec<Chunk>>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            _ = cancel => {
                tracing::debug!(region = ?self.region, "chunk request cancelled");
                Err(Error::Cancelled)
            }
            result = self.handle(storage) => result,
        }
    }

    /// Open the first index candidate that can be opened.
    async fn open_index(
        &self,
        storage: &dyn Storage,
    ) -> Result<(String, IndexFlavor, ObjectReader)> {
        let mut last_error = Error::NotFound("no index candidates".to_string());

        for name in &self.index_names {
            let Some(flavor) = IndexFlavor::from_name(name) else {
                last_error = Error::UnsupportedFormat(format!("unknown index type: {}", name));
                continue;
            };

            match storage.open(name).await {
                Ok(reader) => return Ok((name.clone(), flavor, reader)),
                Err(e) => {
                    tracing::debug!(index = %name, error = %e, "index candidate unavailable");
                    last_error = e;
                }
            }
        }

        tracing::warn!(candidates = ?self.index_names, "no index could be opened");
        Err(Error::StorageAccess {
            op: "opening index",
            source: Box::new(last_error),
        })
    }
}
