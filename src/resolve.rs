//! Top-level query resolution for a stored data object.

use std::sync::Arc;

use crate::chunk::Chunk;
use crate::formats::{bam, bcf};
use crate::request::ChunksRequest;
use crate::storage::Storage;
use crate::types::{Format, Region, RegionQuery};
use crate::{Error, Result};

/// Default merge threshold: one maximal BGZF block.
pub const DEFAULT_BLOCK_SIZE_LIMIT: u64 = 65_536;

/// Resolves region queries against objects of one storage backend
#[derive(Clone)]
pub struct Resolver {
    storage: Arc<dyn Storage>,
    block_size_limit: u64,
}

impl Resolver {
    pub fn new(storage: Arc<dyn Storage>, block_size_limit: u64) -> Self {
        Self {
            storage,
            block_size_limit,
        }
    }

    /// Chunks of `object` that must be fetched to answer `query`, merged and
    /// sorted, header chunk included.
    pub async fn resolve(
        &self,
        object: &str,
        format: Format,
        query: &RegionQuery,
    ) -> Result<Vec<Chunk>> {
        let (start, end) = coordinates(query)?;

        let reference_id = match &query.reference_name {
            Some(name) => self.reference_id(object, format, name).await?,
            None => -1,
        };
        let region = Region::new(reference_id, start, end);
        tracing::debug!(object, ?format, ?region, "resolving region");

        let request = ChunksRequest::new(format.index_names(object), self.block_size_limit, region);
        request.handle(self.storage.as_ref()).await
    }

    /// Numeric reference id of `name` as used by the index of `object`.
    pub async fn reference_id(&self, object: &str, format: Format, name: &str) -> Result<i32> {
        let reader = self
            .storage
            .open(object)
            .await
            .map_err(|e| Error::StorageAccess {
                op: "opening data object",
                source: Box::new(e),
            })?;

        match format {
            Format::Bam => bam::reference_id(reader, name).await,
            Format::Bcf => bcf::reference_id(reader, name).await,
        }
    }
}

/// Index coordinates of a query: `start` defaults to 0 and a missing `end`
/// becomes 0, which the index treats as unbounded.
fn coordinates(query: &RegionQuery) -> Result<(u32, u32)> {
    let to_u32 = |value: u64, what: &str| {
        u32::try_from(value)
            .map_err(|_| Error::InvalidInput(format!("{} {} out of range", what, value)))
    };

    let start = query.start.map(|s| to_u32(s, "start")).transpose()?.unwrap_or(0);
    let end = query.end.map(|e| to_u32(e, "end")).transpose()?.unwrap_or(0);

    if query.end.is_some() && start > end {
        return Err(Error::InvalidInput(format!(
            "start {} is after end {}",
            start, end
        )));
    }
    if query.reference_name.is_none() && (query.start.is_some() || query.end.is_some()) {
        return Err(Error::InvalidInput(
            "start and end require a reference name".to_string(),
        ));
    }

    Ok((start, end))
}
