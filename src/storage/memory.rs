use super::{ObjectReader, Storage};
use crate::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::io::Cursor;

/// Objects held in memory, keyed by name
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    objects: HashMap<String, Bytes>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, data: impl Into<Bytes>) {
        self.objects.insert(name.into(), data.into());
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn open(&self, name: &str) -> Result<ObjectReader> {
        let data = self
            .objects
            .get(name)
            .cloned()
            .ok_or_else(|| Error::NotFound(name.to_string()))?;
        Ok(Box::new(Cursor::new(data)))
    }
}
