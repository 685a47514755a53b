use super::{ObjectReader, Storage};
use crate::{Error, Result};
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

pub struct LocalStorage {
    data_dir: PathBuf,
}

impl LocalStorage {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Path of an object below the data directory.
    ///
    /// Names must be relative and may not leave the data directory.
    fn object_path(&self, name: &str) -> Result<PathBuf> {
        let relative = Path::new(name);
        let confined = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if name.is_empty() || !confined {
            return Err(Error::InvalidInput(format!("invalid object name: {}", name)));
        }
        Ok(self.data_dir.join(relative))
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn open(&self, name: &str) -> Result<ObjectReader> {
        let path = self.object_path(name)?;
        match fs::File::open(&path).await {
            Ok(file) => Ok(Box::new(file)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::NotFound(name.to_string()))
            }
            Err(e) => Err(Error::io("opening object", e)),
        }
    }
}
