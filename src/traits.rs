//! Traits for the upload boundary

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::types::*;

/// Source of an uploaded workbook.
///
/// Reading the bytes is the only asynchronous step of an ingestion run;
/// parsing happens afterwards, synchronously and to completion.
#[async_trait]
pub trait UploadSource: Send + Sync {
    /// File name as given by the user, used for the format check
    fn file_name(&self) -> &str;

    /// Read the complete file content
    async fn read_bytes(&self) -> LedgerResult<Vec<u8>>;
}

/// Upload whose content is already in memory (e.g. received from a browser)
#[derive(Debug, Clone)]
pub struct InMemoryUpload {
    name: String,
    bytes: Vec<u8>,
}

impl InMemoryUpload {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

#[async_trait]
impl UploadSource for InMemoryUpload {
    fn file_name(&self) -> &str {
        &self.name
    }

    async fn read_bytes(&self) -> LedgerResult<Vec<u8>> {
        Ok(self.bytes.clone())
    }
}

/// Upload read from the local file system
#[derive(Debug, Clone)]
pub struct FileUpload {
    path: PathBuf,
    name: String,
}

impl FileUpload {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, name }
    }
}

#[async_trait]
impl UploadSource for FileUpload {
    fn file_name(&self) -> &str {
        &self.name
    }

    async fn read_bytes(&self) -> LedgerResult<Vec<u8>> {
        Ok(std::fs::read(&self.path)?)
    }
}
