//! In-memory session holding the current ledger snapshot

use std::sync::Arc;
use tracing::info;

use crate::config::IngestConfig;
use crate::ledger::core::{process_workbook, LedgerSnapshot};
use crate::traits::UploadSource;
use crate::types::*;
use crate::utils::validation::validate_upload_name;

/// Owner of the current ledger snapshot.
///
/// Each successful upload replaces the snapshot wholesale. A failed upload
/// leaves the previous snapshot active. Consumers hold `Arc` clones and never
/// see a partially built ledger.
#[derive(Debug, Default)]
pub struct LedgerSession {
    config: IngestConfig,
    current: Option<Arc<LedgerSnapshot>>,
}

impl LedgerSession {
    /// Create an empty session
    pub fn new(config: IngestConfig) -> Self {
        Self {
            config,
            current: None,
        }
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// The active snapshot, if any upload succeeded so far
    pub fn current(&self) -> Option<Arc<LedgerSnapshot>> {
        self.current.clone()
    }

    /// Validate, read and ingest an upload, then make it the active snapshot.
    ///
    /// # Errors
    ///
    /// [`LedgerError::UnsupportedFormat`] before reading anything when the
    /// extension is not accepted, [`LedgerError::Io`] when reading fails, and
    /// [`LedgerError::Unreadable`] when the content is not a workbook.
    pub async fn upload(&mut self, source: &dyn UploadSource) -> LedgerResult<Arc<LedgerSnapshot>> {
        validate_upload_name(source.file_name(), &self.config)?;
        let bytes = source.read_bytes().await?;
        self.load_bytes(source.file_name(), &bytes)
    }

    /// Synchronous variant of [`upload`](Self::upload) for bytes already in memory
    pub fn load_bytes(&mut self, file_name: &str, bytes: &[u8]) -> LedgerResult<Arc<LedgerSnapshot>> {
        validate_upload_name(file_name, &self.config)?;
        let snapshot = Arc::new(process_workbook(file_name, bytes, &self.config)?);

        if let Some(previous) = &self.current {
            info!(previous_run = %previous.run_id, run = %snapshot.run_id, "Replacing ledger snapshot");
        }
        self.current = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    /// Drop the active snapshot
    pub fn clear(&mut self) {
        self.current = None;
    }
}
