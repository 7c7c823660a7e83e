//! Upload validation

use std::path::Path;

use crate::config::IngestConfig;
use crate::types::*;

/// Reject an upload whose file extension is not an accepted spreadsheet format.
///
/// The check runs before any byte is read; the comparison ignores case.
pub fn validate_upload_name(file_name: &str, config: &IngestConfig) -> LedgerResult<()> {
    let extension = Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase());

    match extension {
        Some(ext) if config.accepted_extensions.iter().any(|a| *a == ext) => Ok(()),
        _ => Err(LedgerError::UnsupportedFormat(format!(
            "'{}' is not an Excel file, expected one of: {}",
            file_name,
            config
                .accepted_extensions
                .iter()
                .map(|e| format!(".{}", e))
                .collect::<Vec<_>>()
                .join(", ")
        ))),
    }
}
