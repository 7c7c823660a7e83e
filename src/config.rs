//! Ingestion configuration

use chrono::NaiveDate;
use serde::Deserialize;

use crate::types::{LedgerError, LedgerResult};

/// Tunable constants of the ingestion pipeline
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IngestConfig {
    /// Opening date used when a sheet carries no "Solde dd.mm.yyyy - ..." marker
    #[serde(default = "default_fallback_opening_date")]
    pub fallback_opening_date: NaiveDate,
    /// Balance sheet account absorbing the period result
    #[serde(default = "default_closing_account_number")]
    pub closing_account_number: String,
    #[serde(default = "default_closing_account_name")]
    pub closing_account_name: String,
    /// Lowercase file extensions accepted for upload, without the dot
    #[serde(default = "default_accepted_extensions")]
    pub accepted_extensions: Vec<String>,
}

fn default_fallback_opening_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default()
}

fn default_closing_account_number() -> String {
    "2979".to_string()
}

fn default_closing_account_name() -> String {
    "Résultat de l’exercice".to_string()
}

fn default_accepted_extensions() -> Vec<String> {
    vec!["xlsx".to_string(), "xls".to_string()]
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            fallback_opening_date: default_fallback_opening_date(),
            closing_account_number: default_closing_account_number(),
            closing_account_name: default_closing_account_name(),
            accepted_extensions: default_accepted_extensions(),
        }
    }
}

impl IngestConfig {
    /// Parse a configuration from TOML text; absent keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Config`] if the text is not valid TOML for this structure.
    pub fn from_toml_str(text: &str) -> LedgerResult<Self> {
        toml::from_str(text).map_err(|e| LedgerError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = IngestConfig::default();
        assert_eq!(
            config.fallback_opening_date,
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
        );
        assert_eq!(config.closing_account_number, "2979");
        assert_eq!(config.accepted_extensions, vec!["xlsx", "xls"]);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = IngestConfig::from_toml_str(
            r#"
            fallback_opening_date = "2024-01-01"
            closing_account_number = "2990"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.fallback_opening_date,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
        assert_eq!(config.closing_account_number, "2990");
        assert_eq!(config.closing_account_name, "Résultat de l’exercice");
        assert_eq!(config.accepted_extensions, vec!["xlsx", "xls"]);
    }

    #[test]
    fn test_invalid_toml() {
        let result = IngestConfig::from_toml_str("closing_account_number = [");
        assert!(matches!(result, Err(LedgerError::Config(_))));
    }
}
