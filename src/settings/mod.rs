use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::storage::write_atomic;

pub const DEFAULT_ACTIVE_UNITS: i64 = 137;
pub const DEFAULT_COMMISSION_MULTIPLIER: f64 = 20.0;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Invalid {field}: {message}")]
    Invalid { field: &'static str, message: String },

    #[error("Settings I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Tunable KPI parameters persisted as a flat JSON document.
///
/// Field names from the legacy document (`unidades_ativas`,
/// `gonzaga_commission_multiplier`) are still accepted on read.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KpiSettings {
    #[serde(alias = "unidades_ativas")]
    pub active_units: i64,
    #[serde(alias = "gonzaga_commission_multiplier")]
    pub commission_multiplier: f64,
}

impl Default for KpiSettings {
    fn default() -> Self {
        Self {
            active_units: DEFAULT_ACTIVE_UNITS,
            commission_multiplier: DEFAULT_COMMISSION_MULTIPLIER,
        }
    }
}

impl KpiSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.active_units <= 0 {
            return Err(SettingsError::Invalid {
                field: "active_units",
                message: "must be a positive integer".to_string(),
            });
        }
        if !self.commission_multiplier.is_finite() || self.commission_multiplier < 0.0 {
            return Err(SettingsError::Invalid {
                field: "commission_multiplier",
                message: "must be a non-negative number".to_string(),
            });
        }
        Ok(())
    }
}

/// File-backed settings. Every read goes to disk so admin edits apply immediately.
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current settings, or the defaults when the document is absent or unreadable.
    pub async fn read(&self) -> KpiSettings {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return KpiSettings::default(),
            Err(e) => {
                warn!("Failed to read settings {}: {}, using defaults", self.path.display(), e);
                return KpiSettings::default();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Corrupt settings document {}: {}, using defaults", self.path.display(), e);
                KpiSettings::default()
            }
        }
    }

    /// Validate and persist; a concurrent `read` sees either the old or the new document.
    pub async fn write(&self, settings: &KpiSettings) -> Result<(), SettingsError> {
        settings.validate()?;
        let body = serde_json::to_vec_pretty(settings)?;
        write_atomic(&self.path, &body).await?;
        info!(
            "Settings updated: active_units={}, commission_multiplier={}",
            settings.active_units, settings.commission_multiplier
        );
        Ok(())
    }
}
