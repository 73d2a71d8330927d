//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services.
//! Request handling never reads process-wide environment variables.

use crate::constants::{
    DEFAULT_DATABASE_PATH, DEFAULT_RECENT_APPOINTMENTS_LIMIT, MAX_RECENT_APPOINTMENTS_LIMIT,
};
use crate::{ClinicError, ClinicResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    database_path: PathBuf,
    recent_appointments_limit: usize,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `ClinicError::InvalidConfig` if the limit is zero or above
    /// `MAX_RECENT_APPOINTMENTS_LIMIT`.
    pub fn new(database_path: PathBuf, recent_appointments_limit: usize) -> ClinicResult<Self> {
        if !(1..=MAX_RECENT_APPOINTMENTS_LIMIT).contains(&recent_appointments_limit) {
            return Err(ClinicError::InvalidConfig(format!(
                "recent appointments limit must be between 1 and {}",
                MAX_RECENT_APPOINTMENTS_LIMIT
            )));
        }

        Ok(Self {
            database_path,
            recent_appointments_limit,
        })
    }

    pub fn database_path(&self) -> &Path {
        &self.database_path
    }

    pub fn recent_appointments_limit(&self) -> usize {
        self.recent_appointments_limit
    }
}

/// Resolve the database path from an optional string value.
///
/// `None` or a blank value falls back to `DEFAULT_DATABASE_PATH`.
pub fn database_path_from_env_value(value: Option<String>) -> PathBuf {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH))
}

/// Parse the recent-appointments limit from an optional string value.
///
/// `None` or a blank value yields `DEFAULT_RECENT_APPOINTMENTS_LIMIT`. Range checking
/// happens in `CoreConfig::new`.
pub fn recent_appointments_limit_from_env_value(value: Option<String>) -> ClinicResult<usize> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    match value {
        None => Ok(DEFAULT_RECENT_APPOINTMENTS_LIMIT),
        Some(v) => v.parse::<usize>().map_err(|_| {
            ClinicError::InvalidConfig(format!(
                "recent appointments limit is not a positive integer: {v:?}"
            ))
        }),
    }
}
