//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. The intent is to avoid reading process-wide environment variables
//! during request handling, which can lead to inconsistent behaviour in multi-threaded runtimes
//! and test harnesses.

use crate::constants::{DATABASE_FILENAME, MIN_PASSWORD_LEN};
use crate::{EazydocError, EazydocResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: Option<PathBuf>,
    min_password_len: usize,
}

impl CoreConfig {
    /// Create a configuration persisting to `data_dir`, or keeping everything in memory when
    /// `data_dir` is `None`.
    pub fn new(data_dir: Option<PathBuf>) -> EazydocResult<Self> {
        if let Some(dir) = &data_dir {
            if dir.as_os_str().is_empty() {
                return Err(EazydocError::InvalidInput(
                    "data directory cannot be empty".into(),
                ));
            }
            if dir.exists() && !dir.is_dir() {
                return Err(EazydocError::InvalidInput(format!(
                    "data directory is not a directory: {}",
                    dir.display()
                )));
            }
        }

        Ok(Self {
            data_dir,
            min_password_len: MIN_PASSWORD_LEN,
        })
    }

    /// Configuration for a store that never touches the filesystem.
    pub fn in_memory() -> Self {
        Self {
            data_dir: None,
            min_password_len: MIN_PASSWORD_LEN,
        }
    }

    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    /// Location of the JSON snapshot, if persistence is enabled.
    pub fn database_file(&self) -> Option<PathBuf> {
        self.data_dir.as_ref().map(|dir| dir.join(DATABASE_FILENAME))
    }

    pub fn min_password_len(&self) -> usize {
        self.min_password_len
    }
}

/// Parse a boolean flag from an optional environment value.
///
/// Accepts `true/false`, `1/0`, `yes/no` (case-insensitive). Missing or blank values yield
/// `default`.
pub fn flag_from_env_value(name: &str, value: Option<String>, default: bool) -> EazydocResult<bool> {
    let value = value
        .map(|v| v.trim().to_ascii_lowercase())
        .filter(|v| !v.is_empty());

    match value.as_deref() {
        None => Ok(default),
        Some("true" | "1" | "yes") => Ok(true),
        Some("false" | "0" | "no") => Ok(false),
        Some(other) => Err(EazydocError::InvalidInput(format!(
            "{name} must be a boolean, got '{other}'"
        ))),
    }
}

/// Resolve the data directory from optional environment values.
///
/// `in_memory` wins over `data_dir`; otherwise a blank or missing `data_dir` falls back to
/// `default_dir`.
pub fn data_dir_from_env_values(
    data_dir: Option<String>,
    in_memory: Option<String>,
    default_dir: &str,
) -> EazydocResult<Option<PathBuf>> {
    if flag_from_env_value("EAZYDOC_IN_MEMORY", in_memory, false)? {
        return Ok(None);
    }

    let dir = data_dir
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default_dir.to_string());

    Ok(Some(PathBuf::from(dir)))
}
