use crate::core::{DeskError, Result};
use crate::validation::MIN_PASSWORD_LENGTH;
use crate::view::table::DEFAULT_ROWS_PER_PAGE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding [`DeskConfig::snapshot_path`]
pub const SNAPSHOT_ENV: &str = "MAINTDESK_SNAPSHOT";

/// Lowest bcrypt cost the `bcrypt` crate accepts
const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;

/// Back-office configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeskConfig {
    /// Rows on one page of every table
    pub rows_per_page: usize,

    /// Minimum length of a new account password
    pub min_password_length: usize,

    /// bcrypt cost of the in-process identity provider
    pub bcrypt_cost: u32,

    /// JSON snapshot the document store is loaded from and saved to
    pub snapshot_path: Option<PathBuf>,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
            min_password_length: MIN_PASSWORD_LENGTH,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            snapshot_path: None,
        }
    }
}

impl DeskConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set rows per page
    pub fn rows_per_page(mut self, rows: usize) -> Self {
        self.rows_per_page = rows;
        self
    }

    /// Set minimum password length
    pub fn min_password_length(mut self, min: usize) -> Self {
        self.min_password_length = min;
        self
    }

    /// Set bcrypt cost
    pub fn bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    /// Set snapshot file
    pub fn snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = Some(path.into());
        self
    }

    /// Reads a JSON config file; missing keys keep their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: DeskConfig = serde_json::from_str(&text)
            .map_err(|e| DeskError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `MAINTDESK_SNAPSHOT` when it is set and not empty
    pub fn with_env_overrides(self) -> Self {
        match std::env::var(SNAPSHOT_ENV) {
            Ok(path) => self.apply_snapshot_override(&path),
            Err(_) => self,
        }
    }

    fn apply_snapshot_override(self, value: &str) -> Self {
        if value.trim().is_empty() {
            self
        } else {
            self.snapshot_path(value.trim())
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.rows_per_page == 0 {
            return Err(DeskError::Config("rows_per_page must be > 0".to_string()));
        }

        if self.min_password_length == 0 {
            return Err(DeskError::Config("min_password_length must be > 0".to_string()));
        }

        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&self.bcrypt_cost) {
            return Err(DeskError::Config(format!(
                "bcrypt_cost must be between {} and {}",
                MIN_BCRYPT_COST, MAX_BCRYPT_COST
            )));
        }

        Ok(())
    }
}
