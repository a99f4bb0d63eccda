//! Configuration for modstore
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

/// Main configuration for a RecordStore instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Backing file, read whole on open and written whole on save
    pub path: PathBuf,

    /// Start from an empty store when the file does not exist instead of
    /// failing with `FileNotFound`
    pub create_if_missing: bool,

    /// Run a full integrity scan right after loading
    pub verify_on_open: bool,

    /// fsync the file after every save
    pub sync_on_save: bool,

    // -------------------------------------------------------------------------
    // Resource Limits
    // -------------------------------------------------------------------------
    /// Upper bound on the buffer size (in bytes), `None` for unbounded
    pub max_store_size: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./modstore.bin"),
            create_if_missing: false,
            verify_on_open: true,
            sync_on_save: true,
            max_store_size: None,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the backing file path
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.path = path.into();
        self
    }

    /// Start empty when the backing file is missing
    pub fn create_if_missing(mut self, create: bool) -> Self {
        self.config.create_if_missing = create;
        self
    }

    /// Verify every module and element on open
    pub fn verify_on_open(mut self, verify: bool) -> Self {
        self.config.verify_on_open = verify;
        self
    }

    /// fsync after save
    pub fn sync_on_save(mut self, sync: bool) -> Self {
        self.config.sync_on_save = sync;
        self
    }

    /// Cap the buffer size (in bytes)
    pub fn max_store_size(mut self, bytes: usize) -> Self {
        self.config.max_store_size = Some(bytes);
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
