//! Record Facade
//!
//! The public surface of the store.
//!
//! ## Responsibilities
//! - Load the backing file on open, write it back on save
//! - Read fields with default-on-absence semantics
//! - Write fields, creating modules and elements on first write
//! - Bulk and single module deletion

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::config::Config;
use crate::error::{Result, StoreError};
use crate::hash::NameHash;
use crate::persist;
use crate::scalar::{Scalar, ScalarKind, Value};
use crate::store::{build_module, ModuleStore, StoreStats};

/// A file-backed store of named modules holding typed scalar fields
///
/// ## Concurrency Model
///
/// One owner at a time. The buffer sits behind a `Mutex` so every method
/// takes `&self` and each call runs as one critical section, but there are
/// no multi-call transactions and no offsets survive between calls.
#[derive(Debug)]
pub struct RecordStore {
    config: Config,
    store: Mutex<ModuleStore>,
}

impl RecordStore {
    /// Open the store described by `config`
    ///
    /// On startup:
    /// 1. Read the whole backing file (or start empty if allowed)
    /// 2. Verify framing of every module and element if configured
    pub fn open(config: Config) -> Result<Self> {
        let bytes = match persist::load_file(&config.path) {
            Ok(bytes) => bytes,
            Err(StoreError::FileNotFound { path }) if config.create_if_missing => {
                tracing::debug!(path = %path.display(), "store file missing, starting empty");
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        let store = ModuleStore::from_bytes(bytes).with_max_size(config.max_store_size);

        if config.verify_on_open {
            let stats = store.check_integrity()?;
            tracing::debug!(
                modules = stats.modules,
                elements = stats.elements,
                bytes = stats.bytes,
                "verified store"
            );
        }

        Ok(Self {
            config,
            store: Mutex::new(store),
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config, creating an empty store if the file is missing
    pub fn open_path(path: impl Into<PathBuf>) -> Result<Self> {
        let config = Config::builder().path(path).create_if_missing(true).build();
        Self::open(config)
    }

    /// Write the whole buffer back to the backing file
    pub fn save(&self) -> Result<()> {
        self.save_as(&self.config.path)
    }

    /// Write the whole buffer to another file
    pub fn save_as(&self, path: &Path) -> Result<()> {
        let store = self.store.lock();
        persist::save_file(path, store.as_bytes(), self.config.sync_on_save)
    }

    // =========================================================================
    // Field Access
    // =========================================================================

    /// Read several fields of one module, in the order given.
    ///
    /// Absent modules and absent fields yield the zero value of the
    /// requested kind; the buffer is never modified.
    pub fn get_fields(
        &self,
        module: impl Into<NameHash>,
        fields: &[(NameHash, ScalarKind)],
    ) -> Result<Vec<Value>> {
        let module = module.into();
        let store = self.store.lock();

        let view = match store.find_module(module)? {
            Some(view) => view,
            None => return Ok(fields.iter().map(|(_, kind)| kind.default_value()).collect()),
        };

        fields
            .iter()
            .map(|&(field, kind)| store.read_value(view, field, kind))
            .collect()
    }

    /// Write several fields of one module.
    ///
    /// An absent module is created holding exactly `fields` in order. On an
    /// existing module, present fields are overwritten in place and each
    /// absent one is appended, relocating the module to the tail of the
    /// buffer. Names and types are checked before anything is written.
    pub fn set_fields(&self, module: impl Into<NameHash>, fields: &[(NameHash, Value)]) -> Result<()> {
        let module = module.into();
        check_unique(fields)?;

        let mut store = self.store.lock();

        let mut view = match store.find_module(module)? {
            Some(view) => view,
            None => {
                let bytes = build_module(module, fields);
                store.append_module(&bytes)?;
                tracing::trace!(module = %module, fields = fields.len(), "created module");
                return Ok(());
            }
        };

        for &(field, value) in fields {
            if let Some(element) = store.find_element(view, field)? {
                if element.kind != value.kind() {
                    return Err(StoreError::TypeMismatch {
                        field,
                        stored: element.kind,
                        requested: value.kind(),
                    });
                }
            }
        }

        for &(field, value) in fields {
            view = store.write_value(view, field, value)?;
        }
        Ok(())
    }

    /// Read one field, zero value if absent
    pub fn get<T: Scalar>(&self, module: impl Into<NameHash>, field: impl Into<NameHash>) -> Result<T> {
        let field = field.into();
        let values = self.get_fields(module, &[(field, T::KIND)])?;

        match values.first() {
            Some(&value) => T::from_value(value).ok_or(StoreError::TypeMismatch {
                field,
                stored: value.kind(),
                requested: T::KIND,
            }),
            None => Ok(T::default()),
        }
    }

    /// Write one field
    pub fn set<T: Scalar>(&self, module: impl Into<NameHash>, field: impl Into<NameHash>, value: T) -> Result<()> {
        self.set_fields(module, &[(field.into(), value.into_value())])
    }

    // =========================================================================
    // Module Management
    // =========================================================================

    /// Delete every module not named in `names`, keeping the order of the
    /// rest. Returns the number of modules removed.
    pub fn retain_only<I>(&self, names: I) -> Result<usize>
    where
        I: IntoIterator,
        I::Item: Into<NameHash>,
    {
        let keep: HashSet<NameHash> = names.into_iter().map(Into::into).collect();
        self.store.lock().retain_only(&keep)
    }

    /// Delete one module. Returns false if it did not exist.
    pub fn delete_module(&self, module: impl Into<NameHash>) -> Result<bool> {
        let module = module.into();
        let mut store = self.store.lock();

        match store.find_module(module)? {
            Some(view) => {
                store.delete_module(view.offset)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn contains_module(&self, module: impl Into<NameHash>) -> Result<bool> {
        Ok(self.store.lock().find_module(module.into())?.is_some())
    }

    /// Names of all modules, in buffer order
    pub fn module_names(&self) -> Result<Vec<NameHash>> {
        self.store
            .lock()
            .modules()
            .map(|module| module.map(|m| m.name))
            .collect()
    }

    pub fn module_count(&self) -> Result<usize> {
        self.store.lock().modules().try_fold(0, |count, module| module.map(|_| count + 1))
    }

    /// Full framing check of the buffer
    pub fn check_integrity(&self) -> Result<StoreStats> {
        self.store.lock().check_integrity()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Current buffer size in bytes
    pub fn len_bytes(&self) -> usize {
        self.store.lock().len()
    }

    /// Copy of the raw buffer, exactly as `save` would write it
    pub fn to_bytes(&self) -> Vec<u8> {
        self.store.lock().as_bytes().to_vec()
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

fn check_unique(fields: &[(NameHash, Value)]) -> Result<()> {
    let mut seen = HashSet::with_capacity(fields.len());
    for &(field, _) in fields {
        if !seen.insert(field) {
            return Err(StoreError::DuplicateField { field });
        }
    }
    Ok(())
}
