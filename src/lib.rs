//! # modstore
//!
//! A single-file binary record store:
//! - Named modules holding named, fixed-width scalar fields
//! - Lazy creation on first write, zero values on read-when-absent
//! - Whole-buffer load on open, whole-buffer write on save
//! - Footer sentinels checked on every scan
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Record Facade                            │
//! │          (get_fields / set_fields / retain_only)             │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │   Element   │─────────▶│   Module    │
//!   │  Accessor   │  (grow)  │    Store    │
//!   └──────┬──────┘          └──────┬──────┘
//!          │                        │
//!          ▼                        ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │   Scalar    │          │   Framing   │
//!   │  Registry   │          │    Codec    │
//!   └─────────────┘          └─────────────┘
//!
//!   Persistence: file ──load──▶ buffer ──save──▶ file
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use modstore::{hash_name, RecordStore, ScalarKind, Value};
//!
//! # fn main() -> modstore::Result<()> {
//! let store = RecordStore::open_path("game.bin")?;
//! store.set_fields("player", &[(hash_name("hp"), Value::I32(100))])?;
//! store.save()?;
//!
//! let values = store.get_fields(
//!     "player",
//!     &[(hash_name("hp"), ScalarKind::I32), (hash_name("mana"), ScalarKind::I32)],
//! )?;
//! assert_eq!(values, vec![Value::I32(100), Value::I32(0)]);
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod hash;
pub mod format;
pub mod scalar;
pub mod store;
pub mod persist;
pub mod record;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{StoreError, Result};
pub use config::Config;
pub use hash::{hash_name, NameHash};
pub use scalar::{Scalar, ScalarKind, Value};
pub use store::StoreStats;
pub use record::RecordStore;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of modstore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
