//! Store Module
//!
//! Owns the byte buffer and implements every structural operation on it.
//!
//! ## Responsibilities
//! - Locate modules by name hash (linear scan, footer-checked)
//! - Append, grow (relocate to tail) and delete modules
//! - Locate, read and overwrite elements inside a module
//!
//! There is no index. Every lookup scans from the start of the buffer, and
//! views returned by one call are invalidated by any structural mutation
//! (append, grow, delete, retain). Callers re-resolve after mutating.

mod element;
mod module;

pub use element::ElementIter;
pub use module::{build_module, ModuleIter, ModuleStore};

use crate::format::{FOOTER_SIZE, HEADER_SIZE, TAG_SIZE};
use crate::hash::NameHash;
use crate::scalar::ScalarKind;

// =============================================================================
// Views
// =============================================================================

/// Location of a module inside the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleView {
    /// Offset of the header
    pub offset: usize,
    pub name: NameHash,
    /// Total byte length, header and footer included
    pub size: usize,
}

impl ModuleView {
    /// First byte after the header
    pub fn payload_start(&self) -> usize {
        self.offset + HEADER_SIZE
    }

    /// Offset of the footer
    pub fn payload_end(&self) -> usize {
        self.offset + self.size - FOOTER_SIZE
    }

    /// One past the last byte of the module
    pub fn end(&self) -> usize {
        self.offset + self.size
    }
}

/// Location of an element inside a module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementView {
    /// Offset of the tag
    pub offset: usize,
    pub name: NameHash,
    pub kind: ScalarKind,
}

impl ElementView {
    pub fn value_offset(&self) -> usize {
        self.offset + TAG_SIZE
    }

    /// Tag plus value
    pub fn size(&self) -> usize {
        TAG_SIZE + self.kind.width()
    }
}

/// Result of a full integrity scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub modules: usize,
    pub elements: usize,
    pub bytes: usize,
    /// Modules hidden behind an earlier module with the same name hash
    pub shadowed_modules: usize,
}
