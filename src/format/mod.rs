//! Framing Codec
//!
//! Encodes and decodes the three fixed structures of the store format.
//! Stateless; every decoder is bounds-checked against the slice it is given.
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Module                                                  │
//! │ ┌─────────────────────────────────────────────────────┐ │
//! │ │ Header (16 bytes)                                   │ │
//! │ │   NameHash: u64 (8) | ModuleSize: u64 (8)           │ │
//! │ ├─────────────────────────────────────────────────────┤ │
//! │ │ Element                                             │ │
//! │ │   Tag: NameHash u64 (8) | TypeTag u8 (1)            │ │
//! │ │   Value: TypeTag-width bytes                        │ │
//! │ │ ... repeated for each element ...                   │ │
//! │ ├─────────────────────────────────────────────────────┤ │
//! │ │ Footer (4 bytes)                                    │ │
//! │ │   Sentinel: EF BE AD DE                             │ │
//! │ └─────────────────────────────────────────────────────┘ │
//! ├─────────────────────────────────────────────────────────┤
//! │ Module ... (back to back, no padding, no index)         │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! `ModuleSize` covers header, elements and footer. All integers are
//! little-endian.

mod footer;
mod header;
mod tag;

pub use footer::{footer_sentinel, is_footer_valid, FOOTER_SENTINEL};
pub use header::Header;
pub use tag::ElementTag;

// =============================================================================
// Shared Constants
// =============================================================================

/// Header size: NameHash (8) + ModuleSize (8) = 16 bytes
pub const HEADER_SIZE: usize = 16;

/// Footer size: sentinel only = 4 bytes
pub const FOOTER_SIZE: usize = 4;

/// Element tag size: NameHash (8) + TypeTag (1) = 9 bytes
pub const TAG_SIZE: usize = 9;

/// Smallest well-formed module: header + footer, no elements
pub const MIN_MODULE_SIZE: usize = HEADER_SIZE + FOOTER_SIZE;
