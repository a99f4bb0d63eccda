//! Name hashing
//!
//! Modules and elements are keyed only by a 64-bit hash of their name. No
//! reverse mapping is stored and collisions are not detected.

use std::fmt;

/// Seed of the djb2 family
const SEED: u64 = 5381;

/// 64-bit identifier derived from a human-readable name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NameHash(pub u64);

impl NameHash {
    /// Hash a name (usable in `const` contexts)
    pub const fn of(name: &str) -> Self {
        hash_name(name)
    }

    /// Raw identifier as stored on disk
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<&str> for NameHash {
    fn from(name: &str) -> Self {
        hash_name(name)
    }
}

impl From<u64> for NameHash {
    fn from(raw: u64) -> Self {
        NameHash(raw)
    }
}

impl fmt::Display for NameHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

/// djb2-xor over the name, folded from the last byte to the first:
/// `h = h * 33 ^ byte`, starting at 5381. Each byte is sign-extended to
/// 64 bits first, so bytes >= 0x80 flip the high bits.
pub const fn hash_name(name: &str) -> NameHash {
    let bytes = name.as_bytes();
    let mut h = SEED;
    let mut i = bytes.len();
    while i > 0 {
        i -= 1;
        h = h.wrapping_mul(33) ^ bytes[i] as i8 as i64 as u64;
    }
    NameHash(h)
}
