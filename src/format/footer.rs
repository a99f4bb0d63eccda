//! Module footer sentinel

use super::FOOTER_SIZE;

/// Sentinel closing every module. Framing check only, carries no length.
pub const FOOTER_SENTINEL: [u8; FOOTER_SIZE] = [0xEF, 0xBE, 0xAD, 0xDE];

pub fn footer_sentinel() -> [u8; FOOTER_SIZE] {
    FOOTER_SENTINEL
}

/// Byte-exact compare against the sentinel
pub fn is_footer_valid(bytes: &[u8]) -> bool {
    bytes == FOOTER_SENTINEL
}
