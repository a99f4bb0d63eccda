//! Module header codec

use bytes::{Buf, BufMut};

use crate::error::{Result, StoreError};
use crate::hash::NameHash;

use super::HEADER_SIZE;

/// Fixed module header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub name: NameHash,
    /// Byte length of the whole module, header and footer included
    pub module_size: u64,
}

impl Header {
    pub fn new(name: NameHash, module_size: usize) -> Self {
        Self {
            name,
            module_size: module_size as u64,
        }
    }

    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        let mut cursor = &mut out[..];
        self.write_to(&mut cursor);
        out
    }

    pub fn write_to<B: BufMut>(&self, buf: &mut B) {
        buf.put_u64_le(self.name.get());
        buf.put_u64_le(self.module_size);
    }

    /// Decode the header at the front of `bytes`
    pub fn decode(mut bytes: &[u8]) -> Self {
        let name = NameHash(bytes.get_u64_le());
        let module_size = bytes.get_u64_le();
        Self { name, module_size }
    }

    /// Decode the header starting at `offset` in `buf`
    pub fn read_at(buf: &[u8], offset: usize) -> Result<Self> {
        let end = offset
            .checked_add(HEADER_SIZE)
            .filter(|&end| end <= buf.len())
            .ok_or_else(|| {
                StoreError::corrupted(
                    offset,
                    format!(
                        "truncated header: need {} bytes, {} remain",
                        HEADER_SIZE,
                        buf.len().saturating_sub(offset)
                    ),
                )
            })?;
        Ok(Self::decode(&buf[offset..end]))
    }

    /// Overwrite the size field of the header at `offset`
    pub fn patch_size(buf: &mut [u8], offset: usize, module_size: usize) {
        buf[offset + 8..offset + HEADER_SIZE].copy_from_slice(&(module_size as u64).to_le_bytes());
    }
}
