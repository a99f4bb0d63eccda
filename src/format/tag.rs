//! Element tag codec

use bytes::{Buf, BufMut};

use crate::error::{Result, StoreError};
use crate::hash::NameHash;

use super::TAG_SIZE;

/// Fixed prefix of every element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementTag {
    pub name: NameHash,
    /// Raw type tag, resolved through the scalar registry
    pub type_tag: u8,
}

impl ElementTag {
    pub fn new(name: NameHash, type_tag: u8) -> Self {
        Self { name, type_tag }
    }

    pub fn encode(&self) -> [u8; TAG_SIZE] {
        let mut out = [0u8; TAG_SIZE];
        let mut cursor = &mut out[..];
        self.write_to(&mut cursor);
        out
    }

    pub fn write_to<B: BufMut>(&self, buf: &mut B) {
        buf.put_u64_le(self.name.get());
        buf.put_u8(self.type_tag);
    }

    pub fn decode(mut bytes: &[u8]) -> Self {
        let name = NameHash(bytes.get_u64_le());
        let type_tag = bytes.get_u8();
        Self { name, type_tag }
    }

    /// Decode the tag at `offset`, which must end at or before `limit`
    pub fn read_at(buf: &[u8], offset: usize, limit: usize) -> Result<Self> {
        let end = offset + TAG_SIZE;
        if end > limit || end > buf.len() {
            return Err(StoreError::corrupted(
                offset,
                "element tag runs past the module payload",
            ));
        }
        Ok(Self::decode(&buf[offset..end]))
    }
}
