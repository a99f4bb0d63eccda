//! Module Store
//!
//! Module-level scan and splice operations over the owned buffer.

use std::collections::HashSet;

use bytes::BufMut;

use crate::error::{Result, StoreError};
use crate::format::{is_footer_valid, ElementTag, Header, FOOTER_SENTINEL, FOOTER_SIZE, MIN_MODULE_SIZE, TAG_SIZE};
use crate::hash::NameHash;
use crate::scalar::Value;

use super::ModuleView;

/// Owns the buffer: a back-to-back run of well-formed modules
#[derive(Debug, Default, Clone)]
pub struct ModuleStore {
    buf: Vec<u8>,
    /// Upper bound on `buf.len()`; growth past it fails `AllocationFailure`
    max_size: Option<usize>,
}

impl ModuleStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of raw bytes loaded from disk. Not validated here;
    /// framing errors surface on the first scan that reaches them.
    pub fn from_bytes(buf: Vec<u8>) -> Self {
        Self {
            buf,
            max_size: None,
        }
    }

    pub fn with_max_size(mut self, max_size: Option<usize>) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Scan modules in buffer order
    pub fn modules(&self) -> ModuleIter<'_> {
        ModuleIter {
            buf: &self.buf,
            pos: 0,
            failed: false,
        }
    }

    /// First module whose name hash matches, `None` if the scan reaches the
    /// end of the buffer. Fails `CorruptedStore` on the first framing error
    /// met before the match.
    pub fn find_module(&self, name: NameHash) -> Result<Option<ModuleView>> {
        for module in self.modules() {
            let module = module?;
            if module.name == name {
                return Ok(Some(module));
            }
        }
        tracing::trace!(module = %name, "module not found");
        Ok(None)
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Append an encoded module at the tail of the buffer.
    ///
    /// Leaves the buffer untouched on `AllocationFailure`.
    pub fn append_module(&mut self, bytes: &[u8]) -> Result<ModuleView> {
        debug_assert!(read_module(bytes, 0).map(|m| m.size == bytes.len()).unwrap_or(false));

        self.reserve(bytes.len())?;
        let offset = self.buf.len();
        self.buf.extend_from_slice(bytes);

        let module = read_module(&self.buf, offset)?;
        tracing::trace!(module = %module.name, offset, size = module.size, "appended module");
        Ok(module)
    }

    /// Append `payload` (encoded elements) to a module's payload.
    ///
    /// The grown module moves to the tail of the buffer; the modules that
    /// followed it shift down in their original order. Returns the new view.
    /// Leaves the buffer untouched on `AllocationFailure`.
    pub fn grow_module(&mut self, module: ModuleView, payload: &[u8]) -> Result<ModuleView> {
        let module = read_module(&self.buf, module.offset)?;
        let new_size = module.size + payload.len();
        self.reserve(payload.len())?;

        // Splice out and back in at the tail in one move.
        self.buf[module.offset..].rotate_left(module.size);
        let start = self.buf.len() - module.size;

        self.buf.truncate(self.buf.len() - FOOTER_SIZE);
        self.buf.extend_from_slice(payload);
        self.buf.extend_from_slice(&FOOTER_SENTINEL);
        Header::patch_size(&mut self.buf, start, new_size);

        tracing::trace!(
            module = %module.name,
            from = module.offset,
            to = start,
            size = new_size,
            "relocated grown module"
        );

        Ok(ModuleView {
            offset: start,
            name: module.name,
            size: new_size,
        })
    }

    /// Remove the module at `offset`, shifting every later byte down, and
    /// shrink the allocation. Returns the removed module's view.
    pub fn delete_module(&mut self, offset: usize) -> Result<ModuleView> {
        let module = read_module(&self.buf, offset)?;

        self.buf.copy_within(module.end().., module.offset);
        self.buf.truncate(self.buf.len() - module.size);
        self.buf.shrink_to_fit();

        tracing::trace!(module = %module.name, offset, size = module.size, "deleted module");
        Ok(module)
    }

    /// Delete every module whose name is not in `keep`, preserving the order
    /// of survivors. The whole buffer is validated before anything moves, so
    /// a `CorruptedStore` error leaves it unchanged. Returns the number of
    /// modules removed.
    pub fn retain_only(&mut self, keep: &HashSet<NameHash>) -> Result<usize> {
        let modules = self.modules().collect::<Result<Vec<_>>>()?;

        let mut write = 0;
        let mut removed = 0;
        for module in modules {
            if !keep.contains(&module.name) {
                removed += 1;
                continue;
            }
            if write != module.offset {
                self.buf.copy_within(module.offset..module.end(), write);
            }
            write += module.size;
        }

        self.buf.truncate(write);
        self.buf.shrink_to_fit();

        tracing::trace!(removed, remaining_bytes = write, "retained modules");
        Ok(removed)
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Make room for `additional` bytes without mutating contents
    pub(super) fn reserve(&mut self, additional: usize) -> Result<()> {
        let exceeds_limit = match self.max_size {
            Some(max) => self.buf.len().saturating_add(additional) > max,
            None => false,
        };
        if exceeds_limit {
            return Err(StoreError::AllocationFailure {
                requested: additional,
            });
        }

        self.buf
            .try_reserve(additional)
            .map_err(|_| StoreError::AllocationFailure {
                requested: additional,
            })
    }

    pub(super) fn buf(&self) -> &[u8] {
        &self.buf
    }

    pub(super) fn buf_mut(&mut self) -> &mut [u8] {
        &mut self.buf
    }
}

/// Encode a complete module: header, each element in order, footer
pub fn build_module(name: NameHash, fields: &[(NameHash, Value)]) -> Vec<u8> {
    let size = MIN_MODULE_SIZE
        + fields
            .iter()
            .map(|(_, value)| TAG_SIZE + value.width())
            .sum::<usize>();

    let mut out = Vec::with_capacity(size);
    Header::new(name, size).write_to(&mut out);
    for (field, value) in fields {
        ElementTag::new(*field, value.kind().tag()).write_to(&mut out);
        value.encode(&mut out);
    }
    out.put_slice(&FOOTER_SENTINEL);
    out
}

/// Decode the header at `offset` and check that the module it describes
/// fits in `buf` and is closed by a valid footer.
fn read_module(buf: &[u8], offset: usize) -> Result<ModuleView> {
    let header = Header::read_at(buf, offset)?;

    let size = usize::try_from(header.module_size).map_err(|_| {
        StoreError::corrupted(offset, format!("module size {} overflows", header.module_size))
    })?;
    if size < MIN_MODULE_SIZE {
        return Err(StoreError::corrupted(
            offset,
            format!("module size {} below minimum {}", size, MIN_MODULE_SIZE),
        ));
    }
    let end = offset
        .checked_add(size)
        .filter(|&end| end <= buf.len())
        .ok_or_else(|| {
            StoreError::corrupted(
                offset,
                format!(
                    "module size {} runs past end of buffer ({} bytes)",
                    size,
                    buf.len()
                ),
            )
        })?;

    if !is_footer_valid(&buf[end - FOOTER_SIZE..end]) {
        return Err(StoreError::corrupted(
            end - FOOTER_SIZE,
            "expected footer not found",
        ));
    }

    Ok(ModuleView {
        offset,
        name: header.name,
        size,
    })
}

/// Iterator over the modules of a buffer.
///
/// Yields one error and then stops if the framing breaks.
pub struct ModuleIter<'a> {
    buf: &'a [u8],
    pos: usize,
    failed: bool,
}

impl Iterator for ModuleIter<'_> {
    type Item = Result<ModuleView>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.buf.len() {
            return None;
        }

        match read_module(self.buf, self.pos) {
            Ok(module) => {
                self.pos = module.end();
                Some(Ok(module))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
