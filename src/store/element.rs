//! Element Accessor
//!
//! Field-level scan, read and write inside one module's payload.

use crate::error::{Result, StoreError};
use crate::format::{is_footer_valid, ElementTag, FOOTER_SIZE, TAG_SIZE};
use crate::hash::NameHash;
use crate::scalar::{width_of, ScalarKind, Value};

use super::{ElementView, ModuleStore, ModuleView, StoreStats};

impl ModuleStore {
    /// Scan the elements of `module` in payload order
    pub fn elements(&self, module: ModuleView) -> ElementIter<'_> {
        ElementIter {
            buf: self.buf(),
            cursor: module.payload_start(),
            limit: module.payload_end(),
            failed: false,
        }
    }

    /// First element of `module` named `name`.
    ///
    /// `None` when the scan lands exactly on a valid footer; any other
    /// landing point fails `CorruptedStore`.
    pub fn find_element(&self, module: ModuleView, name: NameHash) -> Result<Option<ElementView>> {
        for element in self.elements(module) {
            let element = element?;
            if element.name == name {
                return Ok(Some(element));
            }
        }
        Ok(None)
    }

    /// Value of a field, or the zero value of `kind` if the field is absent
    pub fn read_value(&self, module: ModuleView, name: NameHash, kind: ScalarKind) -> Result<Value> {
        let element = match self.find_element(module, name)? {
            Some(element) => element,
            None => return Ok(kind.default_value()),
        };

        if element.kind != kind {
            return Err(StoreError::TypeMismatch {
                field: name,
                stored: element.kind,
                requested: kind,
            });
        }

        let start = element.value_offset();
        Ok(Value::decode(kind, &self.buf()[start..start + kind.width()]))
    }

    /// Set a field, in place if it exists, otherwise by growing the module.
    ///
    /// Returns the module's view after the write; it differs from `module`
    /// when the module had to be relocated.
    pub fn write_value(&mut self, module: ModuleView, name: NameHash, value: Value) -> Result<ModuleView> {
        match self.find_element(module, name)? {
            Some(element) => {
                if element.kind != value.kind() {
                    return Err(StoreError::TypeMismatch {
                        field: name,
                        stored: element.kind,
                        requested: value.kind(),
                    });
                }

                let start = element.value_offset();
                let mut slot = &mut self.buf_mut()[start..start + value.width()];
                value.encode(&mut slot);
                Ok(module)
            }
            None => {
                let mut payload = Vec::with_capacity(TAG_SIZE + value.width());
                ElementTag::new(name, value.kind().tag()).write_to(&mut payload);
                value.encode(&mut payload);

                tracing::trace!(module = %module.name, field = %name, "appending element");
                self.grow_module(module, &payload)
            }
        }
    }

    /// Full scan of every module and every element.
    ///
    /// Fails on the first framing error or unknown type tag.
    pub fn check_integrity(&self) -> Result<StoreStats> {
        let mut stats = StoreStats {
            bytes: self.len(),
            ..StoreStats::default()
        };
        let mut seen = std::collections::HashSet::new();

        for module in self.modules() {
            let module = module?;
            stats.modules += 1;
            if !seen.insert(module.name) {
                stats.shadowed_modules += 1;
                tracing::warn!(module = %module.name, offset = module.offset, "shadowed duplicate module");
            }
            for element in self.elements(module) {
                element?;
                stats.elements += 1;
            }
        }

        Ok(stats)
    }
}

/// Iterator over the elements of one module.
///
/// Yields one error and then stops if the cursor does not land exactly on
/// the footer.
pub struct ElementIter<'a> {
    buf: &'a [u8],
    cursor: usize,
    /// Offset of the module footer
    limit: usize,
    failed: bool,
}

impl ElementIter<'_> {
    fn fail(&mut self, err: StoreError) -> Option<Result<ElementView>> {
        self.failed = true;
        Some(Err(err))
    }
}

impl Iterator for ElementIter<'_> {
    type Item = Result<ElementView>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        if self.cursor == self.limit {
            let footer = self.buf.get(self.limit..self.limit + FOOTER_SIZE);
            if footer.map(is_footer_valid).unwrap_or(false) {
                return None;
            }
            return self.fail(StoreError::corrupted(self.limit, "footer not found after last element"));
        }

        let offset = self.cursor;
        let tag = match ElementTag::read_at(self.buf, offset, self.limit) {
            Ok(tag) => tag,
            Err(e) => return self.fail(e),
        };
        let width = match width_of(tag.type_tag, offset + TAG_SIZE - 1) {
            Ok(width) => width,
            Err(e) => return self.fail(e),
        };

        let next = offset + TAG_SIZE + width;
        if next > self.limit || next > self.buf.len() {
            return self.fail(StoreError::corrupted(
                offset,
                "element value runs past the module payload",
            ));
        }
        self.cursor = next;

        // width_of accepted the tag, so it names a registered kind
        ScalarKind::from_tag(tag.type_tag).map(|kind| {
            Ok(ElementView {
                offset,
                name: tag.name,
                kind,
            })
        })
    }
}
