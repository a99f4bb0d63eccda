//! Tests for the module store
//!
//! These tests verify:
//! - Linear scan lookup with footer validation
//! - Append, grow (relocation to tail) and delete
//! - retain_only order preservation and atomicity on corruption
//! - Allocation limits leave the buffer unchanged

#[path = "../common/mod.rs"]
mod common;

use std::collections::HashSet;

use common::{encode_module, walk_modules};
use modstore::format::{ElementTag, FOOTER_SIZE, HEADER_SIZE, TAG_SIZE};
use modstore::store::{build_module, ModuleStore};
use modstore::{NameHash, StoreError, Value};

// =============================================================================
// Helper Functions
// =============================================================================

/// Store with modules 1..=count, module i holding one I32 field of value i
fn store_with_modules(count: u64) -> ModuleStore {
    let mut buf = Vec::new();
    for i in 1..=count {
        buf.extend(encode_module(i, &[(100, Value::I32(i as i32))]));
    }
    ModuleStore::from_bytes(buf)
}

fn names(store: &ModuleStore) -> Vec<u64> {
    walk_modules(store.as_bytes()).into_iter().map(|(name, _, _)| name).collect()
}

fn element_payload(name: u64, value: Value) -> Vec<u8> {
    let mut out = ElementTag::new(NameHash(name), value.kind().tag()).encode().to_vec();
    value.encode(&mut out);
    out
}

// =============================================================================
// Lookup Tests
// =============================================================================

#[test]
fn test_find_module_in_empty_store() {
    let store = ModuleStore::new();
    assert_eq!(store.find_module(NameHash(1)).unwrap(), None);
}

#[test]
fn test_find_module_returns_offsets() {
    let store = store_with_modules(3);
    let module_size = HEADER_SIZE + TAG_SIZE + 4 + FOOTER_SIZE;

    let first = store.find_module(NameHash(1)).unwrap().unwrap();
    let third = store.find_module(NameHash(3)).unwrap().unwrap();

    assert_eq!(first.offset, 0);
    assert_eq!(first.size, module_size);
    assert_eq!(third.offset, 2 * module_size);
    assert_eq!(third.name, NameHash(3));
}

#[test]
fn test_find_module_absent() {
    let store = store_with_modules(3);
    assert_eq!(store.find_module(NameHash(99)).unwrap(), None);
}

#[test]
fn test_find_module_detects_bad_footer() {
    let mut buf = encode_module(1, &[(100, Value::I32(1))]);
    let len = buf.len();
    buf[len - 1] = 0x00;
    buf.extend(encode_module(2, &[]));
    let store = ModuleStore::from_bytes(buf);

    let result = store.find_module(NameHash(2));
    assert!(matches!(result, Err(StoreError::CorruptedStore { .. })));
}

#[test]
fn test_find_module_detects_oversized_header() {
    let mut buf = encode_module(1, &[]);
    buf[8..16].copy_from_slice(&1000u64.to_le_bytes());
    let store = ModuleStore::from_bytes(buf);

    assert!(matches!(
        store.find_module(NameHash(2)),
        Err(StoreError::CorruptedStore { offset: 0, .. })
    ));
}

#[test]
fn test_find_module_detects_undersized_header() {
    let mut buf = encode_module(1, &[]);
    buf[8..16].copy_from_slice(&4u64.to_le_bytes());
    let store = ModuleStore::from_bytes(buf);

    assert!(store.find_module(NameHash(2)).unwrap_err().is_corruption());
}

#[test]
fn test_find_module_detects_trailing_garbage() {
    let mut buf = encode_module(1, &[]);
    buf.extend_from_slice(&[1, 2, 3]);
    let store = ModuleStore::from_bytes(buf);

    assert!(store.find_module(NameHash(1)).unwrap().is_some());
    assert!(store.find_module(NameHash(2)).is_err());
}

#[test]
fn test_duplicate_module_shadows_later_one() {
    let mut buf = encode_module(7, &[(1, Value::I32(1))]);
    buf.extend(encode_module(7, &[(1, Value::I32(2))]));
    let store = ModuleStore::from_bytes(buf);

    let found = store.find_module(NameHash(7)).unwrap().unwrap();
    assert_eq!(found.offset, 0);
}

#[test]
fn test_modules_iterator_stops_after_error() {
    let mut buf = encode_module(1, &[]);
    buf.extend_from_slice(&[0u8; 5]);
    let store = ModuleStore::from_bytes(buf);

    let items: Vec<_> = store.modules().collect();
    assert_eq!(items.len(), 2);
    assert!(items[0].is_ok());
    assert!(items[1].is_err());
}

// =============================================================================
// Append Tests
// =============================================================================

#[test]
fn test_append_module_to_empty_store() {
    let mut store = ModuleStore::new();
    let bytes = build_module(NameHash(1), &[(NameHash(2), Value::F32(0.5))]);

    let view = store.append_module(&bytes).unwrap();

    assert_eq!(view.offset, 0);
    assert_eq!(view.size, bytes.len());
    assert_eq!(store.as_bytes(), bytes.as_slice());
}

#[test]
fn test_append_module_goes_to_tail() {
    let mut store = store_with_modules(2);
    let before = store.len();

    let view = store.append_module(&build_module(NameHash(9), &[])).unwrap();

    assert_eq!(view.offset, before);
    assert_eq!(names(&store), vec![1, 2, 9]);
}

#[test]
fn test_append_module_over_limit_leaves_buffer_unchanged() {
    let store = store_with_modules(2);
    let limit = store.len() + 10;
    let mut store = store.with_max_size(Some(limit));
    let before = store.as_bytes().to_vec();

    let result = store.append_module(&build_module(NameHash(9), &[]));

    assert!(matches!(result, Err(StoreError::AllocationFailure { requested: 20 })));
    assert_eq!(store.as_bytes(), before.as_slice());
}

// =============================================================================
// Grow Tests
// =============================================================================

#[test]
fn test_grow_module_relocates_to_tail() {
    let mut store = store_with_modules(3);
    let original = store.as_bytes().to_vec();
    let module = store.find_module(NameHash(1)).unwrap().unwrap();
    let payload = element_payload(200, Value::I64(5));

    let grown = store.grow_module(module, &payload).unwrap();

    assert_eq!(names(&store), vec![2, 3, 1]);
    assert_eq!(grown.size, module.size + payload.len());
    assert_eq!(grown.offset + grown.size, store.len());

    // Modules 2 and 3 shift down unchanged
    assert_eq!(&store.as_bytes()[..2 * module.size], &original[module.size..]);
}

#[test]
fn test_grow_module_keeps_old_payload_and_appends_new() {
    let mut store = store_with_modules(2);
    let module = store.find_module(NameHash(2)).unwrap().unwrap();
    let old_payload = store.as_bytes()[module.payload_start()..module.payload_end()].to_vec();
    let payload = element_payload(201, Value::Bool(true));

    let grown = store.grow_module(module, &payload).unwrap();

    let bytes = store.as_bytes();
    let new_payload = &bytes[grown.payload_start()..grown.payload_end()];
    assert_eq!(&new_payload[..old_payload.len()], old_payload.as_slice());
    assert_eq!(&new_payload[old_payload.len()..], payload.as_slice());
    walk_modules(bytes);
}

#[test]
fn test_grow_last_module_stays_in_place() {
    let mut store = store_with_modules(2);
    let module = store.find_module(NameHash(2)).unwrap().unwrap();

    let grown = store.grow_module(module, &element_payload(5, Value::U32(1))).unwrap();

    assert_eq!(grown.offset, module.offset);
    assert_eq!(names(&store), vec![1, 2]);
}

#[test]
fn test_grow_module_over_limit_leaves_buffer_unchanged() {
    let store = store_with_modules(3);
    let limit = store.len() + 5;
    let mut store = store.with_max_size(Some(limit));
    let before = store.as_bytes().to_vec();
    let module = store.find_module(NameHash(1)).unwrap().unwrap();

    let result = store.grow_module(module, &element_payload(5, Value::U64(1)));

    assert!(matches!(result, Err(StoreError::AllocationFailure { .. })));
    assert_eq!(store.as_bytes(), before.as_slice());
}

// =============================================================================
// Delete Tests
// =============================================================================

#[test]
fn test_delete_middle_module() {
    let mut store = store_with_modules(3);
    let module = store.find_module(NameHash(2)).unwrap().unwrap();
    let before = store.len();

    let removed = store.delete_module(module.offset).unwrap();

    assert_eq!(removed.name, NameHash(2));
    assert_eq!(store.len(), before - module.size);
    assert_eq!(names(&store), vec![1, 3]);
}

#[test]
fn test_delete_only_module() {
    let mut store = store_with_modules(1);

    store.delete_module(0).unwrap();

    assert!(store.is_empty());
    assert_eq!(store.find_module(NameHash(1)).unwrap(), None);
}

#[test]
fn test_delete_module_at_bad_offset() {
    let mut store = store_with_modules(2);
    let before = store.as_bytes().to_vec();

    assert!(store.delete_module(3).is_err());
    assert_eq!(store.as_bytes(), before.as_slice());
}

// =============================================================================
// Retain Tests
// =============================================================================

#[test]
fn test_retain_only_preserves_order() {
    let mut store = store_with_modules(4);
    let keep: HashSet<NameHash> = [NameHash(1), NameHash(2)].into_iter().collect();

    let removed = store.retain_only(&keep).unwrap();

    assert_eq!(removed, 2);
    assert_eq!(names(&store), vec![1, 2]);
}

#[test]
fn test_retain_only_interleaved() {
    let mut store = store_with_modules(5);
    let original = store.as_bytes().to_vec();
    let module_size = original.len() / 5;
    let keep: HashSet<NameHash> = [NameHash(2), NameHash(4)].into_iter().collect();

    store.retain_only(&keep).unwrap();

    assert_eq!(names(&store), vec![2, 4]);
    assert_eq!(&store.as_bytes()[..module_size], &original[module_size..2 * module_size]);
    assert_eq!(&store.as_bytes()[module_size..], &original[3 * module_size..4 * module_size]);
}

#[test]
fn test_retain_only_empty_set_clears_store() {
    let mut store = store_with_modules(3);

    let removed = store.retain_only(&HashSet::new()).unwrap();

    assert_eq!(removed, 3);
    assert!(store.is_empty());
}

#[test]
fn test_retain_only_corruption_leaves_buffer_unchanged() {
    let mut buf = encode_module(1, &[]);
    buf.extend(encode_module(2, &[]));
    let len = buf.len();
    buf[len - 2] = 0x42;
    let mut store = ModuleStore::from_bytes(buf.clone());

    let result = store.retain_only(&HashSet::new());

    assert!(matches!(result, Err(StoreError::CorruptedStore { .. })));
    assert_eq!(store.as_bytes(), buf.as_slice());
}
