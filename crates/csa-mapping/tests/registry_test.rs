//! Tests for FolderRegistry path handling

use csa_core::{AddressSpace, MemoryAddressSpace, NodeHandle, VariableNode};
use csa_mapping::FolderRegistry;

fn setup() -> (FolderRegistry<MemoryAddressSpace>, NodeHandle) {
    let mut registry = FolderRegistry::new(MemoryAddressSpace::new());
    let base = registry.space().base_folder();
    let own = registry.create_folder(base, "Adapter", "").unwrap();
    (registry, own)
}

#[test]
fn test_create_path_is_idempotent() {
    let (mut registry, own) = setup();

    let first = registry.create_path(own, &["test", "test"]).unwrap();
    let folders = registry.len();
    let requests = registry.space().requests();

    let second = registry.create_path(own, &["test", "test"]).unwrap();
    assert_eq!(first, second);
    assert_eq!(registry.len(), folders);
    assert_eq!(registry.space().requests(), requests);
}

#[test]
fn test_prefix_sharing() {
    let (mut registry, own) = setup();
    let before = registry.len();

    let c = registry.create_path(own, &["A", "B", "C"]).unwrap();
    let d = registry.create_path(own, &["A", "B", "D"]).unwrap();

    assert_ne!(c, d);
    assert_eq!(registry.len() - before, 4);

    let b = registry.exists_path(own, &["A", "B"]).unwrap();
    assert_eq!(registry.get(c).unwrap().parent, b);
    assert_eq!(registry.get(d).unwrap().parent, b);
}

#[test]
fn test_partial_path_is_completed() {
    let (mut registry, own) = setup();
    registry.create_path(own, &["test", "test"]).unwrap();
    let before = registry.len();

    let leaf = registry.create_path(own, &["test", "test1"]).unwrap();

    assert_eq!(registry.len(), before + 1);
    assert_eq!(registry.exists_path(own, &["test", "test1"]), Some(leaf));
}

#[test]
fn test_exists_before_and_after_creation() {
    let (mut registry, own) = setup();
    let path = csa_core::split_path("/test/test/", "/");

    assert_eq!(registry.exists_path(own, &path), None);
    let created = registry.create_path(own, &path).unwrap();
    assert_eq!(registry.exists_path(own, &path), Some(created));
}

#[test]
fn test_exists_path_stops_at_missing_segment() {
    let (mut registry, own) = setup();
    registry.create_path(own, &["a", "b"]).unwrap();

    assert_eq!(registry.exists_path(own, &["a", "x", "b"]), None);
    assert!(registry.exists_path(own, &["a"]).is_some());
}

#[test]
fn test_invalid_base_short_circuits() {
    let (mut registry, _) = setup();
    let requests = registry.space().requests();

    assert_eq!(registry.create_path(NodeHandle::NULL, &["a", "b"]), None);
    assert_eq!(registry.exists_path(NodeHandle::NULL, &["a", "b"]), None);
    assert_eq!(registry.space().requests(), requests);
}

#[test]
fn test_get_by_id() {
    let (mut registry, own) = setup();
    let leaf = registry.create_path(own, &["x", "y", "z"]).unwrap();

    let node = registry.get(leaf).unwrap();
    assert_eq!(node.name, "z");
    assert_eq!(registry.get(node.parent).unwrap().name, "y");
    assert_eq!(registry.get(own).unwrap().name, "Adapter");
    assert!(registry.get(NodeHandle::new(4242)).is_none());
}

#[test]
fn test_folder_blocked_by_variable_is_not_recorded() {
    let (mut registry, own) = setup();
    registry
        .space_mut()
        .create_variable_node(own, &VariableNode::new("a", "a"));
    let folders = registry.len();

    assert_eq!(registry.create_path(own, &["a", "b"]), None);
    assert_eq!(registry.exists(own, "a"), None);
    assert_eq!(registry.len(), folders);
}

/// Address space that refuses folders with a given name.
struct RefusingSpace {
    inner: MemoryAddressSpace,
    refuse: &'static str,
}

impl AddressSpace for RefusingSpace {
    fn base_folder(&self) -> NodeHandle {
        self.inner.base_folder()
    }

    fn create_folder_node(&mut self, parent: NodeHandle, name: &str, description: &str) -> NodeHandle {
        if name == self.refuse {
            return NodeHandle::NULL;
        }
        self.inner.create_folder_node(parent, name, description)
    }

    fn create_variable_node(&mut self, parent: NodeHandle, node: &VariableNode) -> NodeHandle {
        self.inner.create_variable_node(parent, node)
    }

    fn is_valid(&self, handle: NodeHandle) -> bool {
        self.inner.is_valid(handle)
    }
}

#[test]
fn test_refused_folder_is_not_recorded() {
    let space = RefusingSpace {
        inner: MemoryAddressSpace::new(),
        refuse: "broken",
    };
    let mut registry = FolderRegistry::new(space);
    let base = registry.space().base_folder();

    assert_eq!(registry.create_path(base, &["ok", "broken", "leaf"]), None);

    // "ok" was created and is reused; nothing below the refused folder exists
    assert_eq!(registry.len(), 1);
    assert!(registry.exists(base, "ok").is_some());
    let ok = registry.exists(base, "ok").unwrap();
    assert_eq!(registry.exists(ok, "broken"), None);
}
