//! Folder Registry - the folder tree of the address space
//!
//! Every folder the mapping engine needs goes through this registry. It asks
//! the [`AddressSpace`] for a node only when no folder with the same name
//! exists below the same parent, so repeated and overlapping paths share
//! their common prefix:
//!
//! ```text
//! create_path(app, [A, B, C])   creates A, B, C
//! create_path(app, [A, B, D])   reuses A, B; creates D
//! create_path(app, [A, B, D])   creates nothing
//! ```
//!
//! An invalid base handle is not an error: lookups and creations return
//! `None`, and every caller must check for it.

use csa_core::{AddressSpace, NodeHandle};
use std::collections::HashMap;
use tracing::debug;

/// A folder created through the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderNode {
    pub id: NodeHandle,
    pub name: String,
    pub parent: NodeHandle,
    pub description: String,
}

/// Address-space folder tree with a `(parent, name)` index.
///
/// The registry has no internal locking. Mutations after startup must be
/// serialised by the owner.
#[derive(Debug)]
pub struct FolderRegistry<A> {
    space: A,
    folders: Vec<FolderNode>,
    by_id: HashMap<NodeHandle, usize>,
    /// parent -> name -> folder
    children: HashMap<NodeHandle, HashMap<String, NodeHandle>>,
}

impl<A: AddressSpace> FolderRegistry<A> {
    pub fn new(space: A) -> Self {
        Self {
            space,
            folders: Vec::new(),
            by_id: HashMap::new(),
            children: HashMap::new(),
        }
    }

    /// Folder named `name` directly below `parent`.
    pub fn exists(&self, parent: NodeHandle, name: &str) -> Option<NodeHandle> {
        self.children
            .get(&parent)
            .and_then(|siblings| siblings.get(name))
            .copied()
    }

    /// Walk `segments` below `base`. `None` as soon as a segment is missing
    /// or when `base` is invalid.
    pub fn exists_path<S: AsRef<str>>(&self, base: NodeHandle, segments: &[S]) -> Option<NodeHandle> {
        if !self.space.is_valid(base) {
            return None;
        }
        segments
            .iter()
            .try_fold(base, |parent, segment| self.exists(parent, segment.as_ref()))
    }

    /// Ensure the folder path `segments` exists below `base` and return its
    /// last folder.
    ///
    /// The longest existing prefix is reused; only the remaining suffix is
    /// created. An empty path returns `base`.
    pub fn create_path<S: AsRef<str>>(&mut self, base: NodeHandle, segments: &[S]) -> Option<NodeHandle> {
        if !self.space.is_valid(base) {
            return None;
        }

        let mut current = base;
        let mut matched = 0;
        for segment in segments {
            match self.exists(current, segment.as_ref()) {
                Some(folder) => {
                    current = folder;
                    matched += 1;
                }
                None => break,
            }
        }

        for segment in &segments[matched..] {
            current = self.create_folder(current, segment.as_ref(), "")?;
        }
        Some(current)
    }

    /// Return the folder `name` below `base`, creating it if needed.
    ///
    /// On a repeated call the existing folder is returned and `description`
    /// is ignored.
    pub fn create_folder(&mut self, base: NodeHandle, name: &str, description: &str) -> Option<NodeHandle> {
        if !self.space.is_valid(base) {
            return None;
        }
        if let Some(existing) = self.exists(base, name) {
            return Some(existing);
        }

        let id = self.space.create_folder_node(base, name, description);
        if id.is_null() {
            debug!(category = "namespace", parent = %base, folder = name, "Folder node was not created");
            return None;
        }

        debug!(category = "namespace", parent = %base, folder = name, id = %id, "Created folder");
        self.children
            .entry(base)
            .or_default()
            .insert(name.to_string(), id);
        self.by_id.insert(id, self.folders.len());
        self.folders.push(FolderNode {
            id,
            name: name.to_string(),
            parent: base,
            description: description.to_string(),
        });
        Some(id)
    }

    /// Look up a registered folder.
    pub fn get(&self, id: NodeHandle) -> Option<&FolderNode> {
        self.by_id.get(&id).map(|&i| &self.folders[i])
    }

    /// Registered folders in creation order.
    pub fn folders(&self) -> &[FolderNode] {
        &self.folders
    }

    pub fn len(&self) -> usize {
        self.folders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    pub fn space(&self) -> &A {
        &self.space
    }

    pub fn space_mut(&mut self) -> &mut A {
        &mut self.space
    }

    pub fn into_space(self) -> A {
        self.space
    }
}
