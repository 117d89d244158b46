//! Node-creation boundary towards the protocol stack.
//!
//! The mapping engine never talks to an OPC UA server directly. It asks an
//! [`AddressSpace`] for folder and variable nodes and keeps the returned
//! handles. [`MemoryAddressSpace`] records every request in memory; it backs
//! the tests and the `build` command of the CLI.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Write as _;

use crate::handle::NodeHandle;

/// Handle of the protocol server's `Objects` folder (ns=0;i=85 in OPC UA).
pub const OBJECTS_FOLDER: NodeHandle = NodeHandle::new(85);

/// First handle handed out for created nodes.
const FIRST_NODE_HANDLE: u32 = 1000;

/// A variable node creation request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableNode {
    /// Name shown in the address space.
    pub display_name: String,
    /// Process variable backing the node.
    pub variable_name: String,
    /// Engineering unit, empty when unknown.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub unit: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Fixed value for constants and additional nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl VariableNode {
    pub fn new(display_name: impl Into<String>, variable_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            variable_name: variable_name.into(),
            ..Default::default()
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// Node-creation collaborator supplied by the protocol stack.
///
/// Implementations return [`NodeHandle::NULL`] when a node cannot be
/// created; callers must not record such a node.
pub trait AddressSpace {
    /// Container under which the adapter's root folder is created.
    fn base_folder(&self) -> NodeHandle;

    /// Create a folder node below `parent`.
    fn create_folder_node(&mut self, parent: NodeHandle, name: &str, description: &str)
        -> NodeHandle;

    /// Create a variable node below `parent`.
    fn create_variable_node(&mut self, parent: NodeHandle, node: &VariableNode) -> NodeHandle;

    /// Whether `handle` may be used as a parent.
    fn is_valid(&self, handle: NodeHandle) -> bool {
        !handle.is_null()
    }
}

/// Kind of a recorded node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeKind {
    Folder,
    Variable(VariableNode),
}

/// A node held by [`MemoryAddressSpace`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub handle: NodeHandle,
    pub parent: Option<NodeHandle>,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(flatten)]
    pub kind: NodeKind,
}

/// In-memory address space.
#[derive(Debug, Clone)]
pub struct MemoryAddressSpace {
    nodes: Vec<NodeRecord>,
    index: HashMap<NodeHandle, usize>,
    /// parent -> child indices, in creation order
    children: HashMap<NodeHandle, Vec<usize>>,
    next_handle: u32,
    requests: usize,
}

impl MemoryAddressSpace {
    /// Create an address space holding only the `Objects` folder.
    pub fn new() -> Self {
        let objects = NodeRecord {
            handle: OBJECTS_FOLDER,
            parent: None,
            name: "Objects".to_string(),
            description: String::new(),
            kind: NodeKind::Folder,
        };
        let mut index = HashMap::new();
        index.insert(OBJECTS_FOLDER, 0);

        Self {
            nodes: vec![objects],
            index,
            children: HashMap::new(),
            next_handle: FIRST_NODE_HANDLE,
            requests: 0,
        }
    }

    /// Look up a node by handle.
    pub fn get(&self, handle: NodeHandle) -> Option<&NodeRecord> {
        self.index.get(&handle).map(|&i| &self.nodes[i])
    }

    /// Direct children of `parent`, in creation order.
    pub fn children(&self, parent: NodeHandle) -> Vec<&NodeRecord> {
        self.children
            .get(&parent)
            .map(|indices| indices.iter().map(|&i| &self.nodes[i]).collect())
            .unwrap_or_default()
    }

    /// Child of `parent` named `name`.
    pub fn find_child(&self, parent: NodeHandle, name: &str) -> Option<&NodeRecord> {
        self.children
            .get(&parent)?
            .iter()
            .map(|&i| &self.nodes[i])
            .find(|n| n.name == name)
    }

    /// Resolve a chain of child names starting at `base`.
    pub fn resolve(&self, base: NodeHandle, names: &[&str]) -> Option<&NodeRecord> {
        let mut current = self.get(base)?;
        for name in names {
            current = self.find_child(current.handle, name)?;
        }
        Some(current)
    }

    /// Number of folders, the `Objects` folder excluded.
    pub fn folder_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n.kind, NodeKind::Folder))
            .count()
            - 1
    }

    pub fn variable_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n.kind, NodeKind::Variable(_)))
            .count()
    }

    /// Every creation request received, including failed ones.
    pub fn requests(&self) -> usize {
        self.requests
    }

    /// All nodes in creation order.
    pub fn nodes(&self) -> &[NodeRecord] {
        &self.nodes
    }

    /// Render the subtree below `root` as indented text.
    pub fn render_tree(&self, root: NodeHandle) -> String {
        let mut out = String::new();
        if let Some(node) = self.get(root) {
            self.render_node(node, 0, &mut out);
        }
        out
    }

    fn render_node(&self, node: &NodeRecord, depth: usize, out: &mut String) {
        let indent = "  ".repeat(depth);
        match &node.kind {
            NodeKind::Folder => {
                let _ = writeln!(out, "{}{}/", indent, node.name);
            }
            NodeKind::Variable(var) => {
                let _ = write!(out, "{}{} <- {}", indent, node.name, var.variable_name);
                if !var.unit.is_empty() {
                    let _ = write!(out, " [{}]", var.unit);
                }
                if let Some(value) = &var.value {
                    let _ = write!(out, " = {}", value);
                }
                out.push('\n');
            }
        }
        for child in self.children(node.handle) {
            self.render_node(child, depth + 1, out);
        }
    }

    fn insert(&mut self, parent: NodeHandle, name: &str, description: &str, kind: NodeKind) -> NodeHandle {
        self.requests += 1;
        if !self.index.contains_key(&parent) {
            return NodeHandle::NULL;
        }
        if let Some(p) = self.get(parent) {
            if !matches!(p.kind, NodeKind::Folder) {
                return NodeHandle::NULL;
            }
        }
        // Browse names are unique among siblings.
        if self.find_child(parent, name).is_some() {
            return NodeHandle::NULL;
        }

        let handle = NodeHandle::new(self.next_handle);
        self.next_handle += 1;
        let position = self.nodes.len();
        self.index.insert(handle, position);
        self.children.entry(parent).or_default().push(position);
        self.nodes.push(NodeRecord {
            handle,
            parent: Some(parent),
            name: name.to_string(),
            description: description.to_string(),
            kind,
        });
        handle
    }
}

impl Default for MemoryAddressSpace {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressSpace for MemoryAddressSpace {
    fn base_folder(&self) -> NodeHandle {
        OBJECTS_FOLDER
    }

    fn create_folder_node(
        &mut self,
        parent: NodeHandle,
        name: &str,
        description: &str,
    ) -> NodeHandle {
        self.insert(parent, name, description, NodeKind::Folder)
    }

    fn create_variable_node(&mut self, parent: NodeHandle, node: &VariableNode) -> NodeHandle {
        self.insert(
            parent,
            &node.display_name,
            &node.description,
            NodeKind::Variable(node.clone()),
        )
    }

    fn is_valid(&self, handle: NodeHandle) -> bool {
        !handle.is_null() && self.index.contains_key(&handle)
    }
}
