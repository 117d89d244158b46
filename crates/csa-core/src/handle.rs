//! Opaque node handles.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle of a node in the protocol server's address space.
///
/// Handles are assigned by the [`AddressSpace`](crate::AddressSpace)
/// implementation; the mapping engine only compares and stores them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeHandle(u32);

impl NodeHandle {
    /// The null handle. Never refers to a node.
    pub const NULL: NodeHandle = NodeHandle(0);

    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl Default for NodeHandle {
    fn default() -> Self {
        Self::NULL
    }
}

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ns=1;i={}", self.0)
    }
}
