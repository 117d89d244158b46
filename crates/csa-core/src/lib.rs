//! Core types for the control-system OPC UA adapter.
//!
//! This crate defines the foundational abstractions shared by the mapping
//! engine, the adapter and the command-line tool:
//!
//! - **Node handles** and the [`AddressSpace`] trait through which folders and
//!   variable nodes are requested from the protocol stack
//! - **Path utilities** for turning delimited strings into folder segments
//! - **Process variables** and the sources that enumerate them
//! - The unified [`Error`] type and configuration defaults

pub mod config;
pub mod error;
pub mod handle;
pub mod path;
pub mod space;
pub mod variable;

pub use error::{Error, Result};
pub use handle::NodeHandle;
pub use path::{split_path, DEFAULT_SEPARATOR};
pub use space::{AddressSpace, MemoryAddressSpace, NodeKind, NodeRecord, VariableNode};
pub use variable::{
    Direction, FileVariableSource, ProcessVariable, StaticVariableSource, VariableSource,
};

/// Re-exports commonly used types.
pub mod prelude {
    pub use crate::config::{defaults, env_vars};
    pub use crate::error::{Error, Result};
    pub use crate::handle::NodeHandle;
    pub use crate::path::split_path;
    pub use crate::space::{AddressSpace, MemoryAddressSpace, VariableNode};
    pub use crate::variable::{Direction, ProcessVariable, VariableSource};
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
