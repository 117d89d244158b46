//! Namespace mapping engine.
//!
//! Turns a flat list of process-variable names and a set of declarative
//! mapping rules into a folder tree with variable nodes.
//!
//! ## Architecture
//!
//! ```text
//! mapping.toml ──parse──> MappingConfig ──> MappingRuleStore
//!                                              │
//! process variable ──> VariableBinder ─────────┘
//!                          │
//!                          ├─> FolderRegistry ──> AddressSpace::create_folder_node
//!                          └─────────────────────> AddressSpace::create_variable_node
//! ```
//!
//! - **document**: parsing of the mapping document, no address space access
//! - **store**: read-only rule lookup by source variable name
//! - **registry**: idempotent, prefix-sharing folder creation
//! - **root**: the root folder with its `Variables`/`Constants` containers
//! - **binder**: rule interpretation and variable node requests

pub mod additional;
pub mod binder;
pub mod document;
pub mod error;
pub mod registry;
pub mod root;
pub mod rule;
pub mod store;

pub use additional::{AdditionalFolder, AdditionalVariable};
pub use binder::{Placement, VariableBinder, VariableBinding};
pub use document::{LoginSettings, MappingConfig, RootSettings, ServerSettings};
pub use error::{CsaError, MappingError, Result};
pub use registry::{FolderNode, FolderRegistry};
pub use root::NamespaceRoot;
pub use rule::{MappingRule, UnrollSpec};
pub use store::MappingRuleStore;
