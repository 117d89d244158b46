//! Control-system OPC UA adapter.
//!
//! Wires the mapping engine to a process-variable source and an address
//! space, and holds the result for the lifetime of the protocol server.
//!
//! ## Example
//!
//! ```rust,no_run
//! use csa_adapter::{shutdown_signal, Adapter};
//! use csa_core::{FileVariableSource, MemoryAddressSpace};
//! use csa_mapping::MappingConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = MappingConfig::load("uamapping.toml")?;
//!     let adapter = Adapter::new(config, MemoryAddressSpace::new())?;
//!     adapter.register_all(&FileVariableSource::new("variables.toml"))?;
//!
//!     adapter.run_until(shutdown_signal()).await;
//!     Ok(())
//! }
//! ```

pub mod adapter;
pub mod error;
pub mod shutdown;

pub use adapter::{Adapter, StartupReport};
pub use error::{AdapterError, Result};
pub use shutdown::shutdown_signal;
