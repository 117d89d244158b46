//! Configuration defaults and helpers shared across crates.
//!
//! Keeps the default values and environment variable names in one place so
//! the mapping document parser, the adapter and the CLI agree on them.

use std::path::PathBuf;

/// Default values used when the mapping document leaves a setting out.
pub mod defaults {
    /// Display name of the top-level root folder.
    pub const ROOT_FOLDER: &str = "DefaultRootFolder";
    /// Description of the top-level root folder.
    pub const ROOT_DESCRIPTION: &str = "";
    /// OPC UA port the protocol server listens on.
    pub const OPCUA_PORT: u16 = 16664;
    /// Application name announced by the protocol server.
    pub const APPLICATION_NAME: &str = "ControlSystemAdapterOPCUA";
    /// Container holding variables no rule maps.
    pub const VARIABLES_FOLDER: &str = "Variables";
    /// Container holding constants.
    pub const CONSTANTS_FOLDER: &str = "Constants";
    /// Mapping document looked up in the working directory.
    pub const CONFIG_FILE: &str = "uamapping.toml";
}

/// Environment variable names.
pub mod env_vars {
    /// Path to the mapping document.
    pub const CONFIG: &str = "CSA_CONFIG";
    /// Emit JSON log lines when set to `true`.
    pub const LOG_JSON: &str = "CSA_LOG_JSON";
}

/// Resolve the mapping document path.
///
/// Priority: explicit path > `CSA_CONFIG` > `uamapping.toml`.
pub fn resolve_config_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| std::env::var(env_vars::CONFIG).ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(defaults::CONFIG_FILE))
}

/// Whether JSON log output was requested through the environment.
pub fn json_logging_requested() -> bool {
    std::env::var(env_vars::LOG_JSON)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_path_wins() {
        let path = resolve_config_path(Some(PathBuf::from("/etc/csa/mapping.toml")));
        assert_eq!(path, PathBuf::from("/etc/csa/mapping.toml"));
    }

    #[test]
    fn test_default_folder_names() {
        assert_eq!(defaults::VARIABLES_FOLDER, "Variables");
        assert_eq!(defaults::CONSTANTS_FOLDER, "Constants");
        assert!(defaults::OPCUA_PORT > 0);
    }
}
