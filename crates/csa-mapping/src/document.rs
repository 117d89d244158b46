//! Mapping document parsing.
//!
//! Turns the TOML mapping document into plain values: root settings, server
//! settings, [`MappingRule`]s and additional nodes. Nothing here touches the
//! address space; interpretation happens in the binder.
//!
//! ```toml
//! [config]
//! root_folder = "ControlSystem"
//!
//! [config.server]
//! port = 16664
//!
//! [[application]]
//! name = "Test"
//!
//! [[application.map]]
//! source_variable_name = "Ist/Name/dieser/int32Scalar"
//! unroll_path = { separator = "/" }
//! ```

use csa_core::config::defaults;
use csa_core::path::{split_path, DEFAULT_SEPARATOR};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

use crate::additional::AdditionalFolder;
use crate::error::{MappingError, Result};
use crate::rule::{MappingRule, UnrollSpec};

/// Root folder settings (`[config]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootSettings {
    #[serde(default = "default_root_folder")]
    pub root_folder: String,
    #[serde(default)]
    pub description: String,
    /// List every variable under `Variables`, mapped or not.
    #[serde(default)]
    pub mirror_variables: bool,
}

fn default_root_folder() -> String {
    defaults::ROOT_FOLDER.to_string()
}

impl Default for RootSettings {
    fn default() -> Self {
        Self {
            root_folder: default_root_folder(),
            description: defaults::ROOT_DESCRIPTION.to_string(),
            mirror_variables: false,
        }
    }
}

/// Protocol server settings (`[config.server]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_application_name")]
    pub application_name: String,
}

fn default_port() -> u16 {
    defaults::OPCUA_PORT
}

fn default_application_name() -> String {
    defaults::APPLICATION_NAME.to_string()
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: default_port(),
            application_name: default_application_name(),
        }
    }
}

/// Username/password login (`[config.login]`). Anonymous login when absent.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginSettings {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for LoginSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginSettings")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigSection {
    #[serde(flatten)]
    root: RootSettings,
    #[serde(default)]
    server: ServerSettings,
    #[serde(default)]
    login: Option<LoginSettings>,
}

#[derive(Debug, Deserialize)]
struct ApplicationSection {
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    map: Vec<MapSection>,
}

#[derive(Debug, Deserialize)]
struct MapSection {
    #[serde(default)]
    source_variable_name: String,
    #[serde(default)]
    rename: Option<String>,
    #[serde(default)]
    engineering_unit: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    folders: Vec<String>,
    #[serde(default)]
    unroll_path: Option<UnrollSpec>,
}

#[derive(Debug, Deserialize)]
struct Document {
    #[serde(default)]
    config: ConfigSection,
    #[serde(default)]
    application: Vec<ApplicationSection>,
    #[serde(default)]
    additional_nodes: Vec<AdditionalFolder>,
}

/// A parsed and validated mapping document.
#[derive(Debug, Clone, Default)]
pub struct MappingConfig {
    pub root: RootSettings,
    pub server: ServerSettings,
    pub login: Option<LoginSettings>,
    /// Rules in document order.
    pub rules: Vec<MappingRule>,
    pub additional_nodes: Vec<AdditionalFolder>,
}

impl MappingConfig {
    /// Read and parse a mapping document from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        debug!(
            category = "config",
            path = %path.display(),
            rules = config.rules.len(),
            "Loaded mapping document"
        );
        Ok(config)
    }

    /// Parse a mapping document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let document: Document = toml::from_str(content)?;
        Self::from_document(document)
    }

    fn from_document(document: Document) -> Result<Self> {
        let mut rules = Vec::new();

        for (app_index, app) in document.application.into_iter().enumerate() {
            if app.name.trim().is_empty() {
                return Err(MappingError::Validation(format!(
                    "application #{} has no name",
                    app_index + 1
                )));
            }

            for (map_index, map) in app.map.into_iter().enumerate() {
                if map.source_variable_name.is_empty() {
                    return Err(MappingError::Validation(format!(
                        "map #{} in application '{}' has no source_variable_name",
                        map_index + 1,
                        app.name
                    )));
                }

                if let Some(unroll) = &map.unroll_path {
                    if unroll.enabled && unroll.separator.is_empty() {
                        warn!(
                            category = "config",
                            variable = %map.source_variable_name,
                            "Unroll enabled without a separator, the variable name is kept as leaf"
                        );
                    }
                }

                rules.push(MappingRule {
                    source_variable_name: map.source_variable_name,
                    application_name: app.name.clone(),
                    application_description: app.description.clone(),
                    rename: non_empty(map.rename),
                    engineering_unit: non_empty(map.engineering_unit),
                    description: non_empty(map.description),
                    folders: map
                        .folders
                        .iter()
                        .map(|f| split_path(f, DEFAULT_SEPARATOR))
                        .collect(),
                    unroll: map.unroll_path,
                });
            }
        }

        let additional_nodes = document
            .additional_nodes
            .into_iter()
            .filter(|folder| {
                if folder.folder_name.is_empty() {
                    warn!(
                        category = "config",
                        "Additional nodes without folder_name are skipped"
                    );
                    false
                } else {
                    true
                }
            })
            .collect();

        Ok(Self {
            root: document.config.root,
            server: document.config.server,
            login: document.config.login,
            rules,
            additional_nodes,
        })
    }

    /// Distinct application names in document order.
    pub fn application_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for rule in &self.rules {
            if !names.contains(&rule.application_name.as_str()) {
                names.push(&rule.application_name);
            }
        }
        names
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
