//! Additional nodes: static folders and values declared in the mapping
//! document rather than exported by the control system.

use serde::{Deserialize, Serialize};

/// A folder below the namespace root holding static variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalFolder {
    #[serde(default)]
    pub folder_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "variable")]
    pub variables: Vec<AdditionalVariable>,
}

/// A static variable with a fixed value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalVariable {
    pub browse_name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub description: String,
}

impl AdditionalFolder {
    pub fn new(folder_name: impl Into<String>) -> Self {
        Self {
            folder_name: folder_name.into(),
            ..Default::default()
        }
    }

    pub fn with_variable(
        mut self,
        browse_name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.variables.push(AdditionalVariable {
            browse_name: browse_name.into(),
            value: value.into(),
            description: String::new(),
        });
        self
    }
}
