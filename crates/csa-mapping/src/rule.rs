//! Mapping rules.

use csa_core::path::{split_path, DEFAULT_SEPARATOR};
use serde::{Deserialize, Serialize};

/// Path unrolling: the source variable name is split into folders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnrollSpec {
    #[serde(default = "default_unroll_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub separator: String,
}

fn default_unroll_enabled() -> bool {
    true
}

impl UnrollSpec {
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            enabled: true,
            separator: separator.into(),
        }
    }
}

/// One declarative binding of a process variable into the address space.
///
/// Several rules may share a `source_variable_name`; each of them places the
/// variable at its own location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingRule {
    /// Exact name of the process variable this rule applies to.
    pub source_variable_name: String,
    /// Folder directly below the namespace root grouping the rule's nodes.
    pub application_name: String,
    /// Description given to the application folder if this rule creates it.
    #[serde(default)]
    pub application_description: String,
    /// Overrides the displayed name.
    #[serde(default)]
    pub rename: Option<String>,
    #[serde(default)]
    pub engineering_unit: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Declared folder paths, already split into segments. Each entry is a
    /// separate location for the variable.
    #[serde(default)]
    pub folders: Vec<Vec<String>>,
    #[serde(default)]
    pub unroll: Option<UnrollSpec>,
}

impl MappingRule {
    pub fn new(source_variable_name: impl Into<String>, application_name: impl Into<String>) -> Self {
        Self {
            source_variable_name: source_variable_name.into(),
            application_name: application_name.into(),
            application_description: String::new(),
            rename: None,
            engineering_unit: None,
            description: None,
            folders: Vec::new(),
            unroll: None,
        }
    }

    pub fn with_rename(mut self, rename: impl Into<String>) -> Self {
        self.rename = Some(rename.into());
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.engineering_unit = Some(unit.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a folder path such as `"/plant/line1"`.
    pub fn with_folder(mut self, path: &str) -> Self {
        self.folders.push(split_path(path, DEFAULT_SEPARATOR));
        self
    }

    pub fn with_unroll(mut self, separator: impl Into<String>) -> Self {
        self.unroll = Some(UnrollSpec::new(separator));
        self
    }

    /// Whether the source variable name is unrolled into folders.
    pub fn unrolls(&self) -> bool {
        self.unroll.as_ref().is_some_and(|u| u.enabled)
    }

    /// The rename, if set and non-empty.
    pub fn effective_rename(&self) -> Option<&str> {
        self.rename.as_deref().filter(|r| !r.is_empty())
    }

    /// Segments contributed by unrolling `variable_name`.
    pub fn unroll_segments(&self, variable_name: &str) -> Vec<String> {
        match &self.unroll {
            Some(spec) if spec.enabled && !spec.separator.is_empty() => {
                split_path(variable_name, &spec.separator)
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let rule = MappingRule::new("int8Scalar", "Test")
            .with_rename("renamed")
            .with_unit("V")
            .with_folder("/a/b/")
            .with_unroll("/");

        assert_eq!(rule.effective_rename(), Some("renamed"));
        assert_eq!(rule.folders, vec![vec!["a".to_string(), "b".to_string()]]);
        assert!(rule.unrolls());
    }

    #[test]
    fn test_empty_rename_is_ignored() {
        let rule = MappingRule::new("x", "App").with_rename("");
        assert_eq!(rule.effective_rename(), None);
    }

    #[test]
    fn test_unroll_segments() {
        let rule = MappingRule::new("a/b/c", "App").with_unroll("/");
        assert_eq!(rule.unroll_segments("a/b/c"), vec!["a", "b", "c"]);

        let plain = MappingRule::new("a/b/c", "App");
        assert!(plain.unroll_segments("a/b/c").is_empty());
    }

    #[test]
    fn test_unroll_without_separator_contributes_nothing() {
        let rule = MappingRule::new("a/b/c", "App").with_unroll("");
        assert!(rule.unrolls());
        assert!(rule.unroll_segments("a/b/c").is_empty());
    }
}
