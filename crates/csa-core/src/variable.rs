//! Process variables and the sources that enumerate them.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Data flow direction of a process variable.
///
/// The mapping engine does not interpret the direction; it is carried along
/// for the protocol stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    DeviceToControl,
    ControlToDevice,
}

/// A named signal exported by the control system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessVariable {
    pub name: String,
    #[serde(default)]
    pub direction: Direction,
    /// Current value, used for constants.
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub constant: bool,
}

impl ProcessVariable {
    pub fn new(name: impl Into<String>, direction: Direction) -> Self {
        Self {
            name: name.into(),
            direction,
            value: None,
            constant: false,
        }
    }

    /// A constant with a fixed value.
    pub fn constant(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            direction: Direction::DeviceToControl,
            value: Some(value.into()),
            constant: true,
        }
    }
}

/// Supplies the process variables to expose.
pub trait VariableSource {
    fn process_variables(&self) -> Result<Vec<ProcessVariable>>;
}

/// A fixed, in-memory list of process variables.
#[derive(Debug, Clone, Default)]
pub struct StaticVariableSource {
    variables: Vec<ProcessVariable>,
}

impl StaticVariableSource {
    pub fn new(variables: Vec<ProcessVariable>) -> Self {
        Self { variables }
    }

    pub fn push(&mut self, variable: ProcessVariable) {
        self.variables.push(variable);
    }
}

impl VariableSource for StaticVariableSource {
    fn process_variables(&self) -> Result<Vec<ProcessVariable>> {
        Ok(self.variables.clone())
    }
}

#[derive(Debug, Deserialize)]
struct VariableFile {
    #[serde(default, rename = "variable")]
    variables: Vec<ProcessVariable>,
}

/// Reads process variables from a TOML file of `[[variable]]` tables.
///
/// ```toml
/// [[variable]]
/// name = "Ist/Name/dieser/int32Scalar"
/// direction = "control_to_device"
///
/// [[variable]]
/// name = "version"
/// constant = true
/// value = "1.2"
/// ```
#[derive(Debug, Clone)]
pub struct FileVariableSource {
    path: PathBuf,
}

impl FileVariableSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Parse variables from TOML text.
    pub fn parse(content: &str) -> Result<Vec<ProcessVariable>> {
        let file: VariableFile = toml::from_str(content)?;
        if let Some(bad) = file.variables.iter().find(|v| v.name.is_empty()) {
            return Err(Error::Validation(format!(
                "process variable without a name (direction {:?})",
                bad.direction
            )));
        }
        Ok(file.variables)
    }
}

impl VariableSource for FileVariableSource {
    fn process_variables(&self) -> Result<Vec<ProcessVariable>> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            Error::Io(format!("{}: {}", self.path.display(), e))
        })?;
        let variables = Self::parse(&content)?;
        tracing::debug!(
            category = "variables",
            path = %self.path.display(),
            count = variables.len(),
            "Loaded process variables"
        );
        Ok(variables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variable_file() {
        let content = r#"
            [[variable]]
            name = "intA"

            [[variable]]
            name = "intB"
            direction = "control_to_device"

            [[variable]]
            name = "version"
            constant = true
            value = "1.2"
        "#;

        let vars = FileVariableSource::parse(content).unwrap();
        assert_eq!(vars.len(), 3);
        assert_eq!(vars[0].direction, Direction::DeviceToControl);
        assert_eq!(vars[1].direction, Direction::ControlToDevice);
        assert!(vars[2].constant);
        assert_eq!(vars[2].value.as_deref(), Some("1.2"));
    }

    #[test]
    fn test_parse_rejects_unnamed_variable() {
        let result = FileVariableSource::parse("[[variable]]\nname = \"\"\n");
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_parse_empty_file() {
        assert!(FileVariableSource::parse("").unwrap().is_empty());
    }

    #[test]
    fn test_static_source() {
        let mut source = StaticVariableSource::default();
        source.push(ProcessVariable::new("intA", Direction::DeviceToControl));
        source.push(ProcessVariable::constant("pi", "3.14"));
        assert_eq!(source.process_variables().unwrap().len(), 2);
    }
}
