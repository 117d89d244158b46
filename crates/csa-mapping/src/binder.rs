//! Variable Binder - places process variables into the address space
//!
//! For every rule matching a variable the binder resolves the application
//! folder, works out the display name and folder path(s), lets the
//! [`FolderRegistry`] create what is missing and requests the variable node.
//!
//! Name and path resolution, in order of precedence:
//!
//! | rename | unroll | display name | folder path |
//! |--------|--------|--------------|-------------|
//! | set | any | rename | folders + all unrolled segments |
//! | empty | on | last unrolled segment | folders + unrolled segments without the last |
//! | empty | off | variable name | folders |
//!
//! A rule with several declared folders places the variable once per folder.
//! With unrolling on, an empty declared folder ends the folder list.
//!
//! Binding is idempotent: a variable already placed keeps its nodes and a
//! repeated call returns the earlier bindings.

use csa_core::{AddressSpace, NodeHandle, ProcessVariable, VariableNode};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

use crate::additional::AdditionalFolder;
use crate::document::RootSettings;
use crate::error::Result;
use crate::registry::FolderRegistry;
use crate::root::NamespaceRoot;
use crate::rule::MappingRule;
use crate::store::MappingRuleStore;

/// The outcome of placing one variable at one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableBinding {
    pub variable_name: String,
    /// Application folder name; `None` for the default containers.
    pub application: Option<String>,
    pub target_folder: NodeHandle,
    /// Handle of the created variable node.
    pub node: NodeHandle,
    pub display_name: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub description: String,
}

/// Display name and folder paths resolved from one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub display_name: String,
    /// Folder paths relative to the application folder, one per location.
    pub paths: Vec<Vec<String>>,
}

impl Placement {
    pub fn resolve(rule: &MappingRule, variable_name: &str) -> Self {
        let mut unrolled = rule.unroll_segments(variable_name);

        let display_name = if let Some(rename) = rule.effective_rename() {
            rename.to_string()
        } else if rule.unrolls() {
            // The leaf is consumed as the name. Without segments (no
            // separator configured) the raw variable name is kept.
            unrolled.pop().unwrap_or_else(|| variable_name.to_string())
        } else {
            variable_name.to_string()
        };

        let folders: Vec<&Vec<String>> = if rule.unrolls() {
            rule.folders.iter().take_while(|f| !f.is_empty()).collect()
        } else {
            rule.folders.iter().collect()
        };

        let paths = if folders.is_empty() {
            vec![unrolled]
        } else {
            folders
                .into_iter()
                .map(|folder| folder.iter().chain(unrolled.iter()).cloned().collect())
                .collect()
        };

        Self { display_name, paths }
    }
}

/// Binds process variables according to the mapping rules.
#[derive(Debug)]
pub struct VariableBinder<A> {
    registry: FolderRegistry<A>,
    rules: MappingRuleStore,
    root: NamespaceRoot,
    bound: HashSet<String>,
    /// (container, variable name) -> index into `bindings`
    placed: HashMap<(NodeHandle, String), usize>,
    bindings: Vec<VariableBinding>,
}

impl<A: AddressSpace> VariableBinder<A> {
    /// Build the namespace root in `space` and prepare to bind.
    pub fn new(space: A, settings: &RootSettings, rules: MappingRuleStore) -> Result<Self> {
        let mut registry = FolderRegistry::new(space);
        let root = NamespaceRoot::build(&mut registry, settings)?;
        Ok(Self::from_parts(registry, root, rules))
    }

    /// Use a registry whose root was already built.
    pub fn from_parts(registry: FolderRegistry<A>, root: NamespaceRoot, rules: MappingRuleStore) -> Self {
        Self {
            registry,
            rules,
            root,
            bound: HashSet::new(),
            placed: HashMap::new(),
            bindings: Vec::new(),
        }
    }

    /// Place `variable_name` at every location its rules describe.
    ///
    /// Returns the bindings of the variable; empty when no rule matches or
    /// no location could be created. A variable that is already bound is
    /// not placed again.
    pub fn bind(&mut self, variable_name: &str) -> Vec<VariableBinding> {
        if self.bound.contains(variable_name) {
            debug!(category = "mapping", variable = %variable_name, "Variable already bound");
            return self
                .bindings
                .iter()
                .filter(|b| b.variable_name == variable_name && b.application.is_some())
                .cloned()
                .collect();
        }

        let Self {
            registry,
            rules,
            root,
            bound,
            bindings,
            ..
        } = self;

        let mut emitted = Vec::new();
        // (folder, display name) pairs placed by this call
        let mut taken: HashSet<(NodeHandle, String)> = HashSet::new();
        for rule in rules.find_rules_for(variable_name) {
            let Some(app) = registry.create_folder(
                root.root,
                &rule.application_name,
                &rule.application_description,
            ) else {
                warn!(
                    category = "mapping",
                    application = %rule.application_name,
                    "Cannot create application folder"
                );
                continue;
            };

            let placement = Placement::resolve(rule, variable_name);

            for path in &placement.paths {
                let Some(target) = registry.create_path(app, path) else {
                    warn!(
                        category = "mapping",
                        variable = %variable_name,
                        path = %path.join("/"),
                        "Cannot create folder path"
                    );
                    continue;
                };
                if !taken.insert((target, placement.display_name.clone())) {
                    continue;
                }

                let request = VariableNode::new(&placement.display_name, variable_name)
                    .with_unit(rule.engineering_unit.clone().unwrap_or_default())
                    .with_description(rule.description.clone().unwrap_or_default());
                let node = registry.space_mut().create_variable_node(target, &request);
                if node.is_null() {
                    warn!(
                        category = "mapping",
                        variable = %variable_name,
                        "Variable node was not created"
                    );
                    continue;
                }

                info!(
                    category = "mapping",
                    variable = %variable_name,
                    name = %placement.display_name,
                    application = %rule.application_name,
                    "Variable registered in application"
                );
                emitted.push(VariableBinding {
                    variable_name: variable_name.to_string(),
                    application: Some(rule.application_name.clone()),
                    target_folder: target,
                    node,
                    display_name: request.display_name,
                    unit: request.unit,
                    description: request.description,
                });
            }
        }

        if !emitted.is_empty() {
            bound.insert(variable_name.to_string());
        }
        bindings.extend(emitted.iter().cloned());
        emitted
    }

    /// Place a variable in the `Variables` container under its own name.
    /// Returns the existing binding when the variable is already there.
    pub fn bind_default(&mut self, variable: &ProcessVariable) -> Option<VariableBinding> {
        let folder = self.root.variables;
        self.bind_into(folder, VariableNode::new(&variable.name, &variable.name))
    }

    /// Place a constant, with its value, in the `Constants` container.
    pub fn bind_constant(&mut self, variable: &ProcessVariable) -> Option<VariableBinding> {
        let mut request = VariableNode::new(&variable.name, &variable.name);
        request.value = variable.value.clone();
        let folder = self.root.constants;
        self.bind_into(folder, request)
    }

    fn bind_into(&mut self, folder: NodeHandle, request: VariableNode) -> Option<VariableBinding> {
        let key = (folder, request.variable_name.clone());
        if let Some(&index) = self.placed.get(&key) {
            return self.bindings.get(index).cloned();
        }

        let node = self.registry.space_mut().create_variable_node(folder, &request);
        if node.is_null() {
            warn!(
                category = "mapping",
                variable = %request.variable_name,
                "Variable node was not created"
            );
            return None;
        }

        let binding = VariableBinding {
            variable_name: request.variable_name,
            application: None,
            target_folder: folder,
            node,
            display_name: request.display_name,
            unit: request.unit,
            description: request.description,
        };
        self.placed.insert(key, self.bindings.len());
        self.bindings.push(binding.clone());
        Some(binding)
    }

    /// Create the static folders and values below the namespace root.
    ///
    /// Returns the number of variable nodes created.
    pub fn add_additional_nodes(&mut self, folders: &[AdditionalFolder]) -> usize {
        let mut created = 0;
        for folder in folders {
            let Some(handle) =
                self.registry
                    .create_folder(self.root.root, &folder.folder_name, &folder.description)
            else {
                warn!(category = "mapping", folder = %folder.folder_name, "Cannot create additional folder");
                continue;
            };

            for var in &folder.variables {
                let request = VariableNode::new(&var.browse_name, &var.browse_name)
                    .with_description(&var.description)
                    .with_value(&var.value);
                if !self.registry.space_mut().create_variable_node(handle, &request).is_null() {
                    created += 1;
                }
            }
        }
        created
    }

    /// Rule sources that were never bound to a process variable.
    pub fn list_unbound_rule_sources(&self) -> Vec<String> {
        self.rules
            .sources()
            .into_iter()
            .filter(|source| !self.bound.contains(*source))
            .map(str::to_string)
            .collect()
    }

    pub fn is_bound(&self, variable_name: &str) -> bool {
        self.bound.contains(variable_name)
    }

    /// Whether any rule mentions `variable_name`.
    pub fn has_rules_for(&self, variable_name: &str) -> bool {
        !self.rules.find_rules_for(variable_name).is_empty()
    }

    /// Every binding made so far, in order.
    pub fn bindings(&self) -> &[VariableBinding] {
        &self.bindings
    }

    pub fn root(&self) -> NamespaceRoot {
        self.root
    }

    pub fn registry(&self) -> &FolderRegistry<A> {
        &self.registry
    }

    pub fn rules(&self) -> &MappingRuleStore {
        &self.rules
    }

    pub fn space(&self) -> &A {
        self.registry.space()
    }
}
