//! Read-only store of mapping rules.

use std::collections::HashMap;

use crate::rule::MappingRule;

/// Holds the parsed mapping rules, indexed by source variable name.
///
/// The store is built once and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct MappingRuleStore {
    rules: Vec<MappingRule>,
    by_source: HashMap<String, Vec<usize>>,
}

impl MappingRuleStore {
    pub fn new(rules: Vec<MappingRule>) -> Self {
        let mut by_source: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, rule) in rules.iter().enumerate() {
            by_source
                .entry(rule.source_variable_name.clone())
                .or_default()
                .push(i);
        }
        Self { rules, by_source }
    }

    /// Rules for `source_variable_name`, in configuration order.
    pub fn find_rules_for(&self, source_variable_name: &str) -> Vec<&MappingRule> {
        self.by_source
            .get(source_variable_name)
            .map(|indices| indices.iter().map(|&i| &self.rules[i]).collect())
            .unwrap_or_default()
    }

    /// Distinct source variable names, in order of first appearance.
    pub fn sources(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.rules
            .iter()
            .map(|r| r.source_variable_name.as_str())
            .filter(|name| seen.insert(*name))
            .collect()
    }

    pub fn rules(&self) -> &[MappingRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MappingRuleStore {
        MappingRuleStore::new(vec![
            MappingRule::new("int8Scalar", "A").with_rename("first"),
            MappingRule::new("int16Scalar", "A"),
            MappingRule::new("int8Scalar", "B").with_rename("second"),
        ])
    }

    #[test]
    fn test_find_rules_in_order() {
        let store = store();
        let rules = store.find_rules_for("int8Scalar");
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].application_name, "A");
        assert_eq!(rules[1].application_name, "B");
    }

    #[test]
    fn test_find_rules_unknown() {
        assert!(store().find_rules_for("missing").is_empty());
    }

    #[test]
    fn test_sources_are_distinct() {
        assert_eq!(store().sources(), vec!["int8Scalar", "int16Scalar"]);
    }

    #[test]
    fn test_empty_store() {
        let store = MappingRuleStore::default();
        assert!(store.is_empty());
        assert!(store.sources().is_empty());
    }
}
