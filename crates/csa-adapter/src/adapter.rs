//! The server-lifetime adapter object.
//!
//! `main` owns the [`Adapter`] and hands a reference to whatever decides when
//! to shut down. The mapping engine sits behind a mutex so variables added
//! after startup are bound one at a time.

use csa_core::{AddressSpace, ProcessVariable, VariableSource};
use csa_mapping::{
    LoginSettings, MappingConfig, MappingRuleStore, RootSettings, ServerSettings, VariableBinder,
    VariableBinding,
};
use parking_lot::Mutex;
use serde::Serialize;
use std::future::Future;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::Result;

/// Summary of the startup binding pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StartupReport {
    /// Process variables offered by the source.
    pub variables: usize,
    pub constants: usize,
    /// Variables placed by at least one rule.
    pub mapped: usize,
    /// Variables placed only in the `Variables` container.
    pub unmapped: usize,
    pub folders: usize,
    pub additional_variables: usize,
    pub bindings: Vec<VariableBinding>,
    /// Rule sources no process variable matched.
    pub unbound_rule_sources: Vec<String>,
}

/// Owns the address space mapping for the lifetime of the server.
pub struct Adapter<A> {
    engine: Mutex<VariableBinder<A>>,
    root: RootSettings,
    server: ServerSettings,
    login: Option<LoginSettings>,
    additional_variables: usize,
    running: watch::Sender<bool>,
}

impl<A: AddressSpace> Adapter<A> {
    /// Create the namespace root and the additional nodes in `space`.
    pub fn new(config: MappingConfig, space: A) -> Result<Self> {
        let MappingConfig {
            root,
            server,
            login,
            rules,
            additional_nodes,
        } = config;

        let mut engine = VariableBinder::new(space, &root, MappingRuleStore::new(rules))?;
        let additional_variables = engine.add_additional_nodes(&additional_nodes);

        info!(
            category = "adapter",
            root = %root.root_folder,
            port = server.port,
            application = %server.application_name,
            login = login.is_some(),
            rules = engine.rules().len(),
            "Adapter namespace prepared"
        );

        let (running, _) = watch::channel(false);
        Ok(Self {
            engine: Mutex::new(engine),
            root,
            server,
            login,
            additional_variables,
            running,
        })
    }

    /// Bind every variable offered by `source`.
    pub fn register_all(&self, source: &dyn VariableSource) -> Result<StartupReport> {
        let variables = source.process_variables()?;
        let mut report = StartupReport {
            variables: variables.len(),
            additional_variables: self.additional_variables,
            ..Default::default()
        };

        for variable in &variables {
            let bindings = self.add_variable(variable);
            if variable.constant {
                report.constants += 1;
            } else if bindings.iter().any(|b| b.application.is_some()) {
                report.mapped += 1;
            } else {
                report.unmapped += 1;
            }
            report.bindings.extend(bindings);
        }

        report.unbound_rule_sources = self.unbound_rule_sources();
        report.folders = self.engine.lock().registry().len();

        for source in &report.unbound_rule_sources {
            warn!(
                category = "adapter",
                variable = %source,
                "Mapped variable has no process variable"
            );
        }
        info!(
            category = "adapter",
            variables = report.variables,
            mapped = report.mapped,
            unmapped = report.unmapped,
            constants = report.constants,
            "Startup binding finished"
        );
        Ok(report)
    }

    /// Bind one process variable. Safe to call while the server runs.
    pub fn add_variable(&self, variable: &ProcessVariable) -> Vec<VariableBinding> {
        let mut engine = self.engine.lock();

        if variable.constant {
            return engine.bind_constant(variable).into_iter().collect();
        }

        let mut bindings = engine.bind(&variable.name);
        if bindings.is_empty() || self.root.mirror_variables {
            if bindings.is_empty() && engine.has_rules_for(&variable.name) {
                warn!(
                    category = "adapter",
                    variable = %variable.name,
                    "Mapping rules matched but no node was created"
                );
            }
            debug!(category = "adapter", variable = %variable.name, "Placed in Variables");
            bindings.extend(engine.bind_default(variable));
        }
        bindings
    }

    pub fn unbound_rule_sources(&self) -> Vec<String> {
        self.engine.lock().list_unbound_rule_sources()
    }

    /// Run `f` with the engine locked.
    pub fn with_engine<R>(&self, f: impl FnOnce(&VariableBinder<A>) -> R) -> R {
        let engine = self.engine.lock();
        f(&*engine)
    }

    pub fn server(&self) -> &ServerSettings {
        &self.server
    }

    pub fn login(&self) -> Option<&LoginSettings> {
        self.login.as_ref()
    }

    pub fn root_settings(&self) -> &RootSettings {
        &self.root
    }

    pub fn start(&self) {
        if !self.running.send_replace(true) {
            info!(category = "adapter", port = self.server.port, "Adapter started");
        }
    }

    pub fn stop(&self) {
        if self.running.send_replace(false) {
            info!(category = "adapter", "Adapter stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        *self.running.borrow()
    }

    /// Mark the adapter running until `shutdown` resolves or [`stop`] is
    /// called, then stop it.
    ///
    /// [`stop`]: Adapter::stop
    pub async fn run_until<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut state = self.running.subscribe();
        self.start();

        tokio::select! {
            _ = shutdown => {
                info!(category = "adapter", "Shutdown requested");
            }
            _ = state.wait_for(|running| !*running) => {}
        }

        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csa_core::{Direction, MemoryAddressSpace};
    use csa_mapping::MappingRule;

    fn adapter(mirror: bool) -> Adapter<MemoryAddressSpace> {
        let config = MappingConfig {
            root: RootSettings {
                root_folder: "Adapter".to_string(),
                mirror_variables: mirror,
                ..Default::default()
            },
            rules: vec![MappingRule::new("intA", "App")],
            ..Default::default()
        };
        Adapter::new(config, MemoryAddressSpace::new()).unwrap()
    }

    #[test]
    fn test_mapped_variable_skips_default_container() {
        let adapter = adapter(false);
        let bindings = adapter.add_variable(&ProcessVariable::new("intA", Direction::DeviceToControl));
        assert_eq!(bindings.len(), 1);
        assert!(bindings[0].application.is_some());
    }

    #[test]
    fn test_mirror_lists_mapped_variable_twice() {
        let adapter = adapter(true);
        let bindings = adapter.add_variable(&ProcessVariable::new("intA", Direction::DeviceToControl));
        assert_eq!(bindings.len(), 2);
        assert!(bindings[1].application.is_none());

        let again = adapter.add_variable(&ProcessVariable::new("intA", Direction::DeviceToControl));
        assert_eq!(again, bindings);
        adapter.with_engine(|engine| {
            assert_eq!(engine.space().children(engine.root().variables).len(), 1);
        });
    }

    #[test]
    fn test_start_stop() {
        let adapter = adapter(false);
        assert!(!adapter.is_running());
        adapter.start();
        assert!(adapter.is_running());
        adapter.stop();
        assert!(!adapter.is_running());
    }
}
