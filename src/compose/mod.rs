//! Configuration composition: from layered YAML documents to a simulation
//! graph description.
//!
//! The pipeline is synchronous and single-pass: load both documents,
//! deep-merge them (scenario wins), index the defaults, resolve scenario
//! settings, assemble model instance descriptors, then resolve connections
//! and monitors. It either completes into an immutable [`Composition`] or
//! fails fast with a [`ComposeError`].

pub mod assemble;
pub mod connect;
pub mod defaults;
pub mod document;
pub mod error;
pub mod merge;
pub mod meta;
pub mod settings;

use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;
use serde_yaml::Mapping;

pub use assemble::ModelInstanceDescriptor;
pub use connect::{AttrRef, Connection};
pub use defaults::DefaultsIndex;
pub use error::ComposeError;
pub use merge::deep_merge;
pub use meta::CapabilityMeta;
pub use settings::ScenarioSettings;

use crate::registry::ModelRegistry;

/// The composed simulation graph, the sole hand-off surface to the
/// external execution host.
#[derive(Debug, Serialize)]
pub struct Composition {
    /// Resolved top-level scenario settings.
    pub settings: ScenarioSettings,
    /// Model instance descriptors keyed by instance name.
    pub models: HashMap<String, ModelInstanceDescriptor>,
    /// Directed data-flow edges, in document order.
    pub connections: Vec<Connection>,
    /// Monitored attributes, in document order.
    pub monitors: Vec<AttrRef>,
    /// The unified configuration the graph was derived from.
    #[serde(skip)]
    pub merged: Mapping,
}

impl Composition {
    /// Composes the simulation graph from two configuration documents.
    ///
    /// The defaults document is an explicit argument; there is no hidden
    /// process-wide defaults location. Neither input document is mutated.
    ///
    /// # Errors
    ///
    /// Propagates every fatal condition of [`ComposeError`]; malformed
    /// connection and monitor entries are logged and skipped instead.
    pub fn compose(
        defaults: &Mapping,
        scenario: &Mapping,
        registry: &ModelRegistry,
    ) -> Result<Self, ComposeError> {
        let mut merged = Mapping::new();
        deep_merge(&mut merged, defaults)?;
        deep_merge(&mut merged, scenario)?;

        let defaults_index = DefaultsIndex::build(defaults)?;
        let settings = ScenarioSettings::resolve(&merged)?;
        let models = assemble::assemble(&merged, &defaults_index, registry, &settings)?;
        let connections = connect::resolve_connections(&merged);
        let monitors = connect::resolve_monitors(&merged);

        Ok(Self {
            settings,
            models,
            connections,
            monitors,
            merged,
        })
    }

    /// Loads both documents from disk and composes the graph.
    ///
    /// # Errors
    ///
    /// As [`Composition::compose`], plus document read and parse errors.
    pub fn from_files(
        defaults_path: &Path,
        scenario_path: &Path,
        registry: &ModelRegistry,
    ) -> Result<Self, ComposeError> {
        let defaults = document::load_document(defaults_path)?;
        let scenario = document::load_document(scenario_path)?;
        Self::compose(&defaults, &scenario, registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::document::parse_document;

    #[test]
    fn scenario_keys_override_defaults_in_the_merged_configuration() {
        let defaults = parse_document("scenario: Base\nend_time: 100", "test").unwrap();
        let scenario = parse_document("end_time: 200", "test").unwrap();
        let composition =
            Composition::compose(&defaults, &scenario, &ModelRegistry::builtin()).unwrap();

        assert_eq!(composition.settings.scenario, "Base");
        assert_eq!(composition.settings.end_time, 200);
        // Inputs were layered into the retained unified configuration.
        assert_eq!(
            composition
                .merged
                .get("end_time")
                .and_then(serde_yaml::Value::as_i64),
            Some(200)
        );
    }

    #[test]
    fn empty_documents_compose_to_an_empty_graph() {
        let composition = Composition::compose(
            &Mapping::new(),
            &Mapping::new(),
            &ModelRegistry::builtin(),
        )
        .unwrap();
        assert!(composition.models.is_empty());
        assert!(composition.connections.is_empty());
        assert!(composition.monitors.is_empty());
    }
}
