//! Shared helpers for the composition integration tests.

use serde_yaml::Mapping;

use cosim_graph::compose::document::parse_document;
use cosim_graph::compose::{ComposeError, Composition};
use cosim_graph::registry::ModelRegistry;

/// Parses a YAML test document, panicking on malformed test input.
pub fn doc(text: &str) -> Mapping {
    parse_document(text, "test document").expect("test document should parse")
}

/// Composes a defaults/scenario document pair with the built-in registry.
pub fn compose(defaults: &str, scenario: &str) -> Result<Composition, ComposeError> {
    Composition::compose(&doc(defaults), &doc(scenario), &ModelRegistry::builtin())
}

/// Defaults document used by most end-to-end scenarios.
pub const BATTERY_DEFAULTS: &str = "
simulators:
  - model_type: Battery
    step_size: 1
    Inputs:
      requested_power_flow: 0
    Outputs:
      effective_power_flow: 0
    Parameters:
      charge_power_max: 100
      discharge_power_max: 200
      soc_min: 0.1
      soc_max: 0.9
      capacity: 1000
    States:
      soc: 0.5
";
