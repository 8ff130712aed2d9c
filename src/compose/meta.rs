//! Capability metadata derived from resolved attribute categories.

use std::collections::BTreeSet;

use serde::Serialize;
use serde_yaml::Mapping;

/// Protocol version advertised to the co-simulation host.
pub const API_VERSION: &str = "3.0";

/// Capability advertisement for one model instance.
///
/// A pure function of the instance's resolved attribute categories; the host
/// uses it to introspect what the model exposes without instantiating it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapabilityMeta {
    /// Fixed protocol version, [`API_VERSION`].
    pub api_version: String,
    /// Mirrors the instance's `model_mode`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Per-model capability block.
    pub models: CapabilityModels,
}

/// The `models` block of a capability advertisement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapabilityModels {
    /// The single advertised model entry.
    #[serde(rename = "Model")]
    pub model: ModelCapability,
}

/// Attribute-level capabilities of one advertised model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelCapability {
    /// Always true; every composed model is host-visible.
    pub public: bool,
    /// Union of parameter and state attribute names.
    pub params: Vec<String>,
    /// Union of input, output, state and trigger attribute names.
    pub attrs: Vec<String>,
    /// Always false; models accept only their declared inputs.
    pub any_inputs: bool,
    /// Trigger attribute names.
    pub trigger: Vec<String>,
}

/// Derives capability metadata from resolved attribute categories.
///
/// The unions are sets; they are realized here as sorted lists purely for
/// determinism, and the ordering is not part of the contract.
pub fn generate(
    model_mode: &str,
    inputs: &Mapping,
    outputs: &Mapping,
    parameters: &Mapping,
    states: &Mapping,
    triggers: &Mapping,
) -> CapabilityMeta {
    let mut params: BTreeSet<String> = string_keys(parameters);
    params.extend(string_keys(states));

    let mut attrs: BTreeSet<String> = string_keys(inputs);
    attrs.extend(string_keys(outputs));
    attrs.extend(string_keys(states));
    attrs.extend(string_keys(triggers));

    CapabilityMeta {
        api_version: API_VERSION.to_string(),
        kind: model_mode.to_string(),
        models: CapabilityModels {
            model: ModelCapability {
                public: true,
                params: params.into_iter().collect(),
                attrs: attrs.into_iter().collect(),
                any_inputs: false,
                trigger: string_keys(triggers).into_iter().collect(),
            },
        },
    }
}

fn string_keys(map: &Mapping) -> BTreeSet<String> {
    map.iter()
        .filter_map(|(key, _)| key.as_str().map(str::to_string))
        .collect()
}
