//! Simulator/model assembly: layered configuration into instance descriptors.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use tracing::warn;

use crate::compose::defaults::DefaultsIndex;
use crate::compose::error::ComposeError;
use crate::compose::merge::deep_merge;
use crate::compose::meta::{self, CapabilityMeta};
use crate::compose::settings::ScenarioSettings;
use crate::registry::ModelRegistry;

/// Model mode used when a simulator entry gives none.
pub const DEFAULT_MODEL_MODE: &str = "hybrid";

/// Step size used when a simulator entry gives none.
pub const DEFAULT_STEP_SIZE: u32 = 1;

/// Attribute category keys as they appear in configuration documents.
const CATEGORY_KEYS: [&str; 6] = [
    "Inputs",
    "Outputs",
    "Parameters",
    "States",
    "Triggers",
    "Scenario_File",
];

/// Fully resolved configuration for one simulated component.
///
/// Immutable once assembled; the external host instantiates a model from it
/// through the capability registry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInstanceDescriptor {
    /// Unique instance name.
    pub name: String,
    /// Declared model type identifier.
    pub model_type: String,
    /// Stepping mode advertised to the host.
    pub model_mode: String,
    /// Step size in minutes.
    pub step_size: u32,
    /// Resolved capability key, `None` when the type has no registered
    /// implementation.
    pub capability: Option<String>,
    /// Simulation start shared by all instances of the scenario.
    pub start_time: NaiveDateTime,
    /// Merged input attributes.
    pub inputs: Mapping,
    /// Merged output attributes.
    pub outputs: Mapping,
    /// Merged parameters.
    pub parameters: Mapping,
    /// Merged state attributes.
    pub states: Mapping,
    /// Merged trigger attributes.
    pub triggers: Mapping,
    /// Opaque scenario-file reference, absent unless configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenario_file: Option<Value>,
    /// Derived capability advertisement.
    pub meta: CapabilityMeta,
}

/// Assembles model instance descriptors for every simulator entry.
///
/// Each entry is layered as: defaults-index entry for its `model_type`,
/// then the scenario entry, then each named model override. An entry with
/// no `models` list produces exactly one instance named
/// `{model_type}_default`. Instance-name collisions keep the later
/// descriptor and log the overwrite.
///
/// # Errors
///
/// Returns [`ComposeError::MissingModelType`] or
/// [`ComposeError::MissingModelName`] for malformed entries (the whole
/// composition aborts rather than skipping a broken scenario file), and
/// propagates merge and category errors.
pub fn assemble(
    merged: &Mapping,
    defaults_index: &DefaultsIndex,
    registry: &ModelRegistry,
    settings: &ScenarioSettings,
) -> Result<HashMap<String, ModelInstanceDescriptor>, ComposeError> {
    let mut instances = HashMap::new();

    let Some(entries) = merged.get("simulators").and_then(Value::as_sequence) else {
        return Ok(instances);
    };

    for (index, entry) in entries.iter().enumerate() {
        let entry_map = entry
            .as_mapping()
            .ok_or(ComposeError::MissingModelType { index })?;
        let model_type = entry_map
            .get("model_type")
            .and_then(Value::as_str)
            .ok_or(ComposeError::MissingModelType { index })?
            .to_string();

        // Mode and step size are entry-level: they come from the scenario
        // entry itself, not from the defaults layer.
        let model_mode = entry_map
            .get("model_mode")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_MODEL_MODE)
            .to_string();
        let step_size = entry_map
            .get("step_size")
            .and_then(Value::as_i64)
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(DEFAULT_STEP_SIZE);

        let capability = registry.resolve(&model_type);

        let mut layered = defaults_index.get(&model_type).cloned().unwrap_or_default();
        deep_merge(&mut layered, entry_map)?;

        for override_map in model_overrides(&layered, &model_type)? {
            let name = override_map
                .get("name")
                .and_then(Value::as_str)
                .ok_or_else(|| ComposeError::MissingModelName {
                    model_type: model_type.clone(),
                })?
                .to_string();

            let inputs = mapping_category(&layered, &override_map, "Inputs", &name)?;
            let outputs = mapping_category(&layered, &override_map, "Outputs", &name)?;
            let parameters = mapping_category(&layered, &override_map, "Parameters", &name)?;
            let states = mapping_category(&layered, &override_map, "States", &name)?;
            let triggers = mapping_category(&layered, &override_map, "Triggers", &name)?;
            let scenario_file = merged_category(&layered, &override_map, "Scenario_File")?;

            let meta = meta::generate(&model_mode, &inputs, &outputs, &parameters, &states, &triggers);

            let descriptor = ModelInstanceDescriptor {
                name: name.clone(),
                model_type: model_type.clone(),
                model_mode: model_mode.clone(),
                step_size,
                capability: capability.clone(),
                start_time: settings.start_time,
                inputs,
                outputs,
                parameters,
                states,
                triggers,
                scenario_file,
                meta,
            };

            if instances.insert(name.clone(), descriptor).is_some() {
                warn!("model instance `{name}` redefined, keeping the later definition");
            }
        }
    }

    Ok(instances)
}

/// Returns the named override blocks of a layered simulator entry.
///
/// An absent or empty `models` list synthesizes a single override named
/// `{model_type}_default` with no further fields.
fn model_overrides(layered: &Mapping, model_type: &str) -> Result<Vec<Mapping>, ComposeError> {
    let mut overrides = Vec::new();

    if let Some(listed) = layered.get("models").and_then(Value::as_sequence) {
        for item in listed {
            let map = item
                .as_mapping()
                .ok_or_else(|| ComposeError::MissingModelName {
                    model_type: model_type.to_string(),
                })?;
            overrides.push(map.clone());
        }
    }

    if overrides.is_empty() {
        let mut synthesized = Mapping::new();
        synthesized.insert(
            Value::String("name".into()),
            Value::String(format!("{model_type}_default")),
        );
        overrides.push(synthesized);
    }

    Ok(overrides)
}

/// Merges one attribute category across the entry and override layers.
///
/// When both layers hold mappings they are deep-merged (override wins);
/// otherwise the override value is taken if present, else the entry value,
/// else nothing. YAML nulls count as absent.
fn merged_category(
    layered: &Mapping,
    override_map: &Mapping,
    key: &str,
) -> Result<Option<Value>, ComposeError> {
    debug_assert!(CATEGORY_KEYS.contains(&key));

    let entry_value = present(layered.get(key));
    let override_value = present(override_map.get(key));

    match (entry_value, override_value) {
        (Some(Value::Mapping(entry_map)), Some(Value::Mapping(override_inner))) => {
            let mut category = entry_map.clone();
            deep_merge(&mut category, override_inner)?;
            Ok(Some(Value::Mapping(category)))
        }
        (entry_value, override_value) => Ok(override_value.or(entry_value).cloned()),
    }
}

/// Resolves a category that must end up as a mapping, empty when absent.
fn mapping_category(
    layered: &Mapping,
    override_map: &Mapping,
    key: &str,
    model: &str,
) -> Result<Mapping, ComposeError> {
    match merged_category(layered, override_map, key)? {
        None => Ok(Mapping::new()),
        Some(Value::Mapping(map)) => Ok(map),
        Some(_) => Err(ComposeError::CategoryNotMapping {
            model: model.to_string(),
            category: key.to_string(),
        }),
    }
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}
