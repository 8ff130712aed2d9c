//! Common types and helpers for the pluggable physics models.

use std::collections::HashMap;

use serde_yaml::{Mapping, Value};

use crate::compose::{ComposeError, ModelInstanceDescriptor};

/// Numeric attribute map shared by model inputs, outputs and states.
pub type AttrMap = HashMap<String, f64>;

/// The mutable attribute surface of a live model.
///
/// Seeded from the descriptor's resolved categories; the host writes
/// inputs, calls [`EnergyModel::step`], and reads outputs and states.
#[derive(Debug, Clone, Default)]
pub struct ModelIo {
    /// Input attributes, written by the host before each step.
    pub inputs: AttrMap,
    /// Output attributes, written by the model during each step.
    pub outputs: AttrMap,
    /// State attributes, carried across steps.
    pub states: AttrMap,
}

impl ModelIo {
    /// Seeds the attribute surface from a descriptor's categories.
    ///
    /// Non-numeric initial values seed as zero; the key is kept so the
    /// attribute stays addressable.
    pub fn from_descriptor(descriptor: &ModelInstanceDescriptor) -> Self {
        Self {
            inputs: numeric_attrs(&descriptor.inputs),
            outputs: numeric_attrs(&descriptor.outputs),
            states: numeric_attrs(&descriptor.states),
        }
    }

    /// Reads an input attribute, zero when absent.
    pub fn input(&self, name: &str) -> f64 {
        self.inputs.get(name).copied().unwrap_or(0.0)
    }
}

/// Contract every pluggable model satisfies.
///
/// One call to [`step`](Self::step) advances the model a single simulation
/// tick: it reads inputs, parameters and states and writes outputs and
/// states. Step size and start time are accepted at construction.
pub trait EnergyModel: std::fmt::Debug {
    /// The registered capability key for this model.
    fn model_type(&self) -> &'static str;

    /// The model's attribute surface.
    fn io(&self) -> &ModelIo;

    /// Mutable access for the host to write inputs and reset states.
    fn io_mut(&mut self) -> &mut ModelIo;

    /// Advances the model by one simulation tick.
    fn step(&mut self);
}

/// Whether a generator reports instantaneous power or interval energy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    /// Instantaneous power in kW.
    Power,
    /// Energy in kWh over the step interval.
    Energy,
}

impl OutputKind {
    /// Reads the `output_type` parameter of a descriptor.
    ///
    /// # Errors
    ///
    /// Missing or unrecognized values are construction errors.
    pub fn from_parameters(parameters: &Mapping, model: &str) -> Result<Self, ComposeError> {
        match parameters.get("output_type").and_then(Value::as_str) {
            Some("power") => Ok(Self::Power),
            Some("energy") => Ok(Self::Energy),
            Some(other) => Err(ComposeError::InvalidParameter {
                model: model.to_string(),
                name: "output_type".to_string(),
                message: format!("must be \"power\" or \"energy\", got \"{other}\""),
            }),
            None => Err(ComposeError::MissingParameter {
                model: model.to_string(),
                name: "output_type".to_string(),
            }),
        }
    }
}

/// Converts a step size in minutes to the interval length in hours.
pub(crate) fn interval_hours(step_size: u32) -> f64 {
    f64::from(step_size) / 60.0
}

/// Reads a required numeric parameter from a descriptor category.
pub(crate) fn require_f64(
    parameters: &Mapping,
    name: &str,
    model: &str,
) -> Result<f64, ComposeError> {
    match parameters.get(name) {
        Some(value) => value.as_f64().ok_or_else(|| ComposeError::InvalidParameter {
            model: model.to_string(),
            name: name.to_string(),
            message: "must be a number".to_string(),
        }),
        None => Err(ComposeError::MissingParameter {
            model: model.to_string(),
            name: name.to_string(),
        }),
    }
}

/// Reads an optional numeric parameter, with a default.
pub(crate) fn optional_f64(parameters: &Mapping, name: &str, default: f64) -> f64 {
    parameters.get(name).and_then(Value::as_f64).unwrap_or(default)
}

fn numeric_attrs(category: &Mapping) -> AttrMap {
    category
        .iter()
        .filter_map(|(key, value)| {
            let name = key.as_str()?.to_string();
            Some((name, value.as_f64().unwrap_or(0.0)))
        })
        .collect()
}
