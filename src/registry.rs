//! Static capability registry.
//!
//! Maps lower-cased model-type identifiers to model factories. The registry
//! is populated at start-up ([`ModelRegistry::builtin`] registers the four
//! shipped models) and never consulted for anything the documents do not
//! declare; looking up an unregistered type is not an error, the descriptor
//! is simply produced without a capability.

use std::collections::HashMap;

use crate::compose::{ComposeError, ModelInstanceDescriptor};
use crate::models::{Battery, EnergyModel, Household, Pv, WindTurbine};

/// Builds a live model from a resolved descriptor.
pub type ModelFactory = fn(&ModelInstanceDescriptor) -> Result<Box<dyn EnergyModel>, ComposeError>;

/// Registry of model factories keyed by lower-cased model type.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    factories: HashMap<String, ModelFactory>,
}

impl ModelRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the four shipped models registered.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register("battery", battery_factory);
        registry.register("household", household_factory);
        registry.register("pv", pv_factory);
        registry.register("windturbine", wind_turbine_factory);
        registry
    }

    /// Registers a factory under the lower-cased form of `model_type`.
    ///
    /// Re-registering a type replaces the earlier factory.
    pub fn register(&mut self, model_type: &str, factory: ModelFactory) {
        self.factories
            .insert(model_type.to_ascii_lowercase(), factory);
    }

    /// Resolves a model type to its capability key, if registered.
    ///
    /// The key is the lower-cased type name; absence is tolerated.
    pub fn resolve(&self, model_type: &str) -> Option<String> {
        let key = model_type.to_ascii_lowercase();
        self.factories.contains_key(&key).then_some(key)
    }

    /// Looks up the factory for a model type, if registered.
    pub fn lookup(&self, model_type: &str) -> Option<ModelFactory> {
        self.factories
            .get(&model_type.to_ascii_lowercase())
            .copied()
    }

    /// Instantiates a live model from a descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError::UnknownModelType`] when no factory is
    /// registered for the descriptor's type, or the factory's own error
    /// when the descriptor's parameters are unusable.
    pub fn instantiate(
        &self,
        descriptor: &ModelInstanceDescriptor,
    ) -> Result<Box<dyn EnergyModel>, ComposeError> {
        let factory = self
            .lookup(&descriptor.model_type)
            .ok_or_else(|| ComposeError::UnknownModelType(descriptor.model_type.clone()))?;
        factory(descriptor)
    }

    /// Registered capability keys, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

fn battery_factory(
    descriptor: &ModelInstanceDescriptor,
) -> Result<Box<dyn EnergyModel>, ComposeError> {
    Ok(Box::new(Battery::from_descriptor(descriptor)?))
}

fn household_factory(
    descriptor: &ModelInstanceDescriptor,
) -> Result<Box<dyn EnergyModel>, ComposeError> {
    Ok(Box::new(Household::from_descriptor(descriptor)?))
}

fn pv_factory(descriptor: &ModelInstanceDescriptor) -> Result<Box<dyn EnergyModel>, ComposeError> {
    Ok(Box::new(Pv::from_descriptor(descriptor)?))
}

fn wind_turbine_factory(
    descriptor: &ModelInstanceDescriptor,
) -> Result<Box<dyn EnergyModel>, ComposeError> {
    Ok(Box::new(WindTurbine::from_descriptor(descriptor)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_covers_the_shipped_models() {
        let registry = ModelRegistry::builtin();
        assert_eq!(
            registry.names(),
            ["battery", "household", "pv", "windturbine"]
        );
    }

    #[test]
    fn lookup_normalizes_case() {
        let registry = ModelRegistry::builtin();
        assert_eq!(registry.resolve("Battery").as_deref(), Some("battery"));
        assert_eq!(registry.resolve("BATTERY").as_deref(), Some("battery"));
        assert_eq!(registry.resolve("WindTurbine").as_deref(), Some("windturbine"));
    }

    #[test]
    fn unknown_types_resolve_to_none() {
        let registry = ModelRegistry::builtin();
        assert!(registry.resolve("FusionReactor").is_none());
        assert!(registry.lookup("FusionReactor").is_none());
    }

    #[test]
    fn registration_is_case_insensitive_and_replaceable() {
        let mut registry = ModelRegistry::new();
        registry.register("Battery", battery_factory);
        assert_eq!(registry.resolve("battery").as_deref(), Some("battery"));

        registry.register("BATTERY", household_factory);
        assert_eq!(registry.names().len(), 1);
    }
}
