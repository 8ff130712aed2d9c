//! Index of default simulator entries by model type.

use std::collections::HashMap;

use serde_yaml::{Mapping, Value};
use tracing::warn;

use crate::compose::error::ComposeError;

/// Lookup from `model_type` to its entry in the defaults document.
///
/// Built once per composition from the defaults document alone; the indexed
/// entry is the base layer for every scenario simulator of that type.
#[derive(Debug, Default)]
pub struct DefaultsIndex {
    by_type: HashMap<String, Mapping>,
}

impl DefaultsIndex {
    /// Indexes the `simulators` sequence of the defaults document.
    ///
    /// An absent sequence yields an empty index. On duplicate `model_type`
    /// the later entry wins; the shadowing is logged but not an error.
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError::MissingModelType`] when an entry carries no
    /// `model_type`.
    pub fn build(defaults: &Mapping) -> Result<Self, ComposeError> {
        let mut by_type = HashMap::new();

        if let Some(entries) = defaults.get("simulators").and_then(Value::as_sequence) {
            for (index, entry) in entries.iter().enumerate() {
                let entry_map = entry
                    .as_mapping()
                    .ok_or(ComposeError::MissingModelType { index })?;
                let model_type = entry_map
                    .get("model_type")
                    .and_then(Value::as_str)
                    .ok_or(ComposeError::MissingModelType { index })?;

                if by_type
                    .insert(model_type.to_string(), entry_map.clone())
                    .is_some()
                {
                    warn!("defaults declare `{model_type}` more than once, keeping the later entry");
                }
            }
        }

        Ok(Self { by_type })
    }

    /// Returns the defaults entry for a model type, if declared.
    pub fn get(&self, model_type: &str) -> Option<&Mapping> {
        self.by_type.get(model_type)
    }

    /// Number of indexed model types.
    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    /// Whether the defaults document declared no simulators.
    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::document::parse_document;

    fn doc(text: &str) -> Mapping {
        parse_document(text, "test").unwrap()
    }

    #[test]
    fn entries_are_indexed_by_model_type() {
        let index = DefaultsIndex::build(&doc(
            "simulators:\n  - model_type: Battery\n    step_size: 1\n  - model_type: PV",
        ))
        .unwrap();
        assert_eq!(index.len(), 2);
        let battery = index.get("Battery").unwrap();
        assert_eq!(battery.get("step_size").and_then(Value::as_i64), Some(1));
        assert!(index.get("Household").is_none());
    }

    #[test]
    fn absent_simulators_gives_an_empty_index() {
        let index = DefaultsIndex::build(&doc("scenario: X")).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn later_duplicate_wins() {
        let index = DefaultsIndex::build(&doc(
            "simulators:\n  - model_type: Battery\n    step_size: 1\n  - model_type: Battery\n    step_size: 7",
        ))
        .unwrap();
        assert_eq!(index.len(), 1);
        let battery = index.get("Battery").unwrap();
        assert_eq!(battery.get("step_size").and_then(Value::as_i64), Some(7));
    }

    #[test]
    fn entry_without_model_type_is_fatal() {
        let err = DefaultsIndex::build(&doc("simulators:\n  - step_size: 1")).unwrap_err();
        assert!(matches!(err, ComposeError::MissingModelType { index: 0 }));
    }
}
