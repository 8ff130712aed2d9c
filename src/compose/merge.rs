//! Depth-guarded recursive merge over YAML mappings.

use serde_yaml::{Mapping, Value};

use crate::compose::error::ComposeError;

/// Maximum mapping nesting the merger will walk before giving up.
pub const MAX_MERGE_DEPTH: usize = 64;

/// Merges `overlay` into `base` in place. The overlay wins on conflict.
///
/// Keys present in both layers whose values are both mappings are merged
/// recursively; any other clash (scalar, sequence, or mixed) is resolved by
/// cloning the overlay value over the base value. Sequences are never
/// merged element-wise. The overlay is never mutated.
///
/// Merging the same overlay a second time leaves the result unchanged.
///
/// # Errors
///
/// Returns [`ComposeError::MergeTooDeep`] if the two layers nest mappings
/// beyond [`MAX_MERGE_DEPTH`] levels.
pub fn deep_merge(base: &mut Mapping, overlay: &Mapping) -> Result<(), ComposeError> {
    merge_level(base, overlay, 0)
}

fn merge_level(base: &mut Mapping, overlay: &Mapping, depth: usize) -> Result<(), ComposeError> {
    if depth >= MAX_MERGE_DEPTH {
        return Err(ComposeError::MergeTooDeep);
    }

    for (key, overlay_value) in overlay {
        if let Value::Mapping(overlay_map) = overlay_value {
            if let Some(Value::Mapping(base_map)) = base.get_mut(key) {
                merge_level(base_map, overlay_map, depth + 1)?;
                continue;
            }
        }
        base.insert(key.clone(), overlay_value.clone());
    }
    Ok(())
}
