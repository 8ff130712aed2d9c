//! Fatal error taxonomy for the composition pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort the whole composition.
///
/// Malformed connection and monitor entries are deliberately not represented
/// here: they are reported at the point of detection and skipped.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// A configuration document could not be read from disk.
    #[error("cannot read `{}`: {source}", .path.display())]
    Read {
        /// Path of the unreadable document.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A configuration document is not valid YAML.
    #[error("invalid YAML in {origin}: {source}")]
    Parse {
        /// Where the document came from (path or label).
        origin: String,
        /// Underlying YAML error.
        source: serde_yaml::Error,
    },

    /// A configuration document has a non-mapping top level.
    #[error("{origin} must hold a mapping at the top level")]
    NotAMapping {
        /// Where the document came from (path or label).
        origin: String,
    },

    /// A simulator entry does not name its model type.
    #[error("simulator entry {index} is missing `model_type`")]
    MissingModelType {
        /// Zero-based position in the `simulators` sequence.
        index: usize,
    },

    /// A model override block does not name its instance.
    #[error("a model override under `{model_type}` is missing `name`")]
    MissingModelName {
        /// Model type whose `models` list holds the nameless block.
        model_type: String,
    },

    /// An attribute category holds a value that is neither mapping nor null.
    #[error("`{category}` of model `{model}` must be a mapping")]
    CategoryNotMapping {
        /// Instance name of the offending model.
        model: String,
        /// Category key as written in the document.
        category: String,
    },

    /// The scenario start time is textual but not a valid timestamp.
    #[error("invalid start_time `{value}`: {source}")]
    InvalidStartTime {
        /// The offending text.
        value: String,
        /// Underlying timestamp parse error.
        source: chrono::format::ParseError,
    },

    /// Configuration mappings are nested beyond the merge depth guard.
    #[error("configuration nesting exceeds the merge depth limit")]
    MergeTooDeep,

    /// A model factory requires a parameter the descriptor does not carry.
    #[error("model `{model}` is missing required parameter `{name}`")]
    MissingParameter {
        /// Instance name of the model under construction.
        model: String,
        /// Parameter key.
        name: String,
    },

    /// A model parameter is present but unusable.
    #[error("model `{model}`: parameter `{name}` {message}")]
    InvalidParameter {
        /// Instance name of the model under construction.
        model: String,
        /// Parameter key.
        name: String,
        /// Constraint description.
        message: String,
    },

    /// No factory is registered for the requested model type.
    #[error("no capability registered for model type `{0}`")]
    UnknownModelType(String),
}
