//! Data-flow connection and monitor resolution.
//!
//! Both resolvers share one parsing rule: a `"Model.Attribute"` string must
//! split on `.` into exactly two non-empty components. Malformed entries are
//! logged and skipped; they never abort the composition.

use std::fmt;

use serde::Serialize;
use serde_yaml::{Mapping, Value};
use tracing::warn;

/// One endpoint of a connection, or a monitored attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttrRef {
    /// Model instance name.
    pub model: String,
    /// Attribute name on that instance.
    pub attr: String,
}

impl AttrRef {
    /// Parses `"Model.Attribute"`.
    ///
    /// Returns `None` unless splitting on `.` yields exactly two non-empty
    /// components.
    pub fn parse(text: &str) -> Option<Self> {
        let mut parts = text.split('.');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(model), Some(attr), None) if !model.is_empty() && !attr.is_empty() => {
                Some(Self {
                    model: model.to_string(),
                    attr: attr.to_string(),
                })
            }
            _ => None,
        }
    }
}

impl fmt::Display for AttrRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.model, self.attr)
    }
}

/// Directed data-flow edge between two model attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Connection {
    /// Source endpoint.
    pub from: AttrRef,
    /// Destination endpoint.
    pub to: AttrRef,
}

/// Resolves the `connections` sequence of the merged configuration.
///
/// Output order matches input order; nothing is deduplicated. Entries that
/// are not mappings, lack textual `from`/`to`, or fail endpoint parsing are
/// logged and omitted.
pub fn resolve_connections(merged: &Mapping) -> Vec<Connection> {
    let Some(entries) = merged.get("connections").and_then(Value::as_sequence) else {
        return Vec::new();
    };

    let mut connections = Vec::new();
    for entry in entries {
        let endpoints = entry.as_mapping().and_then(|map| {
            let from = map.get("from").and_then(Value::as_str)?;
            let to = map.get("to").and_then(Value::as_str)?;
            Some((AttrRef::parse(from)?, AttrRef::parse(to)?))
        });
        match endpoints {
            Some((from, to)) => connections.push(Connection { from, to }),
            None => warn!("skipping invalid connection entry: {entry:?}"),
        }
    }
    connections
}

/// Resolves the `monitor` sequence of bare `"Model.Attribute"` strings.
///
/// Same rejection policy and ordering guarantees as
/// [`resolve_connections`].
pub fn resolve_monitors(merged: &Mapping) -> Vec<AttrRef> {
    let Some(entries) = merged.get("monitor").and_then(Value::as_sequence) else {
        return Vec::new();
    };

    let mut monitors = Vec::new();
    for entry in entries {
        match entry.as_str().and_then(AttrRef::parse) {
            Some(monitor) => monitors.push(monitor),
            None => warn!("skipping invalid monitor entry: {entry:?}"),
        }
    }
    monitors
}
