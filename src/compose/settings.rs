//! Top-level scenario settings with defaults.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_yaml::{Mapping, Value};

use crate::compose::error::ComposeError;

/// Scenario name used when the documents give none.
pub const DEFAULT_SCENARIO_NAME: &str = "DefaultScenario";

/// End time used when the documents give none.
pub const DEFAULT_END_TIME: i64 = 1440;

/// Resolved top-level scenario settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioSettings {
    /// Scenario name.
    pub scenario: String,
    /// Simulation start, attached to every model instance descriptor.
    pub start_time: NaiveDateTime,
    /// Simulation end, in scenario-defined units.
    pub end_time: i64,
}

impl ScenarioSettings {
    /// Resolves settings from the merged configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError::InvalidStartTime`] when `start_time` is
    /// textual but not a parsable timestamp. A scenario cannot proceed with
    /// an unparsable start time, so this aborts the composition.
    pub fn resolve(merged: &Mapping) -> Result<Self, ComposeError> {
        let scenario = merged
            .get("scenario")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_SCENARIO_NAME)
            .to_string();

        let start_time = match merged.get("start_time") {
            Some(Value::String(text)) => parse_start_time(text)?,
            _ => default_start_time(),
        };

        let end_time = merged
            .get("end_time")
            .and_then(Value::as_i64)
            .unwrap_or(DEFAULT_END_TIME);

        Ok(Self {
            scenario,
            start_time,
            end_time,
        })
    }
}

/// Parses a scenario start time, accepting `T` or space as the separator.
fn parse_start_time(text: &str) -> Result<NaiveDateTime, ComposeError> {
    let trimmed = text.trim();
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S"))
        .map_err(|source| ComposeError::InvalidStartTime {
            value: text.to_string(),
            source,
        })
}

fn default_start_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2012, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("literal default date is valid")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::document::parse_document;

    fn doc(text: &str) -> Mapping {
        parse_document(text, "test").unwrap()
    }

    #[test]
    fn all_defaults_apply_to_an_empty_document() {
        let settings = ScenarioSettings::resolve(&doc("")).unwrap();
        assert_eq!(settings.scenario, DEFAULT_SCENARIO_NAME);
        assert_eq!(settings.start_time, default_start_time());
        assert_eq!(settings.end_time, DEFAULT_END_TIME);
    }

    #[test]
    fn explicit_settings_are_taken() {
        let settings = ScenarioSettings::resolve(&doc(
            "scenario: Microgrid\nstart_time: \"2020-05-04 12:30:00\"\nend_time: 96",
        ))
        .unwrap();
        assert_eq!(settings.scenario, "Microgrid");
        assert_eq!(
            settings.start_time,
            NaiveDate::from_ymd_opt(2020, 5, 4)
                .unwrap()
                .and_hms_opt(12, 30, 0)
                .unwrap()
        );
        assert_eq!(settings.end_time, 96);
    }

    #[test]
    fn t_separated_start_time_parses() {
        let settings =
            ScenarioSettings::resolve(&doc("start_time: \"2019-01-31T06:00:00\"")).unwrap();
        assert_eq!(
            settings.start_time,
            NaiveDate::from_ymd_opt(2019, 1, 31)
                .unwrap()
                .and_hms_opt(6, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn unparsable_start_time_is_fatal() {
        let err = ScenarioSettings::resolve(&doc("start_time: \"next tuesday\"")).unwrap_err();
        assert!(matches!(err, ComposeError::InvalidStartTime { .. }));
        assert!(err.to_string().contains("next tuesday"));
    }

    #[test]
    fn non_textual_start_time_falls_back_to_default() {
        let settings = ScenarioSettings::resolve(&doc("start_time: 42")).unwrap();
        assert_eq!(settings.start_time, default_start_time());
    }

    #[test]
    fn non_integer_end_time_falls_back_to_default() {
        let settings = ScenarioSettings::resolve(&doc("end_time: soon")).unwrap();
        assert_eq!(settings.end_time, DEFAULT_END_TIME);
    }
}
