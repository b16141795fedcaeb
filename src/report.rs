//! Billing report payloads.

use crate::error::Result;
use serde_json::Value;
use std::io::Write;

/// A billing report body as returned by the API.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub body: Value,
}

impl Report {
    /// Unwraps one level of `data` when the server wraps the payload.
    pub fn from_json(raw: Value) -> Self {
        let body = match raw {
            Value::Object(mut map) if map.contains_key("data") => {
                map.remove("data").unwrap_or(Value::Null)
            }
            other => other,
        };
        Report { body }
    }

    /// Pretty JSON with two-space indentation.
    ///
    /// `serde_json::Map` is ordered by key, so objects come out sorted.
    pub fn render(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.body).map_err(std::io::Error::from)?)
    }

    /// Writes the rendered report followed by a newline.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writeln!(writer, "{}", self.render()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwraps_data() {
        let report = Report::from_json(json!({"data": {"total": 12.5}}));
        assert_eq!(report.body, json!({"total": 12.5}));
    }

    #[test]
    fn test_unwrap_is_idempotent() {
        let inner = json!({"cost": [1, 2], "currency": "USD"});
        assert_eq!(
            Report::from_json(json!({"data": inner.clone()})),
            Report::from_json(inner)
        );
    }

    #[test]
    fn test_passes_through_unwrapped() {
        let raw = json!([{"month": 1}]);
        assert_eq!(Report::from_json(raw.clone()).body, raw);
    }

    #[test]
    fn test_unwraps_only_one_level() {
        let report = Report::from_json(json!({"data": {"data": 1}}));
        assert_eq!(report.body, json!({"data": 1}));
    }

    #[test]
    fn test_render_sorts_keys() {
        let report = Report::from_json(json!({"zeta": 1, "alpha": {"b": 2, "a": 1}}));
        assert_eq!(
            report.render().unwrap(),
            "{\n  \"alpha\": {\n    \"a\": 1,\n    \"b\": 2\n  },\n  \"zeta\": 1\n}"
        );
    }
}
