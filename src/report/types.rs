use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Column headers of the execution table, in row field order
pub const TABLE_HEADERS: [&str; 6] = [
    "Sl No",
    "Spec File Name",
    "Total TC",
    "Total Passed TC",
    "Total Failed TC",
    "Total Skipped TC",
];

/// Outcome of a test run as handed over by the harness.
///
/// Every field is optional and every counter is parsed leniently, so any JSON
/// object deserializes successfully. Absent counters stay `None` so the
/// aggregator can apply its fallback chain; present but non-numeric ones
/// become `Some(0)`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RunResult {
    #[serde(default, deserialize_with = "lenient::object")]
    pub stats: Option<RunStats>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub specs: Option<Vec<SpecResult>>,
}

impl RunResult {
    /// Convert an arbitrary JSON value. Non-object input yields an empty result.
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }
}

/// Run-level counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RunStats {
    #[serde(default, deserialize_with = "lenient::count")]
    pub tests: Option<u64>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub passes: Option<u64>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub failures: Option<u64>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub skipped: Option<u64>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub pending: Option<u64>,
}

/// Per-spec result. Explicit counters win over the embedded test list.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SpecResult {
    #[serde(default, deserialize_with = "lenient::text")]
    pub file: Option<String>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub total: Option<u64>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub passes: Option<u64>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub failures: Option<u64>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub skipped: Option<u64>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub tests: Option<Vec<TestEntry>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TestEntry {
    #[serde(default, deserialize_with = "lenient::text")]
    pub state: Option<String>,
}

/// First column of a report row: a 1-based position or the totals marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowIndex {
    Position(usize),
    Total,
}

impl fmt::Display for RowIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowIndex::Position(n) => write!(f, "{}", n),
            RowIndex::Total => f.write_str("--"),
        }
    }
}

impl Serialize for RowIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RowIndex::Position(n) => serializer.serialize_u64(*n as u64),
            RowIndex::Total => serializer.serialize_str("--"),
        }
    }
}

/// One line of the execution table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    #[serde(rename = "Sl No")]
    pub index: RowIndex,
    #[serde(rename = "Spec File Name")]
    pub spec_label: String,
    #[serde(rename = "Total TC")]
    pub total: u64,
    #[serde(rename = "Total Passed TC")]
    pub passed: u64,
    #[serde(rename = "Total Failed TC")]
    pub failed: u64,
    #[serde(rename = "Total Skipped TC")]
    pub skipped: u64,
}

impl ReportRow {
    /// Placeholder row used when real figures cannot be computed
    pub fn sentinel(label: &str) -> Self {
        Self {
            index: RowIndex::Position(1),
            spec_label: label.to_string(),
            total: 0,
            passed: 0,
            failed: 0,
            skipped: 0,
        }
    }

    pub fn is_total(&self) -> bool {
        self.index == RowIndex::Total
    }

    /// Cell values in `TABLE_HEADERS` order
    pub fn cells(&self) -> [String; 6] {
        [
            self.index.to_string(),
            self.spec_label.clone(),
            self.total.to_string(),
            self.passed.to_string(),
            self.failed.to_string(),
            self.skipped.to_string(),
        ]
    }
}

/// Coerce a JSON value into a non-negative counter.
///
/// `null` counts as absent. Numbers are truncated and negatives clamp to 0;
/// numeric strings are parsed; anything else is 0.
pub fn coerce_count(value: &Value) -> Option<u64> {
    match value {
        Value::Null => None,
        Value::Number(n) => Some(
            n.as_u64()
                .or_else(|| n.as_f64().map(clamp_float))
                .unwrap_or(0),
        ),
        Value::String(s) => Some(s.trim().parse::<f64>().map(clamp_float).unwrap_or(0)),
        _ => Some(0),
    }
}

fn clamp_float(f: f64) -> u64 {
    if f.is_finite() && f > 0.0 {
        f.trunc() as u64
    } else {
        0
    }
}

mod lenient {
    use super::coerce_count;
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
        let value = Value::deserialize(d)?;
        Ok(coerce_count(&value))
    }

    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        match Value::deserialize(d)? {
            Value::String(s) if !s.is_empty() => Ok(Some(s)),
            _ => Ok(None),
        }
    }

    /// Objects parse into `T`; anything else is treated as absent
    pub fn object<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        match Value::deserialize(d)? {
            value @ Value::Object(_) => Ok(serde_json::from_value(value).ok()),
            _ => Ok(None),
        }
    }

    /// Arrays parse element-wise; malformed elements fall back to `T::default()`
    pub fn list<'de, D, T>(d: D) -> Result<Option<Vec<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + Default,
    {
        match Value::deserialize(d)? {
            Value::Array(items) => Ok(Some(
                items
                    .into_iter()
                    .map(|item| match item {
                        Value::Object(_) => serde_json::from_value(item).unwrap_or_default(),
                        _ => T::default(),
                    })
                    .collect(),
            )),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_count() {
        assert_eq!(coerce_count(&json!(3)), Some(3));
        assert_eq!(coerce_count(&json!(-2)), Some(0));
        assert_eq!(coerce_count(&json!(2.7)), Some(2));
        assert_eq!(coerce_count(&json!("4")), Some(4));
        assert_eq!(coerce_count(&json!("abc")), Some(0));
        assert_eq!(coerce_count(&json!({"n": 1})), Some(0));
        assert_eq!(coerce_count(&Value::Null), None);
    }

    #[test]
    fn test_run_result_tolerates_partial_shape() {
        let result = RunResult::from_value(json!({
            "stats": {"tests": "NaN", "failures": 1},
            "specs": [{"file": 42, "tests": [{"state": "passed"}, 7]}, "junk"]
        }));

        let stats = result.stats.unwrap();
        assert_eq!(stats.tests, Some(0));
        assert_eq!(stats.failures, Some(1));
        assert_eq!(stats.skipped, None);

        let specs = result.specs.unwrap();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].file, None);
        assert_eq!(specs[0].tests.as_ref().map(|t| t.len()), Some(2));
        assert_eq!(specs[1], SpecResult::default());
    }

    #[test]
    fn test_non_object_input_is_empty() {
        assert_eq!(RunResult::from_value(json!([1, 2])), RunResult::default());
        assert_eq!(RunResult::from_value(json!(null)), RunResult::default());
    }

    #[test]
    fn test_row_serializes_with_table_headers() {
        let row = ReportRow {
            index: RowIndex::Total,
            spec_label: "Total".to_string(),
            total: 3,
            passed: 2,
            failed: 1,
            skipped: 0,
        };
        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["Sl No"], json!("--"));
        assert_eq!(value["Spec File Name"], json!("Total"));
        assert_eq!(value["Total Failed TC"], json!(1));
        assert_eq!(value.as_object().unwrap().len(), TABLE_HEADERS.len());
    }
}
