//! Per-file analysis records.
//!
//! A `FileAnalysis` is what the external analyzer reports for one source
//! file. The shape is fixed:
//!
//! ```json
//! {
//!   "functions": [ { "name", "description", "inputs", "outputs", "calls": [] } ],
//!   "dependencies": [],
//!   "entry_points": [],
//!   "summary": ""
//! }
//! ```
//!
//! but the values inside are whatever a language model produced, so decoding
//! goes through `serde_json::Value` and coerces field by field.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Name given to a function entry that arrives without one.
pub const UNKNOWN_NAME: &str = "unknown";

/// One function or class reported by the analyzer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FunctionEntry {
    /// Bare identifier. Not guaranteed unique across files.
    pub name: String,
    pub description: String,
    pub inputs: String,
    pub outputs: String,
    /// Called identifiers in the order the analyzer listed them.
    ///
    /// The order matters: path tracing follows the first resolvable callee.
    pub calls: Vec<String>,
}

impl FunctionEntry {
    /// Creates an entry with just a name and a call list.
    pub fn new(name: impl Into<String>, calls: Vec<String>) -> Self {
        Self {
            name: name.into(),
            calls,
            ..Default::default()
        }
    }

    /// Sets the description (builder style).
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Decodes an entry from a JSON object. Returns `None` for non-objects.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        Some(Self {
            name: obj
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or(UNKNOWN_NAME)
                .to_string(),
            description: text_field(obj, "description"),
            inputs: text_field(obj, "inputs"),
            outputs: text_field(obj, "outputs"),
            calls: list_field(obj, "calls"),
        })
    }
}

/// Everything the analyzer reports about a single file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileAnalysis {
    pub functions: Vec<FunctionEntry>,
    /// Declared dependencies: module names or file paths, as reported.
    pub dependencies: Vec<String>,
    pub entry_points: Vec<String>,
    pub summary: String,
}

impl FileAnalysis {
    /// Decodes a record from any JSON value. Never fails.
    ///
    /// A non-object value yields an empty record.
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };

        let functions = obj
            .get("functions")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(FunctionEntry::from_value).collect())
            .unwrap_or_default();

        Self {
            functions,
            dependencies: list_field(obj, "dependencies"),
            entry_points: list_field(obj, "entry_points"),
            summary: text_field(obj, "summary"),
        }
    }

    /// Record used when an analyzer response could not be understood.
    pub fn failed(reason: impl std::fmt::Display) -> Self {
        Self {
            summary: format!("Analysis failed: {}", reason),
            ..Default::default()
        }
    }

    /// Builder-style helpers, mostly for tests and fixtures.
    pub fn with_function(mut self, entry: FunctionEntry) -> Self {
        self.functions.push(entry);
        self
    }

    pub fn with_entry_point(mut self, name: impl Into<String>) -> Self {
        self.entry_points.push(name.into());
        self
    }

    pub fn with_dependency(mut self, dep: impl Into<String>) -> Self {
        self.dependencies.push(dep.into());
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }
}

impl<'de> Deserialize<'de> for FileAnalysis {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

impl<'de> Deserialize<'de> for FunctionEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value).unwrap_or_else(|| FunctionEntry::new(UNKNOWN_NAME, vec![])))
    }
}

/// Free-text field: strings as-is, null/missing empty, anything else as JSON text.
fn text_field(obj: &Map<String, Value>, key: &str) -> String {
    match obj.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Identifier list: an array of strings, or a lone string.
fn list_field(obj: &Map<String, Value>, key: &str) -> Vec<String> {
    match obj.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        Some(Value::String(s)) => vec![s.clone()],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_record() {
        let value = json!({
            "functions": [{
                "name": "main",
                "description": "Entry point",
                "inputs": "argv",
                "outputs": "exit code",
                "calls": ["parse_args", "run"]
            }],
            "dependencies": ["os", "utils.py"],
            "entry_points": ["main"],
            "summary": "CLI entry"
        });

        let analysis = FileAnalysis::from_value(&value);
        assert_eq!(analysis.functions.len(), 1);
        assert_eq!(analysis.functions[0].name, "main");
        assert_eq!(analysis.functions[0].calls, vec!["parse_args", "run"]);
        assert_eq!(analysis.dependencies, vec!["os", "utils.py"]);
        assert_eq!(analysis.entry_points, vec!["main"]);
        assert_eq!(analysis.summary, "CLI entry");
    }

    #[test]
    fn test_missing_keys_default_to_empty() {
        let analysis = FileAnalysis::from_value(&json!({}));
        assert_eq!(analysis, FileAnalysis::default());

        let analysis = FileAnalysis::from_value(&json!({"functions": [{"name": "f"}]}));
        let f = &analysis.functions[0];
        assert_eq!(f.description, "");
        assert_eq!(f.inputs, "");
        assert!(f.calls.is_empty());
    }

    #[test]
    fn test_garbled_fields_are_coerced() {
        let value = json!({
            "functions": [
                "not an object",
                {"description": "nameless", "calls": "helper"},
                {"name": "g", "inputs": ["a", "b"], "outputs": null, "calls": [1, "h", null]}
            ],
            "dependencies": 42,
            "entry_points": "g",
            "summary": {"text": "odd"}
        });

        let analysis = FileAnalysis::from_value(&value);
        assert_eq!(analysis.functions.len(), 2);
        assert_eq!(analysis.functions[0].name, UNKNOWN_NAME);
        assert_eq!(analysis.functions[0].calls, vec!["helper"]);
        assert_eq!(analysis.functions[1].inputs, r#"["a","b"]"#);
        assert_eq!(analysis.functions[1].outputs, "");
        assert_eq!(analysis.functions[1].calls, vec!["h"]);
        assert!(analysis.dependencies.is_empty());
        assert_eq!(analysis.entry_points, vec!["g"]);
        assert_eq!(analysis.summary, r#"{"text":"odd"}"#);
    }

    #[test]
    fn test_non_object_is_empty() {
        assert_eq!(FileAnalysis::from_value(&json!([1, 2])), FileAnalysis::default());
        assert_eq!(FileAnalysis::from_value(&json!(null)), FileAnalysis::default());
    }

    #[test]
    fn test_deserialize_goes_through_lenient_path() {
        let analysis: FileAnalysis =
            serde_json::from_str(r#"{"functions": [{"name": "x", "calls": "y"}], "summary": 3}"#)
                .unwrap();
        assert_eq!(analysis.functions[0].calls, vec!["y"]);
        assert_eq!(analysis.summary, "3");
    }
}
