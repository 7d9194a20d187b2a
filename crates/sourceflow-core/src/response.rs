//! Parsing of raw analyzer responses.
//!
//! Language models asked for "JSON only" still wrap it in markdown fences or
//! add a sentence around it. We peel those layers off before decoding.

use crate::record::FileAnalysis;
use tracing::warn;

/// Parses a raw analyzer response into a `FileAnalysis`.
///
/// Handles ```` ```json ```` fences, bare ```` ``` ```` fences and chatter
/// around the JSON object. If nothing parses, returns a record whose summary
/// explains the failure. Never errors.
pub fn parse_response(response: &str) -> FileAnalysis {
    let cleaned = extract_json(response);

    match serde_json::from_str::<serde_json::Value>(cleaned) {
        Ok(value) => FileAnalysis::from_value(&value),
        Err(e) => {
            let preview: String = cleaned.chars().take(100).collect();
            warn!("Failed to parse analyzer response as JSON ({}): {}...", e, preview);
            FileAnalysis::failed(e)
        }
    }
}

/// Narrows a response down to the JSON object it most likely contains.
fn extract_json(response: &str) -> &str {
    let mut cleaned = response.trim();

    for fence in ["```json", "```"] {
        if let Some(rest) = cleaned.strip_prefix(fence) {
            cleaned = rest.split("```").next().unwrap_or(rest);
            break;
        }
    }

    match (cleaned.find('{'), cleaned.rfind('}')) {
        (Some(start), Some(end)) if start < end => &cleaned[start..=end],
        _ => cleaned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_json() {
        let analysis = parse_response(r#"{"summary": "Parses args", "entry_points": ["main"]}"#);
        assert_eq!(analysis.summary, "Parses args");
        assert_eq!(analysis.entry_points, vec!["main"]);
    }

    #[test]
    fn test_json_fence() {
        let text = "```json\n{\"summary\": \"fenced\"}\n```\nHope this helps!";
        assert_eq!(parse_response(text).summary, "fenced");
    }

    #[test]
    fn test_bare_fence() {
        let text = "```\n{\"summary\": \"bare\"}\n```";
        assert_eq!(parse_response(text).summary, "bare");
    }

    #[test]
    fn test_surrounding_chatter() {
        let text = "Here is the analysis: {\"functions\": [{\"name\": \"f\"}]} Let me know.";
        let analysis = parse_response(text);
        assert_eq!(analysis.functions[0].name, "f");
    }

    #[test]
    fn test_unparsable_falls_back() {
        let analysis = parse_response("I could not analyze this file.");
        assert!(analysis.functions.is_empty());
        assert!(analysis.dependencies.is_empty());
        assert!(analysis.summary.starts_with("Analysis failed:"));
    }

    #[test]
    fn test_truncated_json_falls_back() {
        let analysis = parse_response(r#"{"functions": [{"name": "f", "calls": ["#);
        assert!(analysis.summary.starts_with("Analysis failed:"));
    }
}
