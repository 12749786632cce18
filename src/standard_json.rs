//! Serde model for the structured JSON input and the result object.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Top-level standard JSON input: `language`, `sources`, `settings`.
///
/// `sources` keeps JSON declaration order (the keys become source unit
/// names verbatim, and declaration order is VFS insertion order).
#[derive(Debug, Deserialize)]
pub struct StandardJsonInput {
    #[serde(default)]
    pub language: Option<String>,
    pub sources: IndexMap<String, SourceEntry>,
    #[serde(default)]
    pub settings: Settings,
}

/// A `sources` entry: inline content, or a URL fallback list handed to
/// the loader dispatcher.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SourceEntry {
    Content { content: String },
    Urls { urls: Vec<String> },
}

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub remappings: Vec<String>,
}

/// Result object printed on stdout in `--standard-json` mode.
#[derive(Debug, Default, Serialize)]
pub struct StandardJsonOutput {
    pub sources: IndexMap<String, SourceListing>,
    pub errors: Vec<OutputError>,
}

#[derive(Debug, Serialize)]
pub struct SourceListing {
    pub origin: &'static str,
    pub bytes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loaded_via: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OutputError {
    pub kind: &'static str,
    pub message: String,
}

impl From<&Error> for OutputError {
    fn from(err: &Error) -> Self {
        OutputError {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_content_and_urls_entries() {
        let input: StandardJsonInput = serde_json::from_str(
            r#"{
                "language": "Solidity",
                "sources": {
                    "a.sol": {"content": "contract A {}"},
                    "b.sol": {"urls": ["file:///tmp/b.sol", "https://h/b.sol"]}
                },
                "settings": {"remappings": ["lib/=vendor/lib/"]}
            }"#,
        )
        .unwrap();

        assert_eq!(input.language.as_deref(), Some("Solidity"));
        assert_eq!(input.settings.remappings, vec!["lib/=vendor/lib/"]);

        let keys: Vec<&String> = input.sources.keys().collect();
        assert_eq!(keys, vec!["a.sol", "b.sol"]);
        assert!(matches!(&input.sources["a.sol"], SourceEntry::Content { content } if content == "contract A {}"));
        assert!(matches!(&input.sources["b.sol"], SourceEntry::Urls { urls } if urls.len() == 2));
    }

    #[test]
    fn settings_are_optional() {
        let input: StandardJsonInput =
            serde_json::from_str(r#"{"sources": {"a.sol": {"content": ""}}}"#).unwrap();
        assert!(input.settings.remappings.is_empty());
        assert!(input.language.is_none());
    }

    #[test]
    fn source_keys_are_taken_verbatim() {
        let input: StandardJsonInput = serde_json::from_str(
            r#"{"sources": {"a/./b.sol": {"content": "x"}, "a//b.sol": {"content": "y"}}}"#,
        )
        .unwrap();
        let keys: Vec<&String> = input.sources.keys().collect();
        assert_eq!(keys, vec!["a/./b.sol", "a//b.sol"]);
    }
}
