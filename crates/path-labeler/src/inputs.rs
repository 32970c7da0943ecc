//! Action inputs: the token and the pattern -> label mapping.

use std::fmt;

use tracing::debug;

use crate::error::LabelerError;
use crate::types::PathLabelMap;

pub const INPUT_GITHUB_TOKEN: &str = "github_token";
pub const INPUT_PATH_LABELS: &str = "path_labels";

/// Inputs as supplied by the runner, before validation
#[derive(Clone, Default)]
pub struct RawInputs {
    pub github_token: Option<String>,
    pub path_labels: Option<String>,
}

/// Validated inputs
#[derive(Clone)]
pub struct ActionInputs {
    pub github_token: String,
    pub path_labels: PathLabelMap,
}

impl ActionInputs {
    /// Validate raw inputs.
    ///
    /// Values are trimmed; a blank value counts as missing.
    ///
    /// # Errors
    ///
    /// Returns [`LabelerError::MissingInput`] for an absent input and
    /// [`LabelerError::InvalidPathLabels`] if `path_labels` is not a mapping of
    /// strings to strings.
    pub fn parse(raw: &RawInputs) -> Result<Self, LabelerError> {
        let github_token = required(INPUT_GITHUB_TOKEN, raw.github_token.as_deref())?;
        let path_labels = required(INPUT_PATH_LABELS, raw.path_labels.as_deref())?;
        let path_labels = parse_path_labels(&path_labels)?;

        debug!(patterns = path_labels.len(), "Parsed path labels");

        Ok(Self {
            github_token,
            path_labels,
        })
    }
}

fn required(name: &'static str, value: Option<&str>) -> Result<String, LabelerError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
        .ok_or(LabelerError::MissingInput(name))
}

/// Parse a serialized pattern -> label mapping.
///
/// JSON is tried first. Anything that is not valid JSON is read as YAML, so
/// block mappings written directly in a workflow file are accepted too.
///
/// # Errors
///
/// Returns [`LabelerError::InvalidPathLabels`] if the input is neither a JSON
/// object nor a YAML mapping with string values.
pub fn parse_path_labels(input: &str) -> Result<PathLabelMap, LabelerError> {
    let json_error = match serde_json::from_str::<PathLabelMap>(input) {
        Ok(map) => return Ok(map),
        Err(e) => e,
    };

    if input.trim_start().starts_with('{') {
        return Err(LabelerError::InvalidPathLabels(json_error.to_string()));
    }

    // An empty document (`---`, comments only) comes back as `None`
    serde_yaml::from_str::<Option<PathLabelMap>>(input)
        .map_err(|e| LabelerError::InvalidPathLabels(e.to_string()))?
        .ok_or_else(|| {
            LabelerError::InvalidPathLabels("expected a mapping of patterns to labels".to_string())
        })
}

impl fmt::Debug for RawInputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawInputs")
            .field("github_token", &self.github_token.as_ref().map(|_| "<redacted>"))
            .field("path_labels", &self.path_labels)
            .finish()
    }
}

impl fmt::Debug for ActionInputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionInputs")
            .field("github_token", &"<redacted>")
            .field("path_labels", &self.path_labels)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(token: Option<&str>, labels: Option<&str>) -> RawInputs {
        RawInputs {
            github_token: token.map(ToString::to_string),
            path_labels: labels.map(ToString::to_string),
        }
    }

    #[test]
    fn test_parse_json_mapping() {
        let inputs = ActionInputs::parse(&raw(
            Some("ghs_token"),
            Some(r#"{"src/**": "backend", "*.md": "docs"}"#),
        ))
        .unwrap();

        assert_eq!(inputs.github_token, "ghs_token");
        assert_eq!(inputs.path_labels.len(), 2);
        assert_eq!(inputs.path_labels.get("*.md"), Some("docs"));
    }

    #[test]
    fn test_parse_yaml_mapping() {
        let map = parse_path_labels("'src/**': backend\n'**/*.md': docs\n").unwrap();
        let entries: Vec<_> = map.iter().collect();
        assert_eq!(entries, vec![("src/**", "backend"), ("**/*.md", "docs")]);
    }

    #[test]
    fn test_missing_token() {
        let err = ActionInputs::parse(&raw(None, Some("{}"))).unwrap_err();
        assert!(matches!(err, LabelerError::MissingInput("github_token")));
        assert_eq!(
            err.to_string(),
            "Input required and not supplied: github_token"
        );
    }

    #[test]
    fn test_blank_path_labels_is_missing() {
        let err = ActionInputs::parse(&raw(Some("t"), Some("   \n"))).unwrap_err();
        assert!(matches!(err, LabelerError::MissingInput("path_labels")));
    }

    #[test]
    fn test_malformed_json_is_invalid() {
        let err = parse_path_labels(r#"{"src/**": "backend","#).unwrap_err();
        assert!(matches!(err, LabelerError::InvalidPathLabels(_)));
    }

    #[test]
    fn test_scalar_is_invalid() {
        let err = parse_path_labels("not a mapping").unwrap_err();
        assert!(matches!(err, LabelerError::InvalidPathLabels(_)));
    }

    #[test]
    fn test_empty_yaml_document_is_invalid() {
        for input in ["---", "# comment only", "---\n# nothing here\n", "null", "~"] {
            let err = parse_path_labels(input).unwrap_err();
            assert!(
                matches!(err, LabelerError::InvalidPathLabels(_)),
                "{input:?} was accepted"
            );
        }
    }

    #[test]
    fn test_empty_json_object_is_accepted() {
        assert!(parse_path_labels("{}").unwrap().is_empty());
        assert!(parse_path_labels(" { } ").unwrap().is_empty());
    }

    #[test]
    fn test_list_is_invalid() {
        assert!(parse_path_labels(r#"["src/**"]"#).is_err());
        assert!(parse_path_labels("- src/**\n- docs/**\n").is_err());
    }

    #[test]
    fn test_non_string_label_is_invalid() {
        let err = parse_path_labels(r#"{"src/**": ["a", "b"]}"#).unwrap_err();
        assert!(matches!(err, LabelerError::InvalidPathLabels(_)));
    }

    #[test]
    fn test_debug_redacts_token() {
        let inputs = ActionInputs::parse(&raw(Some("ghs_secret"), Some("{}"))).unwrap();
        assert!(!format!("{inputs:?}").contains("ghs_secret"));
        assert!(!format!("{:?}", raw(Some("ghs_secret"), None)).contains("ghs_secret"));
    }
}
