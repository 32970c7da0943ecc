//! Core data types shared by the matcher, the resolver and the GitHub client.

use std::collections::HashSet;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::LabelerError;

/// Repository coordinates (`owner/name`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRef {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse an `owner/repo` string.
    ///
    /// # Errors
    ///
    /// Returns [`LabelerError::Context`] if the value is not exactly two
    /// non-empty segments separated by `/`.
    pub fn parse(value: &str) -> Result<Self, LabelerError> {
        match value.split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(Self::new(owner, name))
            }
            _ => Err(LabelerError::Context(format!(
                "invalid repository '{value}', expected 'owner/repo'"
            ))),
        }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Change status of a file in a pull request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Added,
    Removed,
    Modified,
    Renamed,
    Copied,
    Changed,
    Unchanged,
    #[serde(other)]
    Unknown,
}

/// A file changed by a pull request, as reported by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedFile {
    /// Path relative to the repository root
    pub filename: String,

    /// Change status
    #[serde(default = "unknown_status")]
    pub status: FileStatus,

    /// Previous path for renamed files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_filename: Option<String>,
}

fn unknown_status() -> FileStatus {
    FileStatus::Unknown
}

impl ChangedFile {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            status: FileStatus::Modified,
            previous_filename: None,
        }
    }
}

/// Mapping of path patterns to label names.
///
/// Entries keep the order in which their patterns first appeared in the
/// serialized input. Inserting an existing pattern replaces its label in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathLabelMap {
    entries: Vec<(String, String)>,
}

impl PathLabelMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pattern, returning the label it previously mapped to.
    pub fn insert(
        &mut self,
        pattern: impl Into<String>,
        label: impl Into<String>,
    ) -> Option<String> {
        let pattern = pattern.into();
        let label = label.into();

        if let Some((_, existing)) = self.entries.iter_mut().find(|(p, _)| *p == pattern) {
            return Some(std::mem::replace(existing, label));
        }

        self.entries.push((pattern, label));
        None
    }

    /// Look up the label for a pattern
    #[must_use]
    pub fn get(&self, pattern: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(p, _)| p == pattern)
            .map(|(_, label)| label.as_str())
    }

    /// Iterate `(pattern, label)` pairs in input order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(pattern, label)| (pattern.as_str(), label.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<P: Into<String>, L: Into<String>> FromIterator<(P, L)> for PathLabelMap {
    fn from_iter<I: IntoIterator<Item = (P, L)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (pattern, label) in iter {
            map.insert(pattern, label);
        }
        map
    }
}

impl<'de> Deserialize<'de> for PathLabelMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PathLabelVisitor;

        impl<'de> Visitor<'de> for PathLabelVisitor {
            type Value = PathLabelMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of path patterns to label names")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = PathLabelMap::new();
                while let Some((pattern, label)) = access.next_entry::<String, String>()? {
                    map.insert(pattern, label);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(PathLabelVisitor)
    }
}

/// Deduplicated label names in order of first insertion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSet {
    labels: Vec<String>,
    seen: HashSet<String>,
}

impl LabelSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a label; returns `false` if it was already present.
    pub fn insert(&mut self, label: &str) -> bool {
        if self.seen.contains(label) {
            return false;
        }
        self.seen.insert(label.to_string());
        self.labels.push(label.to_string());
        true
    }

    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.seen.contains(label)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.labels
    }

    /// Join labels with `separator`, in insertion order
    #[must_use]
    pub fn join(&self, separator: &str) -> String {
        self.labels.join(separator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_ref_parse() {
        let repo = RepoRef::parse("octo/widgets").unwrap();
        assert_eq!(repo.owner, "octo");
        assert_eq!(repo.name, "widgets");
        assert_eq!(repo.to_string(), "octo/widgets");
    }

    #[test]
    fn test_repo_ref_parse_rejects_malformed() {
        assert!(RepoRef::parse("widgets").is_err());
        assert!(RepoRef::parse("/widgets").is_err());
        assert!(RepoRef::parse("octo/").is_err());
        assert!(RepoRef::parse("octo/widgets/extra").is_err());
    }

    #[test]
    fn test_path_label_map_keeps_first_position() {
        let mut map = PathLabelMap::new();
        assert!(map.insert("src/**", "backend").is_none());
        map.insert("*.md", "docs");
        assert_eq!(map.insert("src/**", "server").as_deref(), Some("backend"));

        let entries: Vec<_> = map.iter().collect();
        assert_eq!(entries, vec![("src/**", "server"), ("*.md", "docs")]);
    }

    #[test]
    fn test_path_label_map_deserialize_preserves_order() {
        let map: PathLabelMap =
            serde_json::from_str(r#"{"z/**": "last", "a/**": "first"}"#).unwrap();
        let patterns: Vec<_> = map.iter().map(|(p, _)| p).collect();
        assert_eq!(patterns, vec!["z/**", "a/**"]);
    }

    #[test]
    fn test_path_label_map_rejects_non_string_label() {
        let result: Result<PathLabelMap, _> = serde_json::from_str(r#"{"src/**": 1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_path_label_map_rejects_non_mapping() {
        assert!(serde_json::from_str::<PathLabelMap>(r#"["src/**"]"#).is_err());
        assert!(serde_json::from_str::<PathLabelMap>("null").is_err());
    }

    #[test]
    fn test_label_set_dedupes_in_insertion_order() {
        let mut labels = LabelSet::new();
        assert!(labels.insert("backend"));
        assert!(labels.insert("docs"));
        assert!(!labels.insert("backend"));

        assert_eq!(labels.len(), 2);
        assert_eq!(labels.join(","), "backend,docs");
        assert!(labels.contains("docs"));
    }

    #[test]
    fn test_changed_file_deserialize_github_shape() {
        let file: ChangedFile = serde_json::from_str(
            r#"{
                "sha": "bbcd538c8e72b8c175046e27cc8f907076331401",
                "filename": "docs/new.md",
                "status": "renamed",
                "previous_filename": "docs/old.md",
                "additions": 0,
                "deletions": 0
            }"#,
        )
        .unwrap();

        assert_eq!(file.filename, "docs/new.md");
        assert_eq!(file.status, FileStatus::Renamed);
        assert_eq!(file.previous_filename.as_deref(), Some("docs/old.md"));
    }

    #[test]
    fn test_changed_file_unknown_status() {
        let file: ChangedFile =
            serde_json::from_str(r#"{"filename": "a.txt", "status": "teleported"}"#).unwrap();
        assert_eq!(file.status, FileStatus::Unknown);

        let file: ChangedFile = serde_json::from_str(r#"{"filename": "a.txt"}"#).unwrap();
        assert_eq!(file.status, FileStatus::Unknown);
    }
}
