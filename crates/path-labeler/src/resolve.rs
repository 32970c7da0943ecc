//! Label resolution: match every changed file against every pattern and
//! collect the labels of the patterns that hit.

use tracing::debug;

use crate::pattern::{PathPattern, PatternError};
use crate::types::{ChangedFile, LabelSet, PathLabelMap};

/// Compiled pattern -> label rules
#[derive(Debug, Clone)]
pub struct LabelRules {
    rules: Vec<(PathPattern, String)>,
}

impl LabelRules {
    /// Compile every pattern in `map`.
    ///
    /// # Errors
    ///
    /// Returns the first [`PatternError`] encountered.
    pub fn compile(map: &PathLabelMap) -> Result<Self, PatternError> {
        let rules = map
            .iter()
            .map(|(pattern, label)| Ok((PathPattern::new(pattern)?, label.to_string())))
            .collect::<Result<Vec<_>, PatternError>>()?;

        Ok(Self { rules })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Resolve the labels for a set of changed files.
    ///
    /// Every (file, rule) pair is evaluated; a file may contribute several
    /// labels and a label contributed by several files appears once.
    #[must_use]
    pub fn resolve(&self, files: &[ChangedFile]) -> LabelSet {
        let mut labels = LabelSet::new();

        for file in files {
            for (pattern, label) in &self.rules {
                if pattern.matches(&file.filename) {
                    debug!(
                        file = %file.filename,
                        pattern = %pattern,
                        label = %label,
                        "Pattern matched"
                    );
                    labels.insert(label);
                }
            }
        }

        labels
    }
}

/// Compile `map` and resolve the labels for `files` in one step.
///
/// # Errors
///
/// Returns [`PatternError`] if any pattern in `map` does not compile.
pub fn resolve_labels(
    files: &[ChangedFile],
    map: &PathLabelMap,
) -> Result<LabelSet, PatternError> {
    Ok(LabelRules::compile(map)?.resolve(files))
}
