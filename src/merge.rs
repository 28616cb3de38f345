//! Right-biased structural merge of independently-parsed fragments.
//!
//! The dump interleaves the pieces of one entity (a file's name arrives on
//! a different line than its duration), so each parser produces a partial
//! patch and the builder folds patches together. The merge is associative
//! and right-biased: a field present on the right always wins, and nothing
//! needs to pre-exist on the left.

use crate::{FileProfile, Line, Summary};

/// Partial summary assembled from the artifact's leading section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryPatch {
    pub command_line: Option<String>,
    pub total_duration: Option<f64>,
}

impl SummaryPatch {
    pub fn merge(self, other: Self) -> Self {
        Self {
            command_line: other.command_line.or(self.command_line),
            total_duration: other.total_duration.or(self.total_duration),
        }
    }

    pub fn into_summary(self) -> Summary {
        Summary {
            command_line: self.command_line.unwrap_or_default(),
            total_duration: self.total_duration.unwrap_or_default(),
        }
    }
}

/// Partial file profile assembled from a file section's header block and
/// record body.
#[derive(Debug, Clone, Default)]
pub struct FilePatch {
    pub name: Option<String>,
    pub duration: Option<f64>,
    pub percentage: Option<f64>,
    pub lines: Option<Vec<Line>>,
}

impl FilePatch {
    pub fn merge(self, other: Self) -> Self {
        Self {
            name: other.name.or(self.name),
            duration: other.duration.or(self.duration),
            percentage: other.percentage.or(self.percentage),
            lines: other.lines.or(self.lines),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.duration.is_none()
            && self.percentage.is_none()
            && self.lines.is_none()
    }

    pub fn into_file(self) -> FileProfile {
        FileProfile {
            name: self.name.unwrap_or_default(),
            duration: self.duration.unwrap_or_default(),
            percentage: self.percentage.unwrap_or_default(),
            lines: self.lines.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_is_right_biased() {
        let a = SummaryPatch {
            command_line: Some("a.py".to_string()),
            total_duration: Some(1.0),
        };
        let b = SummaryPatch {
            command_line: Some("b.py".to_string()),
            total_duration: None,
        };
        let merged = a.merge(b);
        assert_eq!(merged.command_line.as_deref(), Some("b.py"));
        assert_eq!(merged.total_duration, Some(1.0));
    }

    #[test]
    fn merge_is_associative_for_disjoint_fields() {
        let a = FilePatch {
            name: Some("x.py".to_string()),
            ..Default::default()
        };
        let b = FilePatch {
            duration: Some(2.5),
            ..Default::default()
        };
        let c = FilePatch {
            percentage: Some(50.0),
            ..Default::default()
        };

        let left = a.clone().merge(b.clone()).merge(c.clone());
        let right = a.merge(b.merge(c));
        assert_eq!(left.name, right.name);
        assert_eq!(left.duration, right.duration);
        assert_eq!(left.percentage, right.percentage);
    }

    #[test]
    fn merge_does_not_require_fields_on_the_left() {
        let merged = FilePatch::default().merge(FilePatch {
            name: Some("y.py".to_string()),
            ..Default::default()
        });
        assert_eq!(merged.name.as_deref(), Some("y.py"));
    }

    #[test]
    fn finalize_applies_documented_defaults() {
        let summary = SummaryPatch::default().into_summary();
        assert_eq!(summary.command_line, "");
        assert_eq!(summary.total_duration, 0.0);

        let file = FilePatch::default().into_file();
        assert_eq!(file.name, "");
        assert!(file.lines.is_empty());
    }
}
