//! In-memory profile model: one summary plus one entity per profiled file.

use serde::{Deserialize, Serialize};

use std::collections::BTreeMap;

/// Invoked command line and total wall-clock duration. Immutable once the
/// builder finishes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Summary {
    pub command_line: String,
    pub total_duration: f64,
}

/// A directed, weighted edge: this line invoked code rooted at
/// (`target_file`, `target_line`). The entry-point label starts as printed
/// by the profiler and may be rewritten by the resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    pub hits: u64,
    pub time: f64,
    pub time_per_hit: f64,
    pub percentage: f64,
    pub target_file: String,
    pub target_line: u32,
    pub entry_point: String,
}

/// An aggregated incoming edge: (`file`, `line`) called the owning line
/// `hits` times in total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerEdge {
    pub file: String,
    pub line: u32,
    pub hits: u64,
}

/// One profiled source line. `called_from` stays empty until the reverse
/// graph pass runs; no numeric consistency between `hits` and `time` is
/// assumed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Line {
    pub line_number: u32,
    pub hits: u64,
    pub time: f64,
    pub time_per_hit: f64,
    pub percentage: f64,
    pub code: String,
    #[serde(default)]
    pub calls: Vec<Call>,
    #[serde(default)]
    pub called_from: Vec<CallerEdge>,
}

/// One profiled file. `name` preserves profiler pseudo-paths such as
/// `<string>` verbatim; `lines` are ordered by line number as they appear
/// in the artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileProfile {
    pub name: String,
    pub duration: f64,
    pub percentage: f64,
    pub lines: Vec<Line>,
}

impl FileProfile {
    /// Index of the line with this 1-based number, if present.
    pub fn line_index(&self, number: u32) -> Option<usize> {
        self.lines
            .binary_search_by_key(&number, |l| l.line_number)
            .ok()
    }

    /// The line with this 1-based number, if present.
    pub fn line(&self, number: u32) -> Option<&Line> {
        self.line_index(number).map(|i| &self.lines[i])
    }
}

/// The aggregate root: the run summary plus every file keyed by its
/// stable identity hash. BTreeMap keeps iteration deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileModel {
    pub summary: Summary,
    pub files: BTreeMap<String, FileProfile>,
}

impl ProfileModel {
    /// Look up a file by its raw path as printed in the artifact.
    pub fn file_by_path(&self, path: &str) -> Option<&FileProfile> {
        self.files.get(&file_key(path))
    }
}

/// Deterministic identity hash of a file path. Stable across runs and
/// platforms; collisions are irrelevant at realistic path cardinalities.
pub fn file_key(path: &str) -> String {
    let digest = blake3::hash(path.as_bytes());
    digest.to_hex().as_str()[..16].to_string()
}
