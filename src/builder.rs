//! Assembling the profile model from the raw artifact text.

use crate::sections::{FILE_MARKER, RULE_MARKER, Sections, split_sections};
use crate::{
    Call, FilePatch, Line, ProfileModel, SummaryPatch, file_key, record,
};

/// Parse the complete artifact into a [`ProfileModel`]. Parse-level
/// anomalies degrade gracefully: unmatched lines are skipped, unparsable
/// numbers become zero, orphan call records are dropped with a warning.
pub fn build_model(text: &str) -> ProfileModel {
    let lines: Vec<&str> = text.lines().collect();

    let mut model = ProfileModel::default();
    let mut sections = Sections::new(&lines, FILE_MARKER);

    if let Some(summary_section) = sections.next() {
        model.summary = parse_summary_section(summary_section).into_summary();
    }

    for section in sections {
        let patch = parse_file_section(section);
        if patch.is_empty() {
            continue;
        }
        let file = patch.into_file();
        model.files.insert(file_key(&file.name), file);
    }

    tracing::debug!(
        files = model.files.len(),
        total_duration = model.summary.total_duration,
        "parsed profile artifact"
    );
    model
}

fn parse_summary_section(section: &[&str]) -> SummaryPatch {
    let mut patch = SummaryPatch::default();
    for line in section {
        if line.starts_with(record::COMMAND_LINE_PREFIX) {
            patch = patch.merge(SummaryPatch {
                command_line: Some(record::command_line(line)),
                ..Default::default()
            });
        }
        if line.starts_with(record::TOTAL_DURATION_PREFIX) {
            patch = patch.merge(SummaryPatch {
                total_duration: Some(record::total_duration(line)),
                ..Default::default()
            });
        }
    }
    patch
}

fn parse_file_section(section: &[&str]) -> FilePatch {
    let mut patch = FilePatch::default();
    for sub in split_sections(section, RULE_MARKER) {
        patch = patch.merge(parse_header_block(sub));
        let body = parse_record_block(sub);
        if body.lines.is_some() {
            patch = patch.merge(body);
        }
    }
    if let Some(lines) = patch.lines.as_mut() {
        scrub_call_marker_lines(lines);
    }
    patch
}

fn parse_header_block(sub: &[&str]) -> FilePatch {
    let mut patch = FilePatch::default();
    for line in sub {
        if line.starts_with(FILE_MARKER) {
            patch = patch.merge(FilePatch {
                name: Some(record::file_name(line)),
                ..Default::default()
            });
        }
        if line.starts_with(record::FILE_DURATION_PREFIX) {
            patch = patch.merge(FilePatch {
                duration: Some(record::file_duration(line)),
                percentage: Some(record::file_percentage(line)),
                ..Default::default()
            });
        }
    }
    patch
}

/// Parse the pipe-delimited record block. A call record annotates the line
/// record immediately preceding it; a call with no preceding line is a
/// malformed-input condition and is dropped rather than failing the run.
fn parse_record_block(sub: &[&str]) -> FilePatch {
    let mut lines: Vec<Line> = Vec::new();
    let mut saw_records = false;

    for raw in sub {
        if let Some(rec) = record::parse_line(raw) {
            saw_records = true;
            lines.push(Line {
                line_number: rec.line_number,
                hits: rec.hits,
                time: rec.time,
                time_per_hit: rec.time_per_hit,
                percentage: rec.percentage,
                code: rec.code,
                calls: Vec::new(),
                called_from: Vec::new(),
            });
        } else if let Some(rec) = record::parse_call(raw) {
            saw_records = true;
            match lines.last_mut() {
                Some(owner) => owner.calls.push(Call {
                    hits: rec.hits,
                    time: rec.time,
                    time_per_hit: rec.time_per_hit,
                    percentage: rec.percentage,
                    target_file: rec.target_file,
                    target_line: rec.target_line,
                    entry_point: rec.entry_point,
                }),
                None => {
                    tracing::warn!(record = %raw, "dropping orphan call record");
                }
            }
        }
    }

    FilePatch {
        lines: saw_records.then_some(lines),
        ..Default::default()
    }
}

/// The profiler occasionally emits `(call)` text as the *source* of a line
/// record. Those lines carry no real source text; remove them.
fn scrub_call_marker_lines(lines: &mut Vec<Line>) {
    lines.retain(|line| !line.code.trim_start().starts_with("(call)"));
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTIFACT: &str = "\
Command line: ['to_html.py']
Total duration: 12.5s
File: to_html.py
File duration: 10.0s (80.00%)
Line #|      Hits|         Time| Time per hit|      %|Source code
------+----------+-------------+-------------+-------+-----------
     1|         2|   4.1008e-05|   2.0504e-05|  0.00%|import os
     2|        10|     0.100000|     0.010000|  0.80%|helper()
(call)|        10|     0.010000|     0.001000|  0.08%|# other.py:5 helper
     3|         0|     0.000000|     0.000000|  0.00%|
File: other.py
File duration: 2.5s (20.00%)
Line #|      Hits|         Time| Time per hit|      %|Source code
------+----------+-------------+-------------+-------+-----------
     5|        10|     0.010000|     0.001000|  0.08%|def helper():
";

    #[test]
    fn full_artifact_builds_summary_and_files() {
        let model = build_model(ARTIFACT);
        assert_eq!(model.summary.command_line, "to_html.py");
        assert_eq!(model.summary.total_duration, 12.5);
        assert_eq!(model.files.len(), 2);

        let file = model.file_by_path("to_html.py").expect("file");
        assert_eq!(file.duration, 10.0);
        assert_eq!(file.percentage, 80.0);
        assert_eq!(file.lines.len(), 3);
    }

    #[test]
    fn call_records_thread_onto_the_preceding_line() {
        let model = build_model(ARTIFACT);
        let file = model.file_by_path("to_html.py").expect("file");
        let line = file.line(2).expect("line 2");
        assert_eq!(line.calls.len(), 1);
        assert_eq!(line.calls[0].target_file, "other.py");
        assert_eq!(line.calls[0].target_line, 5);
        assert_eq!(line.calls[0].entry_point, "helper");
        assert!(file.line(1).expect("line 1").calls.is_empty());
    }

    #[test]
    fn orphan_call_record_is_dropped_not_fatal() {
        let artifact = "\
File: x.py
File duration: 1.0s (100.00%)
------+----------+-------------+-------------+-------+-----------
(call)|         1|     0.100000|     0.100000|  1.00%|# y.py:3 f
     1|         1|     0.100000|     0.100000|  1.00%|pass
";
        let model = build_model(artifact);
        let file = model.file_by_path("x.py").expect("file");
        assert_eq!(file.lines.len(), 1);
        assert!(file.lines[0].calls.is_empty());
    }

    #[test]
    fn call_marker_source_lines_are_scrubbed() {
        let artifact = "\
File: x.py
File duration: 1.0s (100.00%)
------+----------+-------------+-------------+-------+-----------
     1|         1|     0.100000|     0.100000|  1.00%|pass
     2|         1|     0.100000|     0.100000|  1.00%|(call)|# y.py:3 f
";
        let model = build_model(artifact);
        let file = model.file_by_path("x.py").expect("file");
        assert_eq!(file.lines.len(), 1);
        assert_eq!(file.lines[0].line_number, 1);
    }

    #[test]
    fn empty_artifact_builds_empty_model() {
        let model = build_model("");
        assert_eq!(model.summary.command_line, "");
        assert_eq!(model.summary.total_duration, 0.0);
        assert!(model.files.is_empty());
    }

    #[test]
    fn malformed_summary_lines_degrade_to_defaults() {
        let model = build_model("Command line: broken\nTotal duration: abc\n");
        assert_eq!(model.summary.command_line, "");
        assert_eq!(model.summary.total_duration, 0.0);
    }
}
