//! Heuristic resolution of placeholder call labels.
//!
//! The profiler prints `<lambda>` for anonymous functions and `__init__`
//! for constructor entry points. Both can usually be rewritten to a
//! human-meaningful name by re-reading the target file's source text.
//! Resolution is best-effort: a miss leaves the label unchanged, and only
//! self-referential `<lambda>` artifacts are dropped outright.

use regex::Regex;

use std::collections::BTreeMap;

use crate::ProfileModel;

const LAMBDA_LABEL: &str = "<lambda>";
const INIT_LABEL: &str = "__init__";

/// Read-only source lookup, constructed once per run from the model before
/// any call list is mutated. Maps a raw file path to its ordered
/// (line number, source text) pairs.
struct SourceTable {
    by_path: BTreeMap<String, Vec<(u32, String)>>,
}

impl SourceTable {
    fn from_model(model: &ProfileModel) -> Self {
        let mut by_path = BTreeMap::new();
        for file in model.files.values() {
            let lines = file
                .lines
                .iter()
                .map(|l| (l.line_number, l.code.clone()))
                .collect();
            by_path.insert(file.name.clone(), lines);
        }
        Self { by_path }
    }

    fn code_at(&self, path: &str, number: u32) -> Option<&str> {
        let lines = self.by_path.get(path)?;
        let idx = lines.binary_search_by_key(&number, |(n, _)| *n).ok()?;
        Some(lines[idx].1.as_str())
    }

    /// Source lines of `path` at or before `number`, nearest first.
    fn backward_from<'a>(
        &'a self,
        path: &str,
        number: u32,
    ) -> Option<impl Iterator<Item = &'a str>> {
        let lines = self.by_path.get(path)?;
        let upper = lines.partition_point(|(n, _)| *n <= number);
        Some(lines[..upper].iter().rev().map(|(_, code)| code.as_str()))
    }
}

struct Patterns {
    lambda_binding: Regex,
    cls_receiver: Regex,
    class_decl: Regex,
}

impl Patterns {
    fn new() -> Self {
        Self {
            lambda_binding: Regex::new(r"(\w+)\s*=\s*lambda").expect("static pattern"),
            cls_receiver: Regex::new(r"\bcls\(").expect("static pattern"),
            class_decl: Regex::new(r"class\s+(\w+)\(").expect("static pattern"),
        }
    }
}

enum Resolution {
    Keep,
    Drop,
}

/// Rewrite placeholder labels across the whole model. Idempotent: resolved
/// labels no longer match a placeholder, so a second pass is a no-op.
pub fn resolve_calls(model: &mut ProfileModel) {
    let table = SourceTable::from_model(model);
    let patterns = Patterns::new();

    for file in model.files.values_mut() {
        let owner_path = file.name.clone();
        for line in file.lines.iter_mut() {
            let owned = std::mem::take(&mut line.calls);
            let mut kept = Vec::with_capacity(owned.len());
            for mut call in owned {
                let outcome = if call.entry_point == LAMBDA_LABEL {
                    resolve_lambda(&mut call, &owner_path, line.line_number, &table, &patterns)
                } else if call.entry_point == INIT_LABEL {
                    resolve_init(&mut call, &line.code, &table, &patterns)
                } else {
                    Resolution::Keep
                };
                match outcome {
                    Resolution::Keep => kept.push(call),
                    Resolution::Drop => {}
                }
            }
            line.calls = kept;
        }
    }
}

/// A `<lambda>` call back to its own line is a profiler artifact carrying
/// no information; drop it. Otherwise look for `name = lambda` on the
/// target line and take the bound name.
fn resolve_lambda(
    call: &mut crate::Call,
    owner_path: &str,
    owner_line: u32,
    table: &SourceTable,
    patterns: &Patterns,
) -> Resolution {
    if call.target_file == owner_path && call.target_line == owner_line {
        return Resolution::Drop;
    }

    let Some(code) = table.code_at(&call.target_file, call.target_line) else {
        tracing::debug!(file = %call.target_file, "lambda target not in model; label kept");
        return Resolution::Keep;
    };
    if let Some(caps) = patterns.lambda_binding.captures(code) {
        call.entry_point = caps[1].to_string();
    }
    Resolution::Keep
}

/// `__init__` resolves to the `cls(` receiver on the calling line when
/// present, otherwise to the nearest enclosing `class Name(` declaration
/// found scanning backward through the target file.
fn resolve_init(
    call: &mut crate::Call,
    caller_code: &str,
    table: &SourceTable,
    patterns: &Patterns,
) -> Resolution {
    if patterns.cls_receiver.is_match(caller_code) {
        call.entry_point = "cls".to_string();
        return Resolution::Keep;
    }

    let Some(backward) = table.backward_from(&call.target_file, call.target_line) else {
        tracing::debug!(file = %call.target_file, "constructor target not in model; label kept");
        return Resolution::Keep;
    };
    for code in backward {
        if let Some(caps) = patterns.class_decl.captures(code) {
            call.entry_point = caps[1].to_string();
            return Resolution::Keep;
        }
    }
    Resolution::Keep
}
