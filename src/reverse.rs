//! Reverse call graph: who called this line.
//!
//! The artifact only records the forward direction. One pass over every
//! call builds an inverted index keyed by the call target; a second walk
//! attaches each line's incoming edges. Hit counts from the same source
//! line sum, they never overwrite.

use crate::{CallerEdge, ProfileModel, file_key};

use std::collections::BTreeMap;

/// (target file key, target line) → (source path, source line) → Σ hits.
pub type ReverseIndex = BTreeMap<(String, u32), BTreeMap<(String, u32), u64>>;

/// Single forward pass over every file's every line's every call.
pub fn build_reverse_index(model: &ProfileModel) -> ReverseIndex {
    let mut index = ReverseIndex::new();

    for file in model.files.values() {
        for line in &file.lines {
            for call in &line.calls {
                let target = (file_key(&call.target_file), call.target_line);
                let source = (file.name.clone(), line.line_number);
                *index.entry(target).or_default().entry(source).or_insert(0) += call.hits;
            }
        }
    }

    index
}

/// Attach each line's slice of the index as its `called_from` edges,
/// ordered by (source path, source line).
pub fn attach_reverse_edges(model: &mut ProfileModel, index: &ReverseIndex) {
    for (key, file) in model.files.iter_mut() {
        for line in file.lines.iter_mut() {
            let Some(sources) = index.get(&(key.clone(), line.line_number)) else {
                continue;
            };
            line.called_from = sources
                .iter()
                .map(|((path, number), hits)| CallerEdge {
                    file: path.clone(),
                    line: *number,
                    hits: *hits,
                })
                .collect();
        }
    }
}
