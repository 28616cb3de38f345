//! The batch pipeline: artifact in, report directory out.

use std::path::{Path, PathBuf};

use crate::config::ReportLayout;
use crate::{
    LineviewResult, ProfileModel, attach_reverse_edges, build_model, build_reverse_index, html,
    render_file_page, render_index_page, resolve_calls,
};

/// Where the generated report landed. `index` is the entry point handed to
/// the report host.
#[derive(Debug, Clone)]
pub struct ReportPaths {
    pub out_dir: PathBuf,
    pub index: PathBuf,
    pub pages: usize,
}

/// Parse the artifact and run every model stage (reverse graph, call
/// resolution) without rendering. Used by the `inspect` command.
pub fn model_from_artifact(artifact: &Path) -> LineviewResult<ProfileModel> {
    let text = std::fs::read_to_string(artifact)?;
    let mut model = build_model(&text);
    let index = build_reverse_index(&model);
    attach_reverse_edges(&mut model, &index);
    resolve_calls(&mut model);
    Ok(model)
}

/// Run the whole pipeline. Every page is rendered in memory before the
/// first write so a render failure cannot leave a torn report behind;
/// `index.html` is written last so its presence implies the per-file
/// pages were all written.
pub fn process_artifact(
    artifact: &Path,
    out_dir: &Path,
    layout: &ReportLayout,
) -> LineviewResult<ReportPaths> {
    let model = model_from_artifact(artifact)?;

    let mut pages: Vec<(PathBuf, String)> = Vec::with_capacity(model.files.len());
    for file in model.files.values() {
        let page = render_file_page(&model, file, layout)?;
        pages.push((out_dir.join(html::page_file_name(&file.name)), page));
    }
    let index_page = render_index_page(&model, layout);

    std::fs::create_dir_all(out_dir)?;
    for (path, page) in &pages {
        std::fs::write(path, page)?;
        tracing::info!(page = %path.display(), "wrote report page");
    }
    let index = out_dir.join("index.html");
    std::fs::write(&index, index_page)?;
    tracing::info!(index = %index.display(), files = pages.len(), "report complete");

    Ok(ReportPaths {
        out_dir: out_dir.to_path_buf(),
        index,
        pages: pages.len(),
    })
}
