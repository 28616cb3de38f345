//! Rendering the summary/index page.

use crate::config::ReportLayout;
use crate::html::{self, ColumnSpec};
use crate::{FileProfile, ProfileModel};

/// Render `index.html`: the run summary plus one row per profiled file,
/// heaviest files first.
pub fn render_index_page(model: &ProfileModel, layout: &ReportLayout) -> String {
    let mut files: Vec<&FileProfile> = model.files.values().collect();
    files.sort_by(|a, b| {
        b.duration
            .partial_cmp(&a.duration)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });

    let columns = vec![
        ColumnSpec::new("file", None, "left", |file: &&FileProfile| {
            html::href(
                &html::page_file_name(&file.name),
                &html::escape(html::strip_pointy(&file.name)),
            )
        }),
        ColumnSpec::new("duration (sec)", Some(110), "right", |file: &&FileProfile| {
            format!("<pre>{:.4}</pre>", file.duration)
        }),
        ColumnSpec::new("duration (%)", Some(90), "right", |file: &&FileProfile| {
            format!("<pre>{:.2}</pre>", file.percentage)
        }),
        ColumnSpec::new("lines", Some(70), "right", |file: &&FileProfile| {
            format!("<pre>{}</pre>", file.lines.len())
        }),
    ];

    let mut body = String::new();
    body.push_str("<h2>profile summary</h2>\n");
    if !model.summary.command_line.is_empty() {
        body.push_str(&format!(
            "<b>Command line</b> : {}<br>\n",
            html::escape(&model.summary.command_line)
        ));
    }
    body.push_str(&format!(
        "<b>Total duration</b> : {} seconds<br>\n<b>Files</b> : {}<br>\n",
        model.summary.total_duration,
        files.len(),
    ));
    body.push_str("<hr>\n");
    body.push_str(&html::table(&columns, files.into_iter()));

    html::page("lineview - profile summary", &body, layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_model;

    const ARTIFACT: &str = "\
Command line: ['to_html.py']
Total duration: 12.5s
File: main.py
File duration: 10.0s (80.00%)
------+----------+-------------+-------------+-------+-----------
     1|         1|     0.010000|     0.010000|  1.00%|pass
File: other.py
File duration: 2.5s (20.00%)
------+----------+-------------+-------------+-------+-----------
     5|        10|     0.010000|     0.001000|  1.00%|def helper():
";

    #[test]
    fn index_lists_every_file_with_links() {
        let model = build_model(ARTIFACT);
        let page = render_index_page(&model, &ReportLayout::default());
        assert!(page.contains("to_html.py"));
        assert!(page.contains("12.5 seconds"));
        assert!(page.contains(&html::href("main_py.html", "main.py")));
        assert!(page.contains(&html::href("other_py.html", "other.py")));
    }

    #[test]
    fn files_are_ordered_heaviest_first() {
        let model = build_model(ARTIFACT);
        let page = render_index_page(&model, &ReportLayout::default());
        let main_at = page.find("main_py.html").expect("main row");
        let other_at = page.find("other_py.html").expect("other row");
        assert!(main_at < other_at);
    }

    #[test]
    fn empty_command_line_is_omitted() {
        let model = build_model("Total duration: 1.0s\n");
        let page = render_index_page(&model, &ReportLayout::default());
        assert!(!page.contains("Command line"));
    }
}
