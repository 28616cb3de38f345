//! Rendering one HTML page per profiled file.

use regex::Regex;

use crate::config::ReportLayout;
use crate::html::{self, ColumnSpec};
use crate::{FileProfile, Line, LineviewError, LineviewResult, ProfileModel, highlight};

/// A listing row: the model line plus everything derived for display.
struct Row<'a> {
    line: &'a Line,
    total_time: f64,
    markup: String,
}

/// Render the complete page for `file`. Fails only when the highlighting
/// pass loses track of the line structure, which would corrupt the whole
/// layout.
pub fn render_file_page(
    model: &ProfileModel,
    file: &FileProfile,
    layout: &ReportLayout,
) -> LineviewResult<String> {
    let totals: Vec<f64> = file
        .lines
        .iter()
        .map(|l| l.time + l.calls.iter().map(|c| c.time).sum::<f64>())
        .collect();
    let max_total = totals.iter().copied().fold(0.0_f64, f64::max);

    let rows = build_rows(model, file, &totals)?;

    let mut body = String::new();
    body.push_str(&header_block(file));
    body.push_str("<hr>\n");
    body.push_str("<h2>most expensive lines</h2>\n");
    body.push_str(&most_expensive_table(&rows, max_total, layout));
    body.push_str("<h2>source code</h2>\n");
    body.push_str(&listing_table(&rows, max_total, layout));

    Ok(html::page(&format!("lineview - {}", file.name), &body, layout))
}

fn build_rows<'a>(
    model: &ProfileModel,
    file: &'a FileProfile,
    totals: &[f64],
) -> LineviewResult<Vec<Row<'a>>> {
    let source: Vec<&str> = file.lines.iter().map(|l| l.code.as_str()).collect();
    let fragments = highlight::highlight_python(&source.join("\n"));
    if !file.lines.is_empty() && fragments.len() != file.lines.len() {
        return Err(LineviewError::Render(format!(
            "highlighting of {} produced {} fragments for {} lines",
            file.name,
            fragments.len(),
            file.lines.len()
        )));
    }

    let mut rows = Vec::with_capacity(file.lines.len());
    for ((line, fragment), total_time) in file.lines.iter().zip(fragments).zip(totals) {
        let mut markup = fragment;
        for call in &line.calls {
            markup = link_call_site(model, &markup, call);
        }
        rows.push(Row {
            line,
            total_time: *total_time,
            markup,
        });
    }
    Ok(rows)
}

/// Turn whole-word occurrences of the call's entry-point label into a link
/// to the target file's anchor. Applied only outside existing tags so the
/// highlighting markup cannot be corrupted, and only for identifier-like
/// labels (unresolved placeholders like `<lambda>` stay plain text). Calls
/// whose target file is absent from the model render without a hyperlink.
fn link_call_site(model: &ProfileModel, markup: &str, call: &crate::Call) -> String {
    let label = call.entry_point.as_str();
    if label.is_empty() || !label.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return markup.to_string();
    }
    if model.file_by_path(&call.target_file).is_none() {
        tracing::debug!(file = %call.target_file, "call target not in model; no hyperlink");
        return markup.to_string();
    }

    let destination = format!(
        "{}#{}",
        html::page_file_name(&call.target_file),
        html::line_anchor(call.target_line)
    );
    let pattern = Regex::new(&format!(r"\b{}\b", regex::escape(label))).expect("escaped literal");

    let mut out = String::with_capacity(markup.len());
    let mut rest = markup;
    while let Some(open) = rest.find('<') {
        let (text, tail) = rest.split_at(open);
        out.push_str(&pattern.replace_all(text, html::href(&destination, label).as_str()));
        match tail.find('>') {
            Some(close) => {
                out.push_str(&tail[..=close]);
                rest = &tail[close + 1..];
            }
            None => {
                out.push_str(tail);
                return out;
            }
        }
    }
    out.push_str(&pattern.replace_all(rest, html::href(&destination, label).as_str()));
    out
}

fn header_block(file: &FileProfile) -> String {
    format!(
        "<div class=\"topnav\">{index}</div>\n<br><br>\n\
         <b>File name</b> : {name}<br>\n\
         <b>Duration (sec)</b> : {duration} seconds<br>\n\
         <b>Duration (perc)</b> : {percentage} &#37;<br>\n",
        index = html::href("index.html", "index"),
        name = html::escape(html::strip_pointy(&file.name)),
        duration = file.duration,
        percentage = file.percentage,
    )
}

fn pre(text: &str) -> String {
    format!("<pre>{text}</pre>")
}

fn blank_if_zero_f(value: f64, formatted: String) -> String {
    if value > 0.0 { formatted } else { String::new() }
}

/// Badges linking back to the heaviest callers of a line, ranked by
/// descending hit count. `called_from` is already ordered by source
/// (file, line), so ties break the same way on every run.
fn called_from_badges(line: &Line, layout: &ReportLayout) -> String {
    let mut edges: Vec<_> = line.called_from.iter().collect();
    edges.sort_by(|a, b| b.hits.cmp(&a.hits));
    edges.truncate(layout.max_call_badges);

    let badges: Vec<String> = edges
        .iter()
        .enumerate()
        .map(|(idx, edge)| {
            let destination = format!(
                "{}#{}",
                html::page_file_name(&edge.file),
                html::line_anchor(edge.line)
            );
            html::href(&destination, &(idx + 1).to_string())
        })
        .collect();
    badges.join("<div class=\"badge-gap\"></div>")
}

fn shared_columns<'a>(
    max_total: f64,
    layout: &'a ReportLayout,
) -> Vec<ColumnSpec<'a, &'a Row<'a>>> {
    vec![
        ColumnSpec::new("", Some(layout.box_width_px), "right", move |row: &&Row| {
            html::time_box(row.line.time, row.total_time, max_total, layout.box_width_px)
        }),
        ColumnSpec::new("hits", Some(70), "right", |row: &&Row| {
            if row.line.hits > 0 {
                pre(&row.line.hits.to_string())
            } else {
                String::new()
            }
        }),
        ColumnSpec::new("total time", Some(70), "right", |row: &&Row| {
            blank_if_zero_f(row.total_time, pre(&format!("{:.4}", row.total_time)))
        }),
        ColumnSpec::new("self time", Some(70), "right", |row: &&Row| {
            blank_if_zero_f(row.line.time, pre(&format!("{:.4}", row.line.time)))
        }),
        ColumnSpec::new("time per hit", Some(70), "right", |row: &&Row| {
            blank_if_zero_f(row.line.time_per_hit, pre(&format!("{:.2e}", row.line.time_per_hit)))
        }),
        ColumnSpec::new("called from", Some(50), "left", move |row: &&Row| {
            called_from_badges(row.line, layout)
        }),
    ]
}

fn most_expensive_table(rows: &[Row<'_>], max_total: f64, layout: &ReportLayout) -> String {
    // Top rows by total time, descending; the stable sort keeps artifact
    // order for ties.
    let mut ranked: Vec<&Row> = rows.iter().collect();
    ranked.sort_by(|a, b| {
        b.total_time
            .partial_cmp(&a.total_time)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked.truncate(layout.max_expensive_lines);

    let mut columns = vec![ColumnSpec::new("line", Some(40), "right", |row: &&Row| {
        html::href(
            &format!("#{}", html::line_anchor(row.line.line_number)),
            &row.line.line_number.to_string(),
        )
    })];
    columns.extend(shared_columns(max_total, layout));
    columns.push(ColumnSpec::new("", None, "left", |row: &&Row| {
        let fragments = highlight::highlight_python(row.line.code.trim_start());
        format!(
            "<div class=\"highlight\"><pre>{}</pre></div>",
            fragments.first().map(String::as_str).unwrap_or_default()
        )
    }));

    html::table(&columns, ranked.into_iter())
}

fn listing_table(rows: &[Row<'_>], max_total: f64, layout: &ReportLayout) -> String {
    let mut columns = vec![ColumnSpec::new("line", Some(40), "right", |row: &&Row| {
        format!(
            "<a name=\"{anchor}\">{number}</a>",
            anchor = html::line_anchor(row.line.line_number),
            number = row.line.line_number,
        )
    })];
    columns.extend(shared_columns(max_total, layout));
    columns.push(ColumnSpec::new("", None, "left", |row: &&Row| {
        format!("<div class=\"highlight\"><pre>{}</pre></div>", row.markup)
    }));

    html::table(&columns, rows.iter())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{build_model, attach_reverse_edges, build_reverse_index, resolve_calls};

    fn prepared_model(artifact: &str) -> ProfileModel {
        let mut model = build_model(artifact);
        let index = build_reverse_index(&model);
        attach_reverse_edges(&mut model, &index);
        resolve_calls(&mut model);
        model
    }

    const ARTIFACT: &str = "\
File: main.py
File duration: 1.0s (100.00%)
------+----------+-------------+-------------+-------+-----------
     1|         1|     0.010000|     0.010000|  1.00%|import other
     2|        10|     0.100000|     0.010000| 10.00%|other.helper()
(call)|        10|     0.010000|     0.001000|  1.00%|# other.py:5 helper
     3|         1|     0.010000|     0.010000|  1.00%|pass
File: other.py
File duration: 0.1s (10.00%)
------+----------+-------------+-------------+-------+-----------
     5|        10|     0.010000|     0.001000|  1.00%|def helper():
";

    #[test]
    fn target_page_shows_called_from_badge_linking_back() {
        let model = prepared_model(ARTIFACT);
        let file = model.file_by_path("other.py").expect("file");
        let page = render_file_page(&model, file, &ReportLayout::default()).expect("page");
        assert!(page.contains("main_py.html#line2"));
        assert!(page.contains("<a name=\"line5\">5</a>"));
    }

    #[test]
    fn call_sites_link_to_target_anchors() {
        let model = prepared_model(ARTIFACT);
        let file = model.file_by_path("main.py").expect("file");
        let page = render_file_page(&model, file, &ReportLayout::default()).expect("page");
        assert!(page.contains(&html::href("other_py.html#line5", "helper")));
    }

    #[test]
    fn calls_to_unknown_files_render_without_hyperlink() {
        let artifact = "\
File: a.py
File duration: 1.0s (100.00%)
------+----------+-------------+-------------+-------+-----------
     1|         1|     0.010000|     0.010000|  1.00%|ext()
(call)|         1|     0.001000|     0.001000|  0.10%|# vendor.py:3 ext
";
        let model = prepared_model(artifact);
        let file = model.file_by_path("a.py").expect("file");
        let page = render_file_page(&model, file, &ReportLayout::default()).expect("page");
        assert!(!page.contains("vendor_py.html"));
        assert!(page.contains("ext"));
    }

    #[test]
    fn link_insertion_matches_whole_words_only() {
        let artifact = "\
File: a.py
File duration: 1.0s (100.00%)
------+----------+-------------+-------------+-------+-----------
     1|         1|     0.010000|     0.010000|  1.00%|helpers = helper()
(call)|         1|     0.001000|     0.001000|  0.10%|# a.py:9 helper
     9|         1|     0.001000|     0.001000|  0.10%|def helper():
";
        let model = prepared_model(artifact);
        let file = model.file_by_path("a.py").expect("file");
        let page = render_file_page(&model, file, &ReportLayout::default()).expect("page");
        let link = html::href("a_py.html#line9", "helper");
        assert!(page.contains(&format!("helpers = {link}()")));
    }

    #[test]
    fn most_expensive_table_ranks_by_total_time() {
        let model = prepared_model(ARTIFACT);
        let file = model.file_by_path("main.py").expect("file");
        let page = render_file_page(&model, file, &ReportLayout::default()).expect("page");
        let expensive = page.find("most expensive lines").expect("section");
        let first_link = page[expensive..].find("#line2").expect("line 2 ranked");
        let later_link = page[expensive..].find("#line1").expect("line 1 present");
        assert!(first_link < later_link);
    }

    #[test]
    fn zero_timings_render_blank_cells() {
        let artifact = "\
File: a.py
File duration: 0.0s (0.00%)
------+----------+-------------+-------------+-------+-----------
     1|         0|     0.000000|     0.000000|  0.00%|pass
";
        let model = prepared_model(artifact);
        let file = model.file_by_path("a.py").expect("file");
        let page = render_file_page(&model, file, &ReportLayout::default()).expect("page");
        assert!(!page.contains("0.0000</pre>"));
        assert!(page.contains("width:0px"));
    }

    #[test]
    fn badge_count_respects_layout_limit() {
        let mut artifact = String::from(
            "File: a.py\nFile duration: 1.0s (100.00%)\n------+---\n",
        );
        for n in 1..=8u32 {
            artifact.push_str(&format!(
                "     {n}|         {n}|     0.010000|     0.010000|  1.00%|f()\n\
                 (call)|         {n}|     0.001000|     0.001000|  0.10%|# a.py:9 f\n"
            ));
        }
        artifact.push_str("     9|         1|     0.001000|     0.001000|  0.10%|def f():\n");
        let model = prepared_model(&artifact);
        let file = model.file_by_path("a.py").expect("file");
        let page = render_file_page(&model, file, &ReportLayout::default()).expect("page");
        let listing = &page[page.find("source code").expect("listing")..];
        let badge_rows: usize = listing.matches("badge-gap").count();
        // 5 badges -> 4 gaps on the line-9 row, and line 9 appears in the
        // expensive table too; gaps never exceed limit - 1 per row.
        assert!(badge_rows >= 4);
        assert!(!listing.contains(">6</a><div class=\"badge-gap\"></div><a"));
    }
}
