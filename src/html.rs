//! HTML building blocks shared by the report pages.

use crate::config::ReportLayout;

/// Escape text for safe interpolation into markup.
pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// `<a href="destination">text</a>`. The text is taken as-is so callers
/// can pass markup; escape it first when it is raw data.
pub fn href(destination: &str, text: &str) -> String {
    format!("<a href=\"{destination}\">{text}</a>")
}

/// Strip the angle-bracket syntax from profiler pseudo-paths such as
/// `<string>` or `<ipython-input-4>`; real paths pass through unchanged.
pub fn strip_pointy(name: &str) -> &str {
    name.trim_start_matches('<').trim_end_matches('>')
}

/// Derive the report file name for a profiled source path. Real paths keep
/// their last few segments joined with separators collapsed to
/// underscores; pseudo-paths lose their brackets instead. Deterministic:
/// the same input path always maps to the same name.
pub fn page_file_name(path: &str) -> String {
    if path.starts_with('<') {
        return format!("{}.html", strip_pointy(path).replace('.', "_"));
    }

    let segments: Vec<&str> = path
        .trim_start_matches('.')
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();
    let tail = if segments.len() > 4 {
        &segments[segments.len() - 4..]
    } else {
        &segments[..]
    };
    let joined = tail.join("_").replace('.', "_");
    format!("{}.html", joined.trim_start_matches('_'))
}

/// Anchor name for a line within a file page.
pub fn line_anchor(line_number: u32) -> String {
    format!("line{line_number}")
}

/// The two-tone box chart: a dark band for self time over a light band for
/// total time, both scaled against `max_total` into `pix_width` pixels.
pub fn time_box(self_time: f64, total_time: f64, max_total: f64, pix_width: u32) -> String {
    let px = |value: f64| -> i64 {
        if value > 0.0 && max_total > 0.0 {
            (f64::from(pix_width) * value / max_total) as i64
        } else {
            0
        }
    };
    let self_px = px(self_time);
    let total_px = px(total_time);
    let light_px = (total_px - self_px).max(0);
    format!(
        "<div class=\"box light\" style=\"width:{light_px}px\"></div>\
         <div class=\"box dark\" style=\"width:{self_px}px\"></div>"
    )
}

/// One table column: header label, optional pixel width, alignment, and
/// the cell renderer. Layout stays data-driven; renderers never build
/// `<td>` markup themselves.
pub struct ColumnSpec<'a, T> {
    pub name: &'static str,
    pub width: Option<u32>,
    pub align: &'static str,
    pub cell: Box<dyn Fn(&T) -> String + 'a>,
}

impl<'a, T> ColumnSpec<'a, T> {
    pub fn new(
        name: &'static str,
        width: Option<u32>,
        align: &'static str,
        cell: impl Fn(&T) -> String + 'a,
    ) -> Self {
        Self {
            name,
            width,
            align,
            cell: Box::new(cell),
        }
    }
}

/// Render a `<table>` from column specs and row items.
pub fn table<T>(columns: &[ColumnSpec<'_, T>], rows: impl Iterator<Item = T>) -> String {
    let mut out = String::from("<table cellspacing=\"0\">\n<tr>");
    for col in columns {
        let width = col
            .width
            .map(|w| format!(" width=\"{w}\""))
            .unwrap_or_default();
        out.push_str(&format!(
            "<th align=\"{align}\"{width}>{name}</th>",
            align = col.align,
            name = col.name,
        ));
    }
    out.push_str("</tr>\n");
    for row in rows {
        out.push_str("<tr>");
        for col in columns {
            out.push_str(&format!(
                "<td align=\"{align}\">{cell}</td>",
                align = col.align,
                cell = (col.cell)(&row),
            ));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</table>\n");
    out
}

/// Wrap a body in the shared page chrome: title, stylesheet, monospace
/// look matching the profiler's plain-text origins.
pub fn page(title: &str, body: &str, layout: &ReportLayout) -> String {
    format!(
        "<!doctype html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
         <style>\n{css}\n</style>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
        title = escape(title),
        css = stylesheet(layout),
        body = body,
    )
}

fn stylesheet(layout: &ReportLayout) -> String {
    format!(
        "body, pre, th, td, h1, h2, h3 {{ font-family: courier, monospace; color: #000000; }}\n\
         body, pre, th, td {{ font-size: small; }}\n\
         body {{ background-color: #eeeeee; }}\n\
         table, th, td {{ border: 1px solid #e0e0e0; border-collapse: collapse; padding: 2px 5px; }}\n\
         pre {{ margin: 0; }}\n\
         .topnav {{ top: 0; position: fixed; background-color: #eeeeee; }}\n\
         .box {{ display: inline-block; height: 12px; margin-top: -8px; margin-bottom: -8px; }}\n\
         .box.dark {{ background-color: #0000ff; }}\n\
         .box.light {{ background-color: #aaaaff; }}\n\
         .badge-gap {{ display: inline-block; height: 12px; width: 2px; background-color: #eeeeee; }}\n\
         .boxcol {{ min-width: {box_width}px; }}\n\
         .highlight pre {{ display: inline; }}\n\
         .k {{ color: #008000; font-weight: bold; }}\n\
         .s {{ color: #ba2121; }}\n\
         .c {{ color: #408080; font-style: italic; }}\n\
         .m {{ color: #666666; }}",
        box_width = layout.box_width_px,
    )
}
