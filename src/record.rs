//! Single-line record parsers for the profiler dump format.
//!
//! Every parser is total: malformed shapes come back as "no match" and
//! unparsable numeric fields degrade to zero. The dump format is known to
//! be occasionally inconsistent, so nothing here aborts the run.

/// Prefix of the command-line record in the summary section.
pub const COMMAND_LINE_PREFIX: &str = "Command line:";

/// Prefix of the total-duration record in the summary section.
pub const TOTAL_DURATION_PREFIX: &str = "Total duration:";

/// Prefix of a file duration/percentage record in a file header block.
pub const FILE_DURATION_PREFIX: &str = "File duration:";

/// A parsed per-line record (the 6-column pipe-delimited shape).
#[derive(Debug, Clone, PartialEq)]
pub struct LineRecord {
    pub line_number: u32,
    pub hits: u64,
    pub time: f64,
    pub time_per_hit: f64,
    pub percentage: f64,
    pub code: String,
}

/// A parsed `(call)` record: the same numeric columns plus the decoded
/// `# path:line label` trailing column.
#[derive(Debug, Clone, PartialEq)]
pub struct CallRecord {
    pub hits: u64,
    pub time: f64,
    pub time_per_hit: f64,
    pub percentage: f64,
    pub target_file: String,
    pub target_line: u32,
    pub entry_point: String,
}

fn soft_u32(s: &str) -> u32 {
    s.trim().parse().unwrap_or(0)
}

fn soft_u64(s: &str) -> u64 {
    s.trim().parse().unwrap_or(0)
}

fn soft_f64(s: &str) -> f64 {
    s.trim().parse().unwrap_or(0.0)
}

fn soft_percent(s: &str) -> f64 {
    soft_f64(s.trim().trim_end_matches('%'))
}

/// `Command line: ['to_html.py']` → `to_html.py`. Empty string when the
/// bracketed list literal is missing.
pub fn command_line(line: &str) -> String {
    let Some(start) = line.find("['") else {
        return String::new();
    };
    let Some(end) = line.find("']") else {
        return String::new();
    };
    if end < start + 2 {
        return String::new();
    }
    line[start + 2..end].to_string()
}

/// `Total duration: 5248.89s` → 5248.89. Malformed → 0.0.
pub fn total_duration(line: &str) -> f64 {
    let rest = line.strip_prefix(TOTAL_DURATION_PREFIX).unwrap_or(line);
    soft_f64(rest.trim().trim_end_matches('s'))
}

/// `File: to_html.py` → `to_html.py`. Empty string when no `:` is present.
pub fn file_name(line: &str) -> String {
    match line.split_once(':') {
        Some((_, rest)) => rest.trim().to_string(),
        None => String::new(),
    }
}

/// `File duration: 5248.68s (100.00%)` → 5248.68 (the seconds part only).
pub fn file_duration(line: &str) -> f64 {
    let rest = line.strip_prefix(FILE_DURATION_PREFIX).unwrap_or(line);
    match rest.find('s') {
        Some(ie) => soft_f64(&rest[..ie]),
        None => soft_f64(rest),
    }
}

/// `File duration: 5248.68s (100.00%)` → 100.00 (the parenthesized part).
pub fn file_percentage(line: &str) -> f64 {
    let (Some(is_), Some(ie_)) = (line.find('('), line.find('%')) else {
        return 0.0;
    };
    if ie_ <= is_ {
        return 0.0;
    }
    soft_f64(&line[is_ + 1..ie_])
}

/// True when the first pipe-delimited column is a (possibly padded) line
/// number, i.e. the line is a per-line record.
pub fn is_line_record(line: &str) -> bool {
    match line.split_once('|') {
        Some((head, _)) => {
            let head = head.trim();
            !head.is_empty() && head.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}

/// True when the first pipe-delimited column is the `(call)` tag.
pub fn is_call_record(line: &str) -> bool {
    match line.split_once('|') {
        Some((head, _)) => head.trim() == "(call)",
        None => false,
    }
}

/// Parse a per-line record. The source-code column is everything after the
/// fifth delimiter, rejoined: source text may itself contain `|`.
pub fn parse_line(line: &str) -> Option<LineRecord> {
    if !is_line_record(line) {
        return None;
    }
    let columns: Vec<&str> = line.split('|').collect();
    if columns.len() < 6 {
        return None;
    }
    Some(LineRecord {
        line_number: soft_u32(columns[0]),
        hits: soft_u64(columns[1]),
        time: soft_f64(columns[2]),
        time_per_hit: soft_f64(columns[3]),
        percentage: soft_percent(columns[4]),
        code: columns[5..].join("|"),
    })
}

/// Parse a `(call)` record. The trailing column has the shape
/// `# path:line label`; the label is whatever follows the first space, and
/// the target line number sits after the last `:` of the location part.
pub fn parse_call(line: &str) -> Option<CallRecord> {
    if !is_call_record(line) {
        return None;
    }
    let columns: Vec<&str> = line.split('|').collect();
    if columns.len() < 6 {
        return None;
    }

    let comment = columns[5..].join("|");
    let comment = comment.trim().trim_start_matches('#').trim_start();
    let (location, entry_point) = match comment.split_once(' ') {
        Some((loc, label)) => (loc, label.trim().to_string()),
        None => (comment, String::new()),
    };
    let (target_file, target_line) = match location.rsplit_once(':') {
        Some((path, number)) => (path.to_string(), soft_u32(number)),
        None => (location.to_string(), 0),
    };

    Some(CallRecord {
        hits: soft_u64(columns[1]),
        time: soft_f64(columns[2]),
        time_per_hit: soft_f64(columns[3]),
        percentage: soft_percent(columns[4]),
        target_file,
        target_line,
        entry_point,
    })
}
