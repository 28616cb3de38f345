//! Minimal single-pass Python syntax highlighting.
//!
//! The whole reconstructed source is scanned once so multi-line tokens
//! (triple-quoted strings) keep their context, then the markup is handed
//! back as one fragment per input line. The scanner never emits or
//! swallows newlines, so the fragment count always equals the input line
//! count; open spans are closed at each line break and reopened on the
//! next line so every fragment is well-formed on its own.

/// CSS classes used by the emitted spans. The matching rules live in the
/// page stylesheet (see `html::page`).
const CLASS_KEYWORD: &str = "k";
const CLASS_STRING: &str = "s";
const CLASS_COMMENT: &str = "c";
const CLASS_NUMBER: &str = "m";

const KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "break", "class", "continue", "def", "del",
    "elif", "else", "except", "exec", "finally", "for", "from", "global", "if", "import", "in",
    "is", "lambda", "not", "or", "pass", "print", "raise", "return", "try", "while", "with",
    "yield",
];

#[derive(Clone, Copy, PartialEq)]
enum State {
    Normal,
    Str { quote: char, triple: bool },
}

struct Emitter {
    lines: Vec<String>,
    current: String,
    open_class: Option<&'static str>,
}

impl Emitter {
    fn new() -> Self {
        Self {
            lines: Vec::new(),
            current: String::new(),
            open_class: None,
        }
    }

    fn set_class(&mut self, class: Option<&'static str>) {
        if self.open_class == class {
            return;
        }
        if self.open_class.is_some() {
            self.current.push_str("</span>");
        }
        if let Some(c) = class {
            self.current.push_str(&format!("<span class=\"{c}\">"));
        }
        self.open_class = class;
    }

    fn text(&mut self, class: Option<&'static str>, raw: &str) {
        self.set_class(class);
        for ch in raw.chars() {
            match ch {
                '&' => self.current.push_str("&amp;"),
                '<' => self.current.push_str("&lt;"),
                '>' => self.current.push_str("&gt;"),
                '"' => self.current.push_str("&quot;"),
                '\'' => self.current.push_str("&#39;"),
                _ => self.current.push(ch),
            }
        }
    }

    fn newline(&mut self) {
        let reopen = self.open_class;
        self.set_class(None);
        self.lines.push(std::mem::take(&mut self.current));
        // Multi-line tokens keep their color on the next fragment.
        self.set_class(reopen);
    }

    fn finish(mut self) -> Vec<String> {
        self.set_class(None);
        self.lines.push(self.current);
        self.lines
    }
}

/// Highlight `source` and return one HTML fragment per input line.
pub fn highlight_python(source: &str) -> Vec<String> {
    let chars: Vec<char> = source.chars().collect();
    let mut out = Emitter::new();
    let mut state = State::Normal;
    let mut i = 0usize;

    while i < chars.len() {
        let ch = chars[i];

        if ch == '\n' {
            if let State::Str { triple: false, .. } = state {
                // Unterminated single-quoted string: the line ends it.
                state = State::Normal;
                out.set_class(None);
            }
            out.newline();
            i += 1;
            continue;
        }

        match state {
            State::Str { quote, triple } => {
                if triple && starts_triple(&chars, i, quote) {
                    out.text(Some(CLASS_STRING), &quote.to_string().repeat(3));
                    state = State::Normal;
                    i += 3;
                } else if !triple && ch == quote {
                    out.text(Some(CLASS_STRING), &ch.to_string());
                    state = State::Normal;
                    i += 1;
                } else if ch == '\\' && i + 1 < chars.len() && chars[i + 1] != '\n' {
                    let escaped: String = chars[i..i + 2].iter().collect();
                    out.text(Some(CLASS_STRING), &escaped);
                    i += 2;
                } else {
                    out.text(Some(CLASS_STRING), &ch.to_string());
                    i += 1;
                }
            }
            State::Normal => {
                if ch == '#' {
                    let end = chars[i..]
                        .iter()
                        .position(|&c| c == '\n')
                        .map(|p| i + p)
                        .unwrap_or(chars.len());
                    let comment: String = chars[i..end].iter().collect();
                    out.text(Some(CLASS_COMMENT), &comment);
                    i = end;
                } else if ch == '"' || ch == '\'' {
                    if starts_triple(&chars, i, ch) {
                        out.text(Some(CLASS_STRING), &ch.to_string().repeat(3));
                        state = State::Str {
                            quote: ch,
                            triple: true,
                        };
                        i += 3;
                    } else {
                        out.text(Some(CLASS_STRING), &ch.to_string());
                        state = State::Str {
                            quote: ch,
                            triple: false,
                        };
                        i += 1;
                    }
                } else if ch.is_ascii_digit() {
                    let end = scan_while(&chars, i, |c| {
                        c.is_ascii_alphanumeric() || c == '.' || c == '_'
                    });
                    let number: String = chars[i..end].iter().collect();
                    out.text(Some(CLASS_NUMBER), &number);
                    i = end;
                } else if ch.is_alphabetic() || ch == '_' {
                    let end = scan_while(&chars, i, |c| c.is_alphanumeric() || c == '_');
                    let word: String = chars[i..end].iter().collect();
                    let class = KEYWORDS.contains(&word.as_str()).then_some(CLASS_KEYWORD);
                    out.text(class, &word);
                    i = end;
                } else {
                    out.text(None, &ch.to_string());
                    i += 1;
                }
            }
        }
    }

    out.finish()
}

fn starts_triple(chars: &[char], i: usize, quote: char) -> bool {
    i + 2 < chars.len() && chars[i] == quote && chars[i + 1] == quote && chars[i + 2] == quote
}

fn scan_while(chars: &[char], start: usize, pred: impl Fn(char) -> bool) -> usize {
    let mut end = start;
    while end < chars.len() && pred(chars[end]) {
        end += 1;
    }
    end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_count_matches_line_count() {
        let source = "import os\nx = 1\n\ndef f():\n    return x";
        let fragments = highlight_python(source);
        assert_eq!(fragments.len(), source.lines().count());
    }

    #[test]
    fn keywords_are_wrapped() {
        let fragments = highlight_python("import os");
        assert!(fragments[0].contains("<span class=\"k\">import</span>"));
        assert!(fragments[0].contains("os"));
    }

    #[test]
    fn identifiers_containing_keywords_are_not_wrapped() {
        let fragments = highlight_python("importer = 1");
        assert!(!fragments[0].contains("class=\"k\""));
    }

    #[test]
    fn triple_quoted_string_spans_lines() {
        let fragments = highlight_python("x = \"\"\"first\nsecond\"\"\"\ny = 2");
        assert_eq!(fragments.len(), 3);
        assert!(fragments[0].contains("class=\"s\""));
        assert!(fragments[1].starts_with("<span class=\"s\">"));
        assert!(fragments[1].contains("second"));
        assert!(!fragments[2].contains("class=\"s\""));
    }

    #[test]
    fn every_fragment_is_self_contained() {
        let fragments = highlight_python("s = \"\"\"a\nb\nc\"\"\"");
        for fragment in &fragments {
            assert_eq!(fragment.matches("<span").count(), fragment.matches("</span>").count());
        }
    }

    #[test]
    fn source_text_is_html_escaped() {
        let fragments = highlight_python("if a < b and c > d:");
        assert!(fragments[0].contains("&lt;"));
        assert!(fragments[0].contains("&gt;"));
    }

    #[test]
    fn comments_and_numbers_get_classes() {
        let fragments = highlight_python("x = 42  # answer");
        assert!(fragments[0].contains("<span class=\"m\">42</span>"));
        assert!(fragments[0].contains("<span class=\"c\"># answer</span>"));
    }

    #[test]
    fn hash_inside_string_is_not_a_comment() {
        let fragments = highlight_python("s = 'a#b'");
        assert!(!fragments[0].contains("class=\"c\""));
    }
}
