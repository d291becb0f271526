//! # Merged Pipeline Documents
//!
//! Several pipeline files are combined into one multi-document YAML stream,
//! the shape a multi-stage pipeline consumer reads. Each appended fragment
//! becomes its own `---`-separated document.
//!
//! Appending is cheap and local; [`MergedDocument::finalize`] runs once over
//! the whole stream before it is handed to the caller. It removes YAML
//! end-of-document markers (`...` lines) and collapses runs of separator
//! lines, including runs broken only by blank lines, into one separator.
//! A separator may carry trailing text (`--- # api`, `--- !tag`); that text
//! stays on the separator that survives the collapse.
//!
//! ```
//! use pipeline_tree::document::MergedDocument;
//!
//! let mut doc = MergedDocument::new();
//! doc.append("kind: pipeline\nname: api\n");
//! doc.append("---\n---\nkind: pipeline\nname: web\n...\n");
//!
//! assert_eq!(
//!     doc.finalize(),
//!     "---\nkind: pipeline\nname: api\n---\nkind: pipeline\nname: web\n"
//! );
//! ```

/// The YAML document separator line.
pub const SEPARATOR: &str = "---";

/// The YAML end-of-document marker line.
pub const END_MARKER: &str = "...";

/// Append-only multi-document accumulator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedDocument {
    data: String,
    documents: usize,
}

impl MergedDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one configuration file body.
    ///
    /// Surrounding whitespace is trimmed and whitespace-only fragments are
    /// ignored. A separator line is prepended unless the fragment already
    /// starts with one. Returns whether anything was appended.
    pub fn append(&mut self, fragment: &str) -> bool {
        let fragment = fragment.trim();
        if fragment.is_empty() {
            return false;
        }

        if !starts_with_separator(fragment) {
            self.data.push_str(SEPARATOR);
            self.data.push('\n');
        }
        self.data.push_str(fragment);
        if !self.data.ends_with('\n') {
            self.data.push('\n');
        }
        self.documents += 1;
        true
    }

    /// Number of fragments appended.
    pub fn documents(&self) -> usize {
        self.documents
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.data
    }

    /// The accumulated text after final cleanup (see [`finalize`]).
    pub fn finalize(&self) -> String {
        finalize(&self.data)
    }
}

fn starts_with_separator(fragment: &str) -> bool {
    fragment
        .lines()
        .next()
        .is_some_and(|first| is_separator_line(first))
}

fn is_separator_line(line: &str) -> bool {
    separator_suffix(line).is_some()
}

/// Text following `---` on a document-start line (`# comment`, `!tag`,
/// inline content), or `None` when the line does not start a document.
fn separator_suffix(line: &str) -> Option<&str> {
    let rest = line.trim_end().strip_prefix(SEPARATOR)?;
    if rest.is_empty() {
        Some(rest)
    } else if rest.starts_with([' ', '\t']) {
        Some(rest.trim_start())
    } else {
        None
    }
}

/// Whether a separator suffix holds document content rather than only a
/// comment or a tag.
fn has_inline_content(suffix: &str) -> bool {
    let rest = match suffix.strip_prefix('!') {
        Some(tagged) => tagged
            .split_once(char::is_whitespace)
            .map_or("", |(_, rest)| rest.trim_start()),
        None => suffix,
    };
    !rest.is_empty() && !rest.starts_with('#')
}

fn is_end_marker_line(line: &str) -> bool {
    line.trim_end() == END_MARKER
}

/// Lines between two separators, with the separator line that opened them.
struct Group<'a> {
    separator: &'a str,
    lines: Vec<&'a str>,
}

impl Group<'_> {
    fn is_decorated(&self) -> bool {
        self.separator != SEPARATOR
    }
}

/// Strip end-of-document markers and collapse separator runs.
///
/// The text is split on separator lines; each group loses its leading and
/// trailing blank lines, empty groups are dropped, and the rest are joined
/// with exactly one separator line each. A separator carrying text after the
/// `---` (a comment, a tag) keeps it: of a collapsed run, the last such line
/// opens the surviving document. The result is either empty or starts with a
/// separator and ends with a single newline. Running it again yields the
/// same text.
pub fn finalize(text: &str) -> String {
    let mut groups = vec![Group {
        separator: SEPARATOR,
        lines: Vec::new(),
    }];
    for line in text.lines() {
        if let Some(suffix) = separator_suffix(line) {
            groups.push(Group {
                separator: if suffix.is_empty() {
                    SEPARATOR
                } else {
                    line.trim_end()
                },
                lines: Vec::new(),
            });
        } else if !is_end_marker_line(line) {
            if let Some(group) = groups.last_mut() {
                group.lines.push(line);
            }
        }
    }

    let mut out = String::with_capacity(text.len());
    let mut pending: Option<&str> = None;
    for group in &groups {
        let first = group.lines.iter().position(|line| !line.trim().is_empty());
        let inline = separator_suffix(group.separator).is_some_and(has_inline_content);
        if first.is_none() && !inline {
            if group.is_decorated() {
                pending = Some(group.separator);
            }
            continue;
        }

        let separator = if group.is_decorated() {
            group.separator
        } else {
            pending.unwrap_or(SEPARATOR)
        };
        pending = None;
        out.push_str(separator);
        out.push('\n');

        if let Some(first) = first {
            let last = group
                .lines
                .iter()
                .rposition(|line| !line.trim().is_empty())
                .unwrap_or(first);
            for line in &group.lines[first..=last] {
                out.push_str(line);
                out.push('\n');
            }
        }
    }
    out
}
