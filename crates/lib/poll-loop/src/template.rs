//! Per-folder line templates.
//!
//! Templates use named placeholders in braces, e.g.
//! `{recent:<3} new mails in {directory} ({count} total)`. A placeholder may
//! carry a format spec of the form `[[fill]align][width][.precision]` where
//! `align` is one of `<`, `>` or `^`; values are left-aligned by default,
//! `precision` truncates, and widths are measured in characters. Literal
//! braces are written as `{{` and `}}`.

/// The template used when none is given.
pub const DEFAULT_FORMAT: &str = "{recent:<3} new mails in {directory} ({count} total)";

/// Errors returned while parsing a template.
#[derive(Debug, thiserror::Error, Eq, PartialEq)]
pub enum TemplateError {
    /// A placeholder names a field that status records do not have.
    #[error("unknown field \"{0}\" (available: directory, recent, count, unseen)")]
    UnknownField(String),

    /// A placeholder has no field name.
    #[error("empty placeholder at byte offset {0}")]
    EmptyField(usize),

    /// A brace is not closed or is a stray closing brace.
    #[error("unmatched brace at byte offset {0}")]
    UnmatchedBrace(usize),

    /// The format spec of a placeholder is not supported.
    #[error("unsupported format spec \"{spec}\" for field \"{field}\"")]
    InvalidSpec {
        /// The field the spec belongs to.
        field: String,

        /// The offending spec.
        spec: String,
    },
}

/// A parsed template, ready to render status records.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FormatTemplate {
    /// The template as written.
    source: String,

    /// Literal runs and placeholders, in order.
    segments: Vec<Segment>,
}

/// A piece of a template.
#[derive(Debug, Clone, Eq, PartialEq)]
enum Segment {
    /// Text copied as-is.
    Literal(String),

    /// A field substitution.
    Placeholder(Placeholder),
}

/// A field substitution with its formatting.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
struct Placeholder {
    /// Which field to substitute.
    field: Field,

    /// How to lay out the value.
    spec: Spec,
}

/// Status record fields available to templates.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum Field {
    /// Folder name.
    Directory,

    /// Recent message count.
    Recent,

    /// Total message count.
    Count,

    /// Unseen message count.
    Unseen,
}

impl Field {
    /// Resolve a field by its placeholder name.
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "directory" => Self::Directory,
            "recent" => Self::Recent,
            "count" => Self::Count,
            "unseen" => Self::Unseen,
            _ => return None,
        })
    }

    /// The value of this field in a record.
    fn value(self, record: &status_core::StatusRecord) -> &str {
        match self {
            Self::Directory => &record.directory,
            Self::Recent => &record.recent,
            Self::Count => &record.count,
            Self::Unseen => &record.unseen,
        }
    }
}

/// Horizontal alignment within the field width.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum Align {
    /// Pad on the right.
    Left,

    /// Pad on the left.
    Right,

    /// Pad on both sides, extra padding on the right.
    Center,
}

/// Layout of a substituted value.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
struct Spec {
    /// Padding character.
    fill: char,

    /// Alignment.
    align: Align,

    /// Minimum width in characters.
    width: usize,

    /// Maximum number of characters taken from the value.
    precision: Option<usize>,
}

impl Default for Spec {
    fn default() -> Self {
        Self {
            fill: ' ',
            align: Align::Left,
            width: 0,
            precision: None,
        }
    }
}

impl FormatTemplate {
    /// Parse a template, validating every placeholder up front.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((idx, ch)) = chars.next() {
            match ch {
                '{' if chars.next_if(|&(_, next)| next == '{').is_some() => literal.push('{'),
                '}' if chars.next_if(|&(_, next)| next == '}').is_some() => literal.push('}'),
                '}' => return Err(TemplateError::UnmatchedBrace(idx)),
                '{' => {
                    let mut body = String::new();
                    let mut closed = false;
                    for (inner_idx, inner) in chars.by_ref() {
                        match inner {
                            '}' => {
                                closed = true;
                                break;
                            }
                            '{' => return Err(TemplateError::UnmatchedBrace(inner_idx)),
                            _ => body.push(inner),
                        }
                    }
                    if !closed {
                        return Err(TemplateError::UnmatchedBrace(idx));
                    }

                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(parse_placeholder(&body, idx)?));
                }
                _ => literal.push(ch),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// The template as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Render a status record through the template.
    pub fn render(&self, record: &status_core::StatusRecord) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(placeholder) => {
                    pad_into(&mut out, placeholder.field.value(record), placeholder.spec);
                }
            }
        }
        out
    }
}

impl Default for FormatTemplate {
    fn default() -> Self {
        Self {
            source: DEFAULT_FORMAT.to_string(),
            segments: vec![
                Segment::Placeholder(Placeholder {
                    field: Field::Recent,
                    spec: Spec {
                        width: 3,
                        ..Spec::default()
                    },
                }),
                Segment::Literal(" new mails in ".to_string()),
                Segment::Placeholder(Placeholder {
                    field: Field::Directory,
                    spec: Spec::default(),
                }),
                Segment::Literal(" (".to_string()),
                Segment::Placeholder(Placeholder {
                    field: Field::Count,
                    spec: Spec::default(),
                }),
                Segment::Literal(" total)".to_string()),
            ],
        }
    }
}

impl std::str::FromStr for FormatTemplate {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for FormatTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

/// Parse the inside of a `{...}` placeholder.
fn parse_placeholder(body: &str, offset: usize) -> Result<Placeholder, TemplateError> {
    let (name, spec) = match body.split_once(':') {
        Some((name, spec)) => (name, Some(spec)),
        None => (body, None),
    };

    if name.is_empty() {
        return Err(TemplateError::EmptyField(offset));
    }
    let field =
        Field::from_name(name).ok_or_else(|| TemplateError::UnknownField(name.to_string()))?;

    let spec = match spec {
        None => Spec::default(),
        Some(spec) => parse_spec(spec).ok_or_else(|| TemplateError::InvalidSpec {
            field: name.to_string(),
            spec: spec.to_string(),
        })?,
    };

    Ok(Placeholder { field, spec })
}

/// Parse `[[fill]align][width][.precision][s]`.
fn parse_spec(spec: &str) -> Option<Spec> {
    let mut out = Spec::default();
    let chars: Vec<char> = spec.chars().collect();
    let mut pos = 0;

    let align_of = |ch: char| match ch {
        '<' => Some(Align::Left),
        '>' => Some(Align::Right),
        '^' => Some(Align::Center),
        _ => None,
    };

    let mut explicit_fill = false;
    if let Some(align) = chars.get(1).copied().and_then(align_of) {
        out.fill = chars[0];
        out.align = align;
        explicit_fill = true;
        pos = 2;
    } else if let Some(align) = chars.first().copied().and_then(align_of) {
        out.align = align;
        pos = 1;
    }

    if !explicit_fill && chars.get(pos) == Some(&'0') {
        out.fill = '0';
    }

    let (width, next) = take_number(&chars, pos)?;
    out.width = width.unwrap_or(0);
    pos = next;

    if chars.get(pos) == Some(&'.') {
        let (precision, next) = take_number(&chars, pos + 1)?;
        out.precision = Some(precision?);
        pos = next;
    }

    if chars.get(pos) == Some(&'s') {
        pos += 1;
    }

    (pos == chars.len()).then_some(out)
}

/// Read a run of ASCII digits starting at `pos`, returning the number (if
/// any digits were present) and the position after them.
///
/// `None` when the digits do not fit in a `usize`.
fn take_number(chars: &[char], pos: usize) -> Option<(Option<usize>, usize)> {
    let digits: String = chars[pos.min(chars.len())..]
        .iter()
        .take_while(|ch| ch.is_ascii_digit())
        .collect();
    let end = pos + digits.len();
    if digits.is_empty() {
        return Some((None, end));
    }
    let number = digits.parse().ok()?;
    Some((Some(number), end))
}

/// Append `value` laid out according to `spec`.
fn pad_into(out: &mut String, value: &str, spec: Spec) {
    let value: String = match spec.precision {
        Some(precision) => value.chars().take(precision).collect(),
        None => value.to_string(),
    };

    let len = value.chars().count();
    let padding = spec.width.saturating_sub(len);
    let (before, after) = match spec.align {
        Align::Left => (0, padding),
        Align::Right => (padding, 0),
        Align::Center => (padding / 2, padding - padding / 2),
    };

    out.extend(std::iter::repeat_n(spec.fill, before));
    out.push_str(&value);
    out.extend(std::iter::repeat_n(spec.fill, after));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(directory: &str, recent: &str, count: &str) -> status_core::StatusRecord {
        status_core::StatusRecord {
            directory: directory.to_string(),
            recent: recent.to_string(),
            count: count.to_string(),
            unseen: "1".to_string(),
        }
    }

    fn render(template: &str, record: &status_core::StatusRecord) -> String {
        FormatTemplate::parse(template).unwrap().render(record)
    }

    #[test]
    fn default_template_output() {
        let line = FormatTemplate::default().render(&record("INBOX", "3", "50"));
        assert_eq!(line, "3   new mails in INBOX (50 total)");
    }

    #[test]
    fn default_matches_parsed_default() {
        assert_eq!(
            FormatTemplate::parse(DEFAULT_FORMAT).unwrap(),
            FormatTemplate::default()
        );
    }

    #[test]
    fn width_never_truncates() {
        let line = FormatTemplate::default().render(&record("INBOX", "1234", "50"));
        assert_eq!(line, "1234 new mails in INBOX (50 total)");
    }

    #[test]
    fn alignment_and_fill() {
        let record = record("INBOX", "7", "50");
        assert_eq!(render("[{recent:>3}]", &record), "[  7]");
        assert_eq!(render("[{recent:^5}]", &record), "[  7  ]");
        assert_eq!(render("[{recent:^4}]", &record), "[ 7  ]");
        assert_eq!(render("[{recent:*<4}]", &record), "[7***]");
        assert_eq!(render("[{recent:4}]", &record), "[7   ]");
        assert_eq!(render("[{recent:03}]", &record), "[700]");
    }

    #[test]
    fn precision_truncates() {
        let record = record("Newsletters", "2", "9");
        assert_eq!(render("{directory:.4}", &record), "News");
        assert_eq!(render("{directory:>6.4s}", &record), "  News");
    }

    #[test]
    fn width_counts_characters() {
        let record = record("Входящие", "2", "9");
        assert_eq!(render("[{directory:10}]", &record), "[Входящие  ]");
    }

    #[test]
    fn unseen_field() {
        assert_eq!(render("{unseen} unread", &record("INBOX", "2", "9")), "1 unread");
    }

    #[test]
    fn escaped_braces() {
        let record = record("INBOX", "2", "9");
        assert_eq!(render("{{{directory}}}", &record), "{INBOX}");
    }

    #[test]
    fn rejects_unknown_field() {
        assert_eq!(
            FormatTemplate::parse("{subject}"),
            Err(TemplateError::UnknownField("subject".to_string()))
        );
    }

    #[test]
    fn rejects_empty_field() {
        assert_eq!(
            FormatTemplate::parse("x {} y"),
            Err(TemplateError::EmptyField(2))
        );
    }

    #[test]
    fn rejects_unmatched_braces() {
        assert_eq!(
            FormatTemplate::parse("{recent"),
            Err(TemplateError::UnmatchedBrace(0))
        );
        assert_eq!(
            FormatTemplate::parse("recent}"),
            Err(TemplateError::UnmatchedBrace(6))
        );
        assert_eq!(
            FormatTemplate::parse("{re{cent}"),
            Err(TemplateError::UnmatchedBrace(3))
        );
    }

    #[test]
    fn rejects_numeric_specs() {
        for template in [
            "{count:d}",
            "{count:+}",
            "{count:=5}",
            "{count:.}",
            "{count:,}",
            "{count:99999999999999999999999}",
            "{count:.99999999999999999999999}",
        ] {
            assert!(
                matches!(
                    FormatTemplate::parse(template),
                    Err(TemplateError::InvalidSpec { .. })
                ),
                "{template} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_overflowing_width() {
        assert_eq!(
            FormatTemplate::parse("[{recent:99999999999999999999999}]"),
            Err(TemplateError::InvalidSpec {
                field: "recent".to_string(),
                spec: "99999999999999999999999".to_string(),
            })
        );
    }

    #[test]
    fn large_width_within_range_is_accepted() {
        let record = record("INBOX", "3", "50");
        assert_eq!(render("[{recent:>12}]", &record), format!("[{:>12}]", "3"));
    }

    #[test]
    fn display_shows_source() {
        let template = FormatTemplate::parse("{directory}: {recent}").unwrap();
        assert_eq!(template.to_string(), "{directory}: {recent}");
    }
}
