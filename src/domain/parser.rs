//! Line-oriented parser for per-language gettext record files.
//!
//! A record starts at a `#. Key:` annotation, collects the annotations and
//! quoted fields that follow it, and is closed by its `msgstr` line. Lines
//! outside a record (file headers, blank lines, unknown comments) are skipped.

use crate::domain::model::Record;
use crate::utils::error::{ConvertError, Result};

pub const KEY_PREFIX: &str = "#. Key:\t";
pub const SOURCE_LOCATION_PREFIX: &str = "#. SourceLocation:\t";
pub const SOURCE_COMMENT_PREFIX: &str = "#: ";
pub const CONTEXT_PREFIX: &str = "msgctxt ";
pub const ID_PREFIX: &str = "msgid ";
pub const TRANSLATION_PREFIX: &str = "msgstr ";

/// A non-empty line with its 1-based position in the input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLine<'a> {
    pub number: usize,
    pub text: &'a str,
}

/// Splits file content into non-empty lines, dropping a leading BOM and
/// trailing `\r`.
pub fn split_lines(content: &str) -> Vec<SourceLine<'_>> {
    content
        .strip_prefix('\u{feff}')
        .unwrap_or(content)
        .lines()
        .enumerate()
        .filter(|(_, text)| !text.is_empty())
        .map(|(index, text)| SourceLine {
            number: index + 1,
            text,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    Key(&'a str),
    SourceLocation(&'a str),
    SourceComment(&'a str),
    Context(&'a str),
    Id(&'a str),
    Translation(&'a str),
    Other,
}

/// Annotation prefixes also match when trailing whitespace was stripped,
/// which yields an empty value.
fn strip_annotation<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    line.strip_prefix(prefix)
        .or_else(|| (line.trim_end() == prefix.trim_end()).then_some(""))
}

pub fn classify(line: &str) -> LineKind<'_> {
    if let Some(rest) = strip_annotation(line, KEY_PREFIX) {
        LineKind::Key(rest)
    } else if let Some(rest) = strip_annotation(line, SOURCE_LOCATION_PREFIX) {
        LineKind::SourceLocation(rest)
    } else if let Some(rest) = strip_annotation(line, SOURCE_COMMENT_PREFIX) {
        LineKind::SourceComment(rest)
    } else if let Some(rest) = line.strip_prefix(CONTEXT_PREFIX) {
        LineKind::Context(rest)
    } else if let Some(rest) = line.strip_prefix(ID_PREFIX) {
        LineKind::Id(rest)
    } else if let Some(rest) = line.strip_prefix(TRANSLATION_PREFIX) {
        LineKind::Translation(rest)
    } else {
        LineKind::Other
    }
}

/// Returns the text between the first and last quote of `payload`, untouched.
pub fn strip_quotes(payload: &str) -> std::result::Result<&str, String> {
    let payload = payload.trim();
    payload
        .strip_prefix('"')
        .ok_or_else(|| format!("expected a quoted string, found `{}`", payload))?
        .strip_suffix('"')
        .ok_or_else(|| format!("missing closing quote in `{}`", payload))
}

/// Decodes a gettext string literal such as `"say \"hi\""`.
///
/// The literal runs from the first to the last unescaped quote on the line.
/// Bare quotes in between are kept as-is.
pub fn parse_quoted(payload: &str) -> std::result::Result<String, String> {
    let inner = strip_quotes(payload)?;

    let trailing_backslashes = inner.chars().rev().take_while(|&c| c == '\\').count();
    if trailing_backslashes % 2 == 1 {
        return Err(format!("missing closing quote in `{}`", payload.trim()));
    }

    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('"') => result.push('"'),
            Some('\\') => result.push('\\'),
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }
    Ok(result)
}

/// Encodes `value` as the body of a gettext string literal (without the
/// surrounding quotes).
pub fn escape_quoted(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '"' => result.push_str("\\\""),
            '\n' => result.push_str("\\n"),
            '\t' => result.push_str("\\t"),
            '\r' => result.push_str("\\r"),
            _ => result.push(c),
        }
    }
    result
}

/// A completed record plus the index (into the `split_lines` output) of the
/// `msgstr` line that closed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRecord {
    pub record: Record,
    pub terminator: usize,
}

#[derive(Debug, Default)]
struct PendingRecord {
    key: String,
    key_line: usize,
    source_location: Option<String>,
    source_comment: Option<String>,
    context: Option<String>,
    source_text: Option<String>,
}

#[derive(Debug, Default)]
enum ParserState {
    #[default]
    Idle,
    Accumulating(PendingRecord),
}

fn malformed(language: &str, line: &SourceLine<'_>, message: String) -> ConvertError {
    ConvertError::MalformedRecord {
        language: language.to_string(),
        line: line.number,
        message,
    }
}

/// Reads a quoted field. Unescaped files keep the literal body verbatim.
fn quoted(language: &str, line: &SourceLine<'_>, payload: &str, escape: bool) -> Result<String> {
    let value = if escape {
        parse_quoted(payload)
    } else {
        strip_quotes(payload).map(str::to_string)
    };
    value.map_err(|message| malformed(language, line, message))
}

pub struct RecordParser<'a> {
    language: &'a str,
    escape: bool,
    state: ParserState,
    records: Vec<ParsedRecord>,
}

impl<'a> RecordParser<'a> {
    /// `escape` selects whether quoted fields carry gettext backslash escapes.
    pub fn new(language: &'a str, escape: bool) -> Self {
        Self {
            language,
            escape,
            state: ParserState::Idle,
            records: Vec::new(),
        }
    }

    /// Feeds the line at `index` of the split line sequence.
    pub fn feed(&mut self, index: usize, line: &SourceLine<'_>) -> Result<()> {
        let language = self.language;
        let escape = self.escape;
        let kind = classify(line.text);

        if let LineKind::Key(key) = kind {
            if let ParserState::Accumulating(pending) = &self.state {
                tracing::debug!(
                    "{}: dropping record '{}' from line {} without msgstr",
                    language,
                    pending.key,
                    pending.key_line
                );
            }
            self.state = ParserState::Accumulating(PendingRecord {
                key: key.to_string(),
                key_line: line.number,
                ..Default::default()
            });
            return Ok(());
        }

        let ParserState::Accumulating(pending) = &mut self.state else {
            return Ok(());
        };

        match kind {
            LineKind::SourceLocation(value) => pending.source_location = Some(value.to_string()),
            LineKind::SourceComment(value) => pending.source_comment = Some(value.to_string()),
            LineKind::Context(payload) => pending.context = Some(quoted(language, line, payload, escape)?),
            LineKind::Id(payload) => pending.source_text = Some(quoted(language, line, payload, escape)?),
            LineKind::Translation(payload) => {
                let translation = quoted(language, line, payload, escape)?;
                let pending = std::mem::take(pending);
                self.state = ParserState::Idle;

                let Some(source_text) = pending.source_text else {
                    return Err(malformed(
                        language,
                        line,
                        format!("record '{}' has msgstr but no msgid", pending.key),
                    ));
                };
                self.records.push(ParsedRecord {
                    record: Record {
                        key: pending.key,
                        source_location: pending.source_location.unwrap_or_default(),
                        source_comment: pending.source_comment.unwrap_or_default(),
                        context: pending.context.unwrap_or_default(),
                        source_text,
                        translations: vec![translation],
                    },
                    terminator: index,
                });
            }
            LineKind::Key(_) | LineKind::Other => {}
        }
        Ok(())
    }

    pub fn finish(self) -> Vec<ParsedRecord> {
        if let ParserState::Accumulating(pending) = &self.state {
            tracing::debug!(
                "{}: dropping trailing record '{}' from line {} without msgstr",
                self.language,
                pending.key,
                pending.key_line
            );
        }
        self.records
    }
}

/// Parses every completed record in `lines`.
pub fn parse_records(
    language: &str,
    lines: &[SourceLine<'_>],
    escape: bool,
) -> Result<Vec<ParsedRecord>> {
    let mut parser = RecordParser::new(language, escape);
    for (index, line) in lines.iter().enumerate() {
        parser.feed(index, line)?;
    }
    Ok(parser.finish())
}

/// Reads the translation text from a single `msgstr` line, or `None` if the
/// line is something else.
pub fn parse_translation_line(
    language: &str,
    line: &SourceLine<'_>,
    escape: bool,
) -> Result<Option<String>> {
    match classify(line.text) {
        LineKind::Translation(payload) => quoted(language, line, payload, escape).map(Some),
        _ => Ok(None),
    }
}
