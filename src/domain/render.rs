//! Re-renders table rows as per-language record files.

use crate::domain::model::{Record, Table};
use crate::domain::parser::{escape_quoted, KEY_PREFIX};

/// Returns the boilerplate an existing record file carries before its first
/// record, without the newline that separates it from that record.
pub fn preserved_header(existing: &str) -> &str {
    let marker = KEY_PREFIX.trim_end();
    let start = if existing.starts_with(marker) {
        Some(0)
    } else {
        existing.find(&format!("\n{}", marker)).map(|i| i + 1)
    };

    match start {
        Some(start) => {
            let header = &existing[..start];
            header.strip_suffix('\n').unwrap_or(header)
        }
        None => "",
    }
}

fn render_record(out: &mut String, record: &Record, translation: &str, escape: bool) {
    let quote = |value: &str| {
        if escape {
            escape_quoted(value)
        } else {
            value.to_string()
        }
    };

    out.push_str(&format!(
        "\n#. Key:\t{}\n#. SourceLocation:\t{}\n#: {}\nmsgctxt \"{}\"\nmsgid \"{}\"\nmsgstr \"{}\"\n",
        record.key,
        record.source_location,
        record.source_comment,
        quote(&record.context),
        quote(&record.source_text),
        quote(translation),
    ));
}

/// Renders the full record file for the language in `column`.
pub fn render_document(header: &str, table: &Table, column: usize, escape: bool) -> String {
    let mut out = String::with_capacity(header.len() + table.rows.len() * 128);
    out.push_str(header);
    for record in &table.rows {
        let translation = record.translations.get(column).map(String::as_str).unwrap_or("");
        render_record(&mut out, record, translation, escape);
    }
    out.push('\n');
    out
}
