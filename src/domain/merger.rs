//! Joins the parsed record sequences of every language into table rows.

use crate::domain::model::{AlignMode, LanguageFile, LanguageSet, Record, Table};
use crate::domain::parser::{
    parse_records, parse_translation_line, split_lines, ParsedRecord, SourceLine,
};
use crate::utils::error::{ConvertError, Result};
use std::collections::{HashMap, HashSet};

/// Merges `files` into a table. The first file is the primary language and
/// defines row order and metadata. `escape` says whether quoted fields carry
/// gettext backslash escapes.
pub fn merge(files: &[LanguageFile], mode: AlignMode, escape: bool) -> Result<Table> {
    let Some(primary) = files.first() else {
        return Ok(Table::default());
    };

    let primary_lines = split_lines(&primary.content);
    let mut parsed = parse_records(&primary.language, &primary_lines, escape)?;
    tracing::debug!(
        "{}: parsed {} records from {}",
        primary.language,
        parsed.len(),
        primary.path
    );

    if mode == AlignMode::Keyed && files.len() > 1 {
        key_index(&primary.language, &parsed)?;
    }

    for file in &files[1..] {
        let lines = split_lines(&file.content);
        let translations = match mode {
            AlignMode::Keyed => keyed_translations(&parsed, file, &lines, escape)?,
            AlignMode::Positional => positional_translations(&parsed, file, &lines, escape)?,
        };
        for (entry, translation) in parsed.iter_mut().zip(translations) {
            entry.record.translations.push(translation);
        }
    }

    let languages = LanguageSet::new(files.iter().map(|f| f.language.clone()).collect());
    let rows: Vec<Record> = parsed.into_iter().map(|p| p.record).collect();

    Ok(Table { languages, rows })
}

fn misaligned(language: &str, message: String) -> ConvertError {
    ConvertError::MisalignedRecords {
        language: language.to_string(),
        message,
    }
}

fn key_index<'a>(language: &str, records: &'a [ParsedRecord]) -> Result<HashMap<&'a str, usize>> {
    let mut index = HashMap::with_capacity(records.len());
    for (position, parsed) in records.iter().enumerate() {
        if index.insert(parsed.record.key.as_str(), position).is_some() {
            return Err(misaligned(
                language,
                format!("duplicate key '{}'", parsed.record.key),
            ));
        }
    }
    Ok(index)
}

/// Looks up every primary key in the secondary file.
fn keyed_translations(
    primary: &[ParsedRecord],
    file: &LanguageFile,
    lines: &[SourceLine<'_>],
    escape: bool,
) -> Result<Vec<String>> {
    let secondary = parse_records(&file.language, lines, escape)?;
    let index = key_index(&file.language, &secondary)?;

    let mut translations = Vec::with_capacity(primary.len());
    for parsed in primary {
        let position = index.get(parsed.record.key.as_str()).ok_or_else(|| {
            misaligned(
                &file.language,
                format!("missing key '{}' in {}", parsed.record.key, file.path),
            )
        })?;
        translations.push(secondary[*position].record.translations[0].clone());
    }

    if secondary.len() != primary.len() {
        let known: HashSet<&str> =
            primary.iter().map(|p| p.record.key.as_str()).collect();
        let extra: Vec<&str> = secondary
            .iter()
            .map(|p| p.record.key.as_str())
            .filter(|key| !known.contains(key))
            .collect();
        return Err(misaligned(
            &file.language,
            format!(
                "{} has keys not present in the primary language: {}",
                file.path,
                extra.join(", ")
            ),
        ));
    }

    Ok(translations)
}

/// Reads each translation from the line index that closed the matching
/// primary record.
fn positional_translations(
    primary: &[ParsedRecord],
    file: &LanguageFile,
    lines: &[SourceLine<'_>],
    escape: bool,
) -> Result<Vec<String>> {
    let secondary_count = parse_records(&file.language, lines, escape)?.len();
    if secondary_count != primary.len() {
        return Err(misaligned(
            &file.language,
            format!(
                "{} has {} records, primary language has {}",
                file.path,
                secondary_count,
                primary.len()
            ),
        ));
    }

    let mut translations = Vec::with_capacity(primary.len());
    for parsed in primary {
        let line = lines.get(parsed.terminator).ok_or_else(|| {
            misaligned(
                &file.language,
                format!(
                    "record '{}' ends past the end of {}",
                    parsed.record.key, file.path
                ),
            )
        })?;
        let translation = parse_translation_line(&file.language, line, escape)?.ok_or_else(|| {
            misaligned(
                &file.language,
                format!(
                    "expected msgstr for record '{}' at line {} of {}",
                    parsed.record.key, line.number, file.path
                ),
            )
        })?;
        translations.push(translation);
    }
    Ok(translations)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_block(key: &str, id: &str, text: &str) -> String {
        format!(
            "#. Key:\t{key}\n#. SourceLocation:\tUI/Menu\n#: Menu.uasset:1\nmsgctxt \"\"\nmsgid \"{id}\"\nmsgstr \"{text}\"\n\n"
        )
    }

    fn file(language: &str, blocks: &[(&str, &str, &str)]) -> LanguageFile {
        let content: String = blocks
            .iter()
            .map(|(key, id, text)| record_block(key, id, text))
            .collect();
        LanguageFile {
            language: language.to_string(),
            path: format!("{language}/Game.po"),
            content,
        }
    }

    #[test]
    fn test_merge_two_languages() {
        let files = vec![
            file("en", &[("GREETING", "Hello", "Hello"), ("BYE", "Bye", "Bye")]),
            file("fr", &[("GREETING", "Hello", "Bonjour"), ("BYE", "Bye", "Salut")]),
        ];

        for mode in [AlignMode::Keyed, AlignMode::Positional] {
            let table = merge(&files, mode, true).unwrap();
            assert_eq!(table.languages.iter().collect::<Vec<_>>(), vec!["en", "fr"]);
            assert_eq!(table.rows.len(), 2);
            assert_eq!(table.rows[0].key, "GREETING");
            assert_eq!(table.rows[0].source_location, "UI/Menu");
            assert_eq!(table.rows[0].translations, vec!["Hello", "Bonjour"]);
            assert_eq!(table.rows[1].translations, vec!["Bye", "Salut"]);
        }
    }

    #[test]
    fn test_keyed_merge_tolerates_reordering() {
        let files = vec![
            file("en", &[("A", "a", "a"), ("B", "b", "b")]),
            file("de", &[("B", "b", "bb"), ("A", "a", "aa")]),
        ];
        let table = merge(&files, AlignMode::Keyed, true).unwrap();
        assert_eq!(table.rows[0].translations, vec!["a", "aa"]);
        assert_eq!(table.rows[1].translations, vec!["b", "bb"]);
    }

    #[test]
    fn test_positional_merge_rejects_shifted_lines() {
        let mut files = vec![
            file("en", &[("A", "a", "a")]),
            file("de", &[("A", "a", "aa")]),
        ];
        files[1].content = format!("# extra header line\n{}", files[1].content);
        let err = merge(&files, AlignMode::Positional, true).unwrap_err();
        assert!(matches!(err, ConvertError::MisalignedRecords { .. }));
    }

    #[test]
    fn test_record_count_mismatch_is_reported() {
        let files = vec![
            file("en", &[("A", "a", "a"), ("B", "b", "b")]),
            file("fr", &[("A", "a", "aa")]),
        ];
        for mode in [AlignMode::Keyed, AlignMode::Positional] {
            let err = merge(&files, mode, true).unwrap_err();
            match err {
                ConvertError::MisalignedRecords { language, .. } => assert_eq!(language, "fr"),
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[test]
    fn test_extra_secondary_key_is_reported() {
        let files = vec![
            file("en", &[("A", "a", "a")]),
            file("fr", &[("A", "a", "aa"), ("Z", "z", "zz")]),
        ];
        let err = merge(&files, AlignMode::Keyed, true).unwrap_err();
        assert!(err.to_string().contains("Z"));
    }

    #[test]
    fn test_duplicate_key_is_reported() {
        let files = vec![
            file("en", &[("A", "a", "a"), ("A", "b", "b")]),
            file("fr", &[("A", "a", "aa"), ("A", "b", "bb")]),
        ];
        let err = merge(&files, AlignMode::Keyed, true).unwrap_err();
        assert!(err.to_string().contains("duplicate key 'A'"));
    }

    #[test]
    fn test_single_language_needs_no_alignment() {
        let files = vec![file("en", &[("A", "a", "a"), ("A", "b", "b")])];
        let table = merge(&files, AlignMode::Keyed, true).unwrap();
        assert_eq!(table.rows.len(), 2);
    }

    #[test]
    fn test_no_files_gives_empty_table() {
        let table = merge(&[], AlignMode::Keyed, true).unwrap();
        assert!(table.rows.is_empty());
        assert!(table.languages.is_empty());
    }
}
