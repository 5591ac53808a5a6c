use crate::domain::model::{LanguageSet, Record, Table, METADATA_COLUMNS, METADATA_HEADER};
use crate::utils::error::{ConvertError, Result};
use csv::{QuoteStyle, ReaderBuilder, WriterBuilder};

/// Columns rendered as single-line annotations rather than quoted fields.
const ANNOTATION_COLUMNS: usize = 3;

/// Serializes the header and every row as comma separated text.
pub fn write_table(table: &Table) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .flexible(false)
        .from_writer(Vec::new());

    writer.write_record(table.header())?;
    for record in &table.rows {
        if record.translations.len() != table.languages.len() {
            return Err(ConvertError::MalformedTable {
                message: format!(
                    "record '{}' has {} translations for {} languages",
                    record.key,
                    record.translations.len(),
                    table.languages.len()
                ),
            });
        }
        writer.write_record(record.to_row())?;
    }

    writer
        .into_inner()
        .map_err(|e| ConvertError::Io(e.into_error()))
}

/// Parses table text written by `write_table` (or edited by a spreadsheet).
pub fn read_table(data: &[u8]) -> Result<Table> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data);

    let mut rows = reader.records();
    let header = match rows.next() {
        Some(header) => header?,
        None => {
            return Err(ConvertError::MalformedTable {
                message: "table is empty".to_string(),
            })
        }
    };

    if header.len() <= METADATA_COLUMNS {
        return Err(ConvertError::MalformedTable {
            message: format!(
                "header has {} columns, expected {} metadata columns and at least one language",
                header.len(),
                METADATA_COLUMNS
            ),
        });
    }

    let languages = LanguageSet::new(
        header
            .iter()
            .skip(METADATA_COLUMNS)
            .map(|name| name.trim().to_string())
            .collect(),
    );
    for (index, language) in languages.iter().enumerate() {
        if language.is_empty() {
            return Err(ConvertError::MalformedTable {
                message: format!("language column {} has an empty name", METADATA_COLUMNS + index + 1),
            });
        }
        if languages.position(language) != Some(index) {
            return Err(ConvertError::MalformedTable {
                message: format!("language '{}' appears more than once in the header", language),
            });
        }
    }

    let width = header.len();
    let mut records = Vec::new();
    for (index, row) in rows.enumerate() {
        let row = row?;
        // Spreadsheets tend to leave fully empty trailing lines behind.
        if row.iter().all(str::is_empty) {
            continue;
        }
        if row.len() < width {
            return Err(ConvertError::MalformedTable {
                message: format!(
                    "row {} has {} columns, header has {}",
                    index + 2,
                    row.len(),
                    width
                ),
            });
        }
        if let Some(column) = row
            .iter()
            .take(ANNOTATION_COLUMNS)
            .position(|field| field.contains(['\n', '\r']))
        {
            return Err(ConvertError::MalformedTable {
                message: format!(
                    "row {} has a line break in column {} ({})",
                    index + 2,
                    column + 1,
                    METADATA_HEADER[column]
                ),
            });
        }
        records.push(Record {
            key: row[0].to_string(),
            source_location: row[1].to_string(),
            source_comment: row[2].to_string(),
            context: row[3].to_string(),
            source_text: row[4].to_string(),
            translations: row
                .iter()
                .skip(METADATA_COLUMNS)
                .take(languages.len())
                .map(str::to_string)
                .collect(),
        });
    }

    Ok(Table {
        languages,
        rows: records,
    })
}
