//! Batch import from CSV.

use log::info;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::InputError;
use crate::record::{AssetRecord, Field};

/// Read a batch of records. Every column of [`Field::ALL`] must be present
/// (headers are trimmed); extra columns are ignored and missing cells read
/// as empty.
pub fn read_table(path: &Path) -> Result<Vec<AssetRecord>, InputError> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if !is_csv {
        return Err(InputError::UnsupportedFormat(path.to_path_buf()));
    }
    let text = fs::read_to_string(path)?;
    let records = parse_table(&text)?;
    info!("read {} record(s) from {}", records.len(), path.display());
    Ok(records)
}

/// Parse CSV text with the same rules as [`read_table`].
pub fn parse_table(text: &str) -> Result<Vec<AssetRecord>, InputError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(sniff_delimiter(text))
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut columns: HashMap<Field, usize> = HashMap::new();
    for (i, name) in reader.headers()?.iter().enumerate() {
        if let Some(field) = Field::from_column(name) {
            columns.entry(field).or_insert(i);
        }
    }
    let missing: Vec<String> = Field::ALL
        .iter()
        .filter(|f| !columns.contains_key(f))
        .map(|f| f.column().to_string())
        .collect();
    if !missing.is_empty() {
        return Err(InputError::MissingColumns(missing));
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let values: HashMap<Field, String> = columns
            .iter()
            .map(|(field, i)| (*field, row.get(*i).unwrap_or_default().to_string()))
            .collect();
        records.push(AssetRecord::from_fields(&values));
    }
    Ok(records)
}

// Spreadsheet exports in German locales separate with ';'.
fn sniff_delimiter(text: &str) -> u8 {
    let header = text.lines().next().unwrap_or_default();
    if header.contains(';') && !header.contains(',') {
        b';'
    } else {
        b','
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Rechnungsdatum,Rechnungsnummer,Bestellnummer,Garantie,Händler,Inventarnummer";

    #[test]
    fn reads_all_columns() {
        let text = format!("{HEADER}\n03.04.2024,R-1,B-1,2 Jahre,Conrad,\n");
        let records = parse_table(&text).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].vendor, "Conrad");
        assert_eq!(records[0].warranty, "2 Jahre");
        assert!(!records[0].has_identifier());
    }

    #[test]
    fn trims_headers_and_ignores_extra_columns() {
        let text = " Inventarnummer , Händler,Notiz,Rechnungsdatum,Rechnungsnummer,Bestellnummer,Garantie\n\
                    42,Reichelt,egal,2024-01-01,R,B,G\n";
        let records = parse_table(text).unwrap();
        assert_eq!(records[0].inventory_number, "42");
        assert_eq!(records[0].vendor, "Reichelt");
    }

    #[test]
    fn reports_missing_columns_in_order() {
        let text = "Rechnungsdatum,Händler\n2024,X\n";
        match parse_table(text) {
            Err(InputError::MissingColumns(cols)) => assert_eq!(
                cols,
                ["Rechnungsnummer", "Bestellnummer", "Garantie", "Inventarnummer"]
            ),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn semicolon_separated() {
        let text = format!("{}\n1.1.2024;R;B;G;H;7\n", HEADER.replace(',', ";"));
        let records = parse_table(&text).unwrap();
        assert_eq!(records[0].inventory_number, "7");
    }

    #[test]
    fn short_rows_read_as_empty() {
        let text = format!("{HEADER}\n1.1.2024,R\n");
        let records = parse_table(&text).unwrap();
        assert_eq!(records[0].invoice_number, "R");
        assert_eq!(records[0].vendor, "");
    }

    #[test]
    fn rejects_other_extensions() {
        let err = read_table(Path::new("batch.xlsx")).unwrap_err();
        assert!(matches!(err, InputError::UnsupportedFormat(_)));
    }
}
