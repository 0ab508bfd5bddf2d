// CSV/TSV import/export of catalog rows

use std::io::Write;
use std::path::Path;

use skugrid_engine::model::{cell_text, text_row, Row, Sheet};

use crate::error::IoError;

/// Read a delimited file into a raw matrix. `None` sniffs the delimiter.
pub fn read_matrix(path: &Path, delimiter: Option<u8>) -> Result<Vec<Row>, IoError> {
    let content = read_text(path)?;
    let delimiter = delimiter.unwrap_or_else(|| sniff_delimiter(&content));
    log::debug!(
        "csv: reading {} with delimiter {:?}",
        path.display(),
        delimiter as char
    );
    parse_matrix(&content, delimiter)
}

/// Candidates in order of preference on a tie.
const DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Records inspected when detecting the delimiter.
const SNIFF_RECORDS: usize = 10;

/// Pick the delimiter that splits the header into the most columns and keeps
/// the following records at that width. Quoted fields, embedded newlines
/// included, are parsed as the csv reader would. Falls back to `,`.
pub fn sniff_delimiter(content: &str) -> u8 {
    let mut best = (b',', 0);
    for delimiter in DELIMITERS {
        let score = width_score(&record_widths(content, delimiter));
        if score > best.1 {
            best = (delimiter, score);
        }
    }
    best.0
}

fn record_widths(content: &str, delimiter: u8) -> Vec<usize> {
    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes())
        .records()
        .take(SNIFF_RECORDS)
        .map_while(Result::ok)
        .map(|record| record.len())
        .collect()
}

/// Header width times the number of records that share it; 0 when the header
/// does not split.
fn width_score(widths: &[usize]) -> usize {
    match widths.first() {
        Some(&width) if width > 1 => width * widths.iter().filter(|&&w| w == width).count(),
        _ => 0,
    }
}

/// Read a text file. A byte-order mark selects the encoding and is dropped;
/// otherwise UTF-8 is expected and Windows-1252 is used when that fails.
pub fn read_text(path: &Path) -> Result<String, IoError> {
    let bytes = std::fs::read(path).map_err(|source| IoError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some((encoding, bom_len)) = encoding_rs::Encoding::for_bom(&bytes) {
        let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return Ok(text.into_owned());
    }

    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(err) => {
            log::warn!(
                "csv: {} is not valid UTF-8 ({}); decoding as Windows-1252",
                path.display(),
                err.utf8_error()
            );
            let (text, _) = encoding_rs::WINDOWS_1252.decode_without_bom_handling(err.as_bytes());
            Ok(text.into_owned())
        }
    }
}

/// Parse delimited text into rows of text cells. Ragged records are kept
/// as-is; readers pad through `cell_text`.
pub fn parse_matrix(content: &str, delimiter: u8) -> Result<Vec<Row>, IoError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let fields: Vec<&str> = record.iter().collect();
        rows.push(text_row(&fields));
    }
    Ok(rows)
}

/// Write the sheet as delimited text: the column headers, then every row.
pub fn export(sheet: &Sheet, path: &Path, delimiter: u8) -> Result<(), IoError> {
    let file = std::fs::File::create(path).map_err(|source| IoError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    write_sheet(sheet, file, delimiter)
}

pub fn write_sheet<W: Write>(sheet: &Sheet, out: W, delimiter: u8) -> Result<(), IoError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_writer(out);

    writer.write_record(sheet.headers())?;

    let width = sheet.columns.len();
    for row in &sheet.rows {
        let mut record: Vec<String> = (0..width.max(row.len()))
            .map(|col| cell_text(row, col))
            .collect();
        // Columns past the header only keep what carries data
        while record.len() > width && record.last().is_some_and(|s| s.is_empty()) {
            record.pop();
        }
        writer.write_record(&record)?;
    }

    writer.flush().map_err(|e| IoError::Csv(e.into()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use skugrid_engine::model::ColumnDef;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_sniff_semicolon_delimiter() {
        let content = "SKU;Color;Size\n;Red;Small\n;Blue;Large\n";
        assert_eq!(sniff_delimiter(content), b';');
    }

    #[test]
    fn test_sniff_comma_delimiter() {
        let content = "SKU,Color,Size\n,Red,Small\n,Blue,Large\n";
        assert_eq!(sniff_delimiter(content), b',');
    }

    #[test]
    fn test_sniff_tab_delimiter() {
        let content = "SKU\tColor\tSize\n\tRed\tSmall\n";
        assert_eq!(sniff_delimiter(content), b'\t');
    }

    #[test]
    fn test_sniff_semicolon_with_commas_in_values() {
        let content = "SKU;Material;Note\n;\"Oak, oiled\";\"a, b\"\n;Pine;plain\n";
        assert_eq!(sniff_delimiter(content), b';');
    }

    #[test]
    fn test_sniff_pipe_delimiter() {
        let content = "SKU|Color|Size\n|Red|Small\n";
        assert_eq!(sniff_delimiter(content), b'|');
    }

    #[test]
    fn test_sniff_quoted_newline_keeps_widths() {
        let content = "SKU,Color,Note\n,Red,\"two\nlines\"\n,Blue,x\n";
        assert_eq!(sniff_delimiter(content), b',');
    }

    #[test]
    fn test_sniff_single_column_defaults_to_comma() {
        assert_eq!(sniff_delimiter("SKU\nA\nB\n"), b',');
    }

    #[test]
    fn test_sniff_empty_defaults_to_comma() {
        assert_eq!(sniff_delimiter(""), b',');
    }

    #[test]
    fn test_parse_matrix_keeps_ragged_rows() {
        let rows = parse_matrix("SKU,Color,Size\n,Red\n", b',').unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].len(), 3);
        assert_eq!(rows[1].len(), 2);
        assert_eq!(cell_text(&rows[1], 1), "Red");
        assert_eq!(cell_text(&rows[1], 2), "");
    }

    #[test]
    fn test_windows_1252_fallback() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("latin.csv");
        // "Crème" with 0xE8 as in Windows-1252
        fs::write(&path, b"SKU,Finish\n,Cr\xe8me\n").unwrap();

        let rows = read_matrix(&path, None).unwrap();
        assert_eq!(cell_text(&rows[1], 1), "Crème");
    }

    #[test]
    fn test_utf8_bom_is_dropped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bom.csv");
        fs::write(&path, b"\xef\xbb\xbfSKU;Color\n;Red\n").unwrap();

        let rows = read_matrix(&path, None).unwrap();
        assert_eq!(cell_text(&rows[0], 0), "SKU");
        assert_eq!(cell_text(&rows[1], 1), "Red");
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = tempdir().unwrap();
        let err = read_matrix(&dir.path().join("absent.csv"), None).unwrap_err();
        assert!(matches!(err, IoError::Read { .. }));
    }

    #[test]
    fn test_export_writes_header_and_rows() {
        let mut sheet = Sheet::new("s", "Products");
        sheet.columns = vec![
            ColumnDef::sku("sku", "SKU"),
            ColumnDef::spec("c1", "color", "Color"),
            ColumnDef::free("c2", "Notes"),
        ];
        sheet.rows = vec![text_row(&["R", "Red"]), text_row(&["B", "Blue", "new, improved"])];

        let mut out = Vec::new();
        write_sheet(&sheet, &mut out, b',').unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "SKU,Color,Notes\nR,Red,\nB,Blue,\"new, improved\"\n");
    }

    #[test]
    fn test_tsv_export_then_import() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.tsv");

        let mut sheet = Sheet::new("s", "Products");
        sheet.columns = vec![ColumnDef::sku("sku", "SKU"), ColumnDef::free("c1", "Name")];
        sheet.rows = vec![text_row(&["A-1", "Alpha"])];
        export(&sheet, &path, b'\t').unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains('\t'));

        let rows = read_matrix(&path, None).unwrap();
        assert_eq!(rows, vec![text_row(&["SKU", "Name"]), text_row(&["A-1", "Alpha"])]);
    }
}
