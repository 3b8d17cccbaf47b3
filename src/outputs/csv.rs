//! CSV export.

use super::ExportError;
use crate::models::ArticleRecord;
use ::csv::{Terminator, WriterBuilder};

/// Comma-delimited, header row first, `\n` line endings. Fields are quoted
/// only when they contain a delimiter, quote, or line break.
pub fn to_csv(records: &[ArticleRecord]) -> Result<Vec<u8>, ExportError> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    for record in records {
        writer.serialize(record)?;
    }
    writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.into_error().into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outputs::tests::record;

    #[test]
    fn test_header_and_rows_without_index() {
        let out = to_csv(&[record("A", "Body."), record("B", "More.")]).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "title,url,date,content\nA,http://x,1 Jan 2024,Body.\nB,http://x,1 Jan 2024,More.\n"
        );
    }

    #[test]
    fn test_multiline_and_comma_fields_are_quoted() {
        let out = to_csv(&[record("Naik, lalu turun", "Satu.\nDua.")]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\"Naik, lalu turun\""));
        assert!(text.contains("\"Satu.\nDua.\""));
    }

    #[test]
    fn test_reads_back_with_csv_reader() {
        let records = vec![record("A \"quoted\"", "Line one.\nLine two.")];
        let out = to_csv(&records).unwrap();
        let parsed: Vec<ArticleRecord> = ::csv::Reader::from_reader(out.as_slice())
            .deserialize()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(parsed, records);
    }
}
