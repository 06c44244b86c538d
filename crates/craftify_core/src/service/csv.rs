//! Minimal CSV codec for item export and import.
//!
//! Comma separated, `"` quoting with doubled inner quotes, `\n` or `\r\n`
//! record terminators. Quoted fields may span lines.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Byte-order mark written before exported content.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
/// Same mark as it appears in decoded text.
pub const BOM_CHAR: char = '\u{FEFF}';

/// Framing error while splitting CSV text into records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsvError {
    /// A quoted field was still open at end of input. `record` is 1-based and
    /// counts the header.
    UnterminatedQuote { record: usize },
}

impl Display for CsvError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnterminatedQuote { record } => {
                write!(f, "unterminated quoted field in record {record}")
            }
        }
    }
}

impl Error for CsvError {}

/// Quotes `value` when it contains a comma, quote, CR or LF.
pub fn escape_field(value: &str) -> String {
    if value.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Appends one `\n`-terminated record to `out`.
pub fn write_record<'a, I>(out: &mut String, fields: I)
where
    I: IntoIterator<Item = &'a str>,
{
    for (index, field) in fields.into_iter().enumerate() {
        if index > 0 {
            out.push(',');
        }
        out.push_str(&escape_field(field));
    }
    out.push('\n');
}

/// Splits `text` into records of fields. Blank lines are skipped.
pub fn parse_records(text: &str) -> Result<Vec<Vec<String>>, CsvError> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut field_started = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(ch);
            }
            continue;
        }
        match ch {
            '"' if !field_started => {
                in_quotes = true;
                field_started = true;
            }
            ',' => {
                record.push(std::mem::take(&mut field));
                field_started = false;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                finish_record(&mut records, &mut record, &mut field);
                field_started = false;
            }
            other => {
                field.push(other);
                field_started = true;
            }
        }
    }

    if in_quotes {
        return Err(CsvError::UnterminatedQuote {
            record: records.len() + 1,
        });
    }
    finish_record(&mut records, &mut record, &mut field);
    Ok(records)
}

fn finish_record(records: &mut Vec<Vec<String>>, record: &mut Vec<String>, field: &mut String) {
    record.push(std::mem::take(field));
    let fields = std::mem::take(record);
    let blank = fields.len() == 1 && fields[0].trim().is_empty();
    if !blank {
        records.push(fields);
    }
}

#[cfg(test)]
mod tests {
    use super::{escape_field, parse_records, write_record, CsvError};

    #[test]
    fn escape_quotes_only_when_needed() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn write_then_parse_preserves_awkward_fields() {
        let mut out = String::new();
        write_record(&mut out, ["ITM-001", "Bolt, \"large\"", "multi\r\nline"]);
        let records = parse_records(&out).expect("valid csv");
        assert_eq!(
            records,
            vec![vec![
                "ITM-001".to_string(),
                "Bolt, \"large\"".to_string(),
                "multi\r\nline".to_string(),
            ]]
        );
    }

    #[test]
    fn parse_skips_blank_lines_and_handles_crlf() {
        let records = parse_records("a,b\r\n\r\nc,\n").expect("valid csv");
        assert_eq!(
            records,
            vec![
                vec!["a".to_string(), "b".to_string()],
                vec!["c".to_string(), String::new()],
            ]
        );
    }

    #[test]
    fn parse_rejects_unterminated_quote() {
        let error = parse_records("a,b\n\"open,c\n").expect_err("quote never closes");
        assert_eq!(error, CsvError::UnterminatedQuote { record: 2 });
    }
}
