//! Parsing of uploaded dataset files and class-name lists.
//!
//! Uploaded files are comma-separated, the first record is a header, and each
//! following record carries `text1,text2[,...]`. Quoted fields follow the
//! usual CSV conventions (embedded commas, doubled quotes, embedded newlines)
//! so a file produced by [`crate::export`] parses back to the same pairs.

use crate::error::CoreError;

/// Separator between class names in the dataset creation form.
pub const CLASS_SEPARATOR: char = ';';

/// One text pair extracted from an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPair {
    pub text1: String,
    pub text2: String,
}

/// A record that was ignored because it had fewer than two fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// 1-based line number where the record starts.
    pub line: usize,
    pub content: String,
}

/// Result of parsing an upload: usable pairs plus the records that were skipped.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParsedUpload {
    pub pairs: Vec<ParsedPair>,
    pub skipped: Vec<SkippedRecord>,
}

/// Trim a dataset name and reject it when empty.
pub fn validate_dataset_name(name: &str) -> Result<String, CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Dataset name cannot be empty".into()));
    }
    Ok(trimmed.to_string())
}

/// Split a `;`-separated class list into trimmed, non-empty names.
pub fn parse_class_names(raw: &str) -> Vec<String> {
    raw.split(CLASS_SEPARATOR)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse an uploaded dataset file.
///
/// The header record is skipped, blank records are ignored and records with
/// fewer than two fields are reported in [`ParsedUpload::skipped`].
pub fn parse_text_pairs(content: &str) -> ParsedUpload {
    let mut upload = ParsedUpload::default();
    for record in read_records(content).into_iter().skip(1) {
        if record.raw.trim().is_empty() {
            continue;
        }
        let mut fields = record.fields.into_iter();
        match (fields.next(), fields.next()) {
            (Some(text1), Some(text2)) => upload.pairs.push(ParsedPair {
                text1: text1.trim().to_string(),
                text2: text2.trim().to_string(),
            }),
            _ => upload.skipped.push(SkippedRecord {
                line: record.line,
                content: record.raw,
            }),
        }
    }
    upload
}

struct Record {
    line: usize,
    raw: String,
    fields: Vec<String>,
}

/// Split `content` into records, honouring quotes across line breaks.
fn read_records(content: &str) -> Vec<Record> {
    let mut records = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut raw = String::new();
    let mut in_quotes = false;
    let mut line = 1usize;
    let mut start_line = 1usize;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    raw.push_str("\"\"");
                    field.push('"');
                }
                '"' => {
                    in_quotes = false;
                    raw.push(c);
                }
                _ => {
                    if c == '\n' {
                        line += 1;
                    }
                    raw.push(c);
                    field.push(c);
                }
            }
            continue;
        }
        match c {
            '"' => {
                in_quotes = true;
                raw.push(c);
            }
            ',' => {
                fields.push(std::mem::take(&mut field));
                raw.push(c);
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                fields.push(std::mem::take(&mut field));
                records.push(Record {
                    line: start_line,
                    raw: std::mem::take(&mut raw),
                    fields: std::mem::take(&mut fields),
                });
                line += 1;
                start_line = line;
            }
            _ => {
                raw.push(c);
                field.push(c);
            }
        }
    }

    if !raw.is_empty() || !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        records.push(Record {
            line: start_line,
            raw,
            fields,
        });
    }
    records
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn pair(a: &str, b: &str) -> ParsedPair {
        ParsedPair {
            text1: a.into(),
            text2: b.into(),
        }
    }

    #[test]
    fn header_is_skipped() {
        let upload = parse_text_pairs("text1,text2\nhello,world\n");
        assert_eq!(upload.pairs, vec![pair("hello", "world")]);
        assert!(upload.skipped.is_empty());
    }

    #[test]
    fn extra_columns_are_ignored() {
        let upload = parse_text_pairs("a,b,c\none,two,three\n");
        assert_eq!(upload.pairs, vec![pair("one", "two")]);
    }

    #[test]
    fn short_records_are_skipped_not_fatal() {
        let upload = parse_text_pairs("text1,text2\nonly-one\nx,y\n");
        assert_eq!(upload.pairs, vec![pair("x", "y")]);
        assert_eq!(
            upload.skipped,
            vec![SkippedRecord {
                line: 2,
                content: "only-one".into()
            }]
        );
    }

    #[test]
    fn blank_lines_are_ignored() {
        let upload = parse_text_pairs("h1,h2\n\n  \nx,y\n\n");
        assert_eq!(upload.pairs, vec![pair("x", "y")]);
        assert!(upload.skipped.is_empty());
    }

    #[test]
    fn fields_are_trimmed_and_empty_second_field_is_kept() {
        let upload = parse_text_pairs("h1,h2\n  left , \n");
        assert_eq!(upload.pairs, vec![pair("left", "")]);
    }

    #[test]
    fn crlf_line_endings() {
        let upload = parse_text_pairs("h1,h2\r\na,b\r\nc,d");
        assert_eq!(upload.pairs, vec![pair("a", "b"), pair("c", "d")]);
    }

    #[test]
    fn quoted_fields_with_commas_quotes_and_newlines() {
        let content = "text1,text2\n\"He said, \"\"hi\"\"\",\"line one\nline two\"\nplain,after\n";
        let upload = parse_text_pairs(content);
        assert_eq!(
            upload.pairs,
            vec![
                pair("He said, \"hi\"", "line one\nline two"),
                pair("plain", "after"),
            ]
        );
    }

    #[test]
    fn empty_file_yields_nothing() {
        assert_eq!(parse_text_pairs(""), ParsedUpload::default());
        assert_eq!(parse_text_pairs("text1,text2\n"), ParsedUpload::default());
    }

    #[test]
    fn class_names_split_on_semicolon() {
        assert_eq!(
            parse_class_names(" positive ; negative;;neutral ;"),
            vec!["positive", "negative", "neutral"]
        );
        assert!(parse_class_names("  ").is_empty());
    }

    #[test]
    fn dataset_name_must_not_be_blank() {
        assert_eq!(validate_dataset_name("  news  ").unwrap(), "news");
        assert_matches!(validate_dataset_name("   "), Err(CoreError::Validation(_)));
    }
}
