//! CSV rendering for dataset downloads.

/// Header row of every exported file.
pub const EXPORT_HEADER: &str = "text1,text2,annotation";

/// Placeholder written when a pair has no annotation yet.
pub const MISSING_ANNOTATION: &str = "N/A";

/// One exported text pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    pub text1: String,
    pub text2: String,
    /// Most recent annotation's class name, if any.
    pub annotation: Option<String>,
}

/// File name offered to the browser for a dataset download.
pub fn export_file_name(dataset_id: crate::types::DbId) -> String {
    format!("dataset_{dataset_id}.csv")
}

/// Quote a field when it contains a separator, a quote or a line break.
/// Embedded quotes are doubled.
pub fn escape_field(value: &str) -> String {
    if value.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Render the header and one line per row, each terminated by `\n`.
pub fn render_csv(rows: &[ExportRow]) -> String {
    let mut out = String::with_capacity(EXPORT_HEADER.len() + 1 + rows.len() * 32);
    out.push_str(EXPORT_HEADER);
    out.push('\n');
    for row in rows {
        out.push_str(&escape_field(&row.text1));
        out.push(',');
        out.push_str(&escape_field(&row.text2));
        out.push(',');
        out.push_str(&escape_field(
            row.annotation.as_deref().unwrap_or(MISSING_ANNOTATION),
        ));
        out.push('\n');
    }
    out
}
