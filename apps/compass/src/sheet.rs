//! # CSV Row Log
//!
//! The production [`RowSink`] backend: one CSV record per completed
//! submission, appended to a local file. The file is the spreadsheet the
//! survey operator collects responses in.
//!
//! Appends are a single `write_all` of one encoded line on a file opened in
//! append mode, which is as atomic as the store's append-only contract
//! requires. No retries; errors surface as `Persistence` and the caller
//! reports them as a non-fatal warning.

use compass_core::{CompassError, RowSink, SheetRow};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Append-only CSV file sink.
#[derive(Debug, Clone)]
pub struct CsvSheet {
    path: PathBuf,
}

impl CsvSheet {
    /// Create a sink writing to the given file. The file is created on the
    /// first append.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this sink appends to.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl RowSink for CsvSheet {
    fn append_row(&self, row: &SheetRow) -> Result<(), CompassError> {
        let line = encode_record(row);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| CompassError::Persistence(format!("open {:?}: {}", self.path, e)))?;

        file.write_all(line.as_bytes())
            .map_err(|e| CompassError::Persistence(format!("append {:?}: {}", self.path, e)))?;

        Ok(())
    }
}

// =============================================================================
// CSV ENCODING
// =============================================================================

/// Encode one row as a CSV record terminated by a newline.
fn encode_record(row: &SheetRow) -> String {
    let fields: Vec<String> = row.fields().into_iter().map(encode_field).collect();
    let mut line = fields.join(",");
    line.push('\n');
    line
}

/// Quote a field when it contains a delimiter, quote, or line break.
fn encode_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use compass_core::primitives::QUESTION_COUNT;
    use compass_core::{Identity, Likert};

    fn sample_row(name: &str, affiliation: &str) -> SheetRow {
        let identity = Identity::new(name, affiliation).expect("valid");
        SheetRow::new(&identity, &[Likert::Often; QUESTION_COUNT])
    }

    #[test]
    fn plain_fields_unquoted() {
        assert_eq!(encode_field("Ada"), "Ada");
        assert_eq!(encode_field("Almost Always"), "Almost Always");
    }

    #[test]
    fn special_fields_quoted() {
        assert_eq!(encode_field("Lovelace, Ada"), "\"Lovelace, Ada\"");
        assert_eq!(encode_field("the \"MIT\""), "\"the \"\"MIT\"\"\"");
        assert_eq!(encode_field("a\nb"), "\"a\nb\"");
    }

    #[test]
    fn record_has_all_columns() {
        let line = encode_record(&sample_row("Ada", "MIT"));
        assert!(line.ends_with('\n'));
        assert_eq!(line.trim_end().split(',').count(), 2 + QUESTION_COUNT);
    }

    #[test]
    fn appends_accumulate() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("responses.csv");
        let sink = CsvSheet::new(&path);

        sink.append_row(&sample_row("Ada", "MIT")).expect("first");
        sink.append_row(&sample_row("Grace", "Yale")).expect("second");

        let contents = std::fs::read_to_string(&path).expect("read");
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Ada,MIT,"));
        assert!(lines[1].starts_with("Grace,Yale,"));
    }

    #[test]
    fn unwritable_path_is_persistence_error() {
        let sink = CsvSheet::new("/nonexistent-dir/responses.csv");
        let result = sink.append_row(&sample_row("Ada", "MIT"));
        assert!(matches!(result, Err(CompassError::Persistence(_))));
    }
}
