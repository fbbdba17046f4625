//! Two-column text ingest.
//!
//! Both exercises read plain comma-delimited files with one observation per
//! line (`energy,cross_section` or `time,activity`), e.g.:
//!
//! ```text
//! # time (h), activity
//! 0.0,0.00
//! 0.5,0.12
//! ```
//!
//! Behavior:
//! - `#` starts a comment line; blank lines are skipped
//! - columns beyond the second are ignored
//! - a non-numeric first record is treated as a header
//! - bad rows are collected as [`RowError`]s and logged, not fatal
//! - zero usable rows is an error (exit code 3)

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::domain::{DataPoint, DatasetStats};
use crate::error::AppError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: u64,
    pub message: String,
}

/// Ingest output: points + stats + row errors.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub points: Vec<DataPoint>,
    pub stats: DatasetStats,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Load a `(time, activity)` series.
pub fn load_series(path: &Path) -> Result<IngestedData, AppError> {
    let data = read_points(open(path)?)?;
    log_ingest(path, &data);
    Ok(data)
}

/// Load interpolation samples; duplicate x values are rejected with their line numbers.
pub fn load_samples(path: &Path) -> Result<IngestedData, AppError> {
    let data = read_points(open(path)?)?;
    log_ingest(path, &data);

    let mut seen: Vec<(f64, usize)> = data.points.iter().enumerate().map(|(i, p)| (p.x, i)).collect();
    seen.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    if let Some(pair) = seen.windows(2).find(|w| w[0].0 == w[1].0) {
        return Err(AppError::new(
            2,
            format!(
                "Duplicate x value {} in '{}' (data rows {} and {}).",
                pair[0].0,
                path.display(),
                pair[0].1 + 1,
                pair[1].1 + 1
            ),
        ));
    }

    Ok(data)
}

/// Parse points from any reader.
pub fn read_points<R: Read>(reader: R) -> Result<IngestedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader);

    let mut points = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                rows_read += 1;
                row_errors.push(RowError {
                    line: e.position().map_or(0, |p| p.line()),
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };
        let line = record.position().map_or(idx as u64 + 1, |p| p.line());

        match parse_row(&record) {
            Ok(point) => {
                rows_read += 1;
                points.push(point);
            }
            // Allow a single leading header row such as `time,activity`.
            Err(_) if idx == 0 && looks_like_header(&record) => {
                log::debug!("treating line {line} as a header: {:?}", record.iter().collect::<Vec<_>>());
            }
            Err(message) => {
                rows_read += 1;
                row_errors.push(RowError { line, message });
            }
        }
    }

    let rows_used = points.len();
    if rows_used == 0 {
        return Err(AppError::new(3, "No valid rows found in input."));
    }

    let stats = DatasetStats::from_points(&points)
        .ok_or_else(|| AppError::new(3, "No valid points remain after parsing."))?;

    Ok(IngestedData {
        points,
        stats,
        row_errors,
        rows_read,
        rows_used,
    })
}

fn open(path: &Path) -> Result<File, AppError> {
    File::open(path).map_err(|e| AppError::new(2, format!("Failed to open data file '{}': {e}", path.display())))
}

fn parse_row(record: &csv::StringRecord) -> Result<DataPoint, String> {
    if record.len() < 2 {
        return Err(format!("expected 2 columns, found {}", record.len()));
    }
    let x = parse_value(&record[0], "first")?;
    let y = parse_value(&record[1], "second")?;
    Ok(DataPoint { x, y })
}

fn parse_value(field: &str, which: &str) -> Result<f64, String> {
    let value: f64 = field
        .parse()
        .map_err(|_| format!("{which} column is not a number: '{field}'"))?;
    if !value.is_finite() {
        return Err(format!("{which} column is not finite: '{field}'"));
    }
    Ok(value)
}

fn looks_like_header(record: &csv::StringRecord) -> bool {
    record
        .iter()
        .take(2)
        .all(|f| !f.is_empty() && f.parse::<f64>().is_err())
}

fn log_ingest(path: &Path, data: &IngestedData) {
    log::info!(
        "loaded {} of {} rows from '{}' (x=[{}, {}])",
        data.rows_used,
        data.rows_read,
        path.display(),
        data.stats.x_min,
        data.stats.x_max
    );
    for err in &data.row_errors {
        log::warn!("{}: line {}: {}", path.display(), err.line, err.message);
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn parses_plain_two_column_rows() {
        let data = read_points("0,0.0\n1.5,0.25\n3,0.5\n".as_bytes()).unwrap();
        assert_eq!(data.rows_used, 3);
        assert_eq!(data.points[1], DataPoint { x: 1.5, y: 0.25 });
        assert_eq!(data.stats.x_max, 3.0);
        assert!(data.row_errors.is_empty());
    }

    #[test]
    fn skips_header_comments_and_bad_rows() {
        let text = "time,activity\n# comment\n0, 0.1\n1,abc\n2\n3,0.4,extra\n";
        let data = read_points(text.as_bytes()).unwrap();
        assert_eq!(
            data.points,
            vec![DataPoint { x: 0.0, y: 0.1 }, DataPoint { x: 3.0, y: 0.4 }]
        );
        assert_eq!(data.rows_read, 4);
        assert_eq!(data.row_errors.len(), 2);
        assert_eq!(data.row_errors[0].line, 4);
        assert!(data.row_errors[0].message.contains("second column"));
        assert!(data.row_errors[1].message.contains("expected 2 columns"));
    }

    #[test]
    fn rejects_non_finite_values() {
        let data = read_points("0,1\n1,NaN\n2,inf\n".as_bytes()).unwrap();
        assert_eq!(data.rows_used, 1);
        assert_eq!(data.row_errors.len(), 2);
    }

    #[test]
    fn empty_input_is_an_error() {
        let err = read_points("# nothing here\n".as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn load_samples_rejects_duplicate_x() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "0,1\n5,2\n0,3").unwrap();
        let err = load_samples(file.path()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("data rows 1 and 3"), "{err}");

        // The same file is fine as a time series.
        assert_eq!(load_series(file.path()).unwrap().rows_used, 3);
    }

    #[test]
    fn missing_file_is_an_input_error() {
        let err = load_series(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
