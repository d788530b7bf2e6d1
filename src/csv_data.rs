//! Shared loader for the CSV inputs behind the shot and power-metric routes.

use std::fs::File;
use std::io::Read;
use std::path::{Component, Path, PathBuf};

use csv::{ReaderBuilder, StringRecord};

use crate::error::ApiError;

/// A fully read CSV file: header names plus every well-formed data row.
#[derive(Debug)]
pub struct CsvTable {
    headers: Vec<String>,
    rows: Vec<StringRecord>,
}

impl CsvTable {
    pub fn load(path: &Path) -> Result<Self, ApiError> {
        let file = File::open(path).map_err(ApiError::CsvOpen)?;
        Self::from_reader(file)
    }

    /// Reads the file on the blocking pool so request workers stay free.
    pub async fn load_async(path: PathBuf) -> Result<Self, ApiError> {
        tokio::task::spawn_blocking(move || Self::load(&path))
            .await
            .map_err(|e| {
                tracing::error!("CSV loader task failed: {}", e);
                ApiError::Internal
            })?
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ApiError> {
        let mut reader = ReaderBuilder::new().flexible(true).from_reader(reader);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect();

        let mut rows = Vec::new();
        let mut skipped = 0usize;
        for record in reader.byte_records() {
            let record = record?;
            // Non-UTF-8 rows and rows that don't line up with the header are dropped
            match StringRecord::from_byte_record(record) {
                Ok(row) if row.len() == headers.len() => rows.push(row),
                _ => skipped += 1,
            }
        }

        if skipped > 0 {
            tracing::debug!("Skipped {} malformed CSV rows", skipped);
        }

        if rows.is_empty() {
            return Err(ApiError::bad_request("CSV file is empty or invalid"));
        }

        Ok(Self { headers, rows })
    }

    /// Index of a header by exact name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Looks up every named column at once, failing with the full list of
    /// the ones that are absent.
    pub fn columns<const N: usize>(&self, names: [&str; N]) -> Result<[usize; N], ApiError> {
        let mut missing = Vec::new();
        let found = names.map(|name| match self.position(name) {
            Some(idx) => idx,
            None => {
                missing.push(name);
                0
            }
        });

        if !missing.is_empty() {
            return Err(ApiError::bad_request(format!(
                "CSV does not contain required columns: {}",
                missing.join(", ")
            )));
        }

        Ok(found)
    }

    pub fn rows(&self) -> impl Iterator<Item = &StringRecord> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Resolves the optional `filePath` query parameter under the data directory.
pub fn resolve_data_path(
    data_dir: &Path,
    file_path: Option<&str>,
    default_file: &str,
) -> Result<PathBuf, ApiError> {
    let requested = match file_path.map(str::trim) {
        Some(p) if !p.is_empty() => p,
        _ => default_file,
    };

    let relative = Path::new(requested);
    let escapes = relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(ApiError::bad_request(
            "filePath must be a relative path inside the data directory",
        ));
    }

    Ok(data_dir.join(relative))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    const SAMPLE: &str = "event,teamCode,game_id\nGOAL,TOR,1\nSHOT,TOR\nSHOT,MTL,1\n";

    #[test]
    fn skips_rows_with_wrong_field_count() {
        let table = CsvTable::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn columns_are_matched_exactly() {
        let table = CsvTable::from_reader(SAMPLE.as_bytes()).unwrap();
        let [team, event] = table.columns(["teamCode", "event"]).unwrap();
        assert_eq!((team, event), (1, 0));

        let err = table.columns(["TeamCode", "season"]).unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("TeamCode, season"));
    }

    #[test]
    fn rows_with_invalid_utf8_are_skipped() {
        let mut bytes = b"event,teamCode\nGOAL,TOR\nSHOT,M".to_vec();
        bytes.push(0xd6);
        bytes.extend_from_slice(b"N\nSHOT,TOR\n");

        let table = CsvTable::from_reader(bytes.as_slice()).unwrap();
        assert_eq!(table.len(), 2);
        let teams: Vec<&str> = table.rows().map(|row| &row[1]).collect();
        assert_eq!(teams, ["TOR", "TOR"]);
    }

    #[test]
    fn header_only_file_is_rejected() {
        let err = CsvTable::from_reader("event,teamCode\n".as_bytes()).unwrap_err();
        assert_eq!(err.to_string(), "CSV file is empty or invalid");
    }

    #[test]
    fn data_path_stays_inside_data_dir() {
        let dir = Path::new("data");
        assert_eq!(
            resolve_data_path(dir, None, "march3.csv").unwrap(),
            PathBuf::from("data/march3.csv")
        );
        assert_eq!(
            resolve_data_path(dir, Some("2025/jan.csv"), "march3.csv").unwrap(),
            PathBuf::from("data/2025/jan.csv")
        );
        assert!(resolve_data_path(dir, Some("../secrets.csv"), "x.csv").is_err());
        assert!(resolve_data_path(dir, Some("/etc/passwd"), "x.csv").is_err());
    }
}
