use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use tracing::{debug, info};

use crate::repository::traits::{project_row, Destination, OrderSink, SinkError};

pub const DEFAULT_DIR_NAME: &str = ".tiffin";
const WORKSHEET_EXT: &str = "csv";

/// Local order sheet: `<base>/<spreadsheet>/<worksheet>.csv`, header in the first row.
#[derive(Clone, Debug)]
pub struct CsvOrderSink {
    base_dir: PathBuf,
}

impl CsvOrderSink {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let path = match base_dir {
            Some(dir) => dir,
            None => {
                let home_dir = dirs::home_dir()
                    .ok_or_else(|| anyhow!("Could not determine home directory"))?;
                home_dir.join(DEFAULT_DIR_NAME)
            }
        };
        fs::create_dir_all(&path)
            .with_context(|| format!("Could not create data directory {}", path.display()))?;

        Ok(CsvOrderSink { base_dir: path })
    }

    pub fn worksheet_path(&self, destination: &Destination) -> PathBuf {
        self.base_dir
            .join(&destination.spreadsheet)
            .join(format!("{}.{}", destination.worksheet, WORKSHEET_EXT))
    }

    /// Creates the worksheet with the given header row. An existing
    /// worksheet is left untouched.
    pub fn init_worksheet(&self, destination: &Destination, headers: &[&str]) -> Result<PathBuf> {
        let path = self.worksheet_path(destination);
        if path.exists() && fs::metadata(&path)?.len() > 0 {
            debug!(path = %path.display(), "worksheet already exists");
            return Ok(path);
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(headers)?;
        writer.flush()?;
        info!(path = %path.display(), "worksheet created");
        Ok(path)
    }

    pub fn read_headers(&self, destination: &Destination) -> Result<Vec<String>, SinkError> {
        let path = self.locate(destination)?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&path)?;

        match reader.records().next() {
            Some(record) => {
                let headers: Vec<String> = record?.iter().map(|h| h.to_string()).collect();
                if headers.iter().all(|h| h.is_empty()) {
                    Err(SinkError::MissingHeaders)
                } else {
                    Ok(headers)
                }
            }
            None => Err(SinkError::MissingHeaders),
        }
    }

    /// Data rows below the header.
    pub fn read_rows(&self, destination: &Destination) -> Result<Vec<Vec<String>>, SinkError> {
        let path = self.locate(destination)?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&path)?;

        let mut rows = Vec::new();
        for record in reader.records() {
            rows.push(record?.iter().map(|c| c.to_string()).collect());
        }
        Ok(rows)
    }

    fn locate(&self, destination: &Destination) -> Result<PathBuf, SinkError> {
        if !self.base_dir.join(&destination.spreadsheet).is_dir() {
            return Err(SinkError::SpreadsheetNotFound(destination.spreadsheet.clone()));
        }
        let path = self.worksheet_path(destination);
        if !path.is_file() {
            return Err(SinkError::WorksheetNotFound {
                spreadsheet: destination.spreadsheet.clone(),
                worksheet: destination.worksheet.clone(),
            });
        }
        Ok(path)
    }
}

impl OrderSink for CsvOrderSink {
    fn try_append(&self, record: &BTreeMap<String, String>, destination: &Destination) -> Result<(), SinkError> {
        let headers = self.read_headers(destination)?;
        let row = project_row(&headers, record);

        let path = self.worksheet_path(destination);
        let mut file = OpenOptions::new().read(true).append(true).open(&path)?;

        // Hand-edited sheets may lack a trailing newline
        if needs_newline(&mut file)? {
            file.write_all(b"\n")?;
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.write_record(&row)?;
        writer.flush()?;
        Ok(())
    }
}

fn needs_newline(file: &mut File) -> std::io::Result<bool> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(false);
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::Start(len - 1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::order::fields::STANDARD_HEADERS;
    use tempfile::tempdir;

    fn record(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_append_projects_onto_headers() {
        let dir = tempdir().unwrap();
        let sink = CsvOrderSink::new(Some(dir.path().to_path_buf())).unwrap();
        let dest = Destination::new("TiffinOrderSheet", "Sheet1");
        sink.init_worksheet(&dest, &["Timestamp", "Name", "Total Price"]).unwrap();

        let rec = record(&[("Timestamp", "2026-10-19 10:00:00"), ("Name", "Asha, B."), ("Address", "Pune")]);
        assert!(sink.append(&rec, &dest));

        let rows = sink.read_rows(&dest).unwrap();
        assert_eq!(rows, vec![vec!["2026-10-19 10:00:00".to_string(), "Asha, B.".to_string(), String::new()]]);
    }

    #[test]
    fn test_missing_spreadsheet_and_worksheet() {
        let dir = tempdir().unwrap();
        let sink = CsvOrderSink::new(Some(dir.path().to_path_buf())).unwrap();
        let rec = record(&[("Name", "Asha")]);

        let missing = Destination::new("Nope", "Sheet1");
        assert!(matches!(sink.try_append(&rec, &missing), Err(SinkError::SpreadsheetNotFound(_))));

        sink.init_worksheet(&Destination::new("Orders", "Sheet1"), &STANDARD_HEADERS).unwrap();
        let wrong_ws = Destination::new("Orders", "Sheet2");
        assert!(matches!(sink.try_append(&rec, &wrong_ws), Err(SinkError::WorksheetNotFound { .. })));
        assert!(!sink.append(&rec, &wrong_ws));
    }

    #[test]
    fn test_empty_worksheet_has_no_headers() {
        let dir = tempdir().unwrap();
        let sink = CsvOrderSink::new(Some(dir.path().to_path_buf())).unwrap();
        let dest = Destination::new("Orders", "Sheet1");
        fs::create_dir_all(dir.path().join("Orders")).unwrap();
        File::create(sink.worksheet_path(&dest)).unwrap();

        assert!(matches!(sink.try_append(&record(&[]), &dest), Err(SinkError::MissingHeaders)));
    }

    #[test]
    fn test_append_after_hand_edit_without_newline() {
        let dir = tempdir().unwrap();
        let sink = CsvOrderSink::new(Some(dir.path().to_path_buf())).unwrap();
        let dest = Destination::new("Orders", "Sheet1");
        fs::create_dir_all(dir.path().join("Orders")).unwrap();
        fs::write(sink.worksheet_path(&dest), "Name,Total Price").unwrap();

        assert!(sink.append(&record(&[("Name", "Asha"), ("Total Price", "260")]), &dest));
        assert!(sink.append(&record(&[("Name", "Ravi")]), &dest));

        let rows = sink.read_rows(&dest).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["Asha", "260"]);
        assert_eq!(rows[1], vec!["Ravi", ""]);
    }

    #[test]
    fn test_init_worksheet_keeps_existing() {
        let dir = tempdir().unwrap();
        let sink = CsvOrderSink::new(Some(dir.path().to_path_buf())).unwrap();
        let dest = Destination::new("Orders", "Sheet1");
        sink.init_worksheet(&dest, &["Name"]).unwrap();
        sink.init_worksheet(&dest, &STANDARD_HEADERS).unwrap();

        assert_eq!(sink.read_headers(&dest).unwrap(), vec!["Name"]);
    }
}
