use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{error, info};

/// Where an order row is appended.
#[derive(Debug, Clone, PartialEq)]
pub struct Destination {
    pub spreadsheet: String,
    pub worksheet: String,
}

impl Destination {
    pub fn new(spreadsheet: impl Into<String>, worksheet: impl Into<String>) -> Self {
        Self {
            spreadsheet: spreadsheet.into(),
            worksheet: worksheet.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("spreadsheet '{0}' not found")]
    SpreadsheetNotFound(String),
    #[error("worksheet '{worksheet}' not found in spreadsheet '{spreadsheet}'")]
    WorksheetNotFound { spreadsheet: String, worksheet: String },
    #[error("no headers found in the first row")]
    MissingHeaders,
    #[error("invalid credentials: {0}")]
    Credentials(String),
    #[error("request failed: {0}")]
    Transport(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Append-only store for submitted orders.
pub trait OrderSink {
    fn try_append(&self, record: &BTreeMap<String, String>, destination: &Destination) -> Result<(), SinkError>;

    /// Appends one row. Failures are logged and reported as `false`.
    fn append(&self, record: &BTreeMap<String, String>, destination: &Destination) -> bool {
        match self.try_append(record, destination) {
            Ok(()) => {
                info!(spreadsheet = %destination.spreadsheet, worksheet = %destination.worksheet, "order row appended");
                true
            }
            Err(e) => {
                error!(spreadsheet = %destination.spreadsheet, worksheet = %destination.worksheet, "failed to append order row: {}", e);
                false
            }
        }
    }
}

impl<T: OrderSink + ?Sized> OrderSink for Box<T> {
    fn try_append(&self, record: &BTreeMap<String, String>, destination: &Destination) -> Result<(), SinkError> {
        (**self).try_append(record, destination)
    }
}

/// Stands in for a sink that could not be configured. Pricing keeps working;
/// every append fails with the configuration problem.
pub struct UnavailableSink {
    reason: String,
}

impl UnavailableSink {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

impl OrderSink for UnavailableSink {
    fn try_append(&self, _record: &BTreeMap<String, String>, _destination: &Destination) -> Result<(), SinkError> {
        Err(SinkError::Credentials(self.reason.clone()))
    }
}

/// Lays a record out along a header row. Headers missing from the record
/// become empty cells; record keys without a header are dropped.
pub fn project_row(headers: &[String], record: &BTreeMap<String, String>) -> Vec<String> {
    headers.iter()
        .map(|h| record.get(h).cloned().unwrap_or_default())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn record(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_project_row_follows_headers() {
        let headers: Vec<String> = ["Timestamp", "Name", "Total Price"].iter().map(|s| s.to_string()).collect();
        let rec = record(&[("Name", "Asha"), ("Address", "Pune"), ("Timestamp", "2026-10-19 10:00:00")]);

        let row = project_row(&headers, &rec);
        assert_eq!(row, vec!["2026-10-19 10:00:00", "Asha", ""]);
    }

    struct FailingSink;
    impl OrderSink for FailingSink {
        fn try_append(&self, _record: &BTreeMap<String, String>, destination: &Destination) -> Result<(), SinkError> {
            Err(SinkError::SpreadsheetNotFound(destination.spreadsheet.clone()))
        }
    }

    struct MemorySink {
        rows: RefCell<Vec<BTreeMap<String, String>>>,
    }
    impl OrderSink for MemorySink {
        fn try_append(&self, record: &BTreeMap<String, String>, _destination: &Destination) -> Result<(), SinkError> {
            self.rows.borrow_mut().push(record.clone());
            Ok(())
        }
    }

    #[test]
    fn test_append_reports_bool() {
        let dest = Destination::new("TiffinOrderSheet", "Sheet1");
        assert!(!FailingSink.append(&record(&[]), &dest));

        let sink = MemorySink { rows: RefCell::new(vec![]) };
        assert!(sink.append(&record(&[("Name", "Asha")]), &dest));
        assert_eq!(sink.rows.borrow().len(), 1);

        let boxed: Box<dyn OrderSink> = Box::new(UnavailableSink::new("no credentials"));
        assert!(!boxed.append(&record(&[("Name", "Asha")]), &dest));
    }
}
