pub mod file;
pub mod menu;
pub mod sheets;
pub mod traits;

// Re-export
pub use file::CsvOrderSink;
pub use menu::{load_catalog, parse_catalog};
pub use sheets::GoogleSheetsSink;
pub use traits::{project_row, Destination, OrderSink, SinkError, UnavailableSink};
