pub mod config;
pub mod model;
pub mod repository;
pub mod service;
pub mod time;
pub mod usecase;

pub use config::{AppConfig, SinkKind};
pub use model::features::{BreadChoice, FormFeatures, MealSlot};
pub use model::menu::{DayMenu, ExtraItem, MealSize, MenuCatalog, TiffinOffer};
pub use model::order::{Customer, LineSelection, OrderRecord, OrderSelections, MAX_QUANTITY};
pub use repository::{load_catalog, CsvOrderSink, Destination, GoogleSheetsSink, OrderSink};
pub use service::dto::OrderDraft;
pub use service::order_service::{OrderService, SubmitOutcome};
pub use service::pricing::{aggregate, price_line, LineQuote, OrderTotals};
pub use service::validation::{validate, ValidationError};
pub use time::{compute_week_window, current_week_window, WeekDate};
