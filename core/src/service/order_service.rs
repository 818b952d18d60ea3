use tracing::{info, warn};

use crate::model::features::FormFeatures;
use crate::model::menu::MenuCatalog;
use crate::model::order::{Customer, OrderRecord, OrderSelections};
use crate::repository::traits::{Destination, OrderSink};
use crate::service::pricing::{aggregate, OrderTotals};
use crate::service::validation::{prepare_record, ValidationError};
use crate::time::now_timestamp;

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Submitted(OrderRecord),
    Rejected(ValidationError),
    /// The order was valid but the sink did not accept it. Nothing is retried.
    SinkFailed(OrderRecord),
}

impl SubmitOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, SubmitOutcome::Submitted(_))
    }
}

pub struct OrderService<S: OrderSink> {
    catalog: MenuCatalog,
    features: FormFeatures,
    sink: S,
    destination: Destination,
}

impl<S: OrderSink> OrderService<S> {
    pub fn new(catalog: MenuCatalog, features: FormFeatures, sink: S, destination: Destination) -> Self {
        Self {
            catalog,
            features,
            sink,
            destination,
        }
    }

    pub fn catalog(&self) -> &MenuCatalog {
        &self.catalog
    }

    pub fn features(&self) -> &FormFeatures {
        &self.features
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    pub fn quote(&self, selections: &OrderSelections) -> OrderTotals {
        aggregate(&self.catalog, selections, &self.features)
    }

    pub fn submit(&self, customer: &Customer, selections: &OrderSelections) -> SubmitOutcome {
        self.submit_at(customer, selections, now_timestamp())
    }

    pub fn submit_at(&self, customer: &Customer, selections: &OrderSelections, timestamp: String) -> SubmitOutcome {
        let totals = self.quote(selections);

        let record = match prepare_record(customer, &totals, self.features.minimum_order_value, timestamp) {
            Ok(record) => record,
            Err(e) => {
                warn!(total = totals.grand_total, "order rejected: {}", e);
                return SubmitOutcome::Rejected(e);
            }
        };

        info!(order_id = %record.order_id, total = record.total_price, dates = totals.lines.len(), "submitting order");
        if self.sink.append(&record.to_row_map(), &self.destination) {
            SubmitOutcome::Submitted(record)
        } else {
            SubmitOutcome::SinkFailed(record)
        }
    }
}
