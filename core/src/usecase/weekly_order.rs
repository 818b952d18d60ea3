use anyhow::Result;

use crate::repository::traits::OrderSink;
use crate::service::dto::OrderDraft;
use crate::service::order_service::{OrderService, SubmitOutcome};
use crate::service::pricing::OrderTotals;
use crate::time::WeekDate;

/// Orders for one delivery week: drafts are placed on the week window,
/// then priced or submitted through the order service.
pub struct WeeklyOrderUseCase<'a, S: OrderSink> {
    service: &'a OrderService<S>,
    window: Vec<WeekDate>,
}

impl<'a, S: OrderSink> WeeklyOrderUseCase<'a, S> {
    pub fn new(service: &'a OrderService<S>, window: Vec<WeekDate>) -> Self {
        Self { service, window }
    }

    pub fn window(&self) -> &[WeekDate] {
        &self.window
    }

    pub fn quote_draft(&self, draft: &OrderDraft) -> Result<OrderTotals> {
        let selections = draft.to_selections(&self.window)?;
        Ok(self.service.quote(&selections))
    }

    pub fn submit_draft(&self, draft: &OrderDraft) -> Result<SubmitOutcome> {
        let selections = draft.to_selections(&self.window)?;
        Ok(self.service.submit(&draft.customer, &selections))
    }
}
