use thiserror::Error;

use crate::model::order::{Customer, OrderRecord};
use crate::service::pricing::OrderTotals;

pub const FIELD_NAME: &str = "Name";
pub const FIELD_CONTACT: &str = "Contact Number";
pub const FIELD_ADDRESS: &str = "Address";
pub const FIELD_DATES: &str = "Dates";

/// Reasons a submission is sent back to the customer. These are expected
/// outcomes of filling in the form, not faults.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Minimum order value is ₹{minimum}. Your current total is ₹{total}.")]
    BelowMinimum { total: u64, minimum: u32 },
    #[error("Please fill all required fields marked with *: {}", .0.join(", "))]
    MissingFields(Vec<String>),
}

impl ValidationError {
    pub fn missing_fields(&self) -> &[String] {
        match self {
            ValidationError::MissingFields(fields) => fields,
            ValidationError::BelowMinimum { .. } => &[],
        }
    }
}

/// Checks a submission. The minimum order gate runs first; when it fails,
/// missing fields are not reported in the same pass.
pub fn validate(
    customer: &Customer,
    selected_dates: usize,
    grand_total: u64,
    minimum_order_value: Option<u32>,
) -> Result<(), ValidationError> {
    if let Some(minimum) = minimum_order_value {
        if grand_total < u64::from(minimum) {
            return Err(ValidationError::BelowMinimum { total: grand_total, minimum });
        }
    }

    let mut missing = Vec::new();
    if customer.name.trim().is_empty() {
        missing.push(FIELD_NAME.to_string());
    }
    if customer.contact.trim().is_empty() {
        missing.push(FIELD_CONTACT.to_string());
    }
    if customer.address.trim().is_empty() {
        missing.push(FIELD_ADDRESS.to_string());
    }
    if selected_dates == 0 {
        missing.push(FIELD_DATES.to_string());
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingFields(missing))
    }
}

/// Validates and, on success, builds the record to hand to an order sink.
pub fn prepare_record(
    customer: &Customer,
    totals: &OrderTotals,
    minimum_order_value: Option<u32>,
    timestamp: String,
) -> Result<OrderRecord, ValidationError> {
    validate(customer, totals.lines.len(), totals.grand_total, minimum_order_value)?;
    Ok(OrderRecord::new(timestamp, customer.clone(), totals.details(), totals.grand_total))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer() -> Customer {
        Customer {
            name: "Asha".to_string(),
            contact: "9876543210".to_string(),
            address: "Kothrud, Pune".to_string(),
            instructions: String::new(),
        }
    }

    #[test]
    fn test_valid_submission() {
        assert!(validate(&customer(), 2, 260, Some(100)).is_ok());
        assert!(validate(&customer(), 1, 50, None).is_ok());
    }

    #[test]
    fn test_missing_fields_in_check_order() {
        let err = validate(&Customer::default(), 0, 0, None).unwrap_err();
        assert_eq!(err.missing_fields(), &["Name", "Contact Number", "Address", "Dates"]);
    }

    #[test]
    fn test_whitespace_counts_as_missing() {
        let mut c = customer();
        c.address = "   ".to_string();
        let err = validate(&c, 1, 200, None).unwrap_err();
        assert_eq!(err, ValidationError::MissingFields(vec!["Address".to_string()]));
    }

    #[test]
    fn test_below_minimum_wins_over_missing_fields() {
        let filled = validate(&customer(), 1, 80, Some(100)).unwrap_err();
        assert_eq!(filled, ValidationError::BelowMinimum { total: 80, minimum: 100 });

        let empty = validate(&Customer::default(), 0, 80, Some(100)).unwrap_err();
        assert_eq!(empty, ValidationError::BelowMinimum { total: 80, minimum: 100 });
        assert!(empty.missing_fields().is_empty());
    }

    #[test]
    fn test_minimum_is_inclusive() {
        assert!(validate(&customer(), 1, 100, Some(100)).is_ok());
    }

    #[test]
    fn test_error_messages() {
        let err = ValidationError::MissingFields(vec!["Name".into(), "Dates".into()]);
        assert_eq!(err.to_string(), "Please fill all required fields marked with *: Name, Dates");
        let err = ValidationError::BelowMinimum { total: 80, minimum: 100 };
        assert!(err.to_string().contains("₹100"));
    }

    #[test]
    fn test_prepare_record() {
        let totals = OrderTotals::default();
        let err = prepare_record(&customer(), &totals, None, "2026-10-19 10:00:00".into()).unwrap_err();
        assert_eq!(err.missing_fields(), &["Dates"]);
    }
}
