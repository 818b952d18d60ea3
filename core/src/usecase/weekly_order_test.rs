#[cfg(test)]
mod tests {
    use crate::usecase::weekly_order::WeeklyOrderUseCase;
    use crate::service::order_service::{OrderService, SubmitOutcome};
    use crate::service::dto::OrderDraft;
    use crate::service::validation::ValidationError;
    use crate::repository::menu::parse_catalog;
    use crate::repository::traits::{Destination, OrderSink, SinkError};
    use crate::model::features::FormFeatures;
    use crate::time::compute_week_window;
    use chrono::NaiveDate;
    use std::cell::RefCell;
    use std::collections::BTreeMap;

    const MENU: &str = r#"
Monday:
  full_tiffin: { cost: 120, items: [Chapati, Usal, Dal, Rice] }
  half_tiffin: { cost: 70, items: [Chapati, Usal] }
Wednesday:
  half_tiffin: { cost: 70, items: [Bhakri, Pithla] }
Friday:
  full_tiffin: { cost: 130, items: [Puran Poli, Katachi Amti, Rice] }
  half_tiffin: { cost: 80, items: [Puran Poli, Katachi Amti] }
extra_items:
  Chapati: { cost: 10 }
  Ukdiche Modak: { cost: 50, days: [Friday] }
"#;

    struct MockSink {
        headers: Vec<String>,
        rows: RefCell<Vec<Vec<String>>>,
    }

    impl OrderSink for MockSink {
        fn try_append(&self, record: &BTreeMap<String, String>, _destination: &Destination) -> Result<(), SinkError> {
            let row = crate::repository::traits::project_row(&self.headers, record);
            self.rows.borrow_mut().push(row);
            Ok(())
        }
    }

    fn service(features: FormFeatures) -> OrderService<MockSink> {
        let sink = MockSink {
            headers: ["Timestamp", "Name", "Total Price"].iter().map(|s| s.to_string()).collect(),
            rows: RefCell::new(vec![]),
        };
        OrderService::new(parse_catalog(MENU).unwrap(), features, sink, Destination::new("TiffinOrderSheet", "Sheet1"))
    }

    fn draft(yaml: &str) -> OrderDraft {
        serde_yaml::from_str(yaml).unwrap()
    }

    // Saturday 2026-10-17: the window is Monday 19 to Saturday 24 October
    fn window() -> Vec<crate::time::WeekDate> {
        compute_week_window(NaiveDate::from_ymd_opt(2026, 10, 17).unwrap())
    }

    #[test]
    fn test_basic_weekly_order() {
        let svc = service(FormFeatures::default());
        let usecase = WeeklyOrderUseCase::new(&svc, window());

        let totals = usecase.quote_draft(&draft(r#"
dates:
  - { date: 2026-10-19, full: 1, half: 2 }
"#)).unwrap();

        assert_eq!(totals.grand_total, 260);
        assert!(totals.details().contains("2 half tiffins, 1 full tiffins"));
    }

    #[test]
    fn test_modak_only_on_friday() {
        let svc = service(FormFeatures::default());
        let usecase = WeeklyOrderUseCase::new(&svc, window());

        let totals = usecase.quote_draft(&draft(r#"
dates:
  - { date: 2026-10-19, half: 1, extras: { Ukdiche Modak: 3 } }
  - { date: 2026-10-23, half: 1, extras: { Ukdiche Modak: 3, Chapati: 2 } }
"#)).unwrap();

        assert_eq!(totals.lines[0].total, 70);
        assert_eq!(totals.lines[1].total, 80 + 150 + 20);
        assert_eq!(totals.grand_total, 320);
        assert!(!totals.lines[0].description().contains("Modak"));
        assert!(totals.lines[1].description().contains("Chapati x2, Ukdiche Modak x3"));
    }

    #[test]
    fn test_day_without_full_tiffin() {
        let svc = service(FormFeatures::default());
        let usecase = WeeklyOrderUseCase::new(&svc, window());

        let totals = usecase.quote_draft(&draft("dates:\n  - { date: 2026-10-21, full: 4, half: 2 }\n")).unwrap();
        assert_eq!(totals.grand_total, 140);
        assert!(totals.details().contains("2 half tiffins, 0 full tiffins"));
    }

    #[test]
    fn test_minimum_order_checked_before_fields() {
        let svc = service(FormFeatures::default());
        let usecase = WeeklyOrderUseCase::new(&svc, window());

        // 80 rupees with no customer details at all
        let outcome = usecase.submit_draft(&draft("dates:\n  - { date: 2026-10-23, half: 1 }\n")).unwrap();
        assert_eq!(outcome, SubmitOutcome::Rejected(ValidationError::BelowMinimum { total: 80, minimum: 100 }));
        assert!(svc_rows(&svc).is_empty());
    }

    #[test]
    fn test_earlier_form_has_no_minimum() {
        let svc = service(FormFeatures::basic());
        let usecase = WeeklyOrderUseCase::new(&svc, window());

        let outcome = usecase.submit_draft(&draft(r#"
customer: { name: Asha, contact: "9876543210", address: "Kothrud, Pune" }
dates:
  - { date: 2026-10-23, half: 1 }
"#)).unwrap();

        assert!(outcome.is_submitted());
        let rows = svc_rows(&svc);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), 3);
        assert_eq!(rows[0][1], "Asha");
        assert_eq!(rows[0][2], "80");
    }

    #[test]
    fn test_missing_fields_reported_together() {
        let svc = service(FormFeatures::default());
        let usecase = WeeklyOrderUseCase::new(&svc, window());

        let outcome = usecase.submit_draft(&draft(r#"
customer: { name: Asha, contact: "", address: "" }
dates:
  - { date: 2026-10-19, full: 1 }
"#)).unwrap();

        match outcome {
            SubmitOutcome::Rejected(err) => assert_eq!(err.missing_fields(), &["Contact Number", "Address"]),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_date_outside_window() {
        let svc = service(FormFeatures::default());
        let usecase = WeeklyOrderUseCase::new(&svc, window());
        assert!(usecase.quote_draft(&draft("dates:\n  - { date: 2026-10-26, full: 1 }\n")).is_err());
    }

    #[test]
    fn test_oversized_quantity_is_not_capped() {
        let svc = service(FormFeatures::basic());
        let usecase = WeeklyOrderUseCase::new(&svc, window());
        let order = draft(r#"
customer: { name: Asha, contact: "9876543210", address: "Kothrud, Pune" }
dates:
  - { date: 2026-10-19, full: 25 }
"#);

        assert!(usecase.quote_draft(&order).is_err());
        assert!(usecase.submit_draft(&order).is_err());
        assert!(svc_rows(&svc).is_empty());
    }

    fn svc_rows(svc: &OrderService<MockSink>) -> Vec<Vec<String>> {
        svc.sink().rows.borrow().clone()
    }
}
