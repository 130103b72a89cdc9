//! Record normalization

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::LoaderError;
use crate::models::{OrderRecord, OrderRow};

static INPUT_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{2}\.\d{2}\.\d{4}$").unwrap());

/// Reformat a `DD.MM.YYYY` date as `YYYY-MM-DD`.
///
/// Anything that is not a real calendar date in that exact shape is returned
/// unchanged, with a warning. Day and month must be two digits: `1.2.2024` is
/// not normalized.
pub fn normalize_date(raw: &str) -> String {
    if INPUT_DATE.is_match(raw) {
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%d.%m.%Y") {
            return date.format("%Y-%m-%d").to_string();
        }
    }
    tracing::warn!("Cannot convert date: {}. Using original string.", raw);
    raw.to_string()
}

impl OrderRow {
    /// Flatten and normalize an input record.
    ///
    /// `index` is the record's position in the batch, used when the record
    /// has no `order_id`. All other fields are optional.
    pub fn from_record(index: usize, record: &OrderRecord) -> Result<Self, LoaderError> {
        let order_id = record
            .order_id
            .clone()
            .ok_or(LoaderError::MissingOrderId { index })?;

        Ok(OrderRow {
            order_id,
            status: record.status.clone(),
            date: record.date.as_deref().map(normalize_date),
            amount: record.amount,
            customer_region: record.customer_region().map(str::to_string),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Customer;

    #[test]
    fn test_normalize_valid_dates() {
        assert_eq!(normalize_date("01.02.2024"), "2024-02-01");
        assert_eq!(normalize_date("31.12.1999"), "1999-12-31");
        assert_eq!(normalize_date("29.02.2024"), "2024-02-29");
    }

    #[test]
    fn test_normalize_keeps_unparseable_input() {
        for raw in [
            "2024-02-01",
            "1.2.2024",
            "32.01.2024",
            "29.02.2023",
            "01/02/2024",
            "01.02.24",
            " 01.02.2024",
            "",
            "yesterday",
        ] {
            assert_eq!(normalize_date(raw), raw, "input {:?}", raw);
        }
    }

    #[test]
    fn test_row_from_full_record() {
        let record = OrderRecord {
            order_id: Some("A1".to_string()),
            status: Some("paid".to_string()),
            date: Some("01.02.2024".to_string()),
            amount: Some(99.5),
            customer: Some(Customer {
                region: Some("MSK".to_string()),
            }),
        };

        let row = OrderRow::from_record(0, &record).unwrap();
        assert_eq!(
            row,
            OrderRow {
                order_id: "A1".to_string(),
                status: Some("paid".to_string()),
                date: Some("2024-02-01".to_string()),
                amount: Some(99.5),
                customer_region: Some("MSK".to_string()),
            }
        );
    }

    #[test]
    fn test_row_tolerates_missing_fields() {
        let record = OrderRecord {
            order_id: Some("B2".to_string()),
            ..Default::default()
        };
        let row = OrderRow::from_record(0, &record).unwrap();
        assert_eq!(row.status, None);
        assert_eq!(row.date, None);
        assert_eq!(row.amount, None);
        assert_eq!(row.customer_region, None);
    }

    #[test]
    fn test_row_negative_amount_accepted() {
        let record = OrderRecord {
            order_id: Some("R1".to_string()),
            amount: Some(-15.25),
            ..Default::default()
        };
        assert_eq!(OrderRow::from_record(0, &record).unwrap().amount, Some(-15.25));
    }

    #[test]
    fn test_row_requires_order_id() {
        let err = OrderRow::from_record(7, &OrderRecord::default()).unwrap_err();
        assert!(matches!(err, LoaderError::MissingOrderId { index: 7 }));
    }
}
