//! Order record and row types
//!
//! [`OrderRecord`] mirrors one object of the input JSON array; every field is
//! optional so a partially filled export still parses. [`OrderRow`] is the
//! flattened, normalized shape stored in the `orders` table.

use serde::{Deserialize, Serialize};

/// Nested customer object of an input record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(default)]
    pub region: Option<String>,
}

/// One order as it appears in the input file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// Expected as `DD.MM.YYYY`
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub customer: Option<Customer>,
}

impl OrderRecord {
    /// Region of the nested customer, if both are present
    pub fn customer_region(&self) -> Option<&str> {
        self.customer.as_ref().and_then(|c| c.region.as_deref())
    }
}

/// One row of the `orders` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRow {
    pub order_id: String,
    pub status: Option<String>,
    /// `YYYY-MM-DD` when the input date was parseable, otherwise the input verbatim
    pub date: Option<String>,
    pub amount: Option<f64>,
    pub customer_region: Option<String>,
}
