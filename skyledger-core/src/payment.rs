use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::timestamp;

/// One row of the append-only payment ledger. Never edited or deleted; a
/// refund is represented by a separate reversal row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Payment {
    #[serde(rename = "payment_id")]
    pub id: Uuid,
    #[serde(rename = "customer_username")]
    pub customer: String,
    pub flight_id: Uuid,
    pub amount: f64,
    #[serde(rename = "date", with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Payment {
    pub fn new(customer: &str, flight_id: Uuid, amount: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer: customer.to_string(),
            flight_id,
            amount,
            created_at: timestamp::now(),
        }
    }

    /// Compensating entry for this payment: fresh id, negated amount.
    pub fn reversal(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer: self.customer.clone(),
            flight_id: self.flight_id,
            amount: -self.amount,
            created_at: timestamp::now(),
        }
    }
}
