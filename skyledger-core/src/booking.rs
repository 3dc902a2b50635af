use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::timestamp;

/// A reserved seat tied to a customer. Serialized field names and order
/// match the bookings store columns, so this struct is both the domain
/// value and the persisted row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    #[serde(rename = "booking_id")]
    pub id: Uuid,
    #[serde(rename = "customer_username")]
    pub customer: String,
    pub flight_id: Uuid,
    pub seat_no: String,
    #[serde(rename = "date", with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(customer: &str, flight_id: Uuid, seat_no: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer: customer.to_string(),
            flight_id,
            seat_no: seat_no.to_string(),
            created_at: timestamp::now(),
        }
    }
}
