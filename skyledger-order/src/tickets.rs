use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use skyledger_catalog::FlightRegistry;
use skyledger_core::timestamp;

use crate::bookings::BookingLedger;

/// Display record joining a booking with its flight.
#[derive(Debug, Clone, Serialize)]
pub struct Ticket {
    pub booking_id: Uuid,
    pub customer: String,
    pub flight_number: String,
    pub airline: String,
    pub origin: String,
    pub destination: String,
    pub price: f64,
    pub date: String,
    pub departure_time: String,
    pub duration: String,
    pub seat_no: String,
    #[serde(with = "timestamp")]
    pub booked_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum TicketError {
    #[error("booking not found: {0}")]
    BookingNotFound(Uuid),

    #[error("flight not found: {0}")]
    FlightNotFound(Uuid),
}

pub fn build_ticket(
    bookings: &BookingLedger,
    registry: &FlightRegistry,
    booking_id: Uuid,
) -> Result<Ticket, TicketError> {
    let booking = bookings
        .get(booking_id)
        .ok_or(TicketError::BookingNotFound(booking_id))?;
    let flight = registry
        .get(booking.flight_id)
        .ok_or(TicketError::FlightNotFound(booking.flight_id))?;

    Ok(Ticket {
        booking_id: booking.id,
        customer: booking.customer.clone(),
        flight_number: flight.flight_number.clone(),
        airline: flight.airline.clone(),
        origin: flight.origin.clone(),
        destination: flight.destination.clone(),
        price: flight.price,
        date: flight.date.clone(),
        departure_time: flight.departure_time.clone(),
        duration: flight.duration.clone(),
        seat_no: booking.seat_no.clone(),
        booked_at: booking.created_at,
    })
}

/// All assemblable tickets for a customer. Bookings whose flight has been
/// deleted are skipped rather than failing the whole listing.
pub fn tickets_for_customer(
    bookings: &BookingLedger,
    registry: &FlightRegistry,
    customer: &str,
) -> Vec<Ticket> {
    bookings
        .list_bookings(Some(customer))
        .into_iter()
        .filter_map(|b| build_ticket(bookings, registry, b.id).ok())
        .collect()
}
