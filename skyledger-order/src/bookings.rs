use uuid::Uuid;

use skyledger_catalog::{FlightRegistry, SeatError};
use skyledger_core::booking::Booking;
use skyledger_core::snapshot::{SnapshotStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("flight not found: {0}")]
    FlightNotFound(Uuid),

    #[error("no such seat: {0}")]
    SeatNotFound(String),

    #[error("seat already reserved: {0}")]
    SeatAlreadyReserved(String),

    #[error("booking not found: {0}")]
    BookingNotFound(Uuid),

    #[error("storage failure: {0}")]
    Store(#[from] StoreError),
}

impl From<SeatError> for BookingError {
    fn from(err: SeatError) -> Self {
        match err {
            SeatError::FlightNotFound(id) => BookingError::FlightNotFound(id),
            SeatError::SeatNotFound(seat) => BookingError::SeatNotFound(seat),
            SeatError::AlreadyReserved(seat) => BookingError::SeatAlreadyReserved(seat),
        }
    }
}

/// Owner of booking records. Reads flight/seat state through the registry
/// to validate and flip reservation flags; the registry keeps ownership of
/// the flights themselves.
pub struct BookingLedger {
    bookings: Vec<Booking>,
    store: Box<dyn SnapshotStore<Booking>>,
}

impl BookingLedger {
    pub fn open(store: Box<dyn SnapshotStore<Booking>>) -> Result<Self, BookingError> {
        let bookings = store.load()?;
        Ok(Self { bookings, store })
    }

    /// Reserve a seat and record the booking. Validation happens through
    /// `FlightRegistry::reserve_seat` in its fixed order; nothing is written
    /// until all checks pass. Not atomic with the payment charge at the
    /// storage layer; callers sequence pay-then-book (see the orchestrator).
    pub fn create_booking(
        &mut self,
        customer: &str,
        registry: &mut FlightRegistry,
        flight_id: Uuid,
        seat_no: &str,
    ) -> Result<Booking, BookingError> {
        registry.reserve_seat(flight_id, seat_no)?;

        let booking = Booking::new(customer, flight_id, seat_no);
        self.bookings.push(booking.clone());
        self.store.save(&self.bookings)?;

        tracing::info!(
            "Booking created: {} for {} on seat {}",
            booking.id,
            customer,
            seat_no
        );
        Ok(booking)
    }

    /// Remove a booking and release its seat. A flight deleted in the
    /// meantime makes the release a no-op; the ledger entry still goes.
    pub fn cancel_booking(
        &mut self,
        booking_id: Uuid,
        registry: &mut FlightRegistry,
    ) -> Result<Booking, BookingError> {
        let index = self
            .bookings
            .iter()
            .position(|b| b.id == booking_id)
            .ok_or(BookingError::BookingNotFound(booking_id))?;

        let booking = self.bookings.remove(index);
        registry.release_seat(booking.flight_id, &booking.seat_no);
        self.store.save(&self.bookings)?;

        tracing::info!("Booking cancelled: {}", booking_id);
        Ok(booking)
    }

    pub fn list_bookings(&self, customer: Option<&str>) -> Vec<&Booking> {
        self.bookings
            .iter()
            .filter(|b| customer.map_or(true, |c| b.customer == c))
            .collect()
    }

    pub fn get(&self, booking_id: Uuid) -> Option<&Booking> {
        self.bookings.iter().find(|b| b.id == booking_id)
    }

    pub fn booking_count(&self) -> usize {
        self.bookings.len()
    }
}
