use std::collections::HashMap;

use uuid::Uuid;

use skyledger_core::flight::{Flight, FlightRecord, FlightSpec, FlightUpdate};
use skyledger_core::identity::{Identity, Role};
use skyledger_core::snapshot::{SnapshotStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("admin role required")]
    Forbidden,

    #[error("flight not found: {0}")]
    FlightNotFound(Uuid),

    #[error("storage failure: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, thiserror::Error)]
pub enum SeatError {
    #[error("flight not found: {0}")]
    FlightNotFound(Uuid),

    #[error("no such seat: {0}")]
    SeatNotFound(String),

    #[error("seat already reserved: {0}")]
    AlreadyReserved(String),
}

/// Owner of the flight set and every flight's seat map. Mutating operations
/// are admin-gated and rewrite the whole flights store before returning.
/// Seat flags live in memory only; the flights store has no seat columns.
pub struct FlightRegistry {
    flights: HashMap<Uuid, Flight>,
    store: Box<dyn SnapshotStore<FlightRecord>>,
    default_seat_count: usize,
}

impl FlightRegistry {
    pub fn open(
        store: Box<dyn SnapshotStore<FlightRecord>>,
        default_seat_count: usize,
    ) -> Result<Self, CatalogError> {
        let flights = store
            .load()?
            .into_iter()
            .map(|record| {
                let flight = Flight::from_record(record, default_seat_count);
                (flight.id, flight)
            })
            .collect();
        Ok(Self {
            flights,
            store,
            default_seat_count,
        })
    }

    pub fn add_flight(&mut self, actor: &Identity, spec: FlightSpec) -> Result<Flight, CatalogError> {
        Self::require_admin(actor)?;

        let flight = Flight::new(spec, self.default_seat_count);
        self.flights.insert(flight.id, flight.clone());
        self.persist()?;

        tracing::info!("Flight added: {} ({})", flight.flight_number, flight.id);
        Ok(flight)
    }

    pub fn edit_flight(
        &mut self,
        actor: &Identity,
        flight_id: Uuid,
        update: FlightUpdate,
    ) -> Result<Flight, CatalogError> {
        Self::require_admin(actor)?;

        let flight = self
            .flights
            .get_mut(&flight_id)
            .ok_or(CatalogError::FlightNotFound(flight_id))?;
        update.apply(flight);
        let updated = flight.clone();
        self.persist()?;

        tracing::info!("Flight updated: {}", flight_id);
        Ok(updated)
    }

    /// Remove a flight. Bookings and payments referencing it are left in
    /// place (dangling references are accepted in this scope).
    pub fn delete_flight(&mut self, actor: &Identity, flight_id: Uuid) -> Result<(), CatalogError> {
        Self::require_admin(actor)?;

        if self.flights.remove(&flight_id).is_none() {
            return Err(CatalogError::FlightNotFound(flight_id));
        }
        self.persist()?;

        tracing::info!("Flight deleted: {}", flight_id);
        Ok(())
    }

    pub fn list_flights(&self) -> Vec<&Flight> {
        let mut flights: Vec<&Flight> = self.flights.values().collect();
        flights.sort_by(|a, b| a.flight_number.cmp(&b.flight_number));
        flights
    }

    pub fn get(&self, flight_id: Uuid) -> Option<&Flight> {
        self.flights.get(&flight_id)
    }

    pub fn flight_count(&self) -> usize {
        self.flights.len()
    }

    /// Mark a seat reserved. Validation order is fixed for deterministic
    /// error reporting: flight exists, seat exists, seat not yet reserved.
    pub fn reserve_seat(&mut self, flight_id: Uuid, seat_no: &str) -> Result<(), SeatError> {
        let flight = self
            .flights
            .get_mut(&flight_id)
            .ok_or(SeatError::FlightNotFound(flight_id))?;
        let seat = flight
            .seats
            .get_mut(seat_no)
            .ok_or_else(|| SeatError::SeatNotFound(seat_no.to_string()))?;
        if seat.is_reserved {
            return Err(SeatError::AlreadyReserved(seat_no.to_string()));
        }
        seat.is_reserved = true;
        Ok(())
    }

    /// Release a previously reserved seat. A flight deleted after the
    /// booking leaves a dangling reference, so a missing flight or seat is
    /// a no-op rather than an error.
    pub fn release_seat(&mut self, flight_id: Uuid, seat_no: &str) {
        if let Some(flight) = self.flights.get_mut(&flight_id) {
            if let Some(seat) = flight.seats.get_mut(seat_no) {
                seat.is_reserved = false;
            }
        }
    }

    fn require_admin(actor: &Identity) -> Result<(), CatalogError> {
        if actor.role != Role::Admin {
            return Err(CatalogError::Forbidden);
        }
        Ok(())
    }

    fn persist(&self) -> Result<(), StoreError> {
        let mut records: Vec<FlightRecord> = self.flights.values().map(FlightRecord::from).collect();
        // Stable file order across rewrites.
        records.sort_by_key(|r| r.flight_id);
        self.store.save(&records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyledger_core::snapshot::MemoryStore;

    fn admin() -> Identity {
        Identity {
            id: "admin-1".to_string(),
            name: "Primary Admin".to_string(),
            login_key: "admin".to_string(),
            password_digest: String::new(),
            role: Role::Admin,
        }
    }

    fn customer() -> Identity {
        Identity {
            id: "nora@example.com".to_string(),
            name: "Nora".to_string(),
            login_key: "nora@example.com".to_string(),
            password_digest: String::new(),
            role: Role::Customer,
        }
    }

    fn spec(number: &str, price: f64, seats: usize) -> FlightSpec {
        FlightSpec {
            flight_number: number.to_string(),
            origin: "CAI".to_string(),
            destination: "DXB".to_string(),
            price,
            date: "2026-09-01".to_string(),
            departure_time: "10:30".to_string(),
            duration: "03:45".to_string(),
            airline: "Skyledger Air".to_string(),
            seat_count: Some(seats),
        }
    }

    fn registry() -> FlightRegistry {
        FlightRegistry::open(Box::new(MemoryStore::new()), 150).unwrap()
    }

    #[test]
    fn non_admin_mutations_are_forbidden_and_change_nothing() {
        let mut reg = registry();
        let flight = reg.add_flight(&admin(), spec("SL1", 200.0, 4)).unwrap();

        let err = reg.add_flight(&customer(), spec("SL2", 100.0, 4)).unwrap_err();
        assert!(matches!(err, CatalogError::Forbidden));

        let err = reg
            .edit_flight(&customer(), flight.id, FlightUpdate::default())
            .unwrap_err();
        assert!(matches!(err, CatalogError::Forbidden));

        let err = reg.delete_flight(&customer(), flight.id).unwrap_err();
        assert!(matches!(err, CatalogError::Forbidden));

        assert_eq!(reg.flight_count(), 1);
        assert_eq!(reg.get(flight.id).unwrap().price, 200.0);
    }

    #[test]
    fn edit_applies_partial_updates_and_keeps_seat_map() {
        let mut reg = registry();
        let flight = reg.add_flight(&admin(), spec("SL1", 200.0, 10)).unwrap();

        let updated = reg
            .edit_flight(
                &admin(),
                flight.id,
                FlightUpdate {
                    price: Some(275.5),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.price, 275.5);
        assert_eq!(updated.origin, "CAI");
        assert_eq!(reg.get(flight.id).unwrap().seat_count(), 10);
    }

    #[test]
    fn edit_and_delete_report_missing_flights() {
        let mut reg = registry();
        let ghost = Uuid::new_v4();
        assert!(matches!(
            reg.edit_flight(&admin(), ghost, FlightUpdate::default()),
            Err(CatalogError::FlightNotFound(_))
        ));
        assert!(matches!(
            reg.delete_flight(&admin(), ghost),
            Err(CatalogError::FlightNotFound(_))
        ));
    }

    #[test]
    fn deleted_flight_disappears_from_listing() {
        let mut reg = registry();
        let flight = reg.add_flight(&admin(), spec("SL1", 200.0, 4)).unwrap();
        reg.delete_flight(&admin(), flight.id).unwrap();

        assert!(reg.get(flight.id).is_none());
        assert!(reg.list_flights().is_empty());
    }

    #[test]
    fn seat_reservation_happens_exactly_once() {
        let mut reg = registry();
        let flight = reg.add_flight(&admin(), spec("SL1", 200.0, 2)).unwrap();

        reg.reserve_seat(flight.id, "S1").unwrap();
        let err = reg.reserve_seat(flight.id, "S1").unwrap_err();
        assert!(matches!(err, SeatError::AlreadyReserved(_)));
        assert_eq!(reg.get(flight.id).unwrap().available_seats(), 1);
    }

    #[test]
    fn seat_validation_order_is_flight_then_seat_then_flag() {
        let mut reg = registry();
        let flight = reg.add_flight(&admin(), spec("SL1", 200.0, 2)).unwrap();

        assert!(matches!(
            reg.reserve_seat(Uuid::new_v4(), "S1"),
            Err(SeatError::FlightNotFound(_))
        ));
        assert!(matches!(
            reg.reserve_seat(flight.id, "S99"),
            Err(SeatError::SeatNotFound(_))
        ));
    }

    #[test]
    fn release_seat_resets_the_flag_and_tolerates_dangling_flights() {
        let mut reg = registry();
        let flight = reg.add_flight(&admin(), spec("SL1", 200.0, 2)).unwrap();

        reg.reserve_seat(flight.id, "S1").unwrap();
        reg.release_seat(flight.id, "S1");
        assert!(reg.reserve_seat(flight.id, "S1").is_ok());

        // No panic for a flight that no longer exists.
        reg.release_seat(Uuid::new_v4(), "S1");
    }

    #[test]
    fn registry_reloads_flights_with_fresh_seat_maps() {
        let store = MemoryStore::new();
        let mut reg = FlightRegistry::open(Box::new(store.clone()), 150).unwrap();
        let flight = reg.add_flight(&admin(), spec("SL1", 200.0, 150)).unwrap();
        reg.reserve_seat(flight.id, "S1").unwrap();

        let reopened = FlightRegistry::open(Box::new(store), 150).unwrap();
        let restored = reopened.get(flight.id).unwrap();
        assert_eq!(restored.flight_number, "SL1");
        assert_eq!(restored.seat_count(), 150);
        // Seat flags are not persisted; the reloaded map is unreserved.
        assert_eq!(restored.available_seats(), 150);
    }
}
