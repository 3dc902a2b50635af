use serde::Serialize;

use skyledger_catalog::FlightRegistry;
use skyledger_core::identity::IdentityStore;

use crate::bookings::BookingLedger;

#[derive(Debug, Clone, Serialize)]
pub struct FlightBookings {
    pub flight_number: String,
    pub bookings: usize,
}

/// Read-only aggregation over the identity, flight, and booking stores.
#[derive(Debug, Clone, Serialize)]
pub struct SystemReport {
    pub customers: usize,
    pub admins: usize,
    pub flights: usize,
    pub bookings: usize,
    pub bookings_per_flight: Vec<FlightBookings>,
}

impl SystemReport {
    pub fn generate(
        identities: &IdentityStore,
        registry: &FlightRegistry,
        ledger: &BookingLedger,
    ) -> Self {
        let bookings_per_flight = registry
            .list_flights()
            .into_iter()
            .map(|flight| FlightBookings {
                flight_number: flight.flight_number.clone(),
                bookings: ledger
                    .list_bookings(None)
                    .into_iter()
                    .filter(|b| b.flight_id == flight.id)
                    .count(),
            })
            .collect();

        Self {
            customers: identities.customer_count(),
            admins: identities.admin_count(),
            flights: registry.flight_count(),
            bookings: ledger.booking_count(),
            bookings_per_flight,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyledger_core::flight::FlightSpec;
    use skyledger_core::identity::{Identity, Role};
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

    fn spec(number: &str) -> FlightSpec {
        FlightSpec {
            flight_number: number.to_string(),
            origin: "CAI".to_string(),
            destination: "DXB".to_string(),
            price: 200.0,
            date: "2026-09-01".to_string(),
            departure_time: "10:30".to_string(),
            duration: "03:45".to_string(),
            airline: "Skyledger Air".to_string(),
            seat_count: Some(3),
        }
    }

    #[test]
    fn report_counts_all_stores_and_groups_bookings_by_flight() {
        let mut identities = IdentityStore::open(
            Box::new(MemoryStore::new()),
            Box::new(MemoryStore::new()),
        )
        .unwrap();
        identities
            .register("Nora", "nora@example.com", "pw", Role::Customer)
            .unwrap();
        identities
            .register("Omar", "omar@example.com", "pw", Role::Customer)
            .unwrap();
        identities.add_admin("admin", "adminpass", "Admin").unwrap();

        let mut registry = FlightRegistry::open(Box::new(MemoryStore::new()), 150).unwrap();
        let a = registry.add_flight(&admin(), spec("SL1")).unwrap();
        registry.add_flight(&admin(), spec("SL2")).unwrap();

        let mut bookings = BookingLedger::open(Box::new(MemoryStore::new())).unwrap();
        bookings
            .create_booking("nora@example.com", &mut registry, a.id, "S1")
            .unwrap();
        bookings
            .create_booking("omar@example.com", &mut registry, a.id, "S2")
            .unwrap();

        let report = SystemReport::generate(&identities, &registry, &bookings);
        assert_eq!(report.customers, 2);
        assert_eq!(report.admins, 1);
        assert_eq!(report.flights, 2);
        assert_eq!(report.bookings, 2);

        let per_flight: Vec<(&str, usize)> = report
            .bookings_per_flight
            .iter()
            .map(|f| (f.flight_number.as_str(), f.bookings))
            .collect();
        assert!(per_flight.contains(&("SL1", 2)));
        assert!(per_flight.contains(&("SL2", 0)));
    }
}
