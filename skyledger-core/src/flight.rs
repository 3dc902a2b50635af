use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_SEAT_COUNT: usize = 150;

/// A single seat in a flight's seat map. The reservation flag transitions
/// false to true exactly once per successful booking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Seat {
    pub seat_no: String,
    pub is_reserved: bool,
}

/// A flight and its fixed-size seat map. The map is built once at creation
/// (labels `S1..Sn`) and never resized for the life of the flight.
#[derive(Debug, Clone)]
pub struct Flight {
    pub id: Uuid,
    pub flight_number: String,
    pub origin: String,
    pub destination: String,
    pub price: f64,
    pub date: String,
    pub departure_time: String,
    pub duration: String,
    pub airline: String,
    pub seats: BTreeMap<String, Seat>,
}

impl Flight {
    pub fn new(spec: FlightSpec, default_seat_count: usize) -> Self {
        let seat_count = spec.seat_count.unwrap_or(default_seat_count);
        Self {
            id: Uuid::new_v4(),
            flight_number: spec.flight_number,
            origin: spec.origin,
            destination: spec.destination,
            price: spec.price,
            date: spec.date,
            departure_time: spec.departure_time,
            duration: spec.duration,
            airline: spec.airline,
            seats: build_seat_map(seat_count),
        }
    }

    /// Rebuild a flight from its persisted row. Seat state is not part of
    /// the flights store, so every seat comes back unreserved.
    pub fn from_record(record: FlightRecord, seat_count: usize) -> Self {
        Self {
            id: record.flight_id,
            flight_number: record.flight_number,
            origin: record.origin,
            destination: record.destination,
            price: record.price,
            date: record.date,
            departure_time: record.departure_time,
            duration: record.duration,
            airline: record.airline,
            seats: build_seat_map(seat_count),
        }
    }

    pub fn seat_count(&self) -> usize {
        self.seats.len()
    }

    pub fn available_seats(&self) -> usize {
        self.seats.values().filter(|s| !s.is_reserved).count()
    }
}

fn build_seat_map(seat_count: usize) -> BTreeMap<String, Seat> {
    (1..=seat_count)
        .map(|n| {
            let seat_no = format!("S{}", n);
            (
                seat_no.clone(),
                Seat {
                    seat_no,
                    is_reserved: false,
                },
            )
        })
        .collect()
}

/// Creation input for a new flight.
#[derive(Debug, Clone, Deserialize)]
pub struct FlightSpec {
    pub flight_number: String,
    pub origin: String,
    pub destination: String,
    pub price: f64,
    pub date: String,
    pub departure_time: String,
    pub duration: String,
    #[serde(default = "default_airline")]
    pub airline: String,
    #[serde(default)]
    pub seat_count: Option<usize>,
}

fn default_airline() -> String {
    "Unknown".to_string()
}

/// Partial update for an existing flight. Absent fields are left untouched;
/// unknown field names in an incoming body are ignored by serde.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlightUpdate {
    pub flight_number: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub price: Option<f64>,
    pub date: Option<String>,
    pub departure_time: Option<String>,
    pub duration: Option<String>,
    pub airline: Option<String>,
}

impl FlightUpdate {
    pub fn apply(&self, flight: &mut Flight) {
        if let Some(flight_number) = &self.flight_number {
            flight.flight_number = flight_number.clone();
        }
        if let Some(origin) = &self.origin {
            flight.origin = origin.clone();
        }
        if let Some(destination) = &self.destination {
            flight.destination = destination.clone();
        }
        if let Some(price) = self.price {
            flight.price = price;
        }
        if let Some(date) = &self.date {
            flight.date = date.clone();
        }
        if let Some(departure_time) = &self.departure_time {
            flight.departure_time = departure_time.clone();
        }
        if let Some(duration) = &self.duration {
            flight.duration = duration.clone();
        }
        if let Some(airline) = &self.airline {
            flight.airline = airline.clone();
        }
    }
}

/// Persisted row of the flights store. Column order matches the file layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlightRecord {
    pub flight_id: Uuid,
    pub flight_number: String,
    pub origin: String,
    pub destination: String,
    pub price: f64,
    pub date: String,
    pub departure_time: String,
    pub duration: String,
    pub airline: String,
}

impl From<&Flight> for FlightRecord {
    fn from(flight: &Flight) -> Self {
        Self {
            flight_id: flight.id,
            flight_number: flight.flight_number.clone(),
            origin: flight.origin.clone(),
            destination: flight.destination.clone(),
            price: flight.price,
            date: flight.date.clone(),
            departure_time: flight.departure_time.clone(),
            duration: flight.duration.clone(),
            airline: flight.airline.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> FlightSpec {
        FlightSpec {
            flight_number: "SL101".to_string(),
            origin: "CAI".to_string(),
            destination: "DXB".to_string(),
            price: 200.0,
            date: "2026-09-01".to_string(),
            departure_time: "10:30".to_string(),
            duration: "03:45".to_string(),
            airline: "Skyledger Air".to_string(),
            seat_count: None,
        }
    }

    #[test]
    fn seat_map_size_equals_requested_count() {
        let mut s = spec();
        s.seat_count = Some(2);
        let flight = Flight::new(s, DEFAULT_SEAT_COUNT);
        assert_eq!(flight.seat_count(), 2);
        assert!(flight.seats.contains_key("S1"));
        assert!(flight.seats.contains_key("S2"));
        assert!(flight.seats.values().all(|seat| !seat.is_reserved));
    }

    #[test]
    fn seat_map_defaults_to_configured_count() {
        let flight = Flight::new(spec(), DEFAULT_SEAT_COUNT);
        assert_eq!(flight.seat_count(), DEFAULT_SEAT_COUNT);
        assert!(flight.seats.contains_key("S150"));
        assert!(!flight.seats.contains_key("S151"));
    }

    #[test]
    fn record_round_trip_rebuilds_seats_unreserved() {
        let mut flight = Flight::new(spec(), 3);
        if let Some(seat) = flight.seats.get_mut("S1") {
            seat.is_reserved = true;
        }

        let record = FlightRecord::from(&flight);
        let restored = Flight::from_record(record.clone(), 3);

        assert_eq!(restored.id, flight.id);
        assert_eq!(restored.price, flight.price);
        assert_eq!(restored.seat_count(), 3);
        assert_eq!(restored.available_seats(), 3);
        assert_eq!(FlightRecord::from(&restored), record);
    }

    #[test]
    fn update_applies_only_present_fields() {
        let mut flight = Flight::new(spec(), 5);
        let update = FlightUpdate {
            price: Some(250.0),
            duration: Some("04:00".to_string()),
            ..Default::default()
        };
        update.apply(&mut flight);

        assert_eq!(flight.price, 250.0);
        assert_eq!(flight.duration, "04:00");
        assert_eq!(flight.origin, "CAI");
        assert_eq!(flight.seat_count(), 5);
    }
}
