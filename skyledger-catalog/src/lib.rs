pub mod registry;

pub use registry::{CatalogError, FlightRegistry, SeatError};
