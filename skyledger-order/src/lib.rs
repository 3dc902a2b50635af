pub mod bookings;
pub mod orchestrator;
pub mod payments;
pub mod reports;
pub mod tickets;
