pub mod booking;
pub mod flight;
pub mod identity;
pub mod password;
pub mod payment;
pub mod snapshot;
pub mod timestamp;
