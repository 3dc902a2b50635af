use std::sync::{Arc, RwLock};

use skyledger_catalog::FlightRegistry;
use skyledger_core::identity::IdentityStore;
use skyledger_order::bookings::BookingLedger;
use skyledger_order::payments::PaymentLedger;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

/// Shared handles over the in-memory stores. The domain model is
/// single-writer per store; axum serves requests from many threads, so each
/// store sits behind its own lock. Handlers that touch several stores
/// acquire locks in a fixed order: identities, flights, payments, bookings.
#[derive(Clone)]
pub struct AppState {
    pub identities: Arc<RwLock<IdentityStore>>,
    pub flights: Arc<RwLock<FlightRegistry>>,
    pub payments: Arc<RwLock<PaymentLedger>>,
    pub bookings: Arc<RwLock<BookingLedger>>,
    pub auth: AuthConfig,
}
