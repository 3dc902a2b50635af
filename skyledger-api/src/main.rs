use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use skyledger_api::{
    app,
    state::{AppState, AuthConfig},
};
use skyledger_catalog::FlightRegistry;
use skyledger_core::identity::IdentityStore;
use skyledger_order::bookings::BookingLedger;
use skyledger_order::payments::PaymentLedger;
use skyledger_store::CsvStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skyledger_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = skyledger_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Skyledger API on port {}", config.server.port);

    let data_dir = PathBuf::from(&config.data.dir);

    let mut identities = IdentityStore::open(
        Box::new(CsvStore::new(data_dir.join("admins.csv"))),
        Box::new(CsvStore::new(data_dir.join("users.csv"))),
    )
    .expect("Failed to open identity stores");
    identities
        .provision_admin(
            &config.bootstrap.admin_username,
            &config.bootstrap.admin_password,
            &config.bootstrap.admin_name,
        )
        .expect("Failed to provision default administrator");

    let flights = FlightRegistry::open(
        Box::new(CsvStore::new(data_dir.join("flights.csv"))),
        config.business_rules.default_seat_count,
    )
    .expect("Failed to open flight registry");

    let payments = PaymentLedger::open(
        Box::new(CsvStore::new(data_dir.join("payments.csv"))),
        config.business_rules.starting_allowance,
    )
    .expect("Failed to open payment ledger");

    let bookings = BookingLedger::open(Box::new(CsvStore::new(data_dir.join("bookings.csv"))))
        .expect("Failed to open booking ledger");

    let app_state = AppState {
        identities: Arc::new(RwLock::new(identities)),
        flights: Arc::new(RwLock::new(flights)),
        payments: Arc::new(RwLock::new(payments)),
        bookings: Arc::new(RwLock::new(bookings)),
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
            expiration: config.auth.jwt_expiration_seconds,
        },
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
