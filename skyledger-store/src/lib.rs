pub mod app_config;
pub mod csv_store;

pub use csv_store::CsvStore;
