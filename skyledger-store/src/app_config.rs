use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub data: DataConfig,
    pub auth: AuthConfig,
    pub bootstrap: BootstrapConfig,
    pub business_rules: BusinessRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataConfig {
    /// Directory holding the CSV snapshot stores.
    pub dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiration_seconds: u64,
}

/// Credentials for the one-time default administrator provisioning. The
/// bootstrap is skipped entirely once any administrator exists.
#[derive(Debug, Deserialize, Clone)]
pub struct BootstrapConfig {
    pub admin_username: String,
    pub admin_password: String,
    pub admin_name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BusinessRules {
    /// Wallet balance granted to a customer on first observation.
    #[serde(default = "default_allowance")]
    pub starting_allowance: f64,
    /// Seat map size for flights created without an explicit count.
    #[serde(default = "default_seat_count")]
    pub default_seat_count: usize,
}

fn default_allowance() -> f64 {
    10000.0
}

fn default_seat_count() -> usize {
    150
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name("config/default"))
            // Add in the current environment file (optional)
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add in a local configuration file, not checked in to git
            .add_source(config::File::with_name("config/local").required(false))
            // Add in settings from the environment (with a prefix of SKYLEDGER)
            // E.g. `SKYLEDGER__SERVER__PORT=9090` would set the port
            .add_source(config::Environment::with_prefix("SKYLEDGER").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
