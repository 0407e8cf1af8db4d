use std::net::{IpAddr, Ipv4Addr};

use relay_common::snowflake::MAX_WORKER_ID;

/// Relay configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Interface the HTTP server binds to.
    pub host: IpAddr,
    /// Port the HTTP server binds to.
    pub port: u16,
    /// Broadcast a notice when a client connects, not only when it leaves.
    pub announce_joins: bool,
    /// Worker id embedded in generated connection ids.
    pub worker_id: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8000,
            announce_joins: false,
            worker_id: 0,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every variable is optional. Panics with a descriptive message if one
    /// is set to a value that cannot be used.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: parsed_var("HOST").unwrap_or(defaults.host),
            port: parsed_var("PORT").unwrap_or(defaults.port),
            announce_joins: std::env::var("RELAY_ANNOUNCE_JOINS")
                .map(|v| flag_enabled(&v))
                .unwrap_or(defaults.announce_joins),
            worker_id: match parsed_var::<u16>("RELAY_WORKER_ID") {
                Some(id) if id <= MAX_WORKER_ID => id,
                Some(id) => panic!("RELAY_WORKER_ID must be at most {MAX_WORKER_ID}, got {id}"),
                None => defaults.worker_id,
            },
        }
    }
}

fn parsed_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok().filter(|s| !s.is_empty())?;
    match raw.parse() {
        Ok(v) => Some(v),
        Err(_) => panic!("{name} has an invalid value: {raw:?}"),
    }
}

fn flag_enabled(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
