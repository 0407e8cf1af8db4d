pub mod config;
pub mod error;
pub mod gateway;
pub mod routes;

use std::sync::Arc;

use config::Config;
use gateway::registry::Registry;
use gateway::relay::Relay;
use relay_common::SnowflakeGenerator;

/// Shared application state available to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub registry: Arc<Registry>,
    pub relay: Arc<Relay>,
    pub snowflake: Arc<SnowflakeGenerator>,
}

impl AppState {
    /// Build a fresh state with an empty registry.
    pub fn new(config: Config) -> Self {
        let registry = Arc::new(Registry::new());
        let relay = Arc::new(Relay::new(registry.clone(), config.announce_joins));
        let snowflake = Arc::new(SnowflakeGenerator::new(config.worker_id));

        Self {
            config: Arc::new(config),
            registry,
            relay,
            snowflake,
        }
    }
}
