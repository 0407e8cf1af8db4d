pub mod snowflake;
pub mod wire;

pub use snowflake::SnowflakeGenerator;
pub use wire::ChatMessage;
