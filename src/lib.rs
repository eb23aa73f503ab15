pub mod config;
pub mod fetch;
pub mod rate_limit;
pub mod records;
pub mod spotify;
pub mod upsert;
