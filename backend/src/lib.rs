pub mod config;
pub mod metrics;
pub mod services;
pub mod store;
