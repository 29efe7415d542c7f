pub mod cli;
pub mod client;
pub mod config;
pub mod conversation;
pub mod error;
pub mod telemetry;
pub mod types;
pub mod validation;
