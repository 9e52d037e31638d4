pub mod chart;
pub mod config;
pub mod errors;
pub mod ingest;

pub mod database;
pub mod server;
pub mod services;
