pub mod config;
pub mod db;
pub mod environment;
pub mod errors;
pub mod filter;
pub mod millis;
pub mod rating;
pub mod routes;
pub mod service;
pub mod ship;
pub mod urls;
pub mod validation;
