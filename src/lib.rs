pub mod app;
pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod geo;
pub mod handlers;
pub mod middleware;
pub mod services;
