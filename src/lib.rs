pub mod cache;
pub mod config;
pub mod db;
pub mod dto;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod order_no;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
