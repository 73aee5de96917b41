pub mod config;
pub mod db;
pub mod handlers;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod server;
pub mod services;
