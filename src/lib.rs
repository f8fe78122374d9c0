//! Dispatch API for waste-collection crews: drivers, collection points and
//! the per-driver routes that link them.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod utils;

pub use routes::create_app;
pub use state::AppState;
