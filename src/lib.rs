pub mod config;
pub mod db;
pub mod error;
pub mod event_grid;
pub mod routes;
pub mod state;
