pub mod activity;
pub mod backend;
pub mod config;
pub mod debounce;
pub mod derive;
pub mod error;
pub mod export;
pub mod models;
pub mod routes;
pub mod state;
