pub mod app;
pub mod chart;
pub mod client;
pub mod config;
pub mod controller;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod state;
pub mod taxonomy;
pub mod trends;
pub mod ui;

pub use app::router;
pub use client::{ApiClient, ApiError};
pub use config::AppConfig;
pub use state::AppState;
pub use taxonomy::TAXONOMY;
