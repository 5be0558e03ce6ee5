//! Demo application wiring the apikit problem pipeline into an axum server.

pub mod app;
pub mod config;
pub mod logging;
pub mod programmers;

pub use app::{build_router, serve};
pub use config::AppConfig;
