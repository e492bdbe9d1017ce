//! Library Server
//!
//! A REST JSON API for a book catalog: create, list, update and delete books,
//! borrow copies, and report the total quantity borrowed per title.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<services::Services>,
}
