// catalog_app/src/lib.rs

//! HTTP front of the product catalog: actix-web routes over `catalog_core`,
//! with Postgres as the catalog store and S3 as the object store.

pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod state;
pub mod storage;
pub mod web;

pub use crate::config::AppConfig;
pub use crate::errors::{AppError, Result};
pub use crate::state::AppState;
