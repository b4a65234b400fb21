// catalog_app/src/models/mod.rs

//! Row shapes as they come back from Postgres.

pub mod product;

pub use product::ProductRow;
