// catalog_app/src/storage/mod.rs

pub mod s3;

pub use s3::S3ObjectStore;
