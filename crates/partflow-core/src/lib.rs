//! # partflow-core
//!
//! Core crate for PartFlow. Contains the object-store client trait,
//! configuration schemas, domain types for multipart uploads, and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other PartFlow crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
