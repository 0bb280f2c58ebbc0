//! # medboard-core
//!
//! Core crate for the Medboard clinical dashboard platform. Contains the
//! configuration schemas, tracing setup, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Medboard crates.

pub mod config;
pub mod error;
pub mod logging;
pub mod result;

pub use error::AppError;
pub use result::AppResult;
