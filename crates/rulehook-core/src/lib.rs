//! # rulehook-core
//!
//! Core crate for rulehook. Contains the unified error system, the
//! configuration schemas, and tracing subscriber setup.
//!
//! This crate has **no** internal dependencies on other rulehook crates.

pub mod config;
pub mod error;
pub mod logging;
pub mod result;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
