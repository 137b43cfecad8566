//! # CourseBridge Common Library
//!
//! Shared code for the CourseBridge server including:
//! - Database schema creation and connection pooling
//! - Row models and domain enums (attendance modes, delivery methods,
//!   enrollment/notification/partnership statuses)
//! - Data-folder resolution
//! - Timestamp utilities

pub mod config;
pub mod db;
pub mod error;
pub mod time;

pub use error::{Error, Result};
