//! Database operations for coursebridge-server
//!
//! Each submodule owns the queries for one table. Handlers call these
//! functions with the shared pool; none of them open their own connections.

pub mod attendance;
pub mod courses;
pub mod enrollments;
pub mod notifications;
pub mod partnerships;
pub mod profiles;
pub mod sessions;
