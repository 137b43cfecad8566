//! External-service integrations
//!
//! Each collaborator sits behind a small seam: bearer-token validation
//! ([`auth`]), communication resource provisioning ([`rooms`]), and the
//! notification dispatch cascade ([`notify`]).

pub mod auth;
pub mod notify;
pub mod rooms;
