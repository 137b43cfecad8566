//! HTTP API handlers for coursebridge-server

pub mod attendance;
pub mod auth;
pub mod courses;
pub mod enroll;
pub mod health;
pub mod partnerships;
pub mod sessions;

pub use attendance::{select_attendance_mode, session_attendance_breakdown};
pub use auth::{require_admin, require_user};
pub use courses::{create_course, delete_course, get_course, list_courses, update_course};
pub use enroll::enroll;
pub use health::health_routes;
pub use partnerships::{
    approve_partnership, delete_partnership, list_partnerships, reject_partnership,
    submit_partnership,
};
pub use sessions::{create_session, list_sessions};
