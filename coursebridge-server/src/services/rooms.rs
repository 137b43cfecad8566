//! Communication resource provisioning for class sessions
//!
//! Video rooms need no API call at all: the meeting service resolves any
//! URL, so the room id is derived from the course and date and the same
//! inputs always produce the same room. Chat channels go through the
//! [`ChatProvisioner`] seam; the shipped implementation is a stub that
//! fabricates identifiers until a real chat backend is wired in.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

/// Chat provisioning errors
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("Chat provisioning failed: {0}")]
    Failed(String),
}

/// Identifiers for a provisioned chat channel
#[derive(Debug, Clone, Serialize)]
pub struct ProvisionedChannel {
    pub channel_id: String,
    pub invite_link: String,
}

/// Chat backend seam
#[async_trait]
pub trait ChatProvisioner: Send + Sync {
    /// Create a channel for one class session and return its identifiers
    async fn provision_channel(&self, name: &str) -> Result<ProvisionedChannel, ProvisionError>;
}

/// Placeholder chat backend: mints a channel id locally and derives the
/// invite link from it
pub struct StubChatProvisioner {
    invite_base: String,
}

impl StubChatProvisioner {
    pub fn new(invite_base: String) -> Self {
        Self { invite_base }
    }
}

impl Default for StubChatProvisioner {
    fn default() -> Self {
        Self::new("https://chat.coursebridge.local/join".to_string())
    }
}

#[async_trait]
impl ChatProvisioner for StubChatProvisioner {
    async fn provision_channel(&self, name: &str) -> Result<ProvisionedChannel, ProvisionError> {
        let channel_id = Uuid::new_v4().to_string();
        let invite_link = format!("{}/{}", self.invite_base.trim_end_matches('/'), channel_id);

        info!(
            channel = %name,
            channel_id = %channel_id,
            "Provisioned chat channel (stub backend)"
        );

        Ok(ProvisionedChannel {
            channel_id,
            invite_link,
        })
    }
}

/// Derive the deterministic video room id for a session.
/// Same course and date, same room.
pub fn video_room_id(prefix: &str, course_id: i64, session_date: &str) -> String {
    format!("{}-course-{}-{}", prefix, course_id, session_date)
}

/// Join URL for a video room
pub fn video_room_url(base_url: &str, room_id: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), room_id)
}

/// Chat channel name from the course title and session date,
/// lowercased with whitespace collapsed to hyphens
pub fn channel_name(course_title: &str, session_date: &str) -> String {
    let slug = course_title
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");
    format!("{}-{}", slug, session_date)
}
