//! Row models and domain enums
//!
//! Enum values mirror the CHECK constraints in `db::init`; `to_db_string`
//! returns the canonical stored form and `from_str` accepts it back.

use serde::{Deserialize, Serialize};

/// How a learner joins a class session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceMode {
    InPerson,
    Video,
    Chat,
}

impl AttendanceMode {
    /// Parse a stored or caller-supplied mode string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "in_person" | "in-person" => Some(AttendanceMode::InPerson),
            "video" => Some(AttendanceMode::Video),
            "chat" => Some(AttendanceMode::Chat),
            _ => None,
        }
    }

    /// Canonical database value (lowercase, underscored)
    pub fn to_db_string(&self) -> &'static str {
        match self {
            AttendanceMode::InPerson => "in_person",
            AttendanceMode::Video => "video",
            AttendanceMode::Chat => "chat",
        }
    }

    /// Human-readable name for message templates
    pub fn display_name(&self) -> &'static str {
        match self {
            AttendanceMode::InPerson => "in person",
            AttendanceMode::Video => "video call",
            AttendanceMode::Chat => "chat",
        }
    }
}

/// How a scheduled session is delivered
///
/// Same value set as [`AttendanceMode`] but a distinct type: the delivery
/// method is the session's plan, the attendance mode is one learner's
/// choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMethod {
    InPerson,
    Video,
    Chat,
}

impl DeliveryMethod {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "in_person" | "in-person" => Some(DeliveryMethod::InPerson),
            "video" => Some(DeliveryMethod::Video),
            "chat" => Some(DeliveryMethod::Chat),
            _ => None,
        }
    }

    pub fn to_db_string(&self) -> &'static str {
        match self {
            DeliveryMethod::InPerson => "in_person",
            DeliveryMethod::Video => "video",
            DeliveryMethod::Chat => "chat",
        }
    }
}

/// Enrollment lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    Pending,
    Confirmed,
    Cancelled,
    Attended,
}

impl EnrollmentStatus {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(EnrollmentStatus::Pending),
            "confirmed" => Some(EnrollmentStatus::Confirmed),
            "cancelled" => Some(EnrollmentStatus::Cancelled),
            "attended" => Some(EnrollmentStatus::Attended),
            _ => None,
        }
    }

    pub fn to_db_string(&self) -> &'static str {
        match self {
            EnrollmentStatus::Pending => "pending",
            EnrollmentStatus::Confirmed => "confirmed",
            EnrollmentStatus::Cancelled => "cancelled",
            EnrollmentStatus::Attended => "attended",
        }
    }
}

/// Delivery status of one notification attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationStatus {
    Pending,
    Sent,
    Failed,
}

impl NotificationStatus {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(NotificationStatus::Pending),
            "sent" => Some(NotificationStatus::Sent),
            "failed" => Some(NotificationStatus::Failed),
            _ => None,
        }
    }

    pub fn to_db_string(&self) -> &'static str {
        match self {
            NotificationStatus::Pending => "pending",
            NotificationStatus::Sent => "sent",
            NotificationStatus::Failed => "failed",
        }
    }
}

/// Outbound notification channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    EmailSms,
    #[serde(rename = "whatsapp")]
    WhatsApp,
    Telegram,
    Twilio,
    ConsoleLog,
}

impl ChannelKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "email_sms" => Some(ChannelKind::EmailSms),
            "whatsapp" => Some(ChannelKind::WhatsApp),
            "telegram" => Some(ChannelKind::Telegram),
            "twilio" => Some(ChannelKind::Twilio),
            "console_log" => Some(ChannelKind::ConsoleLog),
            _ => None,
        }
    }

    pub fn to_db_string(&self) -> &'static str {
        match self {
            ChannelKind::EmailSms => "email_sms",
            ChannelKind::WhatsApp => "whatsapp",
            ChannelKind::Telegram => "telegram",
            ChannelKind::Twilio => "twilio",
            ChannelKind::ConsoleLog => "console_log",
        }
    }
}

/// Partnership application status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartnershipStatus {
    Pending,
    Approved,
    Rejected,
}

impl PartnershipStatus {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(PartnershipStatus::Pending),
            "approved" => Some(PartnershipStatus::Approved),
            "rejected" => Some(PartnershipStatus::Rejected),
            _ => None,
        }
    }

    pub fn to_db_string(&self) -> &'static str {
        match self {
            PartnershipStatus::Pending => "pending",
            PartnershipStatus::Approved => "approved",
            PartnershipStatus::Rejected => "rejected",
        }
    }
}

/// Learner profile row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub emergency_contact: Option<String>,
    pub special_needs: Option<String>,
    pub is_admin: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Course row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub instructor: Option<String>,
    pub max_students: i64,
    pub enrolled_students: i64,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub class_time: Option<String>,
    pub location: Option<String>,
    pub duration: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Enrollment row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: i64,
    pub user_id: String,
    pub course_id: i64,
    pub status: EnrollmentStatus,
    pub created_at: String,
}

/// Scheduled class session row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassSession {
    pub id: i64,
    pub course_id: i64,
    pub session_date: String,
    pub start_time: String,
    pub end_time: String,
    pub delivery_method: DeliveryMethod,
    pub video_room_id: Option<String>,
    pub chat_channel_id: Option<String>,
    pub chat_invite_link: Option<String>,
    pub created_at: String,
}

/// Current attendance-mode selection for one (session, user) pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionAttendance {
    pub session_id: i64,
    pub user_id: String,
    pub attendance_mode: AttendanceMode,
    pub joined_at: String,
}

/// One notification attempt (append-only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub user_id: String,
    pub course_id: Option<i64>,
    pub channel: ChannelKind,
    pub message: String,
    pub status: NotificationStatus,
    pub created_at: String,
}

/// Partner institution application row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Partnership {
    pub id: i64,
    pub organization_name: String,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub selected_courses: Vec<i64>,
    pub notes: Option<String>,
    pub status: PartnershipStatus,
    pub approved_by: Option<String>,
    pub approved_at: Option<String>,
    pub created_at: String,
}

impl Partnership {
    /// Decode the stored JSON array of course ids, tolerating bad data
    pub fn decode_selected_courses(raw: &str) -> Vec<i64> {
        serde_json::from_str(raw).unwrap_or_default()
    }

    /// Encode course ids to the stored JSON array form
    pub fn encode_selected_courses(ids: &[i64]) -> String {
        serde_json::to_string(ids).unwrap_or_else(|_| "[]".to_string())
    }
}
