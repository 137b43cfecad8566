//! Notification dispatch cascade
//!
//! The dispatcher owns channel choice and the append-only delivery log.
//! Channel settings are injected once at construction; nothing here reads
//! the environment. Selection walks a fixed priority order and commits to
//! exactly one channel per send. A failed send is logged and recorded but
//! never surfaces as an error to the operation that triggered it.

pub mod channels;

use crate::config::NotificationConfig;
use crate::db;
use coursebridge_common::db::models::{ChannelKind, Course, NotificationStatus};
use serde::Serialize;
use sqlx::SqlitePool;
use std::time::Duration;
use tracing::{debug, error, info, warn};

pub use channels::ChannelError;

const USER_AGENT: &str = "CourseBridge/0.1.0";

/// Result of one delivery attempt
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DeliveryOutcome {
    pub success: bool,
    pub method: ChannelKind,
}

/// Pick the active channel for the given settings.
///
/// Priority: carrier email gateway (explicit opt-in), WhatsApp, Telegram,
/// Twilio, console log. Partially configured channels are skipped; the
/// console log is always available, so selection never fails.
pub fn select_channel(config: &NotificationConfig) -> ChannelKind {
    if config.email_sms.enabled {
        ChannelKind::EmailSms
    } else if config.whatsapp.api_key.is_some() {
        ChannelKind::WhatsApp
    } else if config.telegram.is_configured() {
        ChannelKind::Telegram
    } else if config.twilio.is_configured() {
        ChannelKind::Twilio
    } else {
        ChannelKind::ConsoleLog
    }
}

/// Notification dispatcher
pub struct Notifier {
    config: NotificationConfig,
    http_client: reqwest::Client,
}

impl Notifier {
    pub fn new(config: NotificationConfig) -> Result<Self, ChannelError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ChannelError::NetworkError(e.to_string()))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// The channel every send will use under the current settings
    pub fn active_channel(&self) -> ChannelKind {
        select_channel(&self.config)
    }

    /// Attempt delivery through the single active channel.
    ///
    /// `destination` is the learner's phone number when one is on file.
    /// Never returns an error; the outcome says what happened.
    pub async fn send(&self, destination: Option<&str>, message: &str) -> DeliveryOutcome {
        let channel = self.active_channel();

        let result = match channel {
            ChannelKind::EmailSms => {
                channels::send_email_sms(
                    &self.http_client,
                    &self.config.email_sms,
                    destination,
                    message,
                )
                .await
            }
            ChannelKind::WhatsApp => {
                channels::send_whatsapp(
                    &self.http_client,
                    &self.config.whatsapp,
                    destination,
                    message,
                )
                .await
            }
            ChannelKind::Telegram => {
                channels::send_telegram(
                    &self.http_client,
                    &self.config.telegram,
                    destination,
                    message,
                )
                .await
            }
            ChannelKind::Twilio => {
                channels::send_twilio(&self.http_client, &self.config.twilio, destination, message)
                    .await
            }
            ChannelKind::ConsoleLog => {
                info!(notification = %message, "Notification (console channel)");
                Ok(())
            }
        };

        match result {
            Ok(()) => {
                debug!(channel = channel.to_db_string(), "Notification delivered");
                DeliveryOutcome {
                    success: true,
                    method: channel,
                }
            }
            Err(e) => {
                warn!(
                    channel = channel.to_db_string(),
                    error = %e,
                    "Notification delivery failed"
                );
                DeliveryOutcome {
                    success: false,
                    method: channel,
                }
            }
        }
    }

    /// Send and record: one delivery attempt, then one log row with the
    /// final status. A failure to write the log row is itself logged and
    /// swallowed so the parent operation still completes.
    pub async fn notify(
        &self,
        pool: &SqlitePool,
        user_id: &str,
        course_id: Option<i64>,
        destination: Option<&str>,
        message: &str,
    ) -> DeliveryOutcome {
        let outcome = self.send(destination, message).await;

        let status = if outcome.success {
            NotificationStatus::Sent
        } else {
            NotificationStatus::Failed
        };

        if let Err(e) =
            db::notifications::record_attempt(pool, user_id, course_id, outcome.method, message, status)
                .await
        {
            error!(error = %e, "Failed to record notification attempt");
        }

        outcome
    }
}

/// Enrollment confirmation text: course title plus whichever schedule
/// details the course carries
pub fn compose_enrollment_message(course: &Course) -> String {
    let mut message = format!("You're enrolled in {}!", course.title);
    if let Some(start_date) = &course.start_date {
        message.push_str(&format!(" Starts {}.", start_date));
    }
    if let Some(class_time) = &course.class_time {
        message.push_str(&format!(" Class time: {}.", class_time));
    }
    if let Some(location) = &course.location {
        message.push_str(&format!(" Location: {}.", location));
    }
    message
}

/// Attendance confirmation text with the join link for remote modes
pub fn compose_attendance_message(
    course_title: &str,
    session_date: &str,
    start_time: &str,
    end_time: &str,
    mode_name: &str,
    join_link: Option<&str>,
) -> String {
    let mut message = format!(
        "Attendance confirmed for {} on {} ({} to {}), joining by {}.",
        course_title, session_date, start_time, end_time, mode_name
    );
    if let Some(link) = join_link {
        message.push_str(&format!(" Join here: {}", link));
    }
    message
}
