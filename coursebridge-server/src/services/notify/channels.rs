//! Delivery channel transports
//!
//! One function per channel, each a single HTTP call with the same shape:
//! build the request from the channel's config, send, check the status.
//! No channel retries and none knows about the notification log.

use crate::config::{EmailSmsConfig, TelegramConfig, TwilioConfig, WhatsAppConfig};
use serde_json::json;
use thiserror::Error;

/// Delivery channel errors
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Channel API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Channel not configured: {0}")]
    NotConfigured(&'static str),

    #[error("No destination phone number on file")]
    MissingDestination,
}

/// Map a phone number onto the carrier's email-to-SMS gateway address.
///
/// Formatting characters are stripped; only digits reach the gateway.
/// Returns None when nothing usable remains. One default carrier domain
/// serves all numbers; there is no carrier detection.
pub fn carrier_gateway_address(phone: &str, carrier_domain: &str) -> Option<String> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    Some(format!("{}@{}", digits, carrier_domain))
}

/// SMS via the carrier email gateway, delivered through the HTTP mail relay
pub async fn send_email_sms(
    client: &reqwest::Client,
    config: &EmailSmsConfig,
    destination: Option<&str>,
    message: &str,
) -> Result<(), ChannelError> {
    let relay_url = config
        .relay_url
        .as_deref()
        .ok_or(ChannelError::NotConfigured("email_sms relay_url"))?;
    let phone = destination.ok_or(ChannelError::MissingDestination)?;
    let to = carrier_gateway_address(phone, &config.carrier_domain)
        .ok_or(ChannelError::MissingDestination)?;

    let response = client
        .post(relay_url)
        .json(&json!({
            "from": config.from_address,
            "to": to,
            "subject": "CourseBridge notification",
            "text": message,
        }))
        .send()
        .await
        .map_err(|e| ChannelError::NetworkError(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        return Err(ChannelError::ApiError(status.as_u16(), error_text));
    }

    Ok(())
}

/// WhatsApp gateway send (GET with phone, text and API key)
pub async fn send_whatsapp(
    client: &reqwest::Client,
    config: &WhatsAppConfig,
    destination: Option<&str>,
    message: &str,
) -> Result<(), ChannelError> {
    let api_key = config
        .api_key
        .as_deref()
        .ok_or(ChannelError::NotConfigured("whatsapp api_key"))?;
    let phone = destination.ok_or(ChannelError::MissingDestination)?;

    let response = client
        .get(&config.api_url)
        .query(&[("phone", phone), ("text", message), ("apikey", api_key)])
        .send()
        .await
        .map_err(|e| ChannelError::NetworkError(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        return Err(ChannelError::ApiError(status.as_u16(), error_text));
    }

    Ok(())
}

/// Telegram bot send to the configured operator chat.
/// The learner's number, when known, is prefixed into the text since the
/// chat itself is not per-user.
pub async fn send_telegram(
    client: &reqwest::Client,
    config: &TelegramConfig,
    destination: Option<&str>,
    message: &str,
) -> Result<(), ChannelError> {
    let bot_token = config
        .bot_token
        .as_deref()
        .ok_or(ChannelError::NotConfigured("telegram bot_token"))?;
    let chat_id = config
        .chat_id
        .as_deref()
        .ok_or(ChannelError::NotConfigured("telegram chat_id"))?;

    let text = match destination {
        Some(phone) => format!("[{}] {}", phone, message),
        None => message.to_string(),
    };

    let url = format!(
        "{}/bot{}/sendMessage",
        config.api_url.trim_end_matches('/'),
        bot_token
    );

    let response = client
        .post(&url)
        .json(&json!({
            "chat_id": chat_id,
            "text": text,
        }))
        .send()
        .await
        .map_err(|e| ChannelError::NetworkError(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        return Err(ChannelError::ApiError(status.as_u16(), error_text));
    }

    Ok(())
}

/// Twilio SMS send (Messages endpoint, form body, basic auth)
pub async fn send_twilio(
    client: &reqwest::Client,
    config: &TwilioConfig,
    destination: Option<&str>,
    message: &str,
) -> Result<(), ChannelError> {
    let account_sid = config
        .account_sid
        .as_deref()
        .ok_or(ChannelError::NotConfigured("twilio account_sid"))?;
    let auth_token = config
        .auth_token
        .as_deref()
        .ok_or(ChannelError::NotConfigured("twilio auth_token"))?;
    let from_number = config
        .from_number
        .as_deref()
        .ok_or(ChannelError::NotConfigured("twilio from_number"))?;
    let phone = destination.ok_or(ChannelError::MissingDestination)?;

    let url = format!(
        "{}/2010-04-01/Accounts/{}/Messages.json",
        config.api_url.trim_end_matches('/'),
        account_sid
    );

    let params = [("To", phone), ("From", from_number), ("Body", message)];

    let response = client
        .post(&url)
        .basic_auth(account_sid, Some(auth_token))
        .form(&params)
        .send()
        .await
        .map_err(|e| ChannelError::NetworkError(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        return Err(ChannelError::ApiError(status.as_u16(), error_text));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_carrier_gateway_strips_formatting() {
        assert_eq!(
            carrier_gateway_address("(555) 123-4567", "vtext.com"),
            Some("5551234567@vtext.com".to_string())
        );
        assert_eq!(
            carrier_gateway_address("+1 555 123 4567", "txt.att.net"),
            Some("15551234567@txt.att.net".to_string())
        );
    }

    #[test]
    fn test_carrier_gateway_rejects_empty_numbers() {
        assert_eq!(carrier_gateway_address("", "vtext.com"), None);
        assert_eq!(carrier_gateway_address("ext. none", "vtext.com"), None);
    }

    #[tokio::test]
    async fn test_whatsapp_without_key_is_not_configured() {
        let client = reqwest::Client::new();
        let config = WhatsAppConfig::default();
        let result = send_whatsapp(&client, &config, Some("5551234567"), "hi").await;
        assert!(matches!(result, Err(ChannelError::NotConfigured(_))));
    }

    #[tokio::test]
    async fn test_email_sms_without_destination_fails() {
        let client = reqwest::Client::new();
        let config = EmailSmsConfig {
            enabled: true,
            relay_url: Some("http://127.0.0.1:1/send".to_string()),
            ..EmailSmsConfig::default()
        };
        let result = send_email_sms(&client, &config, None, "hi").await;
        assert!(matches!(result, Err(ChannelError::MissingDestination)));
    }

    #[tokio::test]
    async fn test_unreachable_relay_reports_network_error() {
        let client = reqwest::Client::new();
        let config = EmailSmsConfig {
            enabled: true,
            relay_url: Some("http://127.0.0.1:1/send".to_string()),
            ..EmailSmsConfig::default()
        };
        let result = send_email_sms(&client, &config, Some("5551234567"), "hi").await;
        assert!(matches!(result, Err(ChannelError::NetworkError(_))));
    }
}
