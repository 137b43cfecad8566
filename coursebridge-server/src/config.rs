//! Configuration management for coursebridge-server
//!
//! Two-tier configuration:
//! 1. **TOML file**: port, database path, logging, integration endpoints
//! 2. **Environment variables**: channel credentials and deployment overrides
//!    (`COURSEBRIDGE_*`), applied on top of the TOML values
//!
//! # Settings Sources Priority
//!
//! 1. Command-line arguments (--port, --database, --data-folder)
//! 2. Environment variables (COURSEBRIDGE_*)
//! 3. TOML configuration file
//! 4. Built-in defaults (code constants)
//!
//! Notification channel settings are read once here at startup and injected
//! into the dispatcher. Nothing below the config layer reads the environment.

use coursebridge_common::{config as common_config, Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Bootstrap configuration loaded from TOML file
///
/// These settings cannot change during runtime. The server must restart
/// to pick up changes to the TOML file.
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// Path to SQLite database file (relative or absolute)
    ///
    /// If not specified, resolved as `<data folder>/coursebridge.db`
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Identity provider used to validate bearer tokens
    #[serde(default)]
    pub auth: AuthConfig,

    /// Video conference room settings
    #[serde(default)]
    pub video: VideoConfig,

    /// Notification channel settings
    #[serde(default)]
    pub notifications: NotificationConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level directive (trace, debug, info, warn, error),
    /// used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Identity provider endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Base URL of the auth service; tokens are validated via GET {url}/user
    #[serde(default = "default_auth_url")]
    pub url: String,
}

/// Video conference room settings
#[derive(Debug, Clone, Deserialize)]
pub struct VideoConfig {
    /// Base URL of the meeting server; room URLs are `{base_url}/{room_id}`
    #[serde(default = "default_video_base_url")]
    pub base_url: String,

    /// Prefix for generated room identifiers
    #[serde(default = "default_room_prefix")]
    pub room_prefix: String,
}

/// Notification channel settings
///
/// Exactly one channel is active at a time, chosen by priority:
/// carrier email-to-SMS, WhatsApp, Telegram, Twilio, console log.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationConfig {
    #[serde(default)]
    pub email_sms: EmailSmsConfig,

    #[serde(default)]
    pub whatsapp: WhatsAppConfig,

    #[serde(default)]
    pub telegram: TelegramConfig,

    #[serde(default)]
    pub twilio: TwilioConfig,
}

/// SMS delivery through a carrier email-to-SMS gateway
///
/// Takes priority over every other channel but only when explicitly enabled.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailSmsConfig {
    /// Explicit opt-in; a configured relay alone does not activate this channel
    #[serde(default)]
    pub enabled: bool,

    /// Carrier gateway domain appended to the learner's number
    #[serde(default = "default_carrier_domain")]
    pub carrier_domain: String,

    /// HTTP mail relay endpoint that accepts {from, to, subject, text}
    #[serde(default)]
    pub relay_url: Option<String>,

    /// Sender address presented to the relay
    #[serde(default = "default_sms_from_address")]
    pub from_address: String,
}

/// WhatsApp delivery via an HTTP gateway keyed per sender
#[derive(Debug, Clone, Deserialize)]
pub struct WhatsAppConfig {
    /// Gateway API key; the channel is eligible only when present
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_whatsapp_api_url")]
    pub api_url: String,
}

/// Telegram bot delivery
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Destination chat; notifications go to this operator-owned chat
    #[serde(default)]
    pub chat_id: Option<String>,

    #[serde(default = "default_telegram_api_url")]
    pub api_url: String,
}

/// Twilio SMS delivery
#[derive(Debug, Clone, Deserialize)]
pub struct TwilioConfig {
    #[serde(default)]
    pub account_sid: Option<String>,

    #[serde(default)]
    pub auth_token: Option<String>,

    #[serde(default)]
    pub from_number: Option<String>,

    #[serde(default = "default_twilio_api_url")]
    pub api_url: String,
}

impl TelegramConfig {
    /// Telegram is eligible only with both a bot token and a chat id;
    /// a token alone falls through to the next channel
    pub fn is_configured(&self) -> bool {
        self.bot_token.is_some() && self.chat_id.is_some()
    }
}

impl TwilioConfig {
    /// Twilio requires account SID, auth token, and a sending number
    pub fn is_configured(&self) -> bool {
        self.account_sid.is_some() && self.auth_token.is_some() && self.from_number.is_some()
    }
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_auth_url() -> String {
    "http://127.0.0.1:8081".to_string()
}

fn default_video_base_url() -> String {
    "https://meet.jit.si".to_string()
}

fn default_room_prefix() -> String {
    "coursebridge".to_string()
}

fn default_carrier_domain() -> String {
    "vtext.com".to_string()
}

fn default_sms_from_address() -> String {
    "noreply@coursebridge.local".to_string()
}

fn default_whatsapp_api_url() -> String {
    "https://api.callmebot.com/whatsapp.php".to_string()
}

fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_twilio_api_url() -> String {
    "https://api.twilio.com".to_string()
}

impl Default for TomlConfig {
    fn default() -> Self {
        TomlConfig {
            database_path: None,
            port: default_port(),
            logging: LoggingConfig::default(),
            auth: AuthConfig::default(),
            video: VideoConfig::default(),
            notifications: NotificationConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        AuthConfig {
            url: default_auth_url(),
        }
    }
}

impl Default for VideoConfig {
    fn default() -> Self {
        VideoConfig {
            base_url: default_video_base_url(),
            room_prefix: default_room_prefix(),
        }
    }
}

impl Default for EmailSmsConfig {
    fn default() -> Self {
        EmailSmsConfig {
            enabled: false,
            carrier_domain: default_carrier_domain(),
            relay_url: None,
            from_address: default_sms_from_address(),
        }
    }
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        WhatsAppConfig {
            api_key: None,
            api_url: default_whatsapp_api_url(),
        }
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        TelegramConfig {
            bot_token: None,
            chat_id: None,
            api_url: default_telegram_api_url(),
        }
    }
}

impl Default for TwilioConfig {
    fn default() -> Self {
        TwilioConfig {
            account_sid: None,
            auth_token: None,
            from_number: None,
            api_url: default_twilio_api_url(),
        }
    }
}

/// Read an environment variable, treating empty values as unset
fn env_non_empty(key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}

/// Apply COURSEBRIDGE_* environment overrides on top of TOML values
fn apply_env_overrides(config: &mut TomlConfig) {
    if let Some(url) = env_non_empty("COURSEBRIDGE_AUTH_URL") {
        config.auth.url = url;
    }
    if let Some(value) = env_non_empty("COURSEBRIDGE_SMS_VIA_EMAIL") {
        config.notifications.email_sms.enabled =
            matches!(value.to_lowercase().as_str(), "true" | "1" | "yes");
    }
    if let Some(url) = env_non_empty("COURSEBRIDGE_SMS_RELAY_URL") {
        config.notifications.email_sms.relay_url = Some(url);
    }
    if let Some(domain) = env_non_empty("COURSEBRIDGE_SMS_CARRIER_DOMAIN") {
        config.notifications.email_sms.carrier_domain = domain;
    }
    if let Some(key) = env_non_empty("COURSEBRIDGE_WHATSAPP_API_KEY") {
        config.notifications.whatsapp.api_key = Some(key);
    }
    if let Some(token) = env_non_empty("COURSEBRIDGE_TELEGRAM_BOT_TOKEN") {
        config.notifications.telegram.bot_token = Some(token);
    }
    if let Some(chat_id) = env_non_empty("COURSEBRIDGE_TELEGRAM_CHAT_ID") {
        config.notifications.telegram.chat_id = Some(chat_id);
    }
    if let Some(sid) = env_non_empty("COURSEBRIDGE_TWILIO_ACCOUNT_SID") {
        config.notifications.twilio.account_sid = Some(sid);
    }
    if let Some(token) = env_non_empty("COURSEBRIDGE_TWILIO_AUTH_TOKEN") {
        config.notifications.twilio.auth_token = Some(token);
    }
    if let Some(number) = env_non_empty("COURSEBRIDGE_TWILIO_FROM_NUMBER") {
        config.notifications.twilio.from_number = Some(number);
    }
}

/// Command-line configuration overrides
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub database_path: Option<PathBuf>,
    pub port: Option<u16>,
    pub data_folder: Option<String>,
}

/// Complete resolved application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database file path
    pub database_path: PathBuf,

    /// HTTP server port
    pub port: u16,

    /// Log level directive used when RUST_LOG is not set
    pub log_level: String,

    /// Identity provider endpoint
    pub auth: AuthConfig,

    /// Video conference room settings
    pub video: VideoConfig,

    /// Notification channel settings
    pub notifications: NotificationConfig,
}

impl Config {
    /// Load configuration from the TOML file, then apply environment and
    /// CLI overrides.
    ///
    /// A missing TOML file is not an error; built-in defaults apply so the
    /// server starts with zero configuration.
    pub fn load(toml_path: &Path, overrides: ConfigOverrides) -> Result<Self> {
        let mut toml_config = if toml_path.exists() {
            let toml_str = std::fs::read_to_string(toml_path).map_err(|e| {
                Error::Config(format!(
                    "Failed to read config file {}: {}",
                    toml_path.display(),
                    e
                ))
            })?;
            toml::from_str::<TomlConfig>(&toml_str)
                .map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))?
        } else {
            TomlConfig::default()
        };

        apply_env_overrides(&mut toml_config);

        let port = overrides.port.unwrap_or(toml_config.port);

        // Database path priority: CLI > TOML > data folder resolution
        let database_path = match (overrides.database_path, toml_config.database_path) {
            (Some(cli_path), _) => cli_path,
            (None, Some(toml_path)) => toml_path,
            (None, None) => {
                let data_folder =
                    common_config::resolve_data_folder(overrides.data_folder.as_deref());
                common_config::database_path(&data_folder)
            }
        };

        Ok(Config {
            database_path,
            port,
            log_level: toml_config.logging.level,
            auth: toml_config.auth,
            video: toml_config.video,
            notifications: toml_config.notifications,
        })
    }
}
