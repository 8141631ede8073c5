//! Configuration types for the DDNS synchronizer
//!
//! Configuration is loaded once per run from environment variables (or any
//! equivalent key/value lookup) and is never mutated afterwards. Loading only
//! fails on values that cannot be parsed; missing and placeholder values are
//! reported by [`SyncConfig::validate`], which the runner calls before any
//! network traffic.

use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;
use std::net::IpAddr;
use std::path::PathBuf;
use std::str::FromStr;

/// Environment variable names recognized by [`SyncConfig::from_env`]
pub mod env_vars {
    /// Cloudflare API token (bearer authentication)
    pub const API_TOKEN: &str = "CLOUDFLARE_API_TOKEN";
    /// Account email for global API key authentication
    pub const API_EMAIL: &str = "CLOUDFLARE_API_EMAIL";
    /// Global API key, used together with [`API_EMAIL`]
    pub const API_KEY: &str = "CLOUDFLARE_API_KEY";
    /// Provider API base URL override
    pub const API_BASE: &str = "CLOUDFLARE_API_BASE";
    pub const ZONE_ID: &str = "ZONE_ID";
    pub const RECORD_NAME: &str = "RECORD_NAME";
    pub const RECORD_TYPE: &str = "RECORD_TYPE";
    pub const RECORD_TTL: &str = "RECORD_TTL";
    pub const RECORD_PROXIED: &str = "RECORD_PROXIED";
    /// Comma-separated list of IP detection service URLs
    pub const IP_DETECTION_SERVICES: &str = "IP_DETECTION_SERVICES";
    pub const HTTP_TIMEOUT_SECS: &str = "DDNS_HTTP_TIMEOUT_SECS";
    /// Logical job identity; enables the `<name>.log` file sink
    pub const LOGGER_NAME: &str = "LOGGER_NAME";
    pub const LOG_DIR: &str = "DDNS_LOG_DIR";
    pub const LOG_LEVEL: &str = "DDNS_LOG_LEVEL";
    /// `dry-run` disables provider writes
    pub const MODE: &str = "DDNS_MODE";
}

/// Cloudflare API v4 base URL
pub const DEFAULT_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Public IP echo services, queried in this order
pub const DEFAULT_IP_DETECTION_SERVICES: &[&str] = &[
    "https://api.ipify.org",
    "https://ifconfig.me/ip",
    "https://icanhazip.com",
    "https://checkip.amazonaws.com",
];

/// Default record TTL in seconds
pub const DEFAULT_TTL: u32 = 120;

/// Upper bound for any single outbound request
pub const MAX_HTTP_TIMEOUT_SECS: u64 = 10;

/// Values shipped in sample configuration files
const PLACEHOLDER_VALUES: &[&str] = &[
    "your_cloudflare_api_token_here",
    "your_zone_id_here",
    "your.domain.com",
    "your_api_key_here",
    "your_email_here",
    "changeme",
    "replace_me",
    "token",
];

/// Main synchronizer configuration
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// DNS provider configuration
    pub provider: ProviderConfig,

    /// The single record kept in sync
    pub record: RecordConfig,

    /// Public IP detection settings
    pub ip_detection: IpDetectionConfig,

    /// Log sink settings
    pub logging: LoggingConfig,

    /// Live or dry-run
    pub mode: RunMode,
}

impl SyncConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key/value lookup
    ///
    /// Blank values are treated as absent. Required fields that are absent
    /// load as empty strings so that [`SyncConfig::validate`] can report them
    /// with an actionable message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when an optional value is present but cannot
    /// be parsed (e.g. `RECORD_TTL=abc`).
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let credentials = match (
            get(env_vars::API_TOKEN),
            get(env_vars::API_EMAIL),
            get(env_vars::API_KEY),
        ) {
            (Some(token), _, _) => Credentials::ApiToken(token),
            (None, Some(email), Some(key)) => Credentials::GlobalKey { email, key },
            (None, Some(email), None) => Credentials::GlobalKey {
                email,
                key: String::new(),
            },
            (None, None, Some(key)) => Credentials::GlobalKey {
                email: String::new(),
                key,
            },
            (None, None, None) => Credentials::ApiToken(String::new()),
        };

        let record_type = match get(env_vars::RECORD_TYPE) {
            Some(value) => value.parse()?,
            None => RecordType::A,
        };

        let ttl = match get(env_vars::RECORD_TTL) {
            Some(value) => value.parse::<u32>().map_err(|_| {
                Error::config(format!(
                    "{} must be a number of seconds. Got: {}",
                    env_vars::RECORD_TTL,
                    value
                ))
            })?,
            None => DEFAULT_TTL,
        };

        let proxied = match get(env_vars::RECORD_PROXIED) {
            Some(value) => parse_bool(env_vars::RECORD_PROXIED, &value)?,
            None => true,
        };

        let endpoints = match get(env_vars::IP_DETECTION_SERVICES) {
            Some(list) => list
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            None => DEFAULT_IP_DETECTION_SERVICES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        };

        let timeout_secs = match get(env_vars::HTTP_TIMEOUT_SECS) {
            Some(value) => value.parse::<u64>().map_err(|_| {
                Error::config(format!(
                    "{} must be a number of seconds. Got: {}",
                    env_vars::HTTP_TIMEOUT_SECS,
                    value
                ))
            })?,
            None => MAX_HTTP_TIMEOUT_SECS,
        };

        let mode = match get(env_vars::MODE) {
            Some(value) => value.parse()?,
            None => RunMode::Live,
        };

        Ok(Self {
            provider: ProviderConfig {
                credentials,
                zone_id: get(env_vars::ZONE_ID).unwrap_or_default(),
                api_base: get(env_vars::API_BASE)
                    .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            },
            record: RecordConfig {
                name: get(env_vars::RECORD_NAME).unwrap_or_default(),
                record_type,
                ttl,
                proxied,
            },
            ip_detection: IpDetectionConfig {
                endpoints,
                timeout_secs,
            },
            logging: LoggingConfig {
                logger_name: get(env_vars::LOGGER_NAME),
                log_dir: get(env_vars::LOG_DIR)
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(".")),
                level: get(env_vars::LOG_LEVEL).unwrap_or_else(|| "info".to_string()),
            },
            mode,
        })
    }

    /// Validate the configuration
    ///
    /// Checks that every required field is present and is not a known
    /// placeholder, and that optional values are within range.
    pub fn validate(&self) -> Result<()> {
        self.provider.validate()?;
        self.record.validate()?;
        self.ip_detection.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Whether provider writes are skipped
    pub fn is_dry_run(&self) -> bool {
        self.mode == RunMode::DryRun
    }
}

/// Provider credentials
///
/// The Debug implementation never prints secret material.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Scoped API token, sent as `Authorization: Bearer`
    ApiToken(String),

    /// Legacy global API key, sent as `X-Auth-Email` / `X-Auth-Key`
    GlobalKey {
        /// Account email
        email: String,
        /// Global API key
        key: String,
    },
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::ApiToken(_) => f.debug_tuple("ApiToken").field(&"<REDACTED>").finish(),
            Credentials::GlobalKey { email, .. } => f
                .debug_struct("GlobalKey")
                .field("email", email)
                .field("key", &"<REDACTED>")
                .finish(),
        }
    }
}

impl Credentials {
    fn validate(&self) -> Result<()> {
        match self {
            Credentials::ApiToken(token) => {
                if token.is_empty() {
                    return Err(Error::config(format!(
                        "{} is required (or set both {} and {}). \
                        Set it via: export {}=your_token",
                        env_vars::API_TOKEN,
                        env_vars::API_EMAIL,
                        env_vars::API_KEY,
                        env_vars::API_TOKEN
                    )));
                }
                if is_placeholder(token) || token.to_ascii_lowercase().contains("your_token") {
                    return Err(Error::config(format!(
                        "{} appears to be a placeholder. \
                        Use an actual API token from the Cloudflare dashboard.",
                        env_vars::API_TOKEN
                    )));
                }
                if !is_header_safe(token) {
                    return Err(Error::config(format!(
                        "{} contains whitespace or non-printable characters",
                        env_vars::API_TOKEN
                    )));
                }
            }
            Credentials::GlobalKey { email, key } => {
                if email.is_empty() || key.is_empty() {
                    return Err(Error::config(format!(
                        "{} and {} must both be set when using global API key authentication",
                        env_vars::API_EMAIL,
                        env_vars::API_KEY
                    )));
                }
                if is_placeholder(email) || !email.contains('@') {
                    return Err(Error::config(format!(
                        "{} must be the Cloudflare account email. Got: {}",
                        env_vars::API_EMAIL,
                        email
                    )));
                }
                if is_placeholder(key) {
                    return Err(Error::config(format!(
                        "{} appears to be a placeholder",
                        env_vars::API_KEY
                    )));
                }
                if !is_header_safe(email) || !is_header_safe(key) {
                    return Err(Error::config(format!(
                        "{} / {} contain whitespace or non-printable characters",
                        env_vars::API_EMAIL,
                        env_vars::API_KEY
                    )));
                }
            }
        }
        Ok(())
    }
}

/// DNS provider configuration
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Authentication material
    pub credentials: Credentials,

    /// Zone identifier
    pub zone_id: String,

    /// API base URL (no trailing slash required)
    pub api_base: String,
}

impl ProviderConfig {
    fn validate(&self) -> Result<()> {
        self.credentials.validate()?;

        if self.zone_id.is_empty() {
            return Err(Error::config(format!(
                "{} is required. Find it on the domain overview page of the Cloudflare dashboard",
                env_vars::ZONE_ID
            )));
        }
        if is_placeholder(&self.zone_id) {
            return Err(Error::config(format!(
                "{} appears to be a placeholder. Use the zone identifier of your domain",
                env_vars::ZONE_ID
            )));
        }
        // Used as a URL path segment
        if !self.zone_id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(Error::config(format!(
                "{} must be alphanumeric. Got: {}",
                env_vars::ZONE_ID,
                self.zone_id
            )));
        }

        if !self.api_base.starts_with("https://") && !self.api_base.starts_with("http://") {
            return Err(Error::config(format!(
                "{} must use HTTP or HTTPS scheme. Got: {}",
                env_vars::API_BASE,
                self.api_base
            )));
        }

        Ok(())
    }
}

/// DNS record configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordConfig {
    /// Fully-qualified record name (e.g., "home.example.com")
    pub name: String,

    /// Address record type
    pub record_type: RecordType,

    /// Time-to-live in seconds (1 = automatic)
    pub ttl: u32,

    /// Whether the record is proxied through Cloudflare
    pub proxied: bool,
}

impl RecordConfig {
    /// Create a record configuration with default TTL and proxy settings
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            record_type: RecordType::A,
            ttl: DEFAULT_TTL,
            proxied: true,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::config(format!(
                "{} is required. Set it via: export {}=home.example.com",
                env_vars::RECORD_NAME,
                env_vars::RECORD_NAME
            )));
        }
        if is_placeholder(&self.name) {
            return Err(Error::config(format!(
                "{} appears to be a placeholder. Use the record you want to keep updated",
                env_vars::RECORD_NAME
            )));
        }
        validate_domain_name(&self.name)?;

        if self.ttl != 1 && !(30..=86400).contains(&self.ttl) {
            return Err(Error::config(format!(
                "{} must be 1 (automatic) or between 30 and 86400 seconds. Got: {}",
                env_vars::RECORD_TTL,
                self.ttl
            )));
        }

        Ok(())
    }
}

/// DNS address record type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    /// A record (IPv4)
    A,
    /// AAAA record (IPv6)
    Aaaa,
}

impl RecordType {
    /// Wire name of the record type
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
        }
    }

    /// Whether an address belongs to the family this record type holds
    pub fn accepts(&self, ip: &IpAddr) -> bool {
        match self {
            RecordType::A => ip.is_ipv4(),
            RecordType::Aaaa => ip.is_ipv6(),
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "A" => Ok(RecordType::A),
            "AAAA" => Ok(RecordType::Aaaa),
            _ => Err(Error::config(format!(
                "{} '{}' is not supported. Supported types: A, AAAA",
                env_vars::RECORD_TYPE,
                s
            ))),
        }
    }
}

/// Public IP detection configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpDetectionConfig {
    /// Echo service URLs, in priority order
    pub endpoints: Vec<String>,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for IpDetectionConfig {
    fn default() -> Self {
        Self {
            endpoints: DEFAULT_IP_DETECTION_SERVICES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            timeout_secs: MAX_HTTP_TIMEOUT_SECS,
        }
    }
}

impl IpDetectionConfig {
    fn validate(&self) -> Result<()> {
        if self.endpoints.is_empty() {
            return Err(Error::config(format!(
                "{} must contain at least one URL",
                env_vars::IP_DETECTION_SERVICES
            )));
        }

        for url in &self.endpoints {
            if !url.starts_with("https://") && !url.starts_with("http://") {
                return Err(Error::config(format!(
                    "IP detection service must use HTTP or HTTPS scheme. Got: {}",
                    url
                )));
            }
            if url.starts_with("http://") {
                tracing::warn!(
                    "IP detection service {} uses HTTP (not HTTPS). Consider using HTTPS.",
                    url
                );
            }
        }

        if !(1..=MAX_HTTP_TIMEOUT_SECS).contains(&self.timeout_secs) {
            return Err(Error::config(format!(
                "{} must be between 1 and {} seconds. Got: {}",
                env_vars::HTTP_TIMEOUT_SECS,
                MAX_HTTP_TIMEOUT_SECS,
                self.timeout_secs
            )));
        }

        Ok(())
    }
}

/// Log sink configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Optional job identity; when set, logs are also appended to `<name>.log`
    pub logger_name: Option<String>,

    /// Directory holding the named log file
    pub log_dir: PathBuf,

    /// Maximum level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            logger_name: None,
            log_dir: PathBuf::from("."),
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Path of the append-only log file, if a logger name is configured
    pub fn log_file_path(&self) -> Option<PathBuf> {
        self.logger_name
            .as_ref()
            .map(|name| self.log_dir.join(format!("{}.log", name)))
    }

    /// Validate level and logger name
    ///
    /// Must pass before the log file is opened.
    pub fn validate(&self) -> Result<()> {
        match self.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(Error::config(format!(
                    "{} '{}' is not valid. Valid levels: trace, debug, info, warn, error",
                    env_vars::LOG_LEVEL,
                    self.level
                )));
            }
        }

        if let Some(name) = &self.logger_name
            && (name == "." || name == ".." || name.contains(['/', '\\']))
        {
            return Err(Error::config(format!(
                "{} must be a plain name without path separators. Got: {}",
                env_vars::LOGGER_NAME,
                name
            )));
        }

        Ok(())
    }
}

/// Whether provider writes are performed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Create and update records
    #[default]
    Live,
    /// Look up records and log intended writes only
    DryRun,
}

impl FromStr for RunMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "live" => Ok(RunMode::Live),
            "dry-run" | "dry_run" | "dryrun" => Ok(RunMode::DryRun),
            _ => Err(Error::config(format!(
                "{} '{}' is not valid. Valid modes: live, dry-run",
                env_vars::MODE,
                s
            ))),
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(Error::config(format!(
            "{} must be true or false. Got: {}",
            key, value
        ))),
    }
}

fn is_placeholder(value: &str) -> bool {
    let lower = value.trim().to_ascii_lowercase();
    PLACEHOLDER_VALUES.contains(&lower.as_str())
        || lower.starts_with("your_")
        || lower.contains("replace_me")
}

fn is_header_safe(value: &str) -> bool {
    value.chars().all(|c| c.is_ascii_graphic())
}

/// Basic record name validation per RFC 1035
///
/// Underscores and a leading `*` label are accepted because Cloudflare
/// allows them in record names.
fn validate_domain_name(domain: &str) -> Result<()> {
    if domain.len() > 253 {
        return Err(Error::config(format!(
            "Domain name too long: {} chars (max 253). Got: {}",
            domain.len(),
            domain
        )));
    }

    for (index, label) in domain.split('.').enumerate() {
        if label.is_empty() {
            return Err(Error::config(format!(
                "Domain name has empty label: '{}'",
                domain
            )));
        }

        if index == 0 && label == "*" {
            continue;
        }

        if label.len() > 63 {
            return Err(Error::config(format!(
                "Domain label too long: {} chars (max 63). Label: '{}'",
                label.len(),
                label
            )));
        }

        if !label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(Error::config(format!(
                "Domain label contains invalid characters. Label: '{}'. \
                Valid: alphanumeric, hyphen and underscore only.",
                label
            )));
        }

        if label.starts_with('-') || label.ends_with('-') {
            return Err(Error::config(format!(
                "Domain label cannot start or end with hyphen. Label: '{}'",
                label
            )));
        }
    }

    Ok(())
}
