// ============================
// crates/backend-lib/src/config.rs
// ============================
//! Configuration management.
//!
//! Settings are resolved once at startup from, in increasing precedence:
//! built-in defaults, a TOML file, `SESSIONGATE_*` environment variables
//! (nested with `__`, e.g. `SESSIONGATE_AUTH__SESSION_NAME`), and the flat
//! legacy keys `AUTH_TYPE`, `SESSION_NAME` and `SESSION_DURATION`.
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Deserializer, Serialize};

/// Default location of the settings file
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Cookie carrying the session id when `SESSION_NAME` is not set
pub const DEFAULT_SESSION_NAME: &str = "_session_id";

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Which authentication scheme guards the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthType {
    /// No authentication at all
    #[serde(rename = "none")]
    NoAuth,
    /// `Authorization: Basic` against the user store
    BasicAuth,
    /// In-memory sessions, no expiry
    SessionAuth,
    /// In-memory sessions expiring after `session_duration_secs`
    SessionExpAuth,
    /// Sessions persisted to the session file, expiring after
    /// `session_duration_secs`
    SessionDbAuth,
}

impl AuthType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthType::NoAuth => "none",
            AuthType::BasicAuth => "basic_auth",
            AuthType::SessionAuth => "session_auth",
            AuthType::SessionExpAuth => "session_exp_auth",
            AuthType::SessionDbAuth => "session_db_auth",
        }
    }

    /// Whether this scheme issues session cookies on login
    pub fn uses_sessions(&self) -> bool {
        matches!(
            self,
            AuthType::SessionAuth | AuthType::SessionExpAuth | AuthType::SessionDbAuth
        )
    }
}

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub log_level: String,
    pub auth: AuthSettings,
    pub password: PasswordSettings,
    pub redaction: RedactionSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageSettings {
    /// Directory holding `users.json` and `user_sessions.json`
    pub path: PathBuf,
}

/// Authentication strategy settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthSettings {
    pub auth_type: AuthType,
    /// Name of the session cookie
    pub session_name: String,
    /// Session lifetime; zero, negative or unparsable means "never expires"
    #[serde(deserialize_with = "lenient_seconds")]
    pub session_duration_secs: i64,
    /// Paths exempt from the gate. Entries ending in `*` match by prefix.
    pub excluded_paths: Vec<String>,
}

/// scrypt cost parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PasswordSettings {
    pub log_n: u8,
    pub r: u32,
    pub p: u32,
}

/// Personal data masked out of text log lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RedactionSettings {
    /// Field names whose `name=value` pairs get their value replaced
    pub fields: Vec<String>,
    pub redaction: String,
    /// What ends a value; the end of a line ends one too
    pub separator: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            storage: StorageSettings::default(),
            log_level: "info".to_string(),
            auth: AuthSettings::default(),
            password: PasswordSettings::default(),
            redaction: RedactionSettings::default(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data"),
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            auth_type: AuthType::BasicAuth,
            session_name: DEFAULT_SESSION_NAME.to_string(),
            session_duration_secs: 0,
            excluded_paths: vec![
                "/api/v1/status/".to_string(),
                "/api/v1/unauthorized/".to_string(),
                "/api/v1/forbidden/".to_string(),
                "/api/v1/users/".to_string(),
                "/api/v1/auth_session/login/".to_string(),
                "/api/v1/reset_password/".to_string(),
            ],
        }
    }
}

impl Default for PasswordSettings {
    fn default() -> Self {
        Self {
            log_n: scrypt::Params::RECOMMENDED_LOG_N,
            r: scrypt::Params::RECOMMENDED_R,
            p: scrypt::Params::RECOMMENDED_P,
        }
    }
}

impl Default for RedactionSettings {
    fn default() -> Self {
        Self {
            fields: ["email", "password", "session_id", "reset_token"]
                .map(String::from)
                .to_vec(),
            redaction: "***".to_string(),
            separator: " ".to_string(),
        }
    }
}

impl AuthSettings {
    /// Session lifetime, or `None` when sessions never expire
    pub fn session_ttl(&self) -> Option<chrono::Duration> {
        (self.session_duration_secs > 0)
            .then(|| chrono::Duration::seconds(self.session_duration_secs))
    }
}

impl Settings {
    /// Load settings from the default config file plus the environment
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load settings from `path` plus the environment.
    /// A missing file is not an error; defaults and env still apply.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings: Settings = Self::figment(path.as_ref())
            .extract()
            .with_context(|| format!("failed to load settings from {}", path.as_ref().display()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// The provider stack used by [`Settings::load_from`]
    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("SESSIONGATE_").split("__"))
            .merge(
                Env::raw()
                    .only(&["AUTH_TYPE", "SESSION_NAME", "SESSION_DURATION"])
                    .map(|key| {
                        if key == "SESSION_DURATION" {
                            "auth.session_duration_secs".into()
                        } else if key == "SESSION_NAME" {
                            "auth.session_name".into()
                        } else {
                            "auth.auth_type".into()
                        }
                    }),
            )
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if !VALID_LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            bail!("invalid log level: {}", self.log_level);
        }

        if self.auth.session_name.trim().is_empty() {
            bail!("session cookie name must not be empty");
        }

        if self
            .auth
            .session_name
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, ';' | '=' | ','))
        {
            bail!("invalid session cookie name: {}", self.auth.session_name);
        }

        if self.auth.excluded_paths.iter().any(|p| !p.starts_with('/')) {
            bail!("excluded paths must be absolute");
        }

        scrypt::Params::new(
            self.password.log_n,
            self.password.r,
            self.password.p,
            scrypt::Params::RECOMMENDED_LEN,
        )
        .map_err(|e| anyhow::anyhow!("invalid scrypt parameters: {e}"))?;

        if self.redaction.separator.is_empty() {
            bail!("redaction separator must not be empty");
        }

        if self.redaction.fields.iter().any(|f| f.trim().is_empty()) {
            bail!("redacted field names must not be empty");
        }

        Ok(())
    }

    /// Socket address the HTTP server binds to
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", self.server.host, self.server.port))
    }
}

/// Accept an integer or a string; anything that is not an integer is 0.
fn lenient_seconds<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Text(String),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Int(n) => n,
        Raw::Text(s) => s.trim().parse().unwrap_or(0),
    })
}
