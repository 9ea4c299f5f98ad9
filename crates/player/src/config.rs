//! Client configuration from the environment.

use std::path::Path;
use std::time::Duration;

use thiserror::Error;
use url::Url;
use wolfpack_domain::{GameId, LocalSession, PlayerId};

use crate::application::auto_pass::DEFAULT_AUTO_PASS_DELAY;
use crate::application::sync::DEFAULT_POLL_INTERVAL;
use crate::infrastructure::http_client::{DEFAULT_REQUEST_TIMEOUT, DEFAULT_SERVER_URL};
use crate::ui::Locale;

pub const SERVER_URL_VAR: &str = "WOLFPACK_SERVER_URL";
pub const WS_URL_VAR: &str = "WOLFPACK_WS_URL";
pub const GAME_ID_VAR: &str = "WOLFPACK_GAME_ID";
pub const PLAYER_ID_VAR: &str = "WOLFPACK_PLAYER_ID";
pub const ALL_AI_VAR: &str = "WOLFPACK_ALL_AI";
pub const LOCALE_VAR: &str = "WOLFPACK_LOCALE";
pub const REQUEST_TIMEOUT_VAR: &str = "WOLFPACK_REQUEST_TIMEOUT_MS";
pub const POLL_INTERVAL_VAR: &str = "WOLFPACK_POLL_INTERVAL_MS";
pub const AUTO_PASS_DELAY_VAR: &str = "WOLFPACK_AUTO_PASS_DELAY_MS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("invalid {var}={value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(var: &'static str, value: &str, reason: impl ToString) -> Self {
        Self::Invalid {
            var,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub server_url: String,
    pub ws_url: String,
    pub game_id: GameId,
    pub player_id: PlayerId,
    pub all_ai: bool,
    pub locale: Locale,
    pub request_timeout: Duration,
    /// `None` turns scheduled refresh off.
    pub poll_interval: Option<Duration>,
    pub auto_pass_delay: Duration,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let server_url = get(SERVER_URL_VAR).unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
        let server_url = server_url.trim_end_matches('/').to_string();
        let ws_url = match get(WS_URL_VAR) {
            Some(url) => {
                Url::parse(&url).map_err(|e| ConfigError::invalid(WS_URL_VAR, &url, e))?;
                url
            }
            None => derive_ws_url(&server_url)?,
        };

        let raw_game_id = get(GAME_ID_VAR).ok_or(ConfigError::Missing(GAME_ID_VAR))?;
        let game_id =
            GameId::new(&*raw_game_id).map_err(|e| ConfigError::invalid(GAME_ID_VAR, &raw_game_id, e))?;

        let player_id = match get(PLAYER_ID_VAR) {
            Some(raw) => raw
                .parse::<PlayerId>()
                .map_err(|e| ConfigError::invalid(PLAYER_ID_VAR, &raw, e))?,
            None => PlayerId::new(1).map_err(|e| ConfigError::invalid(PLAYER_ID_VAR, "1", e))?,
        };

        let all_ai = match get(ALL_AI_VAR) {
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                ConfigError::invalid(ALL_AI_VAR, &raw, "expected true/false")
            })?,
            None => false,
        };

        let locale = match get(LOCALE_VAR) {
            Some(raw) => raw
                .parse::<Locale>()
                .map_err(|e| ConfigError::invalid(LOCALE_VAR, &raw, e))?,
            None => Locale::default(),
        };

        let request_timeout = match get(REQUEST_TIMEOUT_VAR) {
            Some(raw) => {
                let ms = parse_millis(REQUEST_TIMEOUT_VAR, &raw)?;
                if ms.is_zero() {
                    return Err(ConfigError::invalid(
                        REQUEST_TIMEOUT_VAR,
                        &raw,
                        "must be greater than zero",
                    ));
                }
                ms
            }
            None => DEFAULT_REQUEST_TIMEOUT,
        };

        let poll_interval = match get(POLL_INTERVAL_VAR) {
            Some(raw) => Some(parse_millis(POLL_INTERVAL_VAR, &raw)?).filter(|d| !d.is_zero()),
            None => Some(DEFAULT_POLL_INTERVAL),
        };

        let auto_pass_delay = match get(AUTO_PASS_DELAY_VAR) {
            Some(raw) => parse_millis(AUTO_PASS_DELAY_VAR, &raw)?,
            None => DEFAULT_AUTO_PASS_DELAY,
        };

        Ok(Self {
            server_url,
            ws_url,
            game_id,
            player_id,
            all_ai,
            locale,
            request_timeout,
            poll_interval,
            auto_pass_delay,
        })
    }

    pub fn session(&self) -> LocalSession {
        LocalSession::new(self.player_id, self.all_ai)
    }
}

/// `http://host:port/...` becomes `ws://host:port/ws`, https becomes wss.
fn derive_ws_url(server_url: &str) -> Result<String, ConfigError> {
    let mut url =
        Url::parse(server_url).map_err(|e| ConfigError::invalid(SERVER_URL_VAR, server_url, e))?;
    let scheme = match url.scheme() {
        "https" => "wss",
        "http" => "ws",
        other => {
            return Err(ConfigError::invalid(
                SERVER_URL_VAR,
                server_url,
                format!("unsupported scheme {other}"),
            ))
        }
    };
    url.set_scheme(scheme)
        .map_err(|_| ConfigError::invalid(SERVER_URL_VAR, server_url, "cannot derive ws url"))?;
    url.set_path("/ws");
    url.set_query(None);
    Ok(url.to_string())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_millis(var: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    raw.parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|e| ConfigError::invalid(var, raw, e))
}

/// Load `.env.local` then `.env` from the repository root, if present.
/// Variables already set in the process environment win.
pub fn load_dotenv_from_repo_root() {
    let repo_root = Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
