use std::env;
use std::time::Duration;

use tracing::{debug, error};

use crate::error::{Error, Result};

/// Request timeout for the polling call when HTTP_TIMEOUT_SECS is not set.
/// The original relied on the transport default; here it is explicit.
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub practicum_token: String,
    pub telegram_token: String,
    pub telegram_chat_id: i64,
    pub http_timeout: Duration,
}

impl Config {
    /// Loads and checks the required environment variables. Called once,
    /// before the poll loop; a failure here is the only fatal error.
    pub fn from_env() -> Result<Self> {
        Self::build(
            env::var("PRACTICUM_TOKEN").ok(),
            env::var("TELEGRAM_TOKEN").ok(),
            env::var("TELEGRAM_CHAT_ID").ok(),
            env::var("HTTP_TIMEOUT_SECS").ok(),
        )
    }

    fn build(
        practicum_token: Option<String>,
        telegram_token: Option<String>,
        telegram_chat_id: Option<String>,
        http_timeout_secs: Option<String>,
    ) -> Result<Self> {
        let practicum_token = require("PRACTICUM_TOKEN", practicum_token)?;
        let telegram_token = require("TELEGRAM_TOKEN", telegram_token)?;
        let chat_id_raw = require("TELEGRAM_CHAT_ID", telegram_chat_id)?;

        let telegram_chat_id = chat_id_raw.parse::<i64>().map_err(|_| {
            let err = Error::Config(format!(
                "TELEGRAM_CHAT_ID не является числом: {chat_id_raw}"
            ));
            error!("{err}");
            err
        })?;

        let timeout_secs = match http_timeout_secs {
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                let err = Error::Config(format!("HTTP_TIMEOUT_SECS не является числом: {raw}"));
                error!("{err}");
                err
            })?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        debug!("Обязательные переменные окружения обнаружены");

        Ok(Self {
            practicum_token,
            telegram_token,
            telegram_chat_id,
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn require(name: &str, value: Option<String>) -> Result<String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => {
            let err = Error::Config(format!(
                "отсутствует обязательная переменная окружения {name}"
            ));
            error!("{err}");
            Err(err)
        }
    }
}
