use serde_json::Value;
use tracing::{error, info};

use crate::error::{Error, Result};

/// Review verdicts the API is known to emit. Anything else is an error, not a
/// silent passthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Approved,
    Reviewing,
    Rejected,
}

impl Verdict {
    pub fn from_status(status: &str) -> Option<Self> {
        match status {
            "approved" => Some(Self::Approved),
            "reviewing" => Some(Self::Reviewing),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            Self::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            Self::Reviewing => "Работа взята на проверку ревьюером.",
            Self::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

/// Extracts the status from a homework record and builds the notification
/// text. Returns the raw status string alongside the message so the caller
/// can compare it against the last-known one.
pub fn parse_status(homework: &Value) -> Result<(String, String)> {
    let homework_name = string_field(homework, "homework_name")?;
    let status = string_field(homework, "status")?;

    let verdict = Verdict::from_status(status).ok_or_else(|| {
        let err = Error::UnknownVerdict(status.to_string());
        error!("{err}");
        err
    })?;

    let message = format!(
        "Изменился статус проверки работы \"{homework_name}\". {}",
        verdict.text()
    );
    info!("{message}");
    Ok((status.to_string(), message))
}

/// An absent key and a present-but-non-string value are different defects
/// and get different errors.
fn string_field<'a>(homework: &'a Value, key: &'static str) -> Result<&'a str> {
    let value = homework.get(key).ok_or_else(|| {
        let err = Error::MissingField(key);
        error!("{err}");
        err
    })?;
    value.as_str().ok_or_else(|| {
        let err = Error::Structure(format!("\"{key}\" не является строкой"));
        error!("{err}");
        err
    })
}
