use std::time::Duration;

use serde_json::Value;
use tracing::{error, info};

use crate::error::{Error, Result};

/// Homework-status query service of Yandex Practicum.
pub const ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";

pub struct ApiClient {
    token: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(token: String, timeout: Duration) -> Result<Self> {
        // Builder failure happens before the loop starts, so it is fatal,
        // like any other startup configuration problem.
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                let err = Error::Config(format!("не удалось создать HTTP-клиент: {e}"));
                error!("{err}");
                err
            })?;
        Ok(Self { token, client })
    }

    /// Fetches homework statuses changed since `from_date` (Unix seconds).
    /// Any transport failure or non-200 status is a `Fetch` error naming the
    /// endpoint; the body is returned as raw JSON and validated separately.
    pub async fn get_homework_statuses(&self, from_date: i64) -> Result<Value> {
        let fetch_error = || {
            let err = Error::Fetch {
                endpoint: ENDPOINT.to_string(),
            };
            error!("{err}");
            err
        };

        let response = self
            .client
            .get(ENDPOINT)
            .header("Authorization", format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .send()
            .await
            .map_err(|_| fetch_error())?;

        if response.status() != reqwest::StatusCode::OK {
            return Err(fetch_error());
        }

        info!("Ответ API от Яндекс.Домашка получен.");
        let body: Value = response.json().await.map_err(|_| fetch_error())?;
        info!("{body}");
        Ok(body)
    }
}

/// Checks the response shape and returns the validated homeworks list.
///
/// Only the first element is inspected: the tracked account has at most one
/// active submission, so the rest of the list is never consumed.
pub fn check_response(response: &Value) -> Result<&Vec<Value>> {
    let structure_error = |reason: &str| {
        let err = Error::Structure(reason.to_string());
        error!("{err}");
        err
    };

    let object = response
        .as_object()
        .ok_or_else(|| structure_error("тело ответа не является объектом"))?;
    let homeworks = object
        .get("homeworks")
        .ok_or_else(|| structure_error("нет ключа \"homeworks\""))?
        .as_array()
        .ok_or_else(|| structure_error("\"homeworks\" не является списком"))?;
    let first = homeworks
        .first()
        .ok_or_else(|| structure_error("список \"homeworks\" пуст"))?;
    if first.get("status").is_none() {
        return Err(structure_error("нет ключа \"status\""));
    }
    if first.get("homework_name").is_none() {
        return Err(structure_error("нет ключа \"homework_name\""));
    }

    info!("Проверка ответа API прошла успешно.");
    Ok(homeworks)
}
