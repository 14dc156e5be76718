use std::time::Duration;

use chrono::Utc;
use teloxide::prelude::*;
use teloxide::types::ChatId;
use tracing::{debug, error, info};

use crate::api_client::{check_response, ApiClient};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::verdicts::parse_status;

// Интервал повторного запроса к API. Фиксированный: без backoff и jitter.
pub const RETRY_PERIOD: Duration = Duration::from_secs(600);

// Окно просмотра назад от текущего момента: 3 недели. Пересчитывается от
// текущего времени на каждом цикле, не от времени прошлого опроса.
pub const PAST_TIMESTAMP: i64 = 3 * 7 * 24 * 60 * 60;

/// Single-slot memoization of the last status a notification went out for.
/// Owned by the poll loop; lost on restart.
#[derive(Debug, Default)]
pub struct PollState {
    last_status: String,
}

impl PollState {
    /// Records `status` and reports whether it differs from the last one.
    /// An unchanged status produces no notification.
    pub fn observe(&mut self, status: &str) -> bool {
        if self.last_status == status {
            false
        } else {
            self.last_status = status.to_string();
            true
        }
    }
}

/// What a finished cycle decided: dispatch the new message, stay quiet on an
/// unchanged status, or skip after a caught error.
#[derive(Debug, PartialEq, Eq)]
enum CycleOutcome {
    Dispatch(String),
    Unchanged,
    Skipped,
}

/// The polling loop. Never returns: every per-cycle error is caught at this
/// boundary, logged and followed by the same fixed sleep as a successful
/// cycle.
pub async fn run(bot: Bot, config: Config) -> Result<()> {
    let api_client = ApiClient::new(config.practicum_token.clone(), config.http_timeout)?;
    let chat_id = ChatId(config.telegram_chat_id);
    let mut state = PollState::default();

    info!("Запуск цикла опроса...");

    loop {
        if let CycleOutcome::Dispatch(message) =
            evaluate_cycle(poll_once(&api_client).await, &mut state)
        {
            send_message(&bot, chat_id, &message).await;
        }

        tokio::time::sleep(RETRY_PERIOD).await;
    }
}

/// The loop-level error boundary plus the changed-status comparison. A failed
/// cycle is logged and dispatches nothing; the last-known status is only
/// advanced by a successful cycle.
fn evaluate_cycle(result: Result<(String, String)>, state: &mut PollState) -> CycleOutcome {
    match result {
        Ok((status, message)) => {
            if state.observe(&status) {
                CycleOutcome::Dispatch(message)
            } else {
                debug!("Статус состояния не изменился.");
                CycleOutcome::Unchanged
            }
        }
        Err(error) => {
            error!("Сбой в работе программы: {error}");
            CycleOutcome::Skipped
        }
    }
}

/// One cycle: fetch, validate, take the first record, build the message.
async fn poll_once(api_client: &ApiClient) -> Result<(String, String)> {
    let from_date = Utc::now().timestamp() - PAST_TIMESTAMP;
    let response = api_client.get_homework_statuses(from_date).await?;
    let homeworks = check_response(&response)?;
    parse_status(&homeworks[0])
}

/// Sends the notification. A transport failure is logged and swallowed: the
/// message is not retried and the error never reaches the loop boundary.
async fn send_message(bot: &Bot, chat_id: ChatId, message: &str) {
    match bot.send_message(chat_id, message).await {
        Ok(_) => debug!("Отправлено сообщение: {message}"),
        Err(e) => {
            let err = Error::Messaging(e);
            error!("{err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_observation_notifies() {
        let mut state = PollState::default();
        assert!(state.observe("approved"));
    }

    #[test]
    fn repeated_status_does_not_notify() {
        let mut state = PollState::default();
        assert!(state.observe("reviewing"));
        assert!(!state.observe("reviewing"));
        assert!(!state.observe("reviewing"));
    }

    #[test]
    fn changed_status_notifies_again() {
        let mut state = PollState::default();
        assert!(state.observe("reviewing"));
        assert!(state.observe("approved"));
        assert!(!state.observe("approved"));
    }

    #[test]
    fn failed_cycle_is_skipped_and_leaves_state_alone() {
        let mut state = PollState::default();
        assert!(state.observe("reviewing"));

        let fetch_err = Err(Error::Fetch {
            endpoint: crate::api_client::ENDPOINT.to_string(),
        });
        assert_eq!(evaluate_cycle(fetch_err, &mut state), CycleOutcome::Skipped);

        // Состояние не тронуто: следующий успешный цикл сравнивается с
        // последним успешным, а не с ошибкой.
        let ok = Ok(("approved".to_string(), "msg".to_string()));
        assert_eq!(
            evaluate_cycle(ok, &mut state),
            CycleOutcome::Dispatch("msg".to_string())
        );
    }

    #[test]
    fn unchanged_status_cycle_dispatches_nothing() {
        let mut state = PollState::default();
        let cycle = || Ok(("rejected".to_string(), "msg".to_string()));
        assert_eq!(
            evaluate_cycle(cycle(), &mut state),
            CycleOutcome::Dispatch("msg".to_string())
        );
        assert_eq!(evaluate_cycle(cycle(), &mut state), CycleOutcome::Unchanged);
    }

    #[test]
    fn successful_cycle_produces_one_message_and_updates_state() {
        let body = json!({
            "homeworks": [{"status": "approved", "homework_name": "hw1"}],
            "current_date": 1700000000,
        });
        let homeworks = check_response(&body).unwrap();
        let (status, message) = parse_status(&homeworks[0]).unwrap();

        let mut state = PollState::default();
        assert!(state.observe(&status));
        assert_eq!(
            message,
            "Изменился статус проверки работы \"hw1\". \
             Работа проверена: ревьюеру всё понравилось. Ура!"
        );

        // Тот же статус во втором цикле — без повторной отправки.
        assert!(!state.observe(&status));
    }
}
