use thiserror::Error;

/// Everything that can go wrong during a poll cycle, plus startup
/// configuration failures.
///
/// Only `Config` is fatal: it is raised before the loop starts and aborts the
/// process. The rest are caught at the loop boundary, logged and skipped.
/// `Messaging` never even reaches the loop boundary — a notification that
/// fails to send is logged at the dispatch site and dropped.
#[derive(Debug, Error)]
pub enum Error {
    #[error("ошибка конфигурации: {0}")]
    Config(String),

    #[error("ошибка при запросе к эндпоинту: {endpoint}")]
    Fetch { endpoint: String },

    #[error("неверная структура ответа: {0}")]
    Structure(String),

    #[error("отсутствует ключ \"{0}\"")]
    MissingField(&'static str),

    #[error("неизвестный статус работы: {0}")]
    UnknownVerdict(String),

    #[error("ошибка при отправке сообщения: {0}")]
    Messaging(#[from] teloxide::RequestError),
}

pub type Result<T> = std::result::Result<T, Error>;
