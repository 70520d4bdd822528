use std::fmt;

/// Outcome of an asynchronous operation, as published to the presentation layer
///
/// The variant set is closed on purpose: consumers match it exhaustively, so a
/// new variant breaks every view that forgot to render it.
///
/// - [`Idle`](ResultState::Idle): nothing started yet, or reset after a result was consumed
/// - [`Loading`](ResultState::Loading): a call is in flight
/// - [`Success`](ResultState::Success): a well-formed, present payload
/// - [`NoDataFound`](ResultState::NoDataFound): success without a payload
/// - [`Failed`](ResultState::Failed): rejected request or unexpected failure
/// - [`InternetError`](ResultState::InternetError): the server was never reached
/// - [`InternalServerError`](ResultState::InternalServerError): a 5xx answer
#[derive(Debug, Clone, PartialEq)]
pub enum ResultState<T> {
    Idle,
    Loading,
    Success(T),
    NoDataFound,
    Failed(String),
    InternetError,
    InternalServerError(String),
}

impl<T> Default for ResultState<T> {
    fn default() -> Self {
        ResultState::Idle
    }
}

impl<T> ResultState<T> {
    pub fn is_idle(&self) -> bool {
        matches!(self, ResultState::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ResultState::Loading)
    }

    /// Every variant except `Idle` and `Loading`
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ResultState::Idle | ResultState::Loading)
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            ResultState::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn into_success(self) -> Option<T> {
        match self {
            ResultState::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn map<U, F>(self, f: F) -> ResultState<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            ResultState::Idle => ResultState::Idle,
            ResultState::Loading => ResultState::Loading,
            ResultState::Success(data) => ResultState::Success(f(data)),
            ResultState::NoDataFound => ResultState::NoDataFound,
            ResultState::Failed(msg) => ResultState::Failed(msg),
            ResultState::InternetError => ResultState::InternetError,
            ResultState::InternalServerError(msg) => ResultState::InternalServerError(msg),
        }
    }

    /// Server and connectivity failures are worth retrying as-is;
    /// a `Failed` request needs correcting first.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ResultState::InternetError | ResultState::InternalServerError(_)
        )
    }

    /// Text for a toast or inline error, `None` for non-failure states
    pub fn user_message(&self) -> Option<String> {
        match self {
            ResultState::Idle | ResultState::Loading | ResultState::Success(_) => None,
            ResultState::NoDataFound => Some("No data found.".to_string()),
            ResultState::Failed(msg) => Some(msg.clone()),
            ResultState::InternetError => {
                Some("Please check your internet connection and try again.".to_string())
            }
            ResultState::InternalServerError(msg) => {
                Some(format!("{}. Please try again later.", msg))
            }
        }
    }
}

impl<T> fmt::Display for ResultState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultState::Idle => write!(f, "idle"),
            ResultState::Loading => write!(f, "loading"),
            ResultState::Success(_) => write!(f, "success"),
            ResultState::NoDataFound => write!(f, "no data found"),
            ResultState::Failed(msg) => write!(f, "failed: {}", msg),
            ResultState::InternetError => write!(f, "internet error"),
            ResultState::InternalServerError(msg) => write!(f, "internal server error: {}", msg),
        }
    }
}
