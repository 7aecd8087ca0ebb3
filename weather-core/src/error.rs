use thiserror::Error;

/// Failure talking to the weather provider.
///
/// Every variant is reported to callers as "upstream unavailable"; the cause is
/// kept so logs and tests can tell them apart.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("{endpoint} request timed out")]
    Timeout {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} request failed with status {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: u16,
        body: String,
    },

    #[error("failed to reach {endpoint} endpoint")]
    Connection {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to parse {endpoint} response")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{endpoint} response contained an invalid value: {reason}")]
    Invalid {
        endpoint: &'static str,
        reason: String,
    },
}

impl UpstreamError {
    /// Classify a transport error from `reqwest`.
    pub fn transport(endpoint: &'static str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            UpstreamError::Timeout { endpoint, source }
        } else {
            UpstreamError::Connection { endpoint, source }
        }
    }
}

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("{0}")]
    NotFound(String),

    #[error("Upstream weather provider unavailable: {0}")]
    UpstreamUnavailable(#[from] UpstreamError),

    #[error("Override store error: {0}")]
    Store(#[from] sqlx::Error),
}

/// Coarse classification of [`WeatherError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    UpstreamUnavailable,
    Store,
}

impl WeatherError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        WeatherError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        WeatherError::NotFound(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            WeatherError::Validation { .. } => ErrorKind::Validation,
            WeatherError::NotFound(_) => ErrorKind::NotFound,
            WeatherError::UpstreamUnavailable(_) => ErrorKind::UpstreamUnavailable,
            WeatherError::Store(_) => ErrorKind::Store,
        }
    }
}

pub type Result<T, E = WeatherError> = std::result::Result<T, E>;
