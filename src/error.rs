use reqwest::StatusCode;
use std::fmt;

/// Result alias used throughout the SDK.
pub type Result<T> = std::result::Result<T, QalpuchError>;

/// The closed set of API failure kinds, derived from the HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 400
    BadRequest,
    /// 401
    Unauthorized,
    /// 403
    Forbidden,
    /// 404
    NotFound,
    /// 500
    InternalServerError,
    /// Any other status.
    Unknown,
}

impl ErrorKind {
    /// Classifies a raw HTTP status code.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => ErrorKind::BadRequest,
            401 => ErrorKind::Unauthorized,
            403 => ErrorKind::Forbidden,
            404 => ErrorKind::NotFound,
            500 => ErrorKind::InternalServerError,
            _ => ErrorKind::Unknown,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ErrorKind::BadRequest => "bad request",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::NotFound => "not found",
            ErrorKind::InternalServerError => "internal server error",
            ErrorKind::Unknown => "an unknown API error occurred",
        };
        f.write_str(text)
    }
}

/// An error reported by the API itself, as opposed to the transport.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("API error (status {status}): {message}")]
pub struct ApiError {
    /// The HTTP status code of the response.
    pub status: u16,
    /// The best available human-readable reason.
    pub message: String,
    /// The classification of `status`.
    pub kind: ErrorKind,
}

impl ApiError {
    /// Builds an API error and classifies it from its status code.
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            kind: ErrorKind::from_status(status),
        }
    }

    /// Builds an API error when the response body could not be read,
    /// using the status code's standard reason phrase as the message.
    pub fn from_status(status: u16) -> Self {
        let message = StatusCode::from_u16(status)
            .ok()
            .and_then(|code| code.canonical_reason())
            .unwrap_or("Unknown Status")
            .to_string();
        Self::new(status, message)
    }
}

/// Represents the possible errors that can occur when using the Qalpuch SDK.
#[derive(Debug, thiserror::Error)]
pub enum QalpuchError {
    /// No base URL was given, either directly or via `QALPUCH_BASE_URL`.
    #[error("Base URL is missing. Please provide it or set the QALPUCH_BASE_URL environment variable.")]
    MissingBaseUrl,
    /// The request never produced a response: connection refused, DNS failure, timeout.
    #[error("Network request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The caller's cancellation token fired while the request was in flight.
    #[error("Request was cancelled")]
    Cancelled,
    /// The request body could not be serialized; nothing was sent.
    #[error("Failed to encode request body for {method} {path}: {source}")]
    Encode {
        method: String,
        path: String,
        #[source]
        source: serde_json::Error,
    },
    /// A successful response did not carry a readable envelope.
    #[error("Failed to parse API response for {method} {path}: {source}")]
    MalformedResponse {
        method: String,
        path: String,
        #[source]
        source: serde_json::Error,
    },
    /// The envelope's `data` does not match the shape the caller asked for.
    #[error("Failed to decode response data for {method} {path}: {source}")]
    Decode {
        method: String,
        path: String,
        #[source]
        source: serde_json::Error,
    },
    /// A typed result was expected but the envelope carried no `data`.
    #[error("API response for {method} {path} carried no data")]
    MissingData { method: String, path: String },
    /// A multipart part was given a content type that does not parse.
    #[error("Invalid content type for upload part: {0}")]
    InvalidContentType(#[source] reqwest::Error),
    /// The API answered with `success: false` or a non-2xx status.
    #[error(transparent)]
    Api(#[from] ApiError),
    /// `execute` was called on a task builder without any configuration.
    #[error("task configuration is incomplete. Please call one of with_video_config, with_image_config or with_audio_config")]
    IncompleteConfig,
    /// A task configuration violated one of its field constraints.
    #[error("invalid task configuration: {0}")]
    InvalidConfig(String),
    #[error("URL parsing failed: {0}")]
    UrlParseFailed(#[from] url::ParseError),
    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl QalpuchError {
    /// The API error kind, if this is an API-level failure.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            QalpuchError::Api(api) => Some(api.kind),
            _ => None,
        }
    }

    /// The HTTP status code, if this is an API-level failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            QalpuchError::Api(api) => Some(api.status),
            _ => None,
        }
    }

    pub fn is_kind(&self, kind: ErrorKind) -> bool {
        self.kind() == Some(kind)
    }

    /// Typically the signal to refresh the session token and retry once.
    pub fn is_unauthorized(&self) -> bool {
        self.is_kind(ErrorKind::Unauthorized)
    }

    pub fn is_not_found(&self) -> bool {
        self.is_kind(ErrorKind::NotFound)
    }

    /// True for connection, DNS and timeout failures.
    pub fn is_transport(&self) -> bool {
        matches!(self, QalpuchError::Transport(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, QalpuchError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_known_statuses() {
        assert_eq!(ErrorKind::from_status(400), ErrorKind::BadRequest);
        assert_eq!(ErrorKind::from_status(401), ErrorKind::Unauthorized);
        assert_eq!(ErrorKind::from_status(403), ErrorKind::Forbidden);
        assert_eq!(ErrorKind::from_status(404), ErrorKind::NotFound);
        assert_eq!(ErrorKind::from_status(500), ErrorKind::InternalServerError);
    }

    #[test]
    fn everything_else_is_unknown() {
        for status in [200, 201, 302, 409, 422, 429, 502, 503] {
            assert_eq!(ErrorKind::from_status(status), ErrorKind::Unknown);
        }
    }

    #[test]
    fn unreadable_body_falls_back_to_reason_phrase() {
        let err = ApiError::from_status(404);
        assert_eq!(err.message, "Not Found");
        assert_eq!(err.kind, ErrorKind::NotFound);

        let err = ApiError::from_status(503);
        assert_eq!(err.message, "Service Unavailable");
        assert_eq!(err.kind, ErrorKind::Unknown);
    }

    #[test]
    fn kind_is_testable_without_matching_messages() {
        let err = QalpuchError::from(ApiError::new(401, "token expired"));
        assert!(err.is_unauthorized());
        assert!(!err.is_not_found());
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.to_string(), "API error (status 401): token expired");

        assert_eq!(QalpuchError::Cancelled.kind(), None);
    }
}
