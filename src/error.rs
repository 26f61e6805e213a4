//! Error types for client operations.

use crate::model::ErrorResponse;
use thiserror::Error;

/// Errors that can occur while talking to the Java2UML server.
#[derive(Error, Debug)]
pub enum ClientError {
    /// A project-scoped operation ran before any archive was uploaded.
    #[error("no project uploaded: call upload() before {operation}()")]
    NoProject {
        /// Name of the operation that needed a project
        operation: &'static str,
    },

    /// The server accepted the request but has not finished computing the
    /// resource yet (HTTP 202).
    #[error("resource not ready: {path} answered 202 Accepted")]
    NotReady { path: String },

    /// The server answered with a status of 400 or above.
    #[error("HTTP {status} from {path}{}", reason_suffix(.detail))]
    Http {
        status: u16,
        path: String,
        /// Error body sent by the server, when it could be parsed
        detail: Option<ErrorResponse>,
    },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("request timed out")]
    Timeout,

    /// The response body did not have the shape expected for the resource.
    #[error("malformed {resource} response: {message}")]
    Malformed {
        resource: &'static str,
        message: String,
    },

    #[error(transparent)]
    Link(#[from] LinkError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Errors extracting an id from a hypermedia link.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    #[error("link {rel:?} is missing")]
    Missing { rel: String },
    #[error("link {rel:?} ({href}) does not end with a numeric id")]
    InvalidId { rel: String, href: String },
}

fn reason_suffix(detail: &Option<ErrorResponse>) -> String {
    match detail {
        Some(d) if !d.reason.is_empty() => format!(": {}", d.reason),
        _ => String::new(),
    }
}

impl ClientError {
    /// Whether this error means "try again later" (HTTP 202).
    pub fn is_not_ready(&self) -> bool {
        matches!(self, ClientError::NotReady { .. })
    }

    /// Whether this error was raised before any request was sent.
    pub fn is_precondition(&self) -> bool {
        matches!(self, ClientError::NoProject { .. })
    }

    /// HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::NotReady { .. } => Some(202),
            ClientError::Http { status, .. } => Some(*status),
            ClientError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Server-provided error detail, if the failing response carried one.
    pub fn error_response(&self) -> Option<&ErrorResponse> {
        match self {
            ClientError::Http { detail, .. } => detail.as_ref(),
            _ => None,
        }
    }

    pub(crate) fn malformed(resource: &'static str, err: impl std::fmt::Display) -> Self {
        ClientError::Malformed {
            resource,
            message: err.to_string(),
        }
    }
}
