//! Error types for XRPC client operations

use bytes::Bytes;
use http::{HeaderValue, StatusCode};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::session::SessionStoreError;
use crate::types::value::DataError;

/// Client error type wrapping all possible error conditions
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ClientError {
    /// The call could not be attempted at all
    #[error("{0}")]
    Preparation(
        #[from]
        #[diagnostic_source]
        PreparationError,
    ),

    /// HTTP transport error
    #[error("HTTP transport error: {0}")]
    Transport(
        #[from]
        #[diagnostic_source]
        TransportError,
    ),

    /// Authentication error
    #[error("Authentication error: {0}")]
    Auth(
        #[from]
        #[diagnostic_source]
        AuthError,
    ),

    /// Structured error returned by the service
    #[error("{0}")]
    Service(
        #[from]
        #[diagnostic_source]
        ServiceError,
    ),

    /// Response deserialization failed
    #[error("{0}")]
    Decode(
        #[from]
        #[diagnostic_source]
        DecodeError,
    ),
}

impl ClientError {
    /// True if the service rejected the credential used for this call.
    pub fn is_auth(&self) -> bool {
        matches!(self, ClientError::Auth(_))
    }
}

impl From<EncodeError> for ClientError {
    fn from(e: EncodeError) -> Self {
        ClientError::Preparation(PreparationError::Encode(e))
    }
}

impl From<SessionStoreError> for ClientError {
    fn from(e: SessionStoreError) -> Self {
        ClientError::Preparation(PreparationError::Store(e))
    }
}

impl From<HttpError> for ClientError {
    fn from(e: HttpError) -> Self {
        ClientError::Transport(TransportError::Http(e))
    }
}

/// Errors that prevent a request from being built or sent.
///
/// These are never retried.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum PreparationError {
    /// No active session to authenticate the call with
    #[error("No active session")]
    #[diagnostic(
        code(bobbin::prepare::no_session),
        help("log in or resume a stored session first")
    )]
    NoSession,

    /// The target URL could not be constructed
    #[error("Invalid request URL: {0}")]
    #[diagnostic(code(bobbin::prepare::url))]
    InvalidUrl(String),

    /// A header value was not valid
    #[error("Invalid header value: {0}")]
    #[diagnostic(code(bobbin::prepare::header))]
    InvalidHeader(String),

    /// Request parameters or body failed to encode
    #[error("{0}")]
    #[diagnostic(code(bobbin::prepare::encode))]
    Encode(#[from] EncodeError),

    /// Credential store failed while loading or saving tokens
    #[error("Credential store error: {0}")]
    #[diagnostic(code(bobbin::prepare::store))]
    Store(#[from] SessionStoreError),

    /// Other preparation error
    #[error("{0}")]
    #[diagnostic(code(bobbin::prepare::other))]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

/// Transport-level errors that occur during HTTP communication
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum TransportError {
    /// Failed to establish connection to server
    #[error("Connection error: {0}")]
    #[diagnostic(code(bobbin::transport::connect))]
    Connect(String),

    /// Request timed out
    #[error("Request timeout")]
    #[diagnostic(code(bobbin::transport::timeout))]
    Timeout,

    /// Request construction failed inside the transport
    #[error("Invalid request: {0}")]
    #[diagnostic(code(bobbin::transport::invalid_request))]
    InvalidRequest(String),

    /// Non-success response without a recognizable XRPC error body
    #[error("{0}")]
    #[diagnostic(code(bobbin::transport::http))]
    Http(#[from] HttpError),

    /// Other transport error
    #[error("Transport error: {0}")]
    #[diagnostic(code(bobbin::transport::other))]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

#[cfg(feature = "reqwest-client")]
impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::Connect(e.to_string())
        } else if e.is_builder() || e.is_request() {
            Self::InvalidRequest(e.to_string())
        } else {
            Self::Other(Box::new(e))
        }
    }
}

/// HTTP error response (non-2xx status without an XRPC error payload)
#[derive(Debug, Clone, thiserror::Error, miette::Diagnostic)]
pub struct HttpError {
    /// HTTP status code
    pub status: StatusCode,
    /// Response body if available
    pub body: Option<Bytes>,
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(body) = &self.body {
            if let Ok(s) = std::str::from_utf8(body) {
                if !s.is_empty() {
                    write!(f, ":\n{}", s)?;
                }
            }
        }
        Ok(())
    }
}

/// Authentication and authorization errors
#[derive(Debug, Clone, thiserror::Error, miette::Diagnostic)]
pub enum AuthError {
    /// Access token has expired (use refresh token to get a new one)
    #[error("Access token expired")]
    #[diagnostic(code(bobbin::auth::expired))]
    TokenExpired,

    /// Access token is invalid or malformed
    #[error("Invalid access token")]
    #[diagnostic(code(bobbin::auth::invalid))]
    InvalidToken,

    /// The refresh token was rejected; the session is gone
    #[error("Token refresh failed")]
    #[diagnostic(
        code(bobbin::auth::refresh_failed),
        help("the session has been cleared; log in again")
    )]
    RefreshFailed,

    /// Request requires authentication but none was accepted
    #[error("Not authenticated")]
    #[diagnostic(code(bobbin::auth::not_authenticated))]
    NotAuthenticated,

    /// 401 carrying a `WWW-Authenticate` challenge
    #[error("Authentication challenge: {0:?}")]
    #[diagnostic(code(bobbin::auth::challenge))]
    Other(HeaderValue),
}

/// Structured error returned by an XRPC service.
///
/// The `error` kind and `message` are carried verbatim from the response
/// body; the remaining fields are request context filled in by the client.
#[derive(Debug, Clone, Deserialize, Serialize, thiserror::Error, miette::Diagnostic)]
#[diagnostic(code(bobbin::service))]
pub struct ServiceError {
    /// Error kind (e.g. "InvalidRequest", "RateLimitExceeded")
    pub error: SmolStr,
    /// Optional human-readable message
    #[serde(default)]
    pub message: Option<SmolStr>,
    /// XRPC method NSID that produced this error (context only; not serialized)
    #[serde(skip)]
    pub nsid: &'static str,
    /// HTTP method used (context only; not serialized)
    #[serde(skip)]
    pub method: &'static str,
    /// HTTP status code (context only; not serialized)
    #[serde(skip)]
    pub http_status: StatusCode,
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(msg) = &self.message {
            write!(
                f,
                "{}: {} (nsid={}, method={}, status={})",
                self.error, msg, self.nsid, self.method, self.http_status
            )
        } else {
            write!(
                f,
                "{} (nsid={}, method={}, status={})",
                self.error, self.nsid, self.method, self.http_status
            )
        }
    }
}

/// Response and document deserialization errors
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum DecodeError {
    /// JSON deserialization failed
    #[error("Failed to deserialize JSON: {0}")]
    #[diagnostic(code(bobbin::decode::json))]
    Json(
        #[from]
        #[source]
        serde_json::Error,
    ),

    /// Projecting a [`Data`](crate::Data) value onto a typed shape failed
    #[error("Failed to decode data value: {0}")]
    #[diagnostic(code(bobbin::decode::data))]
    Data(
        #[from]
        #[source]
        DataError,
    ),

    /// A union document had no `$type` where one is required
    #[error("Missing `$type` discriminator for {expected}")]
    #[diagnostic(code(bobbin::decode::missing_discriminator))]
    MissingDiscriminator {
        /// Name of the union being decoded
        expected: &'static str,
    },

    /// A union document could not be dispatched on its discriminator
    #[error("Invalid discriminator for {expected}: {reason}")]
    #[diagnostic(code(bobbin::decode::invalid_discriminator))]
    InvalidDiscriminator {
        /// Name of the union being decoded
        expected: &'static str,
        /// What was wrong with it
        reason: SmolStr,
    },

    /// A known union variant had a malformed payload
    #[error("Malformed `{tag}` payload: {source}")]
    #[diagnostic(code(bobbin::decode::variant))]
    Variant {
        /// Discriminator of the variant that failed
        tag: SmolStr,
        /// Underlying failure
        #[source]
        source: Box<DecodeError>,
    },

    /// Other decoding error
    #[error("{0}")]
    #[diagnostic(code(bobbin::decode::other))]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

/// Error type for encoding XRPC requests and lexicon documents
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum EncodeError {
    /// Failed to serialize query parameters
    #[error("Failed to serialize query: {0}")]
    #[diagnostic(code(bobbin::encode::query))]
    Query(
        #[from]
        #[source]
        serde_html_form::ser::Error,
    ),
    /// Failed to serialize JSON body
    #[error("Failed to serialize JSON: {0}")]
    #[diagnostic(code(bobbin::encode::json))]
    Json(
        #[from]
        #[source]
        serde_json::Error,
    ),
    /// Failed to project a typed value into [`Data`](crate::Data)
    #[error("Failed to encode data value: {0}")]
    #[diagnostic(code(bobbin::encode::data))]
    Data(
        #[from]
        #[source]
        DataError,
    ),
    /// A union variant payload did not encode to a JSON object
    #[error("Union variant `{tag}` must encode to an object")]
    #[diagnostic(code(bobbin::encode::not_an_object))]
    NotAnObject {
        /// Discriminator of the offending variant
        tag: &'static str,
    },
    /// Other encoding error
    #[error("Encoding error: {0}")]
    #[diagnostic(code(bobbin::encode::other))]
    Other(String),
}

/// Result type for client operations
pub type XrpcResult<T> = std::result::Result<T, ClientError>;
