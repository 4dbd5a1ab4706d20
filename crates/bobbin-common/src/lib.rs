//! Common types for the bobbin AT Protocol client runtime.
//!
//! This crate holds everything that does not need a live session: the
//! [`Data`](types::value::Data) value model, the open-union lexicon codec,
//! bounded record fields, the error taxonomy, the HTTP transport abstraction
//! and the stateless XRPC request/response plumbing.

#![warn(missing_docs)]
pub use smol_str;
pub use url;

#[doc(hidden)]
pub use indexmap;
#[doc(hidden)]
pub use serde;

pub mod error;
/// HTTP client abstraction used by bobbin crates.
pub mod http_client;
/// Credential storage traits and backends.
pub mod session;
/// Baseline AT Protocol data types and the lexicon codec runtime.
pub mod types;
pub mod xrpc;

pub use error::{
    AuthError, ClientError, DecodeError, EncodeError, PreparationError, ServiceError,
    TransportError, XrpcResult,
};
pub use types::value::{Array, Data, Object};

use smol_str::SmolStr;

/// Authorization token types for XRPC requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationToken {
    /// Bearer token (access JWT, or refresh JWT when refreshing the session)
    Bearer(SmolStr),
}

impl AuthorizationToken {
    /// Render the token as an `Authorization` header value.
    pub fn header_value(&self) -> String {
        match self {
            AuthorizationToken::Bearer(token) => format!("Bearer {token}"),
        }
    }
}
