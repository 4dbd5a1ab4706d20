//! Typed bindings for the AT Protocol endpoints and records bobbin works with.
//!
//! Each endpoint input implements [`XrpcRequest`](bobbin_common::xrpc::XrpcRequest),
//! so it can be sent through any XRPC client. Records implement
//! [`Collection`](bobbin_common::types::Collection). Union-typed fields are
//! open unions and keep variants this crate does not know about.

#[cfg(feature = "app_bsky")]
pub mod app_bsky;

#[cfg(feature = "com_atproto")]
pub mod com_atproto;
