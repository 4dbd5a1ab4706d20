//! # bobbin
//!
//! An AT Protocol client runtime.
//!
//! - A lossless [`Data`] value for records and fields the client has no type for
//! - Open unions that keep variants they do not recognize, and write them back unchanged
//! - App-password sessions that refresh themselves, with concurrent refreshes
//!   coalesced into one
//! - A single error type, [`ClientError`], split by what went wrong
//!
//! ## Example
//!
//! Log in, then fetch the latest posts of an account.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use bobbin::api::app_bsky::feed::get_author_feed::GetAuthorFeed;
//! use bobbin::client::{ClientOptions, CredentialSession};
//! use bobbin::session::MemoryCredentialStore;
//! use bobbin::xrpc::XrpcClient;
//! use miette::IntoDiagnostic;
//!
//! #[tokio::main]
//! async fn main() -> miette::Result<()> {
//!     let session = CredentialSession::new(
//!         Arc::new(MemoryCredentialStore::default()),
//!         Arc::new(reqwest::Client::new()),
//!     )
//!     .with_options(ClientOptions::builder().service("https://bsky.social").build());
//!
//!     let me = session.login("alice.bsky.social", "app-password", None).await?;
//!     println!("logged in as {} ({})", me.handle, me.did);
//!
//!     let feed = session
//!         .send(&GetAuthorFeed::new().actor(me.did.clone()).limit(5).build())
//!         .await?;
//!     for item in &feed.feed {
//!         println!(
//!             "{}",
//!             serde_json::to_string_pretty(&item.post.record).into_diagnostic()?
//!         );
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

/// Credential sessions and the authenticated request pipeline
pub mod client;

/// Typed endpoint and record bindings
pub use bobbin_api as api;
pub use bobbin_common::*;

#[cfg(feature = "derive")]
/// if enabled, reexport the attribute macros
pub use bobbin_derive::*;
