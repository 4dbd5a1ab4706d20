//! Session types and client configuration.
//!
//! [`CredentialSession`] is the stateful client: it logs in with an app
//! password, keeps the tokens in a [`CredentialStore`](bobbin_common::session::CredentialStore),
//! and runs every call through the authenticated pipeline.

/// App-password sessions with coalesced token refresh.
pub mod credential_session;

pub use credential_session::CredentialSession;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use bobbin_api::com_atproto::server::{
    create_session::CreateSessionOutput, get_session::GetSessionOutput,
    refresh_session::RefreshSessionOutput,
};
use bobbin_common::session::StoredCredentials;
use bobbin_common::types::value::Data;
use bobbin_common::xrpc::CallOptions;
use bon::Builder;
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use url::Url;

/// Entryway used for `createSession` when nothing else is configured.
pub const DEFAULT_SERVICE: &str = "https://bsky.social";

/// `User-Agent` sent when nothing else is configured.
pub const DEFAULT_USER_AGENT: &str = concat!("bobbin/", env!("CARGO_PKG_VERSION"));

/// Client-wide defaults.
///
/// ```
/// use std::time::Duration;
/// use bobbin::client::ClientOptions;
///
/// let options = ClientOptions::builder()
///     .timeout(Duration::from_secs(10))
///     .service("https://pds.example.com")
///     .build();
/// assert!(options.auto_refresh);
/// ```
#[derive(Debug, Clone, Builder)]
pub struct ClientOptions {
    /// Timeout applied to calls that do not set their own.
    #[builder(default = Duration::from_secs(30))]
    pub timeout: Duration,
    /// Refresh when the access token expires within this window.
    #[builder(default = TimeDelta::zero())]
    pub refresh_leeway: TimeDelta,
    /// Refresh expired tokens and retry rejected calls once.
    #[builder(default = true)]
    pub auto_refresh: bool,
    /// `User-Agent` header value.
    #[builder(into, default = SmolStr::new_static(DEFAULT_USER_AGENT))]
    pub user_agent: SmolStr,
    /// Service `createSession` is sent to. Calls move to the account's PDS
    /// once login reports one.
    #[builder(into, default = SmolStr::new_static(DEFAULT_SERVICE))]
    pub service: SmolStr,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ClientOptions {
    /// Per-call options carrying these defaults, without authorization.
    pub fn call_options(&self) -> CallOptions {
        CallOptions {
            timeout: Some(self.timeout),
            user_agent: Some(self.user_agent.clone()),
            ..CallOptions::default()
        }
    }
}

/// Who the session belongs to and where its calls go.
///
/// Holds no credentials, so it can be persisted next to a
/// [`CredentialStore`](bobbin_common::session::CredentialStore) and handed to
/// [`CredentialSession::resume`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    /// Account DID
    pub did: SmolStr,
    /// Account handle
    pub handle: SmolStr,
    /// Base URL calls are sent to
    pub endpoint: Url,
    /// Account email, if the service shared it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<SmolStr>,
    /// False if the account is deactivated or taken down
    #[serde(default = "active_by_default")]
    pub active: bool,
}

fn active_by_default() -> bool {
    true
}

/// Tokens and identity returned by `createSession` or `refreshSession`.
#[derive(Clone, PartialEq)]
pub struct AtpSession {
    /// Access token (JWT)
    pub access_jwt: SmolStr,
    /// Refresh token (JWT)
    pub refresh_jwt: SmolStr,
    /// Account DID
    pub did: SmolStr,
    /// Account handle
    pub handle: SmolStr,
    /// Account email, if present
    pub email: Option<SmolStr>,
    /// Whether the account is active
    pub active: bool,
    /// DID document, if the service included one
    pub did_doc: Option<Data>,
}

impl fmt::Debug for AtpSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AtpSession")
            .field("access_jwt", &"<redacted>")
            .field("refresh_jwt", &"<redacted>")
            .field("did", &self.did)
            .field("handle", &self.handle)
            .field("email", &self.email)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

impl AtpSession {
    /// The token pair, with the expiry read from the access token.
    pub fn credentials(&self) -> StoredCredentials {
        StoredCredentials::new(self.access_jwt.clone(), self.refresh_jwt.clone())
    }

    /// Identity of this session, bound to `endpoint`.
    pub fn info(&self, endpoint: Url) -> SessionInfo {
        SessionInfo {
            did: self.did.clone(),
            handle: self.handle.clone(),
            endpoint,
            email: self.email.clone(),
            active: self.active,
        }
    }

    /// PDS named by the DID document, if there is one.
    pub fn pds_endpoint(&self) -> Option<Url> {
        self.did_doc.as_ref().and_then(pds_endpoint)
    }
}

impl From<CreateSessionOutput> for AtpSession {
    fn from(output: CreateSessionOutput) -> Self {
        Self {
            access_jwt: output.access_jwt,
            refresh_jwt: output.refresh_jwt,
            did: output.did,
            handle: output.handle,
            email: output.email,
            active: output.active.unwrap_or(true),
            did_doc: output.did_doc,
        }
    }
}

impl From<RefreshSessionOutput> for AtpSession {
    fn from(output: RefreshSessionOutput) -> Self {
        Self {
            access_jwt: output.access_jwt,
            refresh_jwt: output.refresh_jwt,
            did: output.did,
            handle: output.handle,
            email: None,
            active: output.active.unwrap_or(true),
            did_doc: output.did_doc,
        }
    }
}

impl SessionInfo {
    /// Apply what `getSession` reports about the account.
    pub fn update_from(&mut self, output: &GetSessionOutput) {
        self.handle = output.handle.clone();
        self.active = output.active.unwrap_or(true);
        if output.email.is_some() {
            self.email = output.email.clone();
        }
        if let Some(pds) = output.did_doc.as_ref().and_then(pds_endpoint) {
            self.endpoint = pds;
        }
    }
}

/// Where a [`CredentialSession`] is in its lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    /// No session; calls fail with `PreparationError::NoSession`.
    #[default]
    Unauthenticated,
    /// Logged in or resumed.
    Active(Arc<SessionInfo>),
}

impl SessionState {
    /// The active session's identity.
    pub fn info(&self) -> Option<&SessionInfo> {
        match self {
            SessionState::Active(info) => Some(info),
            SessionState::Unauthenticated => None,
        }
    }
}

/// The `AtprotoPersonalDataServer` endpoint of a DID document.
///
/// `serviceEndpoint` may be a URL string or an object with a `url` field.
pub fn pds_endpoint(did_doc: &Data) -> Option<Url> {
    did_doc.get("service")?.as_array()?.iter().find_map(|service| {
        if service.get("type")?.as_str()? != "AtprotoPersonalDataServer" {
            return None;
        }
        match service.get("serviceEndpoint")? {
            Data::String(url) => Url::parse(url).ok(),
            Data::Object(obj) => Url::parse(obj.get("url")?.as_str()?).ok(),
            _ => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(service: serde_json::Value) -> Data {
        Data::from(serde_json::json!({
            "id": "did:plc:alice",
            "service": service,
        }))
    }

    #[test]
    fn pds_endpoint_from_string_or_object() {
        let plain = doc(serde_json::json!([
            {"id": "#atproto_labeler", "type": "AtprotoLabeler", "serviceEndpoint": "https://labeler.example"},
            {"id": "#atproto_pds", "type": "AtprotoPersonalDataServer", "serviceEndpoint": "https://pds.example"}
        ]));
        assert_eq!(
            pds_endpoint(&plain).map(|u| u.to_string()),
            Some("https://pds.example/".to_owned())
        );

        let structured = doc(serde_json::json!([
            {"type": "AtprotoPersonalDataServer", "serviceEndpoint": {"url": "https://pds2.example"}}
        ]));
        assert_eq!(
            pds_endpoint(&structured).map(|u| u.to_string()),
            Some("https://pds2.example/".to_owned())
        );

        assert_eq!(pds_endpoint(&doc(serde_json::json!([]))), None);
        assert_eq!(pds_endpoint(&Data::Null), None);
    }

    #[test]
    fn options_defaults() {
        let options = ClientOptions::default();
        assert_eq!(options.timeout, Duration::from_secs(30));
        assert_eq!(options.refresh_leeway, TimeDelta::zero());
        assert!(options.auto_refresh);
        assert!(options.user_agent.starts_with("bobbin/"));
        assert_eq!(options.service, DEFAULT_SERVICE);

        let call = options.call_options();
        assert_eq!(call.timeout, Some(Duration::from_secs(30)));
        assert!(call.auth.is_none());
    }

    #[test]
    fn session_debug_redacts_tokens() {
        let session = AtpSession {
            access_jwt: "secret-access".into(),
            refresh_jwt: "secret-refresh".into(),
            did: "did:plc:alice".into(),
            handle: "alice.test".into(),
            email: None,
            active: true,
            did_doc: None,
        };
        let rendered = format!("{session:?}");
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("did:plc:alice"));
    }

    #[test]
    fn session_info_serializes_camel_case() {
        let info = SessionInfo {
            did: "did:plc:alice".into(),
            handle: "alice.test".into(),
            endpoint: Url::parse("https://pds.example").unwrap(),
            email: None,
            active: true,
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "did": "did:plc:alice",
                "handle": "alice.test",
                "endpoint": "https://pds.example/",
                "active": true
            })
        );
        let back: SessionInfo = serde_json::from_value(json).unwrap();
        assert_eq!(back, info);
    }
}
