//! Credential storage for password-based (`createSession`) sessions.
//!
//! The session layer never persists tokens itself. It reads and writes them
//! through a [`CredentialStore`], so applications can keep them in a keychain,
//! a database, or, for development, a JSON file.

use async_trait::async_trait;
use base64::Engine;
use base64::prelude::BASE64_URL_SAFE_NO_PAD;
use chrono::{DateTime, TimeDelta, Utc};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::error::Error as StdError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Errors emitted by credential stores.
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum SessionStoreError {
    /// Filesystem or I/O error
    #[error("I/O error: {0}")]
    #[diagnostic(code(bobbin::session_store::io))]
    Io(#[from] std::io::Error),
    /// Serialization error (e.g., JSON)
    #[error("serialization error: {0}")]
    #[diagnostic(code(bobbin::session_store::serde))]
    Serde(#[from] serde_json::Error),
    /// Any other error from a backend implementation
    #[error(transparent)]
    #[diagnostic(code(bobbin::session_store::other))]
    Other(#[from] Box<dyn StdError + Send + Sync>),
}

/// Access and refresh tokens for one account, plus the access token's expiry.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredCredentials {
    /// Short-lived access JWT
    pub access_jwt: SmolStr,
    /// Long-lived, single-use refresh JWT
    pub refresh_jwt: SmolStr,
    /// When the access token stops being accepted, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl StoredCredentials {
    /// Bundle a token pair, reading the expiry from the access token's `exp` claim.
    pub fn new(access_jwt: impl Into<SmolStr>, refresh_jwt: impl Into<SmolStr>) -> Self {
        let access_jwt = access_jwt.into();
        let expires_at = jwt_expiry(&access_jwt);
        Self {
            access_jwt,
            refresh_jwt: refresh_jwt.into(),
            expires_at,
        }
    }

    /// Bundle a token pair with an explicit expiry.
    pub fn with_expiry(
        access_jwt: impl Into<SmolStr>,
        refresh_jwt: impl Into<SmolStr>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            access_jwt: access_jwt.into(),
            refresh_jwt: refresh_jwt.into(),
            expires_at,
        }
    }

    /// Whether the access token is expired at `now`, counting `leeway` early.
    ///
    /// Tokens without a known expiry are never considered expired here; the
    /// server rejecting them is the only signal.
    pub fn is_expired_at(&self, now: DateTime<Utc>, leeway: TimeDelta) -> bool {
        match self.expires_at {
            Some(expires_at) => match now.checked_add_signed(leeway) {
                Some(deadline) => expires_at <= deadline,
                // Past the end of representable time.
                None => leeway > TimeDelta::zero(),
            },
            None => false,
        }
    }

    /// [`is_expired_at`](Self::is_expired_at) against the current time.
    pub fn is_expired(&self, leeway: TimeDelta) -> bool {
        self.is_expired_at(Utc::now(), leeway)
    }
}

impl fmt::Debug for StoredCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredCredentials")
            .field("access_jwt", &"<redacted>")
            .field("refresh_jwt", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Read the `exp` claim of a JWT without verifying it.
///
/// Returns `None` for opaque tokens or tokens without `exp`.
pub fn jwt_expiry(token: &str) -> Option<DateTime<Utc>> {
    #[derive(Deserialize)]
    struct Claims {
        exp: Option<f64>,
    }

    let payload = token.split('.').nth(1)?;
    let bytes = BASE64_URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .ok()?;
    let claims: Claims = serde_json::from_slice(&bytes).ok()?;
    DateTime::from_timestamp(claims.exp?.trunc() as i64, 0)
}

/// Pluggable storage for the credentials of the current session.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Load the stored credentials, if any.
    async fn load(&self) -> Result<Option<StoredCredentials>, SessionStoreError>;

    /// Persist a new credential set, replacing the old one.
    async fn store(&self, credentials: StoredCredentials) -> Result<(), SessionStoreError>;

    /// Forget the stored credentials.
    async fn clear(&self) -> Result<(), SessionStoreError>;

    /// The current access token, if any.
    async fn access_token(&self) -> Result<Option<SmolStr>, SessionStoreError> {
        Ok(self.load().await?.map(|c| c.access_jwt))
    }

    /// The current refresh token, if any.
    async fn refresh_token(&self) -> Result<Option<SmolStr>, SessionStoreError> {
        Ok(self.load().await?.map(|c| c.refresh_jwt))
    }
}

/// In-memory credential store suitable for short-lived sessions and tests.
#[derive(Clone, Default)]
pub struct MemoryCredentialStore(Arc<RwLock<Option<StoredCredentials>>>);

impl MemoryCredentialStore {
    /// Create a store already holding `credentials`.
    pub fn with_credentials(credentials: StoredCredentials) -> Self {
        Self(Arc::new(RwLock::new(Some(credentials))))
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn load(&self) -> Result<Option<StoredCredentials>, SessionStoreError> {
        Ok(self.0.read().await.clone())
    }

    async fn store(&self, credentials: StoredCredentials) -> Result<(), SessionStoreError> {
        *self.0.write().await = Some(credentials);
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionStoreError> {
        *self.0.write().await = None;
        Ok(())
    }
}

/// File-backed credential store using a JSON file.
///
/// NOT secure, only suitable for development.
///
/// Example
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use bobbin_common::session::{CredentialStore, FileCredentialStore};
///
/// let store = FileCredentialStore::new("/tmp/bobbin-session.json");
/// let creds = store.load().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct FileCredentialStore {
    /// Path to the JSON file.
    pub path: PathBuf,
}

impl FileCredentialStore {
    /// Create a file credential store at the given path. Nothing is touched
    /// on disk until the first write.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn load(&self) -> Result<Option<StoredCredentials>, SessionStoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn store(&self, credentials: StoredCredentials) -> Result<(), SessionStoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        // Write then rename, so a crash never leaves a half-written file.
        let tmp = self.temp_path();
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(&credentials)?).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionStoreError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt_with_claims(claims: serde_json::Value) -> String {
        let header = BASE64_URL_SAFE_NO_PAD.encode(br#"{"alg":"ES256K","typ":"at+jwt"}"#);
        let payload = BASE64_URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap());
        format!("{header}.{payload}.c2ln")
    }

    #[test]
    fn expiry_comes_from_exp_claim() {
        let token = jwt_with_claims(serde_json::json!({"sub": "did:plc:abc", "exp": 1_700_000_000}));
        let creds = StoredCredentials::new(token, "refresh");
        assert_eq!(
            creds.expires_at,
            DateTime::from_timestamp(1_700_000_000, 0)
        );
    }

    #[test]
    fn opaque_tokens_have_no_expiry() {
        assert_eq!(jwt_expiry("not-a-jwt"), None);
        assert_eq!(jwt_expiry("a.%%%.c"), None);
        assert_eq!(jwt_expiry(&jwt_with_claims(serde_json::json!({"sub": "x"}))), None);

        let creds = StoredCredentials::new("opaque", "refresh");
        assert!(!creds.is_expired(TimeDelta::zero()));
    }

    #[test]
    fn expiry_boundaries() {
        let exp = DateTime::from_timestamp(1_000, 0).unwrap();
        let creds = StoredCredentials::with_expiry("a", "r", Some(exp));
        let zero = TimeDelta::zero();

        assert!(!creds.is_expired_at(exp - TimeDelta::seconds(1), zero));
        assert!(creds.is_expired_at(exp, zero));
        assert!(creds.is_expired_at(exp + TimeDelta::seconds(1), zero));
        // Leeway pulls the refresh point earlier.
        assert!(creds.is_expired_at(exp - TimeDelta::seconds(30), TimeDelta::seconds(60)));
    }

    #[test]
    fn extreme_leeway_does_not_overflow() {
        let exp = DateTime::from_timestamp(1_000, 0).unwrap();
        let creds = StoredCredentials::with_expiry("a", "r", Some(exp));

        assert!(creds.is_expired_at(exp - TimeDelta::days(365), TimeDelta::MAX));
        assert!(!creds.is_expired_at(exp, TimeDelta::MIN));
        assert!(creds.is_expired(TimeDelta::MAX));
    }

    #[test]
    fn debug_does_not_leak_tokens() {
        let creds = StoredCredentials::new("secret-access", "secret-refresh");
        let rendered = format!("{creds:?}");
        assert!(!rendered.contains("secret"));
    }

    #[tokio::test]
    async fn memory_store_round_trip() {
        let store = MemoryCredentialStore::default();
        assert!(store.load().await.unwrap().is_none());

        store
            .store(StoredCredentials::new("access-1", "refresh-1"))
            .await
            .unwrap();
        assert_eq!(store.access_token().await.unwrap().as_deref(), Some("access-1"));
        assert_eq!(store.refresh_token().await.unwrap().as_deref(), Some("refresh-1"));

        store.clear().await.unwrap();
        assert!(store.access_token().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");
        let store = FileCredentialStore::new(&path);

        assert!(store.load().await.unwrap().is_none());
        store.clear().await.unwrap();

        let exp = DateTime::from_timestamp(2_000_000_000, 0);
        let creds = StoredCredentials::with_expiry("access", "refresh", exp);
        store.store(creds.clone()).await.unwrap();
        assert!(path.exists());
        assert!(!store.temp_path().exists());

        let reopened = FileCredentialStore::new(&path);
        assert_eq!(reopened.load().await.unwrap(), Some(creds));

        let on_disk: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(on_disk["accessJwt"], "access");
        assert_eq!(on_disk["refreshJwt"], "refresh");

        reopened.clear().await.unwrap();
        assert!(!path.exists());
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn file_store_reports_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, b"{not json").unwrap();

        let store = FileCredentialStore::new(&path);
        assert!(matches!(
            store.load().await,
            Err(SessionStoreError::Serde(_))
        ));
    }
}
