use std::sync::Arc;

use bobbin_api::com_atproto::server::{
    create_session::CreateSession, delete_session::DeleteSession, get_session::GetSession,
    refresh_session::RefreshSession,
};
use bobbin_common::{
    AuthorizationToken,
    error::{AuthError, ClientError, DecodeError, PreparationError, TransportError, XrpcResult},
    http_client::HttpClient,
    session::CredentialStore,
    xrpc::{CallOptions, QueryParams, XrpcClient, XrpcExt, XrpcMethod, XrpcRequest},
};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use serde::de::DeserializeOwned;
use smol_str::SmolStr;
use tokio::sync::{Mutex, RwLock};
use url::Url;

use crate::client::{AtpSession, ClientOptions, SessionInfo, SessionState};

type RefreshFuture = Shared<BoxFuture<'static, Result<SmolStr, RefreshError>>>;

/// Outcome of a shared refresh, cloned out to every waiter.
#[derive(Debug, Clone, thiserror::Error)]
enum RefreshError {
    #[error("refresh token rejected")]
    Rejected,
    #[error("no stored credentials")]
    NoSession,
    #[error("{0}")]
    Failed(Arc<ClientError>),
    #[error("refresh task aborted")]
    Aborted,
}

impl From<RefreshError> for ClientError {
    fn from(e: RefreshError) -> Self {
        match e {
            RefreshError::Rejected => ClientError::Auth(AuthError::RefreshFailed),
            RefreshError::NoSession => ClientError::Preparation(PreparationError::NoSession),
            RefreshError::Failed(shared) => unshare(shared),
            RefreshError::Aborted => ClientError::Transport(TransportError::Other(Box::new(e))),
        }
    }
}

/// One waiter's copy of a shared refresh failure, in the same category.
fn unshare(shared: Arc<ClientError>) -> ClientError {
    let shared = match Arc::try_unwrap(shared) {
        Ok(e) => return e,
        Err(shared) => shared,
    };
    match &*shared {
        ClientError::Auth(e) => ClientError::Auth(e.clone()),
        ClientError::Service(e) => ClientError::Service(e.clone()),
        ClientError::Transport(TransportError::Timeout) => TransportError::Timeout.into(),
        ClientError::Transport(TransportError::Connect(msg)) => {
            TransportError::Connect(msg.clone()).into()
        }
        ClientError::Transport(TransportError::InvalidRequest(msg)) => {
            TransportError::InvalidRequest(msg.clone()).into()
        }
        ClientError::Transport(TransportError::Http(e)) => TransportError::Http(e.clone()).into(),
        ClientError::Transport(TransportError::Other(_)) => {
            TransportError::Other(Box::new(shared)).into()
        }
        ClientError::Preparation(PreparationError::NoSession) => PreparationError::NoSession.into(),
        ClientError::Preparation(PreparationError::InvalidUrl(msg)) => {
            PreparationError::InvalidUrl(msg.clone()).into()
        }
        ClientError::Preparation(PreparationError::InvalidHeader(msg)) => {
            PreparationError::InvalidHeader(msg.clone()).into()
        }
        ClientError::Preparation(_) => PreparationError::Other(Box::new(shared)).into(),
        ClientError::Decode(_) => DecodeError::Other(Box::new(shared)).into(),
    }
}

/// Stateful client for app-password sessions.
///
/// - Tokens live in a pluggable [`CredentialStore`]; identity and endpoint in
///   [`SessionState`].
/// - Expired access tokens are refreshed before a call is sent, and a call the
///   service rejects is retried once after a forced refresh.
/// - Concurrent callers that need a refresh share one `refreshSession`
///   exchange, since the refresh token is single-use.
///
/// Cloning is cheap and clones share all state.
pub struct CredentialSession<S, T> {
    store: Arc<S>,
    client: Arc<T>,
    options: ClientOptions,
    state: Arc<RwLock<SessionState>>,
    refresh_slot: Arc<Mutex<Option<RefreshFuture>>>,
}

impl<S, T> Clone for CredentialSession<S, T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            client: self.client.clone(),
            options: self.options.clone(),
            state: self.state.clone(),
            refresh_slot: self.refresh_slot.clone(),
        }
    }
}

impl<S, T> CredentialSession<S, T> {
    /// Create an unauthenticated session over the given store and transport.
    pub fn new(store: Arc<S>, client: Arc<T>) -> Self {
        Self {
            store,
            client,
            options: ClientOptions::default(),
            state: Arc::new(RwLock::new(SessionState::Unauthenticated)),
            refresh_slot: Arc::new(Mutex::new(None)),
        }
    }

    /// Replace the client options.
    pub fn with_options(self, options: ClientOptions) -> Self {
        Self { options, ..self }
    }

    /// Client options in effect.
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// The credential store backing this session.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Snapshot of the lifecycle state.
    pub async fn state(&self) -> SessionState {
        self.state.read().await.clone()
    }

    /// True while logged in or resumed.
    pub async fn is_authenticated(&self) -> bool {
        matches!(*self.state.read().await, SessionState::Active(_))
    }

    /// Identity of the active session.
    pub async fn session_info(&self) -> Option<SessionInfo> {
        self.state.read().await.info().cloned()
    }

    /// Base URL of the active session.
    pub async fn endpoint(&self) -> Option<Url> {
        self.state.read().await.info().map(|info| info.endpoint.clone())
    }

    async fn set_state(&self, state: SessionState) {
        *self.state.write().await = state;
    }
}

impl<S, T> CredentialSession<S, T>
where
    S: CredentialStore + 'static,
    T: HttpClient + Send + Sync + 'static,
{
    /// Create a session with `com.atproto.server.createSession`.
    ///
    /// The request goes to [`ClientOptions::service`]. If the response carries
    /// a DID document naming a PDS, later calls go there instead.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "info", skip(self, password, auth_factor_token))
    )]
    pub async fn login(
        &self,
        identifier: &str,
        password: &str,
        auth_factor_token: Option<&str>,
    ) -> XrpcResult<SessionInfo> {
        let service = Url::parse(&self.options.service)
            .map_err(|e| PreparationError::InvalidUrl(format!("{}: {e}", self.options.service)))?;
        let request = CreateSession::new()
            .identifier(identifier)
            .password(password)
            .maybe_auth_factor_token(auth_factor_token)
            .build();

        let output = self
            .client
            .xrpc(service.clone())
            .with_options(self.options.call_options())
            .send(&request)
            .await?;
        let session = AtpSession::from(output);
        let endpoint = session.pds_endpoint().unwrap_or(service);

        self.store.store(session.credentials()).await?;
        let info = session.info(endpoint);
        self.set_state(SessionState::Active(Arc::new(info.clone()))).await;

        #[cfg(feature = "tracing")]
        tracing::info!(did = %info.did, endpoint = %info.endpoint, "session created");
        Ok(info)
    }

    /// Pick up a session whose tokens are already in the store.
    ///
    /// Nothing is sent; the tokens are checked on the first call.
    pub async fn resume(&self, info: SessionInfo) -> XrpcResult<()> {
        if self.store.load().await?.is_none() {
            return Err(ClientError::Auth(AuthError::NotAuthenticated));
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(did = %info.did, endpoint = %info.endpoint, "session resumed");
        self.set_state(SessionState::Active(Arc::new(info))).await;
        Ok(())
    }

    /// Re-read the account state with `com.atproto.server.getSession`.
    pub async fn refresh_identity(&self) -> XrpcResult<SessionInfo> {
        let output = self.send(&GetSession).await?;
        let mut state = self.state.write().await;
        let SessionState::Active(info) = &mut *state else {
            return Err(PreparationError::NoSession.into());
        };
        let mut updated = (**info).clone();
        updated.update_from(&output);
        *info = Arc::new(updated.clone());
        Ok(updated)
    }

    /// End the session.
    ///
    /// `deleteSession` is attempted with the refresh token, but local state
    /// is cleared whether or not the service accepts it.
    pub async fn logout(&self) -> XrpcResult<()> {
        let endpoint = self.endpoint().await;
        let refresh = self.store.refresh_token().await?;
        if let (Some(endpoint), Some(refresh)) = (endpoint, refresh) {
            let mut opts = self.options.call_options();
            opts.auth = Some(AuthorizationToken::Bearer(refresh));
            let deleted = self
                .client
                .xrpc(endpoint)
                .with_options(opts)
                .send(&DeleteSession)
                .await;
            if let Err(e) = deleted {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %e, "deleteSession failed, clearing local session anyway");
                #[cfg(not(feature = "tracing"))]
                let _ = e;
            }
        }
        self.store.clear().await?;
        self.set_state(SessionState::Unauthenticated).await;
        Ok(())
    }

    /// True if there is no access token or it is past its expiry (minus the
    /// configured leeway). Opaque tokens with no readable expiry count as valid.
    pub async fn is_expired(&self) -> XrpcResult<bool> {
        Ok(match self.store.load().await? {
            Some(credentials) => credentials.is_expired(self.options.refresh_leeway),
            None => true,
        })
    }

    /// A usable access token, refreshing first if the stored one has expired.
    pub async fn ensure_valid(&self) -> XrpcResult<SmolStr> {
        let credentials = self
            .store
            .load()
            .await?
            .ok_or(PreparationError::NoSession)?;
        if !self.options.auto_refresh || !credentials.is_expired(self.options.refresh_leeway) {
            return Ok(credentials.access_jwt);
        }
        self.refresh_from(&credentials.access_jwt).await
    }

    /// Exchange the refresh token for a new token pair now.
    ///
    /// Joins a refresh already in flight instead of starting another.
    pub async fn refresh(&self) -> XrpcResult<SmolStr> {
        let current = self
            .store
            .access_token()
            .await?
            .ok_or(PreparationError::NoSession)?;
        self.refresh_from(&current).await
    }

    /// Refresh, unless the stored access token is no longer `stale`.
    async fn refresh_from(&self, stale: &str) -> XrpcResult<SmolStr> {
        let pending = {
            let mut slot = self.refresh_slot.lock().await;
            if let Some(in_flight) = slot.clone() {
                #[cfg(feature = "tracing")]
                tracing::trace!("joining in-flight session refresh");
                in_flight
            } else {
                let credentials = self
                    .store
                    .load()
                    .await?
                    .ok_or(PreparationError::NoSession)?;
                if credentials.access_jwt != stale {
                    // Someone else already rotated the tokens.
                    return Ok(credentials.access_jwt);
                }
                let refresh = self.spawn_refresh(credentials.refresh_jwt).shared();
                *slot = Some(refresh.clone());
                refresh
            }
        };
        Ok(pending.await?)
    }

    /// Run the exchange on its own task, so a waiter going away does not
    /// cancel it for the others.
    fn spawn_refresh(
        &self,
        refresh_jwt: SmolStr,
    ) -> BoxFuture<'static, Result<SmolStr, RefreshError>> {
        let store = self.store.clone();
        let client = self.client.clone();
        let state = self.state.clone();
        let slot = self.refresh_slot.clone();
        let opts = self.options.call_options();
        let refresh = async move {
            let outcome = run_refresh(&*store, &*client, &state, opts, refresh_jwt).await;
            *slot.lock().await = None;
            outcome
        };
        #[cfg(feature = "tracing")]
        let refresh =
            tracing::Instrument::instrument(refresh, tracing::debug_span!("refresh_session"));
        let task = tokio::spawn(refresh);
        async move { task.await.unwrap_or(Err(RefreshError::Aborted)) }.boxed()
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            level = "debug",
            skip(self, method, params, body, opts),
            fields(method = method.as_str())
        )
    )]
    async fn execute_inner<O>(
        &self,
        method: XrpcMethod,
        nsid: &'static str,
        params: QueryParams,
        body: Option<Vec<u8>>,
        mut opts: CallOptions,
    ) -> XrpcResult<O>
    where
        O: DeserializeOwned + Send,
    {
        let endpoint = self.endpoint().await.ok_or(PreparationError::NoSession)?;
        let token = self.ensure_valid().await?;

        opts.timeout.get_or_insert(self.options.timeout);
        if opts.user_agent.is_none() {
            opts.user_agent = Some(self.options.user_agent.clone());
        }
        opts.auth = Some(AuthorizationToken::Bearer(token.clone()));

        let first = self
            .client
            .xrpc(endpoint.clone())
            .with_options(opts.clone())
            .execute(method, nsid, &params, body.clone())
            .await;

        match first {
            Err(ClientError::Auth(_e)) if self.options.auto_refresh => {
                #[cfg(feature = "tracing")]
                tracing::debug!(error = %_e, "access token rejected, refreshing and retrying once");
                let fresh = self.refresh_from(&token).await?;
                opts.auth = Some(AuthorizationToken::Bearer(fresh));
                self.client
                    .xrpc(endpoint)
                    .with_options(opts)
                    .execute(method, nsid, &params, body)
                    .await
            }
            other => other,
        }
    }
}

async fn run_refresh<S, T>(
    store: &S,
    client: &T,
    state: &RwLock<SessionState>,
    mut opts: CallOptions,
    refresh_jwt: SmolStr,
) -> Result<SmolStr, RefreshError>
where
    S: CredentialStore,
    T: HttpClient + Sync,
{
    let endpoint = match state.read().await.info() {
        Some(info) => info.endpoint.clone(),
        None => return Err(RefreshError::NoSession),
    };
    opts.auth = Some(AuthorizationToken::Bearer(refresh_jwt));

    match client
        .xrpc(endpoint)
        .with_options(opts)
        .send(&RefreshSession)
        .await
    {
        Ok(output) => {
            let session = AtpSession::from(output);
            let credentials = session.credentials();
            let _expires_at = credentials.expires_at;
            store
                .store(credentials)
                .await
                .map_err(|e| RefreshError::Failed(Arc::new(e.into())))?;
            if let SessionState::Active(info) = &mut *state.write().await {
                let mut updated = (**info).clone();
                updated.handle = session.handle.clone();
                updated.active = session.active;
                *info = Arc::new(updated);
            }
            #[cfg(feature = "tracing")]
            tracing::info!(did = %session.did, expires_at = ?_expires_at, "session refreshed");
            Ok(session.access_jwt)
        }
        Err(ClientError::Auth(_e)) => {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %_e, "refresh token rejected, ending session");
            if let Err(_e) = store.clear().await {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %_e, "failed to clear credential store");
            }
            *state.write().await = SessionState::Unauthenticated;
            Err(RefreshError::Rejected)
        }
        Err(e) => {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %e, "session refresh failed");
            Err(RefreshError::Failed(Arc::new(e)))
        }
    }
}

impl<S, T> XrpcClient for CredentialSession<S, T>
where
    S: CredentialStore + 'static,
    T: HttpClient + Send + Sync + 'static,
{
    async fn base_uri(&self) -> Option<Url> {
        self.endpoint().await
    }

    async fn execute<O>(
        &self,
        method: XrpcMethod,
        nsid: &'static str,
        params: QueryParams,
        body: Option<Vec<u8>>,
        opts: CallOptions,
    ) -> XrpcResult<O>
    where
        O: DeserializeOwned + Send,
    {
        self.execute_inner(method, nsid, params, body, opts).await
    }

    async fn send<R>(&self, request: &R) -> XrpcResult<R::Output>
    where
        R: XrpcRequest + Sync,
        R::Output: Send,
    {
        self.send_with_opts(request, CallOptions::default()).await
    }

    async fn send_with_opts<R>(&self, request: &R, opts: CallOptions) -> XrpcResult<R::Output>
    where
        R: XrpcRequest + Sync,
        R::Output: Send,
    {
        let params = request.query_params();
        let body = request.encode_body()?;
        self.execute_inner(R::METHOD, R::NSID, params, body, opts)
            .await
    }
}
