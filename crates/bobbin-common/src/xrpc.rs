//! Stateless XRPC plumbing: building requests for an endpoint, sending them
//! over an [`HttpClient`], and classifying responses into the error taxonomy.
//!
//! Anything that needs a session (attaching the current access token,
//! refreshing it) lives in the `bobbin` crate on top of this module.

pub mod params;

pub use params::{Bound, QueryParams};

use bytes::Bytes;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT, WWW_AUTHENTICATE};
use http::{HeaderName, HeaderValue, Request, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use smol_str::SmolStr;
use std::future::Future;
use std::time::Duration;
use url::Url;

use crate::AuthorizationToken;
use crate::error::{
    AuthError, ClientError, DecodeError, EncodeError, HttpError, PreparationError, ServiceError,
    TransportError, XrpcResult,
};
use crate::http_client::HttpClient;
use crate::types::value::Data;

/// Media type of every JSON request and response body.
pub const JSON_ENCODING: &str = "application/json";

/// XRPC method type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XrpcMethod {
    /// Query (HTTP GET)
    Query,
    /// Procedure (HTTP POST) with the given body encoding
    Procedure(&'static str),
}

impl XrpcMethod {
    /// Get the HTTP method string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "GET",
            Self::Procedure(_) => "POST",
        }
    }

    /// Get the body encoding type for this method (procedures only)
    pub const fn body_encoding(&self) -> Option<&'static str> {
        match self {
            Self::Query => None,
            Self::Procedure(enc) => Some(enc),
        }
    }

    /// The matching [`http::Method`]
    pub fn http_method(&self) -> http::Method {
        match self {
            Self::Query => http::Method::GET,
            Self::Procedure(_) => http::Method::POST,
        }
    }
}

/// Trait for XRPC request types (queries and procedures)
///
/// Implemented on the endpoint's input type. Provides the NSID, the HTTP
/// method, how the input is put on the wire, and what the response decodes to.
pub trait XrpcRequest {
    /// The NSID for this XRPC method
    const NSID: &'static str;

    /// XRPC method (query/GET or procedure/POST)
    const METHOD: XrpcMethod;

    /// Response body type
    type Output: DeserializeOwned;

    /// Query parameters for this call.
    fn query_params(&self) -> QueryParams {
        QueryParams::new()
    }

    /// Request body for procedures. `None` sends an empty body.
    fn encode_body(&self) -> Result<Option<Vec<u8>>, EncodeError> {
        Ok(None)
    }
}

/// Encode a procedure input as a JSON body.
pub fn json_body<T: Serialize + ?Sized>(input: &T) -> Result<Option<Vec<u8>>, EncodeError> {
    Ok(Some(serde_json::to_vec(input)?))
}

/// Output of endpoints that return nothing useful.
///
/// Accepts an empty body, `null`, `{}` or anything else.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Empty;

impl<'de> Deserialize<'de> for Empty {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        serde::de::IgnoredAny::deserialize(deserializer)?;
        Ok(Empty)
    }
}

/// Per-request options for XRPC calls.
#[derive(Debug, Default, Clone)]
pub struct CallOptions {
    /// Optional Authorization to apply.
    pub auth: Option<AuthorizationToken>,
    /// `atproto-proxy` header value.
    pub atproto_proxy: Option<SmolStr>,
    /// `atproto-accept-labelers` header values.
    pub atproto_accept_labelers: Option<Vec<SmolStr>>,
    /// Extra headers to attach to this request.
    pub extra_headers: Vec<(HeaderName, HeaderValue)>,
    /// Give up on the request after this long.
    pub timeout: Option<Duration>,
    /// `User-Agent` header value.
    pub user_agent: Option<SmolStr>,
}

/// HTTP headers commonly used in XRPC requests
pub enum Header {
    /// Content-Type header
    ContentType,
    /// Authorization header
    Authorization,
    /// `atproto-proxy` header - asks the PDS to forward the request to another service.
    ///
    /// See: <https://atproto.com/specs/xrpc#service-proxying>
    AtprotoProxy,
    /// `atproto-accept-labelers` header - which labelers' labels to apply to the response.
    AtprotoAcceptLabelers,
}

impl From<Header> for HeaderName {
    fn from(value: Header) -> Self {
        match value {
            Header::ContentType => CONTENT_TYPE,
            Header::Authorization => AUTHORIZATION,
            Header::AtprotoProxy => HeaderName::from_static("atproto-proxy"),
            Header::AtprotoAcceptLabelers => HeaderName::from_static("atproto-accept-labelers"),
        }
    }
}

/// Extension for stateless XRPC calls on any `HttpClient`.
///
/// Example
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use bobbin_common::xrpc::XrpcExt;
///
/// let http = reqwest::Client::new();
/// let base = url::Url::parse("https://public.api.bsky.app")?;
/// // let output = http.xrpc(base).send(&request).await?;
/// # Ok(())
/// # }
/// ```
pub trait XrpcExt: HttpClient {
    /// Start building an XRPC call for the given base URL.
    fn xrpc(&self, base: Url) -> XrpcCall<'_, Self>
    where
        Self: Sized,
    {
        XrpcCall {
            client: self,
            base,
            opts: CallOptions::default(),
        }
    }
}

impl<T: HttpClient> XrpcExt for T {}

/// Stateful XRPC client: something that knows where to send calls and how to
/// authenticate them.
#[cfg_attr(not(target_arch = "wasm32"), trait_variant::make(Send))]
pub trait XrpcClient {
    /// Base URL calls are sent to, if one is known yet.
    fn base_uri(&self) -> impl Future<Output = Option<Url>>;

    /// Run one call given its raw parts, decoding the response as `O`.
    fn execute<O>(
        &self,
        method: XrpcMethod,
        nsid: &'static str,
        params: QueryParams,
        body: Option<Vec<u8>>,
        opts: CallOptions,
    ) -> impl Future<Output = XrpcResult<O>>
    where
        O: DeserializeOwned + Send;

    /// Send a typed request.
    fn send<R>(&self, request: &R) -> impl Future<Output = XrpcResult<R::Output>>
    where
        R: XrpcRequest + Sync,
        R::Output: Send;

    /// Send a typed request with per-call options.
    fn send_with_opts<R>(
        &self,
        request: &R,
        opts: CallOptions,
    ) -> impl Future<Output = XrpcResult<R::Output>>
    where
        R: XrpcRequest + Sync,
        R::Output: Send;
}

/// Stateless XRPC call builder.
///
/// Example (per-request overrides)
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use bobbin_common::xrpc::XrpcExt;
/// use bobbin_common::AuthorizationToken;
/// use std::time::Duration;
///
/// let http = reqwest::Client::new();
/// let base = url::Url::parse("https://public.api.bsky.app")?;
/// let call = http
///     .xrpc(base)
///     .auth(AuthorizationToken::Bearer("ACCESS_JWT".into()))
///     .accept_labelers(vec!["did:plc:labelerid".into()])
///     .timeout(Duration::from_secs(10));
/// // let output = call.send(&request).await?;
/// # Ok(())
/// # }
/// ```
pub struct XrpcCall<'a, C: HttpClient> {
    pub(crate) client: &'a C,
    pub(crate) base: Url,
    pub(crate) opts: CallOptions,
}

impl<'a, C: HttpClient> XrpcCall<'a, C> {
    /// Apply Authorization to this call.
    pub fn auth(mut self, token: AuthorizationToken) -> Self {
        self.opts.auth = Some(token);
        self
    }
    /// Set `atproto-proxy` header for this call.
    pub fn proxy(mut self, proxy: SmolStr) -> Self {
        self.opts.atproto_proxy = Some(proxy);
        self
    }
    /// Set `atproto-accept-labelers` header(s) for this call.
    pub fn accept_labelers(mut self, labelers: Vec<SmolStr>) -> Self {
        self.opts.atproto_accept_labelers = Some(labelers);
        self
    }
    /// Add an extra header.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.opts.extra_headers.push((name, value));
        self
    }
    /// Bound the whole round trip.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = Some(timeout);
        self
    }
    /// Replace the builder's options entirely.
    pub fn with_options(mut self, opts: CallOptions) -> Self {
        self.opts = opts;
        self
    }

    /// Send the given typed XRPC request and decode its output.
    pub async fn send<R>(self, request: &R) -> XrpcResult<R::Output>
    where
        R: XrpcRequest,
    {
        let params = request.query_params();
        let body = request.encode_body()?;
        self.execute(R::METHOD, R::NSID, &params, body).await
    }

    /// Send a call given its raw parts and decode the output as `O`.
    pub async fn execute<O>(
        self,
        method: XrpcMethod,
        nsid: &'static str,
        params: &QueryParams,
        body: Option<Vec<u8>>,
    ) -> XrpcResult<O>
    where
        O: DeserializeOwned,
    {
        let response = self.execute_raw(method, nsid, params, body).await?;
        Ok(response.parse()?)
    }

    /// Send a call and return the successful response undecoded.
    ///
    /// Note on 401 handling: a 401 carrying a `WWW-Authenticate` header and no
    /// recognizable token error surfaces as `AuthError::Other(header)`, so
    /// higher layers can inspect the challenge.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip(self, params, body), fields(base = %self.base)))]
    pub async fn execute_raw(
        self,
        method: XrpcMethod,
        nsid: &'static str,
        params: &QueryParams,
        body: Option<Vec<u8>>,
    ) -> XrpcResult<Response> {
        let request = build_http_request(&self.base, method, nsid, params, body, &self.opts)?;

        let sent = self.client.send_http(request);
        let outcome = match self.opts.timeout {
            Some(limit) => tokio::time::timeout(limit, sent)
                .await
                .map_err(|_| TransportError::Timeout)?,
            None => sent.await,
        };
        let http_response = outcome.map_err(|e| TransportError::Other(Box::new(e)))?;

        process_response(nsid, method, http_response)
    }
}

/// Build an HTTP request for an XRPC call given base URL and options
pub fn build_http_request(
    base: &Url,
    method: XrpcMethod,
    nsid: &str,
    params: &QueryParams,
    body: Option<Vec<u8>>,
    opts: &CallOptions,
) -> Result<Request<Vec<u8>>, PreparationError> {
    let mut url = base.clone();
    let mut path = url.path().trim_end_matches('/').to_owned();
    path.push_str("/xrpc/");
    path.push_str(nsid);
    url.set_path(&path);

    if params.is_empty() {
        url.set_query(None);
    } else {
        url.set_query(Some(&params.to_query_string()?));
    }

    let uri = http::Uri::try_from(url.as_str())
        .map_err(|e| PreparationError::InvalidUrl(e.to_string()))?;

    let has_body = body.is_some();
    let mut request = Request::new(body.unwrap_or_default());
    *request.method_mut() = method.http_method();
    *request.uri_mut() = uri;

    let headers = request.headers_mut();
    headers.insert(ACCEPT, HeaderValue::from_static(JSON_ENCODING));

    if let (XrpcMethod::Procedure(encoding), true) = (method, has_body) {
        headers.insert(HeaderName::from(Header::ContentType), header_value(encoding)?);
    }

    if let Some(token) = &opts.auth {
        headers.insert(
            HeaderName::from(Header::Authorization),
            header_value(&token.header_value())?,
        );
    }
    if let Some(proxy) = &opts.atproto_proxy {
        headers.insert(HeaderName::from(Header::AtprotoProxy), header_value(proxy)?);
    }
    if let Some(labelers) = &opts.atproto_accept_labelers {
        if !labelers.is_empty() {
            let joined = labelers
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            headers.insert(
                HeaderName::from(Header::AtprotoAcceptLabelers),
                header_value(&joined)?,
            );
        }
    }
    if let Some(agent) = &opts.user_agent {
        headers.insert(USER_AGENT, header_value(agent)?);
    }
    for (name, value) in &opts.extra_headers {
        headers.append(name.clone(), value.clone());
    }

    Ok(request)
}

fn header_value(value: &str) -> Result<HeaderValue, PreparationError> {
    HeaderValue::from_str(value).map_err(|e| PreparationError::InvalidHeader(e.to_string()))
}

/// Classify an HTTP response into a successful [`Response`] or a typed error.
///
/// - 2xx: success.
/// - `ExpiredToken` / `InvalidToken` error bodies (400 or 401): [`AuthError`].
/// - Any other 401: `AuthError::Other` with the `WWW-Authenticate` challenge if
///   present, otherwise `AuthError::NotAuthenticated`.
/// - Other failures with an `{error, message}` body: [`ServiceError`].
/// - Anything else: [`TransportError::Http`].
pub fn process_response(
    nsid: &'static str,
    method: XrpcMethod,
    http_response: http::Response<Vec<u8>>,
) -> XrpcResult<Response> {
    let status = http_response.status();
    if status.is_success() {
        return Ok(Response::new(status, Bytes::from(http_response.into_body())));
    }

    let challenge = http_response.headers().get(WWW_AUTHENTICATE).cloned();
    let buffer = Bytes::from(http_response.into_body());
    let parsed = serde_json::from_slice::<ServiceError>(&buffer).ok();

    match parsed.as_ref().map(|e| e.error.as_str()) {
        Some("ExpiredToken") => return Err(AuthError::TokenExpired.into()),
        Some("InvalidToken") => return Err(AuthError::InvalidToken.into()),
        _ => {}
    }

    if status == StatusCode::UNAUTHORIZED {
        return Err(match challenge {
            Some(challenge) => AuthError::Other(challenge),
            None => AuthError::NotAuthenticated,
        }
        .into());
    }

    match parsed {
        Some(mut error) => {
            error.nsid = nsid;
            error.method = method.as_str();
            error.http_status = status;
            Err(ClientError::Service(error))
        }
        None => Err(HttpError {
            status,
            body: Some(buffer),
        }
        .into()),
    }
}

/// Successful XRPC response that owns the response buffer
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    buffer: Bytes,
}

impl Response {
    /// Create a new response from a status code and body
    pub fn new(status: StatusCode, buffer: Bytes) -> Self {
        Self { status, buffer }
    }

    /// Get the HTTP status code
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Get the raw body
    pub fn buffer(&self) -> &Bytes {
        &self.buffer
    }

    /// Decode the body as `T`. An empty body decodes like `null`.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, DecodeError> {
        if self.buffer.iter().all(u8::is_ascii_whitespace) {
            return Ok(serde_json::from_slice(b"null")?);
        }
        Ok(serde_json::from_slice(&self.buffer)?)
    }

    /// Decode the body as an untyped [`Data`] value.
    pub fn parse_data(&self) -> Result<Data, DecodeError> {
        if self.buffer.iter().all(u8::is_ascii_whitespace) {
            return Ok(Data::Null);
        }
        Data::from_json(&self.buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: serde_json::Value) -> http::Response<Vec<u8>> {
        let mut resp = http::Response::new(serde_json::to_vec(&body).unwrap());
        *resp.status_mut() = StatusCode::from_u16(status).unwrap();
        resp
    }

    fn classify(resp: http::Response<Vec<u8>>) -> ClientError {
        process_response("com.example.test", XrpcMethod::Procedure(JSON_ENCODING), resp)
            .unwrap_err()
    }

    #[test]
    fn service_error_carries_context() {
        let err = classify(response(
            400,
            serde_json::json!({"error": "InvalidRequest", "message": "missing"}),
        ));
        match err {
            ClientError::Service(e) => {
                assert_eq!(e.error.as_str(), "InvalidRequest");
                assert_eq!(e.message.as_deref(), Some("missing"));
                assert_eq!(e.nsid, "com.example.test");
                assert_eq!(e.method, "POST");
                assert_eq!(e.http_status, StatusCode::BAD_REQUEST);
            }
            other => panic!("unexpected: {other:?}"),
        }

        let err = classify(response(429, serde_json::json!({"error": "RateLimitExceeded"})));
        assert!(matches!(err, ClientError::Service(ref e) if e.message.is_none()));
    }

    #[test]
    fn auth_error_mapping() {
        for status in [400, 401] {
            let err = classify(response(status, serde_json::json!({"error": "ExpiredToken"})));
            assert!(matches!(err, ClientError::Auth(AuthError::TokenExpired)));

            let err = classify(response(status, serde_json::json!({"error": "InvalidToken"})));
            assert!(matches!(err, ClientError::Auth(AuthError::InvalidToken)));
        }

        let err = classify(response(401, serde_json::json!({"error": "AuthMissing"})));
        assert!(matches!(err, ClientError::Auth(AuthError::NotAuthenticated)));

        let mut resp = http::Response::new(b"Unauthorized".to_vec());
        *resp.status_mut() = StatusCode::UNAUTHORIZED;
        assert!(matches!(
            classify(resp),
            ClientError::Auth(AuthError::NotAuthenticated)
        ));
    }

    #[test]
    fn www_authenticate_challenge_is_exposed() {
        let mut resp = response(401, serde_json::json!({"error": "AuthRequired"}));
        resp.headers_mut().insert(
            WWW_AUTHENTICATE,
            HeaderValue::from_static(r#"Bearer error="invalid_token""#),
        );
        match classify(resp) {
            ClientError::Auth(AuthError::Other(hv)) => {
                assert_eq!(hv, r#"Bearer error="invalid_token""#)
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn unstructured_failure_is_transport_http() {
        let mut resp = http::Response::new(b"<html>bad gateway</html>".to_vec());
        *resp.status_mut() = StatusCode::BAD_GATEWAY;
        match classify(resp) {
            ClientError::Transport(TransportError::Http(e)) => {
                assert_eq!(e.status, StatusCode::BAD_GATEWAY);
                assert!(e.to_string().contains("bad gateway"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn success_parses_and_allows_empty_bodies() {
        let resp = process_response(
            "com.example.test",
            XrpcMethod::Query,
            response(200, serde_json::json!({"a": 1})),
        )
        .unwrap();
        let data = resp.parse_data().unwrap();
        assert_eq!(data.get("a"), Some(&Data::Integer(1)));

        let empty = Response::new(StatusCode::OK, Bytes::new());
        assert_eq!(empty.parse::<Empty>().unwrap(), Empty);
        empty.parse::<()>().unwrap();
        assert_eq!(empty.parse::<Option<u8>>().unwrap(), None);

        let object = Response::new(StatusCode::OK, Bytes::from_static(b"{}"));
        assert_eq!(object.parse::<Empty>().unwrap(), Empty);

        let wrong = Response::new(StatusCode::OK, Bytes::from_static(b"[1]"));
        assert!(matches!(
            wrong.parse::<std::collections::HashMap<String, u8>>(),
            Err(DecodeError::Json(_))
        ));
    }

    #[test]
    fn no_double_slash_in_path() {
        let opts = CallOptions::default();
        for base in [
            Url::parse("https://pds").unwrap(),
            Url::parse("https://pds/").unwrap(),
            Url::parse("https://pds/base/").unwrap(),
        ] {
            let req = build_http_request(
                &base,
                XrpcMethod::Query,
                "com.example.test",
                &QueryParams::new(),
                None,
                &opts,
            )
            .unwrap();
            let uri = req.uri().to_string();
            assert!(uri.contains("/xrpc/com.example.test"));
            assert!(!uri.contains("//xrpc"));
            assert!(req.uri().query().is_none());
        }
    }

    #[test]
    fn query_request_shape() {
        let mut params = QueryParams::new();
        params.push("actor", "alice.test").push("limit", 10);
        let opts = CallOptions {
            auth: Some(AuthorizationToken::Bearer("tok".into())),
            atproto_proxy: Some("did:web:api.bsky.app#bsky_appview".into()),
            atproto_accept_labelers: Some(vec!["did:plc:a".into(), "did:plc:b".into()]),
            user_agent: Some("bobbin/test".into()),
            ..Default::default()
        };
        let req = build_http_request(
            &Url::parse("https://pds.example").unwrap(),
            XrpcMethod::Query,
            "app.bsky.feed.getAuthorFeed",
            &params,
            None,
            &opts,
        )
        .unwrap();

        assert_eq!(req.method(), http::Method::GET);
        assert_eq!(
            req.uri().to_string(),
            "https://pds.example/xrpc/app.bsky.feed.getAuthorFeed?actor=alice.test&limit=10"
        );
        let headers = req.headers();
        assert_eq!(headers[AUTHORIZATION], "Bearer tok");
        assert_eq!(headers["atproto-proxy"], "did:web:api.bsky.app#bsky_appview");
        assert_eq!(headers["atproto-accept-labelers"], "did:plc:a, did:plc:b");
        assert_eq!(headers[USER_AGENT], "bobbin/test");
        assert_eq!(headers[ACCEPT], JSON_ENCODING);
        assert!(headers.get(CONTENT_TYPE).is_none());
        assert!(req.body().is_empty());
    }

    #[test]
    fn procedure_sets_plain_json_content_type() {
        let body = json_body(&serde_json::json!({"identifier": "alice"})).unwrap();
        let req = build_http_request(
            &Url::parse("https://pds.example").unwrap(),
            XrpcMethod::Procedure(JSON_ENCODING),
            "com.atproto.server.createSession",
            &QueryParams::new(),
            body,
            &CallOptions::default(),
        )
        .unwrap();

        assert_eq!(req.method(), http::Method::POST);
        assert_eq!(req.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(req.body().as_slice(), br#"{"identifier":"alice"}"#);

        // Bodyless procedures (refreshSession) send no content type.
        let req = build_http_request(
            &Url::parse("https://pds.example").unwrap(),
            XrpcMethod::Procedure(JSON_ENCODING),
            "com.atproto.server.refreshSession",
            &QueryParams::new(),
            None,
            &CallOptions::default(),
        )
        .unwrap();
        assert!(req.headers().get(CONTENT_TYPE).is_none());
    }

    #[test]
    fn invalid_header_is_a_preparation_error() {
        let opts = CallOptions {
            auth: Some(AuthorizationToken::Bearer("bad\ntoken".into())),
            ..Default::default()
        };
        let err = build_http_request(
            &Url::parse("https://pds.example").unwrap(),
            XrpcMethod::Query,
            "com.example.test",
            &QueryParams::new(),
            None,
            &opts,
        )
        .unwrap_err();
        assert!(matches!(err, PreparationError::InvalidHeader(_)));
    }

    struct Stalled;

    impl HttpClient for Stalled {
        type Error = std::io::Error;

        async fn send_http(
            &self,
            _request: http::Request<Vec<u8>>,
        ) -> Result<http::Response<Vec<u8>>, Self::Error> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(http::Response::new(Vec::new()))
        }
    }

    struct Refusing;

    impl HttpClient for Refusing {
        type Error = std::io::Error;

        async fn send_http(
            &self,
            _request: http::Request<Vec<u8>>,
        ) -> Result<http::Response<Vec<u8>>, Self::Error> {
            Err(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "refused",
            ))
        }
    }

    #[tokio::test]
    async fn timeout_is_a_transport_error() {
        let err = Stalled
            .xrpc(Url::parse("https://pds.example").unwrap())
            .timeout(Duration::from_millis(20))
            .execute::<Empty>(XrpcMethod::Query, "com.example.test", &QueryParams::new(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Transport(TransportError::Timeout)));
    }

    #[tokio::test]
    async fn client_failure_is_a_transport_error() {
        let err = Refusing
            .xrpc(Url::parse("https://pds.example").unwrap())
            .execute::<Empty>(XrpcMethod::Query, "com.example.test", &QueryParams::new(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Transport(TransportError::Other(_))));
    }
}
