/// XRPC request marker type
///
///Delete the current session. Requires auth using the 'refreshJwt' (not the 'accessJwt').
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeleteSession;

impl bobbin_common::xrpc::XrpcRequest for DeleteSession {
    const NSID: &'static str = "com.atproto.server.deleteSession";
    const METHOD: bobbin_common::xrpc::XrpcMethod =
        bobbin_common::xrpc::XrpcMethod::Procedure(bobbin_common::xrpc::JSON_ENCODING);

    type Output = bobbin_common::xrpc::Empty;
}
