/// XRPC request marker type
///
///Refresh an authentication session. Requires auth using the 'refreshJwt' (not the 'accessJwt').
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RefreshSession;

#[bobbin_derive::lexicon]
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RefreshSessionOutput {
    pub access_jwt: bobbin_common::smol_str::SmolStr,
    #[serde(skip_serializing_if = "std::option::Option::is_none")]
    pub active: std::option::Option<bool>,
    pub did: bobbin_common::smol_str::SmolStr,
    #[serde(skip_serializing_if = "std::option::Option::is_none")]
    pub did_doc: std::option::Option<bobbin_common::types::value::Data>,
    pub handle: bobbin_common::smol_str::SmolStr,
    pub refresh_jwt: bobbin_common::smol_str::SmolStr,
    #[serde(skip_serializing_if = "std::option::Option::is_none")]
    pub status: std::option::Option<bobbin_common::smol_str::SmolStr>,
}

impl bobbin_common::xrpc::XrpcRequest for RefreshSession {
    const NSID: &'static str = "com.atproto.server.refreshSession";
    const METHOD: bobbin_common::xrpc::XrpcMethod =
        bobbin_common::xrpc::XrpcMethod::Procedure(bobbin_common::xrpc::JSON_ENCODING);

    type Output = RefreshSessionOutput;
}
