/// XRPC request marker type
///
///Get information about the current auth session. Requires auth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GetSession;

#[bobbin_derive::lexicon]
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GetSessionOutput {
    #[serde(skip_serializing_if = "std::option::Option::is_none")]
    pub active: std::option::Option<bool>,
    pub did: bobbin_common::smol_str::SmolStr,
    #[serde(skip_serializing_if = "std::option::Option::is_none")]
    pub did_doc: std::option::Option<bobbin_common::types::value::Data>,
    #[serde(skip_serializing_if = "std::option::Option::is_none")]
    pub email: std::option::Option<bobbin_common::smol_str::SmolStr>,
    #[serde(skip_serializing_if = "std::option::Option::is_none")]
    pub email_auth_factor: std::option::Option<bool>,
    #[serde(skip_serializing_if = "std::option::Option::is_none")]
    pub email_confirmed: std::option::Option<bool>,
    pub handle: bobbin_common::smol_str::SmolStr,
    #[serde(skip_serializing_if = "std::option::Option::is_none")]
    pub status: std::option::Option<bobbin_common::smol_str::SmolStr>,
}

impl bobbin_common::xrpc::XrpcRequest for GetSession {
    const NSID: &'static str = "com.atproto.server.getSession";
    const METHOD: bobbin_common::xrpc::XrpcMethod = bobbin_common::xrpc::XrpcMethod::Query;

    type Output = GetSessionOutput;
}
