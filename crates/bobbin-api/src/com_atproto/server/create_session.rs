///Create an authentication session.
#[bobbin_derive::lexicon]
#[derive(serde::Serialize, serde::Deserialize, Clone, PartialEq, bon::Builder)]
#[serde(rename_all = "camelCase")]
#[builder(start_fn = new)]
pub struct CreateSession {
    #[serde(skip_serializing_if = "std::option::Option::is_none")]
    pub allow_takendown: std::option::Option<bool>,
    #[serde(skip_serializing_if = "std::option::Option::is_none")]
    #[builder(into)]
    pub auth_factor_token: std::option::Option<bobbin_common::smol_str::SmolStr>,
    ///Handle or other identifier supported by the server for the authenticating user.
    #[builder(into)]
    pub identifier: bobbin_common::smol_str::SmolStr,
    #[builder(into)]
    pub password: bobbin_common::smol_str::SmolStr,
}

impl std::fmt::Debug for CreateSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateSession")
            .field("identifier", &self.identifier)
            .field("password", &"<redacted>")
            .field("allow_takendown", &self.allow_takendown)
            .finish_non_exhaustive()
    }
}

#[bobbin_derive::lexicon]
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionOutput {
    pub access_jwt: bobbin_common::smol_str::SmolStr,
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
    pub refresh_jwt: bobbin_common::smol_str::SmolStr,
    ///If active=false, this optional field indicates a possible reason for why the account is not active.
    #[serde(skip_serializing_if = "std::option::Option::is_none")]
    pub status: std::option::Option<bobbin_common::smol_str::SmolStr>,
}

impl bobbin_common::xrpc::XrpcRequest for CreateSession {
    const NSID: &'static str = "com.atproto.server.createSession";
    const METHOD: bobbin_common::xrpc::XrpcMethod =
        bobbin_common::xrpc::XrpcMethod::Procedure(bobbin_common::xrpc::JSON_ENCODING);

    type Output = CreateSessionOutput;

    fn encode_body(
        &self,
    ) -> Result<Option<Vec<u8>>, bobbin_common::error::EncodeError> {
        bobbin_common::xrpc::json_body(self)
    }
}
