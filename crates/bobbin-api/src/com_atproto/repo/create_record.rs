use bobbin_common::error::EncodeError;
use bobbin_common::smol_str::SmolStr;
use bobbin_common::types::Collection;

///Create a single new repository record. Requires auth, implemented by PDS.
#[bobbin_derive::lexicon]
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, bon::Builder)]
#[serde(rename_all = "camelCase")]
#[builder(start_fn = new)]
pub struct CreateRecord {
    ///The NSID of the record collection.
    #[builder(into)]
    pub collection: SmolStr,
    ///The record itself. Must contain a $type field.
    pub record: bobbin_common::types::value::Data,
    ///The handle or DID of the repo (aka, current account).
    #[builder(into)]
    pub repo: SmolStr,
    ///The Record Key.
    #[serde(skip_serializing_if = "std::option::Option::is_none")]
    #[builder(into)]
    pub rkey: std::option::Option<SmolStr>,
    ///Compare and swap with the previous commit by CID.
    #[serde(skip_serializing_if = "std::option::Option::is_none")]
    #[builder(into)]
    pub swap_commit: std::option::Option<SmolStr>,
    ///Can be set to 'false' to skip Lexicon schema validation of record data, 'true' to require it, or leave unset to validate only for known Lexicons.
    #[serde(skip_serializing_if = "std::option::Option::is_none")]
    pub validate: std::option::Option<bool>,
}

impl CreateRecord {
    /// Request creating `record` in `repo`, under the record's own collection.
    pub fn for_record<R: Collection>(
        repo: impl Into<SmolStr>,
        record: &R,
    ) -> Result<Self, EncodeError> {
        Ok(Self::new()
            .repo(repo)
            .collection(R::NSID)
            .record(record.to_record_data()?)
            .build())
    }
}

#[bobbin_derive::lexicon]
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecordOutput {
    pub cid: SmolStr,
    #[serde(skip_serializing_if = "std::option::Option::is_none")]
    pub commit: std::option::Option<bobbin_common::types::value::Data>,
    pub uri: SmolStr,
    #[serde(skip_serializing_if = "std::option::Option::is_none")]
    pub validation_status: std::option::Option<SmolStr>,
}

impl bobbin_common::xrpc::XrpcRequest for CreateRecord {
    const NSID: &'static str = "com.atproto.repo.createRecord";
    const METHOD: bobbin_common::xrpc::XrpcMethod =
        bobbin_common::xrpc::XrpcMethod::Procedure(bobbin_common::xrpc::JSON_ENCODING);

    type Output = CreateRecordOutput;

    fn encode_body(&self) -> Result<Option<Vec<u8>>, EncodeError> {
        bobbin_common::xrpc::json_body(self)
    }
}
