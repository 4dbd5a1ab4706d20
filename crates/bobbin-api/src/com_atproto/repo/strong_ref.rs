///A URI with a content-hash fingerprint.
#[bobbin_derive::lexicon]
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, bon::Builder)]
#[serde(rename_all = "camelCase")]
#[builder(start_fn = new)]
pub struct StrongRef {
    #[builder(into)]
    pub cid: bobbin_common::smol_str::SmolStr,
    #[builder(into)]
    pub uri: bobbin_common::smol_str::SmolStr,
}
