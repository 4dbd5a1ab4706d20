///A representation of some externally linked content (eg, a URL and 'card'), embedded in a Bluesky record (eg, a post).
#[bobbin_derive::lexicon]
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, bon::Builder)]
#[serde(rename_all = "camelCase")]
#[builder(start_fn = new)]
pub struct External {
    pub external: ExternalLink,
}

#[bobbin_derive::lexicon]
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, bon::Builder)]
#[serde(rename_all = "camelCase")]
#[builder(start_fn = new)]
pub struct ExternalLink {
    #[builder(into)]
    pub description: bobbin_common::smol_str::SmolStr,
    #[serde(skip_serializing_if = "std::option::Option::is_none")]
    pub thumb: std::option::Option<bobbin_common::types::value::Data>,
    #[builder(into)]
    pub title: bobbin_common::smol_str::SmolStr,
    #[builder(into)]
    pub uri: bobbin_common::smol_str::SmolStr,
}
