#[bobbin_derive::lexicon]
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileViewBasic {
    #[serde(skip_serializing_if = "std::option::Option::is_none")]
    pub avatar: std::option::Option<bobbin_common::smol_str::SmolStr>,
    #[serde(skip_serializing_if = "std::option::Option::is_none")]
    pub created_at: std::option::Option<chrono::DateTime<chrono::Utc>>,
    pub did: bobbin_common::smol_str::SmolStr,
    #[serde(skip_serializing_if = "std::option::Option::is_none")]
    pub display_name: std::option::Option<bobbin_common::smol_str::SmolStr>,
    pub handle: bobbin_common::smol_str::SmolStr,
    #[serde(skip_serializing_if = "std::option::Option::is_none")]
    pub labels: std::option::Option<Vec<bobbin_common::types::value::Data>>,
    #[serde(skip_serializing_if = "std::option::Option::is_none")]
    pub viewer: std::option::Option<bobbin_common::types::value::Data>,
}
