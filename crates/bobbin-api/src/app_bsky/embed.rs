pub mod external;
pub mod images;
pub mod record;

///width:height represents an aspect ratio. It may be approximate, and may not correspond to absolute dimensions in any given unit.
#[bobbin_derive::lexicon]
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, bon::Builder)]
#[serde(rename_all = "camelCase")]
#[builder(start_fn = new)]
pub struct AspectRatio {
    pub height: i64,
    pub width: i64,
}
