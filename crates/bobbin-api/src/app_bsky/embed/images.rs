#[bobbin_derive::lexicon]
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, bon::Builder)]
#[serde(rename_all = "camelCase")]
#[builder(start_fn = new)]
pub struct Image {
    ///Alt text description of the image, for accessibility.
    #[builder(into)]
    pub alt: bobbin_common::smol_str::SmolStr,
    #[serde(skip_serializing_if = "std::option::Option::is_none")]
    pub aspect_ratio: std::option::Option<crate::app_bsky::embed::AspectRatio>,
    ///Blob reference, as returned by uploadBlob.
    pub image: bobbin_common::types::value::Data,
}

///A set of images embedded in a Bluesky record (eg, a post).
#[bobbin_derive::lexicon]
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, bon::Builder)]
#[serde(rename_all = "camelCase")]
#[builder(start_fn = new)]
pub struct Images {
    ///Current maximum length is 4 images.
    #[builder(into)]
    pub images: bobbin_common::types::LengthLimited<Image, 4>,
}
