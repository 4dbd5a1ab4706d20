/// Largest `text` a post is written with, in graphemes.
pub const MAX_TEXT_GRAPHEMES: usize = 300;

///Record containing a Bluesky post.
#[bobbin_derive::lexicon]
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, bon::Builder)]
#[serde(rename_all = "camelCase")]
#[builder(start_fn = new)]
pub struct Post {
    ///Client-declared timestamp when this post was originally created.
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(skip_serializing_if = "std::option::Option::is_none")]
    pub embed: std::option::Option<PostEmbed>,
    ///Annotations of text (mentions, URLs, hashtags, etc)
    #[serde(skip_serializing_if = "std::option::Option::is_none")]
    pub facets: std::option::Option<Vec<bobbin_common::types::value::Data>>,
    ///Self-label values for this post. Effectively content warnings.
    #[serde(skip_serializing_if = "std::option::Option::is_none")]
    pub labels: std::option::Option<bobbin_common::types::value::Data>,
    ///Indicates human language of post primary text content.
    #[serde(skip_serializing_if = "std::option::Option::is_none")]
    #[builder(into)]
    pub langs: std::option::Option<
        bobbin_common::types::LengthLimited<bobbin_common::smol_str::SmolStr, 3>,
    >,
    #[serde(skip_serializing_if = "std::option::Option::is_none")]
    pub reply: std::option::Option<ReplyRef>,
    ///Additional hashtags, in addition to any included in post text and facets.
    #[serde(skip_serializing_if = "std::option::Option::is_none")]
    pub tags: std::option::Option<Vec<bobbin_common::smol_str::SmolStr>>,
    ///The primary post content. May be an empty string, if there are embeds.
    #[builder(into)]
    pub text: bobbin_common::types::GraphemeLimited<MAX_TEXT_GRAPHEMES>,
}

impl bobbin_common::types::Collection for Post {
    const NSID: &'static str = "app.bsky.feed.post";
}

#[bobbin_derive::open_union]
#[derive(Debug, Clone, PartialEq)]
pub enum PostEmbed {
    #[tag = "app.bsky.embed.images"]
    Images(Box<crate::app_bsky::embed::images::Images>),
    #[tag = "app.bsky.embed.external"]
    External(Box<crate::app_bsky::embed::external::External>),
    #[tag = "app.bsky.embed.record"]
    Record(Box<crate::app_bsky::embed::record::Record>),
}

#[bobbin_derive::lexicon]
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, bon::Builder)]
#[serde(rename_all = "camelCase")]
#[builder(start_fn = new)]
pub struct ReplyRef {
    pub parent: crate::com_atproto::repo::strong_ref::StrongRef,
    pub root: crate::com_atproto::repo::strong_ref::StrongRef,
}
