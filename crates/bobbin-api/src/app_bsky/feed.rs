pub mod get_author_feed;
pub mod get_posts;
pub mod post;

#[bobbin_derive::lexicon]
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedViewPost {
    ///Context provided by feed generator that may be passed back alongside interactions.
    #[serde(skip_serializing_if = "std::option::Option::is_none")]
    pub feed_context: std::option::Option<bobbin_common::smol_str::SmolStr>,
    pub post: PostView,
    #[serde(skip_serializing_if = "std::option::Option::is_none")]
    pub reason: std::option::Option<FeedViewPostReason>,
    #[serde(skip_serializing_if = "std::option::Option::is_none")]
    pub reply: std::option::Option<bobbin_common::types::value::Data>,
    ///Unique identifier per request that may be passed back alongside interactions.
    #[serde(skip_serializing_if = "std::option::Option::is_none")]
    pub req_id: std::option::Option<bobbin_common::smol_str::SmolStr>,
}

#[bobbin_derive::open_union]
#[derive(Debug, Clone, PartialEq)]
pub enum FeedViewPostReason {
    #[tag = "app.bsky.feed.defs#reasonRepost"]
    ReasonRepost(Box<ReasonRepost>),
    #[tag = "app.bsky.feed.defs#reasonPin"]
    ReasonPin(Box<ReasonPin>),
}

#[bobbin_derive::lexicon]
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub author: crate::app_bsky::actor::ProfileViewBasic,
    #[serde(skip_serializing_if = "std::option::Option::is_none")]
    pub bookmark_count: std::option::Option<i64>,
    pub cid: bobbin_common::smol_str::SmolStr,
    #[serde(skip_serializing_if = "std::option::Option::is_none")]
    pub embed: std::option::Option<bobbin_common::types::value::Data>,
    pub indexed_at: chrono::DateTime<chrono::Utc>,
    #[serde(skip_serializing_if = "std::option::Option::is_none")]
    pub labels: std::option::Option<Vec<bobbin_common::types::value::Data>>,
    #[serde(skip_serializing_if = "std::option::Option::is_none")]
    pub like_count: std::option::Option<i64>,
    #[serde(skip_serializing_if = "std::option::Option::is_none")]
    pub quote_count: std::option::Option<i64>,
    pub record: bobbin_common::types::value::Data,
    #[serde(skip_serializing_if = "std::option::Option::is_none")]
    pub reply_count: std::option::Option<i64>,
    #[serde(skip_serializing_if = "std::option::Option::is_none")]
    pub repost_count: std::option::Option<i64>,
    #[serde(skip_serializing_if = "std::option::Option::is_none")]
    pub threadgate: std::option::Option<bobbin_common::types::value::Data>,
    pub uri: bobbin_common::smol_str::SmolStr,
    #[serde(skip_serializing_if = "std::option::Option::is_none")]
    pub viewer: std::option::Option<bobbin_common::types::value::Data>,
}

impl PostView {
    /// Decode the embedded record as a post, if it is one.
    pub fn post_record(&self) -> Option<Result<post::Post, bobbin_common::error::DecodeError>> {
        use bobbin_common::types::Collection;

        (self.record.type_discriminator() == Some(post::Post::NSID))
            .then(|| self.record.to_typed())
    }
}

#[bobbin_derive::lexicon]
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReasonPin {}

#[bobbin_derive::lexicon]
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReasonRepost {
    pub by: crate::app_bsky::actor::ProfileViewBasic,
    #[serde(skip_serializing_if = "std::option::Option::is_none")]
    pub cid: std::option::Option<bobbin_common::smol_str::SmolStr>,
    pub indexed_at: chrono::DateTime<chrono::Utc>,
    #[serde(skip_serializing_if = "std::option::Option::is_none")]
    pub uri: std::option::Option<bobbin_common::smol_str::SmolStr>,
}
