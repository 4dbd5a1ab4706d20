use bobbin_common::smol_str::SmolStr;
use bobbin_common::xrpc::{Bound, QueryParams, XrpcMethod, XrpcRequest};

/// Accepted range of `limit`. The server defaults to 50 when it is omitted.
pub const LIMIT: Bound = Bound::new(1, 100);

///Get a view of an actor's 'author feed' (post and reposts by the author). Does not require auth.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq, bon::Builder)]
#[builder(start_fn = new)]
#[serde(rename_all = "camelCase")]
pub struct GetAuthorFeed {
    #[builder(into)]
    pub actor: SmolStr,
    #[serde(skip_serializing_if = "std::option::Option::is_none")]
    #[builder(into)]
    pub cursor: std::option::Option<SmolStr>,
    ///Combinations of post/repost types to include in response.
    #[serde(skip_serializing_if = "std::option::Option::is_none")]
    #[builder(into)]
    pub filter: std::option::Option<SmolStr>,
    #[serde(skip_serializing_if = "std::option::Option::is_none")]
    pub include_pins: std::option::Option<bool>,
    ///(min: 1, max: 100, default: 50)
    #[serde(skip_serializing_if = "std::option::Option::is_none")]
    pub limit: std::option::Option<i64>,
}

#[bobbin_derive::lexicon]
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GetAuthorFeedOutput {
    #[serde(skip_serializing_if = "std::option::Option::is_none")]
    pub cursor: std::option::Option<SmolStr>,
    pub feed: Vec<crate::app_bsky::feed::FeedViewPost>,
}

impl XrpcRequest for GetAuthorFeed {
    const NSID: &'static str = "app.bsky.feed.getAuthorFeed";
    const METHOD: XrpcMethod = XrpcMethod::Query;

    type Output = GetAuthorFeedOutput;

    fn query_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params
            .push("actor", &self.actor)
            .push_bounded("limit", self.limit, LIMIT)
            .push_opt("cursor", self.cursor.as_ref())
            .push_opt("filter", self.filter.as_ref())
            .push_opt("includePins", self.include_pins);
        params
    }
}
