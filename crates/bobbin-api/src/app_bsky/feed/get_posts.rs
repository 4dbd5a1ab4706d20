use bobbin_common::smol_str::SmolStr;
use bobbin_common::xrpc::{QueryParams, XrpcMethod, XrpcRequest};

/// Most `uris` sent in one call; extra ones are dropped.
pub const MAX_URIS: usize = 25;

///Gets post views for a specified list of posts (by AT-URI). This is sometimes referred to as 'hydrating' a 'feed skeleton'.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq, bon::Builder)]
#[builder(start_fn = new)]
#[serde(rename_all = "camelCase")]
pub struct GetPosts {
    ///List of post AT-URIs to return hydrated views for.
    #[builder(into)]
    pub uris: Vec<SmolStr>,
}

#[bobbin_derive::lexicon]
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GetPostsOutput {
    pub posts: Vec<crate::app_bsky::feed::PostView>,
}

impl XrpcRequest for GetPosts {
    const NSID: &'static str = "app.bsky.feed.getPosts";
    const METHOD: XrpcMethod = XrpcMethod::Query;

    type Output = GetPostsOutput;

    fn query_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.push_all_capped("uris", &self.uris, MAX_URIS);
        params
    }
}
