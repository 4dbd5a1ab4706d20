use bobbin_api::app_bsky::embed::external::{External, ExternalLink};
use bobbin_api::app_bsky::feed::post::{Post, PostEmbed};
use bobbin_api::com_atproto::repo::create_record::CreateRecord;
use bobbin_common::smol_str::SmolStr;
use bobbin_common::types::union::OpenUnion;
use bobbin_common::types::value::Data;
use bobbin_common::xrpc::XrpcRequest;
use chrono::{TimeZone, Utc};
use serde_json::json;

fn created_at() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

#[test]
fn post_with_known_embed_round_trips() {
    let post = Post::new()
        .text("hello")
        .created_at(created_at())
        .embed(PostEmbed::External(Box::new(
            External::new()
                .external(
                    ExternalLink::new()
                        .uri("https://example.com")
                        .title("Example")
                        .description("A page")
                        .build(),
                )
                .build(),
        )))
        .build();

    let value = serde_json::to_value(&post).unwrap();
    assert_eq!(value["embed"]["$type"], "app.bsky.embed.external");
    assert_eq!(value["embed"]["external"]["title"], "Example");

    let decoded: Post = serde_json::from_value(value).unwrap();
    assert_eq!(decoded, post);
}

#[test]
fn post_with_future_embed_is_kept_verbatim() {
    let doc = json!({
        "$type": "app.bsky.feed.post",
        "text": "check this out",
        "createdAt": "2024-05-01T12:00:00Z",
        "embed": {
            "$type": "app.bsky.embed.hologram",
            "projection": {"kind": "volumetric", "frames": [1, 2, 3]},
            "ratio": 1.5
        },
        "futureField": true
    });

    let post: Post = serde_json::from_value(doc.clone()).unwrap();
    let embed = post.embed.as_ref().unwrap();
    assert!(!embed.is_known());
    assert_eq!(embed.tag(), "app.bsky.embed.hologram");
    assert_eq!(post.extra_data.get("futureField"), Some(&Data::Boolean(true)));

    let reencoded = serde_json::to_value(&post).unwrap();
    assert_eq!(reencoded["embed"], doc["embed"]);
    assert_eq!(reencoded["futureField"], true);
}

#[test]
fn post_text_is_truncated_on_encode() {
    let text = "ab".repeat(200);
    let post = Post::new().text(text.as_str()).created_at(created_at()).build();
    assert!(post.text.is_over_limit());

    let value = serde_json::to_value(&post).unwrap();
    let written = value["text"].as_str().unwrap();
    assert_eq!(written.chars().count(), 300);
    assert!(text.starts_with(written));
}

#[test]
fn post_langs_are_capped() {
    let langs: Vec<SmolStr> = ["en", "de", "fr", "ja"].into_iter().map(SmolStr::from).collect();
    let post = Post::new()
        .text("multilingual")
        .created_at(created_at())
        .langs(langs)
        .build();
    let value = serde_json::to_value(&post).unwrap();
    assert_eq!(value["langs"], json!(["en", "de", "fr"]));
}

#[test]
fn create_record_puts_type_first() {
    let post = Post::new().text("hi").created_at(created_at()).build();
    let request = CreateRecord::for_record("did:plc:alice", &post).unwrap();

    assert_eq!(request.collection, "app.bsky.feed.post");
    let record = request.record.as_object().unwrap();
    assert_eq!(record.keys().next().map(|k| k.as_str()), Some("$type"));
    assert_eq!(request.record.type_discriminator(), Some("app.bsky.feed.post"));

    let body = request.encode_body().unwrap().unwrap();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["repo"], "did:plc:alice");
    assert_eq!(body["record"]["text"], "hi");
    assert!(body.get("rkey").is_none());
}
