use bobbin_common::error::DecodeError;
use bobbin_common::types::union::{OpenUnion, UnknownVariant};
use bobbin_common::types::value::Data;
use bobbin_derive::open_union;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
struct TypeA {
    value: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
struct TypeB {
    item_count: i64,
}

#[open_union]
#[derive(Debug, Clone, PartialEq)]
enum TestUnion {
    #[tag = "com.example.typeA"]
    TypeA(TypeA),
    #[tag = "com.example.typeB"]
    TypeB(Box<TypeB>),
}

#[open_union(lenient)]
#[derive(Debug, Clone, PartialEq)]
enum LenientUnion {
    #[tag = "com.example.typeA"]
    TypeA(TypeA),
}

#[test]
fn test_open_union_known_variant() {
    let json = r#"{"$type":"com.example.typeA","value":"hello"}"#;
    let union: TestUnion = serde_json::from_str(json).unwrap();

    match &union {
        TestUnion::TypeA(a) => assert_eq!(a.value, "hello"),
        _ => panic!("expected TypeA"),
    }
    assert!(union.is_known());
    assert_eq!(union.tag(), "com.example.typeA");
}

#[test]
fn test_open_union_unknown_variant() {
    let json = r#"{"$type":"com.example.unknown","data":"something","nested":{"deep":[1,2.5]}}"#;
    let union: TestUnion = serde_json::from_str(json).unwrap();

    match &union {
        TestUnion::Unknown(unknown) => {
            assert_eq!(unknown.tag(), "com.example.unknown");
            assert_eq!(unknown.get("data"), Some(&Data::from("something")));
        }
        _ => panic!("expected Unknown variant"),
    }
    assert!(!union.is_known());

    // Re-encoding reproduces the input exactly, key order included.
    assert_eq!(serde_json::to_string(&union).unwrap(), json);
}

#[test]
fn test_open_union_roundtrip() {
    let union = TestUnion::TypeB(Box::new(TypeB { item_count: 42 }));
    let json = serde_json::to_string(&union).unwrap();
    assert_eq!(json, r#"{"$type":"com.example.typeB","itemCount":42}"#);

    let parsed: TestUnion = serde_json::from_str(&json).unwrap();
    assert_eq!(union, parsed);
}

#[test]
fn test_open_union_constructed_unknown() {
    let fields = [("$type", Data::from("com.example.custom")), ("field1", Data::from(123i64))]
        .into_iter()
        .collect();
    let union = TestUnion::from_unknown(UnknownVariant::from_object(fields));

    let json = serde_json::to_value(&union).unwrap();
    assert_eq!(json, json!({"$type": "com.example.custom", "field1": 123}));
}

#[test]
fn test_known_tags_and_name() {
    assert_eq!(TestUnion::NAME, "TestUnion");
    assert_eq!(
        TestUnion::KNOWN_TAGS,
        &["com.example.typeA", "com.example.typeB"]
    );
    assert!(TestUnion::REQUIRE_TAG);
    assert!(!LenientUnion::REQUIRE_TAG);
}

#[test]
fn test_missing_tag() {
    let err = serde_json::from_value::<TestUnion>(json!({"value": "x"})).unwrap_err();
    assert!(err.to_string().contains("$type"), "{err}");

    let lenient: LenientUnion = serde_json::from_value(json!({"value": "x"})).unwrap();
    match lenient {
        LenientUnion::Unknown(unknown) => {
            assert!(!unknown.has_tag());
            assert_eq!(unknown.get("value"), Some(&Data::from("x")));
        }
        _ => panic!("expected Unknown variant"),
    }
}

#[test]
fn test_malformed_known_variant_is_not_unknown() {
    let data = Data::from(json!({"$type": "com.example.typeB", "itemCount": "many"}));
    let err = bobbin_common::types::union::decode_union::<TestUnion>(data).unwrap_err();
    match err {
        DecodeError::Variant { tag, .. } => assert_eq!(tag, "com.example.typeB"),
        other => panic!("unexpected: {other:?}"),
    }
}
