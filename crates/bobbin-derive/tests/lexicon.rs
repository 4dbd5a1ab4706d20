use bobbin_common::types::value::Data;
use bobbin_derive::lexicon;
use serde::{Deserialize, Serialize};

#[lexicon]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
struct TestRecord {
    text: String,
    count: i64,
}

#[test]
fn test_lexicon_adds_extra_data_field() {
    let json = r#"{"text":"hello","count":42,"unknown":"field","another":123}"#;

    let record: TestRecord = serde_json::from_str(json).unwrap();

    assert_eq!(record.text, "hello");
    assert_eq!(record.count, 42);
    assert_eq!(record.extra_data.len(), 2);
    assert_eq!(record.extra_data.get("unknown"), Some(&Data::from("field")));
    assert_eq!(record.extra_data.get("another"), Some(&Data::Integer(123)));
}

#[test]
fn test_lexicon_roundtrip() {
    let json = r#"{"text":"hello","count":42,"custom":{"nested":[true,null]}}"#;
    let record: TestRecord = serde_json::from_str(json).unwrap();
    assert_eq!(serde_json::to_string(&record).unwrap(), json);
}

#[test]
fn test_lexicon_without_extra_fields() {
    let record = TestRecord {
        text: "hi".into(),
        count: 1,
        extra_data: Default::default(),
    };
    assert_eq!(
        serde_json::to_string(&record).unwrap(),
        r#"{"text":"hi","count":1}"#
    );
}
