use super::*;
use serde::Deserialize;

#[test]
fn serialize_deserialize_scalars() {
    for (json, expected) in [
        ("null", Data::Null),
        ("true", Data::Boolean(true)),
        ("42", Data::Integer(42)),
        ("-7", Data::Integer(-7)),
        ("1.5", Data::Float(1.5)),
        ("\"hello\"", Data::String("hello".into())),
    ] {
        let parsed = Data::from_json_str(json).unwrap();
        assert_eq!(parsed, expected, "parsing {json}");
        assert_eq!(parsed.to_json_string().unwrap(), json);
    }
}

#[test]
fn integer_and_float_stay_distinct() {
    let int = Data::from_json_str("1").unwrap();
    let float = Data::from_json_str("1.0").unwrap();
    assert_eq!(int, Data::Integer(1));
    assert_eq!(float, Data::Float(1.0));
    assert_ne!(int, float);
    assert_eq!(float.to_json_string().unwrap(), "1.0");
}

#[test]
fn integers_above_i64_stay_exact() {
    let parsed = Data::from_json_str("18446744073709551615").unwrap();
    assert_eq!(parsed, Data::Unsigned(u64::MAX));
    assert_eq!(parsed.to_json_string().unwrap(), "18446744073709551615");
    assert_eq!(parsed.kind(), "integer");

    let fits = Data::from_json_str("9223372036854775807").unwrap();
    assert_eq!(fits, Data::Integer(i64::MAX));
    assert_eq!(Data::from(9_223_372_036_854_775_808u64), Data::Unsigned(1 << 63));

    let json: serde_json::Value = serde_json::from_str("18446744073709551615").unwrap();
    assert_eq!(Data::from(json.clone()), Data::Unsigned(u64::MAX));
    assert_eq!(serde_json::Value::from(Data::Unsigned(u64::MAX)), json);

    let big: u64 = Data::Unsigned(u64::MAX).to_typed().unwrap();
    assert_eq!(big, u64::MAX);
    assert_eq!(Data::from_typed(&u64::MAX).unwrap(), Data::Unsigned(u64::MAX));
    assert!(matches!(
        Data::from_typed(&u128::MAX),
        Err(EncodeError::Data(DataError::IntegerOutOfRange))
    ));
}

#[test]
fn object_preserves_key_order() {
    let json = r#"{"zeta":1,"alpha":{"y":true,"b":null},"$type":"com.example.thing","m":[3,2,1]}"#;
    let data = Data::from_json_str(json).unwrap();

    let keys: Vec<&str> = data.as_object().unwrap().keys().map(|k| k.as_str()).collect();
    assert_eq!(keys, ["zeta", "alpha", "$type", "m"]);
    assert_eq!(data.to_json_string().unwrap(), json);
    assert_eq!(data.type_discriminator(), Some("com.example.thing"));
}

#[test]
fn deep_nesting_is_not_limited() {
    // Well past serde_json's default limit of 128.
    let depth = 512;
    let json = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
    let data = Data::from_json_str(&json).unwrap();

    let mut level = 0;
    let mut cursor = &data;
    while let Some(arr) = cursor.as_array() {
        level += 1;
        match arr.get(0) {
            Some(next) => cursor = next,
            None => break,
        }
    }
    assert_eq!(level, depth);
}

#[test]
fn trailing_garbage_is_rejected() {
    assert!(Data::from_json_str("{} {}").is_err());
    assert!(Data::from_json_str("{\"a\":").is_err());
}

#[test]
fn accessors() {
    let data = Data::from_json_str(r#"{"s":"x","i":3,"f":2.5,"b":false,"a":[1],"n":null}"#).unwrap();
    assert_eq!(data.get("s").and_then(Data::as_str), Some("x"));
    assert_eq!(data.get("i").and_then(Data::as_integer), Some(3));
    assert_eq!(data.get("i").and_then(Data::as_float), Some(3.0));
    assert_eq!(data.get("f").and_then(Data::as_float), Some(2.5));
    assert_eq!(data.get("f").and_then(Data::as_integer), None);
    assert_eq!(data.get("b").and_then(Data::as_bool), Some(false));
    assert_eq!(data.get("a").and_then(Data::as_array).map(Array::len), Some(1));
    assert!(data.get("n").is_some_and(Data::is_null));
    assert!(data.get("missing").is_none());
    assert_eq!(data.type_discriminator(), None);
}

#[test]
fn to_typed_and_from_typed() {
    #[derive(Debug, PartialEq, serde::Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Thing {
        display_name: String,
        count: u32,
        ratio: f64,
        tags: Vec<String>,
        note: Option<String>,
    }

    let thing = Thing {
        display_name: "bobbin".into(),
        count: 3,
        ratio: 0.5,
        tags: vec!["a".into(), "b".into()],
        note: None,
    };
    let data = Data::from_typed(&thing).unwrap();
    let keys: Vec<&str> = data.as_object().unwrap().keys().map(|k| k.as_str()).collect();
    assert_eq!(keys, ["displayName", "count", "ratio", "tags", "note"]);

    let back: Thing = data.to_typed().unwrap();
    assert_eq!(back, thing);
}

#[test]
fn to_typed_reports_shape_mismatch() {
    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Needs {
        x: i64,
    }

    let data = Data::from_json_str(r#"{"y":1}"#).unwrap();
    assert!(matches!(
        data.to_typed::<Needs>(),
        Err(DecodeError::Data(DataError::Message(_)))
    ));

    let data = Data::from_json_str(r#"{"x":"one"}"#).unwrap();
    assert!(data.to_typed::<Needs>().is_err());
}

#[test]
fn to_typed_enums() {
    #[derive(Debug, PartialEq, Deserialize)]
    #[serde(rename_all = "snake_case")]
    enum Filter {
        PostsWithReplies,
        PostsNoReplies,
    }

    #[derive(Debug, PartialEq, Deserialize)]
    enum Shape {
        Point { x: i64 },
    }

    let filter: Filter = Data::from("posts_no_replies").to_typed().unwrap();
    assert_eq!(filter, Filter::PostsNoReplies);

    let shape: Shape = Data::from_json_str(r#"{"Point":{"x":4}}"#)
        .unwrap()
        .to_typed()
        .unwrap();
    assert_eq!(shape, Shape::Point { x: 4 });
}

#[test]
fn serde_json_value_conversion() {
    let value = serde_json::json!({
        "text": "hi",
        "n": 5,
        "f": 0.25,
        "list": [true, null],
    });
    let data = Data::from(value.clone());
    assert_eq!(data.get("n"), Some(&Data::Integer(5)));
    assert_eq!(data.get("f"), Some(&Data::Float(0.25)));

    let back: serde_json::Value = data.into();
    assert_eq!(back, value);
}

#[test]
fn display_is_compact_json() {
    let data = Data::from_json_str(r#"{ "a" : [ 1, 2 ] }"#).unwrap();
    assert_eq!(data.to_string(), r#"{"a":[1,2]}"#);
}

#[test]
fn object_remove_keeps_order() {
    let mut obj: Object = [("a", 1i64), ("b", 2), ("c", 3)].into_iter().collect();
    obj.remove("b");
    obj.insert("d", 4i64);
    let keys: Vec<&str> = obj.keys().map(|k| k.as_str()).collect();
    assert_eq!(keys, ["a", "c", "d"]);
}

#[test]
fn bytes_serialize_as_dollar_bytes() {
    let data = Data::from_typed(&serde_bytes_like(&[1, 2, 3])).unwrap();
    assert_eq!(data.get("$bytes").and_then(Data::as_str), Some("AQID"));
}

fn serde_bytes_like(bytes: &[u8]) -> impl serde::Serialize + '_ {
    struct Raw<'a>(&'a [u8]);
    impl serde::Serialize for Raw<'_> {
        fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
            s.serialize_bytes(self.0)
        }
    }
    Raw(bytes)
}
