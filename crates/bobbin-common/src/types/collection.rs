use core::fmt;

use serde::Serialize;

use crate::error::EncodeError;
use crate::types::union::{TYPE_FIELD, encode_payload};
use crate::types::value::{Data, Object};

/// A record type stored in a repository collection.
///
/// The collection NSID doubles as the record's `$type`.
pub trait Collection: fmt::Debug + Serialize {
    /// Collection NSID, e.g. `app.bsky.feed.post`
    const NSID: &'static str;

    /// Encode the record as a repository document, `$type` first.
    fn to_record_data(&self) -> Result<Data, EncodeError> {
        let (tag, fields) = encode_payload(Self::NSID, self)?;
        let mut doc = Object::new();
        doc.insert(TYPE_FIELD, tag);
        for (key, value) in fields {
            if key != TYPE_FIELD {
                doc.insert(key, value);
            }
        }
        Ok(Data::Object(doc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Serialize)]
    struct Like {
        subject: &'static str,
    }

    impl Collection for Like {
        const NSID: &'static str = "app.bsky.feed.like";
    }

    #[test]
    fn record_data_leads_with_type() {
        let data = Like { subject: "at://x" }.to_record_data().unwrap();
        assert_eq!(
            data.to_json_string().unwrap(),
            r#"{"$type":"app.bsky.feed.like","subject":"at://x"}"#
        );
    }
}
