use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smol_str::{SmolStr, format_smolstr};

use crate::error::{DecodeError, EncodeError};
use crate::types::value::{Data, Object};

/// Field that carries the discriminator of a lexicon document.
pub const TYPE_FIELD: &str = "$type";

/// Tag reported for an untagged document captured by a lenient union.
pub const UNKNOWN_TAG: &str = "unknown";

/// A union variant this build of the client does not recognize.
///
/// Holds the whole document, `$type` included and in its original position,
/// so it can be written back out exactly as it was received.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UnknownVariant {
    tag: Option<SmolStr>,
    fields: Object,
}

impl UnknownVariant {
    /// Capture a document, reading its discriminator if it has one.
    pub fn from_object(fields: Object) -> Self {
        let tag = fields.type_discriminator().map(SmolStr::new);
        Self { tag, fields }
    }

    /// The captured discriminator, or [`UNKNOWN_TAG`] if the document had none.
    pub fn tag(&self) -> &str {
        self.tag.as_deref().unwrap_or(UNKNOWN_TAG)
    }

    /// Whether the document carried a `$type` of its own.
    pub fn has_tag(&self) -> bool {
        self.tag.is_some()
    }

    /// All captured fields, discriminator included.
    pub fn fields(&self) -> &Object {
        &self.fields
    }

    /// Take the captured fields.
    pub fn into_fields(self) -> Object {
        self.fields
    }

    /// Look up a single captured field.
    pub fn get(&self, key: &str) -> Option<&Data> {
        self.fields.get(key)
    }

    /// Try to read the payload as `T`, for callers that know a shape the
    /// union itself does not.
    pub fn to_typed<T: DeserializeOwned>(&self) -> Result<T, DecodeError> {
        let mut payload = self.fields.clone();
        payload.remove(TYPE_FIELD);
        Data::Object(payload).to_typed()
    }
}

impl Serialize for UnknownVariant {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.fields.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for UnknownVariant {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Object::deserialize(deserializer).map(UnknownVariant::from_object)
    }
}

/// An open union: a fixed set of known variants, each identified by a
/// `$type` tag, plus an escape hatch that keeps anything else intact.
///
/// Usually implemented by `#[open_union]` from `bobbin-derive`. The
/// dispatching logic lives in [`decode_union`] and [`encode_union`].
pub trait OpenUnion: Sized {
    /// Type name, for error messages.
    const NAME: &'static str;
    /// Every tag the union has a dedicated variant for.
    const KNOWN_TAGS: &'static [&'static str];
    /// Whether a document without `$type` is an error (`true`) or is kept as
    /// an unknown variant under [`UNKNOWN_TAG`] (`false`).
    const REQUIRE_TAG: bool = true;

    /// Decode `doc` as the variant for `tag`. `None` if `tag` is not known.
    fn decode_known(tag: &str, doc: Object) -> Option<Result<Self, DecodeError>>;

    /// Encode a known variant as its tag and payload object. `None` for the
    /// unknown arm.
    fn encode_known(&self) -> Option<Result<(&'static str, Object), EncodeError>>;

    /// Wrap a captured unknown document.
    fn from_unknown(unknown: UnknownVariant) -> Self;

    /// The captured document, if this is the unknown arm.
    fn as_unknown(&self) -> Option<&UnknownVariant>;

    /// The discriminator this value encodes with.
    fn tag(&self) -> &str;

    /// True unless this is the unknown arm.
    fn is_known(&self) -> bool {
        self.as_unknown().is_none()
    }
}

/// Decode a document into an open union.
///
/// An unrecognized tag is not an error: the document is kept as the unknown
/// variant. Errors are reserved for documents that are not objects, that lack
/// a required tag, or whose tag is known but whose payload is malformed.
pub fn decode_union<U: OpenUnion>(data: Data) -> Result<U, DecodeError> {
    let doc = match data {
        Data::Object(doc) => doc,
        other => {
            return Err(DecodeError::InvalidDiscriminator {
                expected: U::NAME,
                reason: format_smolstr!("expected an object, found {}", other.kind()),
            });
        }
    };

    // A non-string `$type` counts as no tag at all.
    let tag = doc.type_discriminator().map(SmolStr::new);
    match tag {
        Some(tag) if U::KNOWN_TAGS.contains(&tag.as_str()) => {
            U::decode_known(&tag, doc).unwrap_or_else(|| {
                Err(DecodeError::InvalidDiscriminator {
                    expected: U::NAME,
                    reason: format_smolstr!("`{tag}` is listed as known but has no variant"),
                })
            })
        }
        Some(_tag) => {
            #[cfg(feature = "tracing")]
            tracing::trace!(union = U::NAME, tag = %_tag, "keeping unrecognized union variant");
            Ok(U::from_unknown(UnknownVariant::from_object(doc)))
        }
        None if U::REQUIRE_TAG => Err(DecodeError::MissingDiscriminator { expected: U::NAME }),
        None => Ok(U::from_unknown(UnknownVariant::from_object(doc))),
    }
}

/// Encode an open union as one flat object with `$type` first.
///
/// The unknown arm is written back verbatim.
pub fn encode_union<U: OpenUnion>(value: &U) -> Result<Data, EncodeError> {
    match value.encode_known() {
        Some(encoded) => {
            let (tag, payload) = encoded?;
            let mut out = IndexMap::with_capacity(payload.len() + 1);
            out.insert(SmolStr::new_static(TYPE_FIELD), Data::String(SmolStr::new_static(tag)));
            for (key, field) in payload {
                if key != TYPE_FIELD {
                    out.insert(key, field);
                }
            }
            Ok(Data::Object(Object(out)))
        }
        None => value
            .as_unknown()
            .map(|unknown| Data::Object(unknown.fields().clone()))
            .ok_or_else(|| {
                EncodeError::Other(format!("{} value is neither known nor unknown", U::NAME))
            }),
    }
}

/// Decode the payload of a known variant, with the discriminator stripped.
///
/// Failures are reported as [`DecodeError::Variant`] so they are not confused
/// with an unrecognized tag.
pub fn decode_payload<T: DeserializeOwned>(tag: &str, mut doc: Object) -> Result<T, DecodeError> {
    doc.remove(TYPE_FIELD);
    Data::Object(doc)
        .to_typed()
        .map_err(|source| DecodeError::Variant {
            tag: SmolStr::new(tag),
            source: Box::new(source),
        })
}

/// Encode the payload of a known variant. It has to come out as an object.
pub fn encode_payload<T: Serialize + ?Sized>(
    tag: &'static str,
    payload: &T,
) -> Result<(&'static str, Object), EncodeError> {
    match Data::from_typed(payload)? {
        Data::Object(obj) => Ok((tag, obj)),
        _ => Err(EncodeError::NotAnObject { tag }),
    }
}

/// `Serialize` body for an open union type.
pub fn serialize_union<U, S>(value: &U, serializer: S) -> Result<S::Ok, S::Error>
where
    U: OpenUnion,
    S: Serializer,
{
    if let Some(unknown) = value.as_unknown() {
        return unknown.serialize(serializer);
    }
    encode_union(value)
        .map_err(serde::ser::Error::custom)?
        .serialize(serializer)
}

/// `Deserialize` body for an open union type.
pub fn deserialize_union<'de, U, D>(deserializer: D) -> Result<U, D::Error>
where
    U: OpenUnion,
    D: Deserializer<'de>,
{
    let data = Data::deserialize(deserializer)?;
    decode_union(data).map_err(serde::de::Error::custom)
}
