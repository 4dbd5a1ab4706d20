/// Length- and grapheme-bounded lexicon fields.
pub mod bounded;
/// Records stored in repository collections.
pub mod collection;
/// Open-union codec runtime: discriminator dispatch with a lossless unknown arm.
pub mod union;
/// Generic JSON value used for unrecognized and intentionally-untyped data.
pub mod value;

pub use collection::Collection;
pub use bounded::{GraphemeLimited, LengthLimited, truncate_bytes, truncate_graphemes};
pub use union::{OpenUnion, TYPE_FIELD, UNKNOWN_TAG, UnknownVariant};
pub use value::{Array, Data, Object};
