//! Dynamically typed argument maps: shared [`ArgMap`] and [`ArgList`]
//! containers of [`Variant`] values, coercing typed reads, `|`-delimited
//! paths into nested containers, a registry for user types, and a compact
//! CBOR encoding of the whole tree.
//!
//! ```
//! use argmap::ArgMap;
//!
//! let map = ArgMap::new();
//! map.set("range", 100);
//! map.set("range|units", "dBm");
//!
//! let decoded = ArgMap::from_slice(&map.to_vec());
//! assert_eq!(decoded.get("range", 0), 100);
//! assert_eq!(decoded.get_str("range|units", ""), "dBm");
//! ```

pub mod cbor;
mod convert;
mod display;
mod error;
mod index;
mod path;
pub mod registry;
#[cfg(feature = "serde")]
mod ser;
mod tag;
mod util;
pub mod value;

pub use cbor::{CodecConfig, Decoder, Encoder};
pub use convert::FromVariant;
pub use error::*;
pub use index::*;
pub use path::{PATH_DELIMITER, VALUE_KEY};
pub use registry::TYPE_KEY;
pub use tag::*;
pub use value::*;
