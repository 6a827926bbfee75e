//! Compact binary encoding of an [`ArgMap`](crate::ArgMap) tree.
//!
//! The wire format is CBOR (RFC 8949). [`Writer`] and [`Reader`] handle
//! item headers, tags and buffer bounds; [`Encoder`] and [`Decoder`] walk a
//! tree on top of them. Numeric vectors travel as RFC 8746 little-endian
//! typed arrays, other vectors under the homogeneous-array tag, and times as
//! RFC 9581 extended time maps.

mod consts;
mod decode;
mod encode;
mod reader;
mod typed;
mod writer;

pub use consts::*;
pub use decode::*;
pub use encode::*;
pub use reader::*;
pub use writer::*;

/// Containers nested deeper than this are not followed.
pub const MAX_DEPTH: usize = 256;
