//! Error types for the binary codec.
//!
//! Reading values never fails: a missing key, a null entry, or a value that
//! cannot be coerced all resolve to the caller's default. The only failures
//! that surface as [`Error`] come from the byte codec, most notably
//! [`Error::BufferTooSmall`] when an encode does not fit the caller's buffer.
//!
//! # Example
//!
//! ```
//! use argmap::{ArgMap, Encoder, Error};
//!
//! let map = ArgMap::new();
//! map.set("name", "Glenn");
//!
//! let mut small = [0u8; 4];
//! let mut encoder = Encoder::new(&mut small);
//! match encoder.encode(&map) {
//!     Ok(len) => println!("wrote {len} bytes"),
//!     Err(Error::BufferTooSmall { needed, .. }) => {
//!         let mut big = vec![0u8; needed];
//!         encoder.init_buffer(&mut big);
//!         assert_eq!(encoder.encode(&map).unwrap(), needed);
//!     }
//!     Err(e) => panic!("{e}"),
//! }
//! ```

use std::fmt::{self, Display};

/// Alias for a `Result` with the error type [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// This type represents all possible errors that can occur when encoding or
/// decoding the wire format.
#[derive(Debug)]
pub enum Error {
    /// An I/O error occurred.
    ///
    /// Only returned by the convenience helpers that write into a
    /// [`std::io::Write`] implementation.
    IO(std::io::Error),

    /// The destination buffer was exhausted during an encode.
    ///
    /// Encoding kept walking the tree in measurement-only mode, so `needed`
    /// is the exact size a retry requires.
    BufferTooSmall { needed: usize, capacity: usize },

    /// The input ended in the middle of a wire item.
    EndOfFile,

    /// An initial byte uses a reserved or unsupported additional-info value
    /// (28-31).
    InvalidHeader(u8),

    /// Containers are nested deeper than the codec is willing to follow.
    NestingTooDeep(usize),
}

impl Display for Error {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::IO(error) => formatter.write_str(&error.to_string()),
            Error::BufferTooSmall { needed, capacity } => formatter.write_str(&format!(
                "buffer too small: {needed} bytes needed, {capacity} available"
            )),
            Error::EndOfFile => formatter.write_str("unexpected end of input"),
            Error::InvalidHeader(byte) => {
                formatter.write_str(&format!("invalid or unsupported item header: {byte:#04x}"))
            }
            Error::NestingTooDeep(depth) => {
                formatter.write_str(&format!("containers nested deeper than {depth} levels"))
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IO(error) => Some(error),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::IO(error)
    }
}
