//! JSON-like text rendering for logs and diagnostics.
//!
//! Maps print with sorted keys and without null entries, numbers use the
//! same text form as a string read of the value, and times print as
//! seconds. The output is meant for people; it is not parsed back.

use std::fmt::{self, Display, Write};

use crate::{ArgList, ArgMap, Variant, Vector, convert::scalar_to_string, registry::registry};

fn write_escaped(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    f.write_char('"')?;
    for c in text.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if c.is_control() => write!(f, "\\u{:04x}", u32::from(c))?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('"')
}

fn write_seq<'a>(
    f: &mut fmt::Formatter<'_>,
    items: impl IntoIterator<Item = &'a Variant>,
) -> fmt::Result {
    f.write_char('[')?;
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            f.write_char(',')?;
        }
        Display::fmt(item, f)?;
    }
    f.write_char(']')
}

impl Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Null => f.write_str("null"),
            Variant::String(text) => write_escaped(f, text),
            Variant::Complex32(_) | Variant::Complex64(_) => {
                write_escaped(f, &scalar_to_string(self).unwrap_or_default())
            }
            Variant::Map(map) => Display::fmt(map, f),
            Variant::List(list) => Display::fmt(list, f),
            Variant::Vector(vector) => Display::fmt(vector, f),
            Variant::Custom(custom) => Display::fmt(&registry().to_arg_map(custom), f),
            scalar => f.write_str(&scalar_to_string(scalar).unwrap_or_default()),
        }
    }
}

impl Display for ArgMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries: Vec<_> = self.iter().filter(|(_, value)| !value.is_null()).collect();
        entries.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));

        f.write_char('{')?;
        for (i, (key, value)) in entries.iter().enumerate() {
            if i > 0 {
                f.write_char(',')?;
            }
            write_escaped(f, key)?;
            f.write_char(':')?;
            Display::fmt(value, f)?;
        }
        f.write_char('}')
    }
}

impl Display for ArgList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_seq(f, &self.iter().collect::<Vec<_>>())
    }
}

impl Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_seq(f, &self.to_variants())
    }
}
