//! Delimited paths through nested maps and lists.
//!
//! `"abc|2|x"` names key `x` of the map at index 2 of the list under key
//! `abc`. A segment starting with an ASCII digit is a list index, any other
//! segment is a map key; the first segment is always a key of the root map.

use std::mem;

use crate::{ArgList, ArgMap, Variant};

/// Separates the segments of a path key.
pub const PATH_DELIMITER: char = '|';

/// Key under which a scalar is kept when a path turns its slot into a map.
/// Typed reads of a map fall back to this entry.
pub const VALUE_KEY: &str = "value";

fn is_index(segment: &str) -> bool {
    segment.starts_with(|c: char| c.is_ascii_digit())
}

/// Leading decimal digits of `segment`, or `None` when they overflow.
fn parse_index(segment: &str) -> Option<usize> {
    segment
        .bytes()
        .take_while(u8::is_ascii_digit)
        .try_fold(0usize, |index, digit| {
            index.checked_mul(10)?.checked_add((digit - b'0') as usize)
        })
}

/// Follows `path` without modifying anything. Any absent node or container
/// of the wrong kind ends the walk with `None`.
pub(crate) fn resolve(root: &ArgMap, path: &str) -> Option<Variant> {
    let mut segments = path.split(PATH_DELIMITER);
    let first = segments.next()?;
    segments.try_fold(root.get_exact(first)?, |node, segment| {
        if is_index(segment) {
            node.at(parse_index(segment)?)
        } else {
            node.at(segment)
        }
    })
}

enum Container {
    Map(ArgMap),
    List(ArgList),
}

impl Container {
    /// `None` when `segment` is an index no list can reach.
    fn with_slot<R>(&self, segment: &str, f: impl FnOnce(&mut Variant) -> R) -> Option<R> {
        match self {
            Container::Map(map) => Some(map.with_slot(segment, f)),
            Container::List(list) => list.with_slot(parse_index(segment)?, f),
        }
    }
}

/// Shapes `slot` into the container kind the next segment needs.
fn prepare(slot: &mut Variant, want_list: bool) -> Option<Container> {
    if slot.is_null() {
        *slot = if want_list {
            Variant::List(ArgList::new())
        } else {
            Variant::Map(ArgMap::new())
        };
    } else if !want_list && !matches!(slot, Variant::Map(_)) {
        let wrapper = ArgMap::new();
        wrapper.insert(VALUE_KEY, mem::take(slot));
        *slot = Variant::Map(wrapper);
    }

    match slot {
        Variant::List(list) if want_list => Some(Container::List(list.clone())),
        Variant::Map(map) if !want_list => Some(Container::Map(map.clone())),
        _ => None,
    }
}

/// Stores `value` at `path`, creating and reshaping nodes along the way.
///
/// A list index through a node that is neither null nor a list, or an index
/// too large to address, cannot be satisfied and the value is dropped.
pub(crate) fn assign(root: &ArgMap, path: &str, value: Variant) {
    let mut segments = path.split(PATH_DELIMITER);
    let Some(mut current) = segments.next() else {
        return;
    };
    let mut container = Container::Map(root.clone());

    for next in segments {
        let child = container.with_slot(current, |slot| prepare(slot, is_index(next)));
        match child.flatten() {
            Some(child) => container = child,
            None => {
                #[cfg(feature = "logging")]
                log::warn!("path `{path}`: segment `{current}` cannot hold the next segment");
                return;
            }
        }
        current = next;
    }

    match container.with_slot(current, |slot| mem::replace(slot, value)) {
        Some(previous) => drop(previous),
        None => {
            #[cfg(feature = "logging")]
            log::warn!("path `{path}`: index `{current}` is out of range");
        }
    }
}
