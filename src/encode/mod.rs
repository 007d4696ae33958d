use smallvec::SmallVec;
use smol_str::SmolStr;

use crate::text::percent::encode_component_into;
use crate::value::{Map, Value};

enum Frame<'a> {
    Map {
        entries: indexmap::map::Iter<'a, SmolStr, Value>,
        base: usize,
        root: bool,
    },
    List {
        items: std::slice::Iter<'a, Value>,
        base: usize,
    },
}

/// Write a tree back out in bracket-path form.
///
/// Values are percent-encoded; keys and labels are written as they are, the
/// same way the parser reads them. Empty lists and maps produce no pairs and
/// absent scalars produce a bare key.
///
/// # Examples
/// ```
/// let map = nested_query::parse("a=x+y&b[][c]=1&d").unwrap();
/// assert_eq!(nested_query::encode::to_query_string(&map), "a=x+y&b[][c]=1&d");
/// ```
pub fn to_query_string(map: &Map) -> String {
    let mut out = String::new();
    let mut prefix = String::new();
    let mut stack: SmallVec<[Frame<'_>; 8]> = SmallVec::new();
    stack.push(Frame::Map {
        entries: map.iter(),
        base: 0,
        root: true,
    });

    while let Some(frame) = stack.last_mut() {
        let next = match frame {
            Frame::Map {
                entries,
                base,
                root,
            } => entries.next().map(|(key, value)| {
                prefix.truncate(*base);
                if *root {
                    prefix.push_str(key);
                } else {
                    prefix.push('[');
                    prefix.push_str(key);
                    prefix.push(']');
                }
                value
            }),
            Frame::List { items, base } => items.next().map(|value| {
                prefix.truncate(*base);
                prefix.push_str("[]");
                value
            }),
        };
        let Some(value) = next else {
            stack.pop();
            continue;
        };
        match value {
            Value::Scalar(text) => {
                if !out.is_empty() {
                    out.push('&');
                }
                out.push_str(&prefix);
                if let Some(text) = text {
                    out.push('=');
                    encode_component_into(&mut out, text);
                }
            }
            Value::List(items) => stack.push(Frame::List {
                items: items.iter(),
                base: prefix.len(),
            }),
            Value::Map(nested) => stack.push(Frame::Map {
                entries: nested.iter(),
                base: prefix.len(),
                root: false,
            }),
        }
    }

    out
}
