//! Record boundaries inside arrays of hashes.
//!
//! A flat query repeats the same labels for every record:
//! `users[][id]=1&users[][name]=a&users[][id]=2&users[][name]=b`. Each labeled
//! value either extends the last map of the array or opens a new one, and the
//! only signal is whether the last map already holds a value at the path the
//! current pair is about to write.

use crate::decode::scan::following_labels;
use crate::value::{Value, ValueKind};

/// Container mismatch found while probing the last record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Mismatch {
    pub expected: ValueKind,
    pub found: ValueKind,
}

/// Decide whether a value labeled `label` opens a new record in an array
/// whose last element is `last`.
///
/// `rest` is the remainder of the input right after the `[label]` segment.
/// When `last[label]` is a map, the `[label]` segments that follow are walked
/// through the nested maps so `users[][data][id]` is compared at `data.id`
/// rather than at `data`. A new record starts when the walk lands on a bound
/// value; absent markers count as unbound.
pub(crate) fn starts_new_group(
    last: Option<&Value>,
    label: &str,
    rest: &[u8],
) -> Result<bool, Mismatch> {
    let Some(last) = last else {
        return Ok(true);
    };
    let Value::Map(record) = last else {
        return Err(Mismatch {
            expected: ValueKind::Map,
            found: last.kind(),
        });
    };

    let mut bound = record.get(label);
    if matches!(bound, Some(Value::Map(_))) {
        for next in following_labels(rest) {
            let current = match bound {
                Some(value) if !value.is_absent() => value,
                _ => break,
            };
            let Value::Map(nested) = current else {
                return Err(Mismatch {
                    expected: ValueKind::Map,
                    found: current.kind(),
                });
            };
            bound = std::str::from_utf8(next)
                .ok()
                .and_then(|key| nested.get(key));
        }
    }

    Ok(bound.is_some_and(|value| !value.is_absent()))
}
