use indexmap::map::Entry;
use smol_str::SmolStr;

use crate::decode::group::starts_new_group;
use crate::value::{Map, Value, ValueKind};
use crate::{Error, Result};

/// Where the next bracket segment or value of a pair lands.
///
/// `Root` means nothing has been descended into yet: the key head is pending
/// in the root map. `InHash` is a map with a pending label. `InArray` is a list
/// that the next segment either extends or appends to.
pub(crate) enum Context<'a> {
    Root(&'a mut Map, SmolStr),
    InArray(&'a mut Vec<Value>),
    InHash(&'a mut Map, SmolStr),
}

impl<'a> Context<'a> {
    /// Resolve a `[]` segment. `path` is the key text up to and including it.
    pub(crate) fn enter_array(self, path: &[u8]) -> Result<Context<'a>> {
        match self {
            Context::Root(map, key) | Context::InHash(map, key) => {
                list_slot(map, key, path).map(Context::InArray)
            }
            Context::InArray(items) => {
                items.push(Value::List(Vec::new()));
                match items.last_mut() {
                    Some(Value::List(inner)) => Ok(Context::InArray(inner)),
                    _ => unreachable!("a list was just pushed"),
                }
            }
        }
    }

    /// Resolve a `[label]` segment. `rest` is the input after its `]`, used to
    /// look ahead when the active context is an array of hashes.
    pub(crate) fn enter_label(
        self,
        label: SmolStr,
        rest: &[u8],
        path: &[u8],
    ) -> Result<Context<'a>> {
        match self {
            Context::Root(map, key) | Context::InHash(map, key) => {
                map_slot(map, key, path).map(|nested| Context::InHash(nested, label))
            }
            Context::InArray(items) => {
                let fresh = starts_new_group(items.last(), &label, rest)
                    .map_err(|found| Error::conflict(path, found.expected, found.found))?;
                if fresh {
                    if !items.is_empty() {
                        tracing::trace!(label = %label, len = items.len(), "array of hashes: new record");
                    }
                    items.push(Value::Map(Map::new()));
                }
                match items.last_mut() {
                    Some(Value::Map(record)) => Ok(Context::InHash(record, label)),
                    _ => unreachable!("last element was checked to be a map"),
                }
            }
        }
    }

    /// Write the final value of a pair into the active context.
    pub(crate) fn commit(self, value: Value, path: &[u8]) -> Result<()> {
        match self {
            Context::InArray(items) => {
                items.push(value);
                Ok(())
            }
            Context::Root(map, key) | Context::InHash(map, key) => assign(map, key, value, path),
        }
    }
}

/// Store a scalar under `key`, replacing an earlier scalar. Containers are
/// never replaced.
pub(crate) fn assign(map: &mut Map, key: SmolStr, value: Value, path: &[u8]) -> Result<()> {
    match map.entry(key) {
        Entry::Occupied(mut slot) => match slot.get() {
            Value::Scalar(_) => {
                slot.insert(value);
                Ok(())
            }
            found => Err(Error::conflict(path, ValueKind::Scalar, found.kind())),
        },
        Entry::Vacant(slot) => {
            slot.insert(value);
            Ok(())
        }
    }
}

fn list_slot<'m>(map: &'m mut Map, key: SmolStr, path: &[u8]) -> Result<&'m mut Vec<Value>> {
    let slot = map.entry(key).or_insert_with(|| Value::List(Vec::new()));
    if slot.is_absent() {
        *slot = Value::List(Vec::new());
    }
    match slot {
        Value::List(items) => Ok(items),
        found => Err(Error::conflict(path, ValueKind::List, found.kind())),
    }
}

fn map_slot<'m>(map: &'m mut Map, key: SmolStr, path: &[u8]) -> Result<&'m mut Map> {
    let slot = map.entry(key).or_insert_with(|| Value::Map(Map::new()));
    if slot.is_absent() {
        *slot = Value::Map(Map::new());
    }
    match slot {
        Value::Map(nested) => Ok(nested),
        found => Err(Error::conflict(path, ValueKind::Map, found.kind())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_array_then_value() {
        let mut root = Map::new();
        let ctx = Context::Root(&mut root, "a".into());
        let ctx = ctx.enter_array(b"a[]").unwrap();
        ctx.commit(Value::string("1"), b"a[]").unwrap();
        assert_eq!(root["a"], Value::List(vec![Value::string("1")]));
    }

    #[test]
    fn nested_arrays_push_a_fresh_list_each_time() {
        let mut root = Map::new();
        for value in ["x", "y"] {
            let ctx = Context::Root(&mut root, "a".into());
            let ctx = ctx.enter_array(b"a[]").unwrap();
            let ctx = ctx.enter_array(b"a[][]").unwrap();
            ctx.commit(Value::string(value), b"a[][]").unwrap();
        }
        assert_eq!(
            root["a"],
            Value::List(vec![
                Value::List(vec![Value::string("x")]),
                Value::List(vec![Value::string("y")]),
            ])
        );
    }

    #[test]
    fn absent_root_key_is_replaced_by_container() {
        let mut root = Map::new();
        root.insert("a".into(), Value::absent());
        let ctx = Context::Root(&mut root, "a".into());
        let ctx = ctx.enter_label("b".into(), b"=1", b"a[b]").unwrap();
        ctx.commit(Value::string("1"), b"a[b]").unwrap();
        assert!(root["a"].is_map());
    }

    #[test]
    fn scalar_root_key_conflicts_with_list() {
        let mut root = Map::new();
        root.insert("a".into(), Value::string("1"));
        let err = Context::Root(&mut root, "a".into())
            .enter_array(b"a[]")
            .err()
            .unwrap();
        assert_eq!(
            err,
            Error::TypeConflict {
                path: "a[]".to_string(),
                expected: ValueKind::List,
                found: ValueKind::Scalar,
            }
        );
    }

    #[test]
    fn commit_over_container_conflicts() {
        let mut root = Map::new();
        root.insert("a".into(), Value::List(vec![]));
        let err = assign(&mut root, "a".into(), Value::string("1"), b"a").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::TypeConflict);
    }
}
