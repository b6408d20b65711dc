//! Higher-order operations over [`Map`].
//!
//! Everything here is built from the map's primitives (`get`, `insert`,
//! `delete`, `to_list`) and never reaches into the table itself.
//!
//! Operations that modify their input (`update`, `merge`, `drop`) do so in
//! place and return the same handle. `map_values`, `filter`, `take` and
//! `from_list` build a fresh map, sharing the source map's token cache.
use crate::identity::SharedTokenCache;
use crate::map::Map;
use crate::value::{MResult, Value};

pub fn has_key(map: &Map, key: &Value) -> bool {
    map.get(key).is_ok()
}

/// Replace the value under `key` with `fun(current)`, where `current` is
/// `None` if the key is absent.
pub fn update<F>(map: &Map, key: Value, fun: F) -> Map
where
    F: FnOnce(Option<Value>) -> Value,
{
    let current = map.get(&key).ok();
    map.insert(key, fun(current))
}

/// Later pairs win over earlier pairs with an equal key
pub fn from_list<I>(pairs: I) -> Map
where
    I: IntoIterator<Item = (Value, Value)>,
{
    insert_pairs(Map::new(), pairs)
}

/// Same as [`from_list`], deriving key tokens through an existing cache
pub fn from_list_with_cache<I>(pairs: I, cache: SharedTokenCache) -> Map
where
    I: IntoIterator<Item = (Value, Value)>,
{
    insert_pairs(Map::with_cache(cache), pairs)
}

fn insert_pairs<I>(map: Map, pairs: I) -> Map
where
    I: IntoIterator<Item = (Value, Value)>,
{
    pairs
        .into_iter()
        .fold(map, |map, (k, v)| map.insert(k, v))
}

/// Fold over every entry in table order. Table order is unspecified, so
/// `fun` should not depend on it.
pub fn fold<A, F>(map: &Map, initial: A, mut fun: F) -> A
where
    F: FnMut(A, Value, Value) -> A,
{
    map.to_list()
        .into_iter()
        .fold(initial, |acc, (k, v)| fun(acc, k, v))
}

pub fn map_values<F>(map: &Map, mut fun: F) -> Map
where
    F: FnMut(&Value, &Value) -> Value,
{
    fold(map, map.empty_like(), |acc, k, v| {
        let new_value = fun(&k, &v);
        acc.insert(k, new_value)
    })
}

/// Keep only the entries for which `predicate(key, value)` holds
pub fn filter<F>(map: &Map, mut predicate: F) -> Map
where
    F: FnMut(&Value, &Value) -> bool,
{
    fold(map, map.empty_like(), |acc, k, v| {
        if predicate(&k, &v) {
            acc.insert(k, v)
        } else {
            acc
        }
    })
}

/// All keys, in the same order as `to_list`
pub fn keys(map: &Map) -> Vec<Value> {
    fold(map, Vec::with_capacity(map.size()), |mut acc, k, _| {
        acc.push(k);
        acc
    })
}

/// All values, in the same order as `to_list`
pub fn values(map: &Map) -> Vec<Value> {
    fold(map, Vec::with_capacity(map.size()), |mut acc, _, v| {
        acc.push(v);
        acc
    })
}

/// A new map with just the `desired_keys` that are present in `map`.
/// Missing keys are skipped.
pub fn take<'a, I>(map: &Map, desired_keys: I) -> Map
where
    I: IntoIterator<Item = &'a Value>,
{
    desired_keys
        .into_iter()
        .fold(map.empty_like(), |taken, key| {
            match map.get(key) {
                Ok(value) => taken.insert(key.clone(), value),
                Err(_) => taken,
            }
        })
}

/// Insert every entry of `new_entries` into `map`; `new_entries` wins on
/// conflicting keys.
pub fn merge(map: &Map, new_entries: &Map) -> Map {
    insert_pairs(map.clone(), new_entries.to_list())
}

/// Delete each of `disallowed_keys` from `map`, in order
pub fn drop<'a, I>(map: &Map, disallowed_keys: I) -> Map
where
    I: IntoIterator<Item = &'a Value>,
{
    disallowed_keys
        .into_iter()
        .fold(map.clone(), |map, key| map.delete(key))
}

/**************************\
|* Host list entry points *|
\**************************/
// Inputs arriving as runtime lists have to be checked for shape. A non-list,
// or an element that isn't a `#(key, value)` pair, aborts the whole
// operation with `MalformedSequence`.

/// Build a map from a list of `#(key, value)` tuples
pub fn from_value_list(pairs: &Value) -> MResult<Map> {
    merge_listed(&Map::new(), pairs)
}

/// [`merge`] with the new entries given as a list of `#(key, value)` tuples
pub fn merge_listed(map: &Map, new_entries: &Value) -> MResult<Map> {
    new_entries
        .expect_list()?
        .iter()
        .try_fold(map.clone(), |map, pair| {
            let (k, v) = pair.expect_pair()?;
            Ok(map.insert(k.clone(), v.clone()))
        })
}

pub fn take_listed(map: &Map, desired_keys: &Value) -> MResult<Map> {
    Ok(take(map, desired_keys.expect_list()?))
}

pub fn drop_listed(map: &Map, disallowed_keys: &Value) -> MResult<Map> {
    Ok(drop(map, disallowed_keys.expect_list()?))
}

/// The map's entries as a host list of `#(key, value)` tuples
pub fn to_value_list(map: &Map) -> Value {
    Value::list(
        map.to_list()
            .into_iter()
            .map(|(k, v)| Value::pair(k, v)),
    )
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::identity::{CacheConfig, TokenCache};
    use crate::value::MapError;

    fn s(text: &str) -> Value {
        Value::from(text)
    }

    fn abc() -> Map {
        from_list([
            (s("a"), Value::Int(1)),
            (s("b"), Value::Int(2)),
            (s("c"), Value::Int(3)),
        ])
    }

    fn sorted(items: Vec<Value>) -> Vec<String> {
        let mut rendered: Vec<String> =
            items.iter().map(Value::to_string).collect();
        rendered.sort();
        rendered
    }

    fn add_ten(current: Option<Value>) -> Value {
        let n = current
            .and_then(|v| isize::try_from(&v).ok())
            .unwrap_or(0);
        Value::Int(n + 10)
    }

    #[test]
    fn test_update_present_and_absent() {
        let m = from_list([(s("a"), Value::Int(1)), (s("b"), Value::Int(2))]);

        let result = update(&m, s("a"), add_ten);
        assert_eq!(result.get(&s("a")), Ok(Value::Int(11)));

        let result = update(&m, s("c"), add_ten);
        assert_eq!(result.get(&s("c")), Ok(Value::Int(10)));
    }

    #[test]
    fn test_has_key() {
        let m = abc();
        assert!(has_key(&m, &s("a")));
        assert!(!has_key(&m, &s("z")));
    }

    #[test]
    fn test_from_list_last_wins() {
        let m = from_list([
            (s("a"), Value::Int(1)),
            (s("a"), Value::Int(2)),
        ]);
        assert_eq!(m.size(), 1);
        assert_eq!(m.get(&s("a")), Ok(Value::Int(2)));
    }

    #[test]
    fn test_filter() {
        let m = filter(&abc(), |_, v| {
            matches!(v, Value::Int(n) if *n > 1)
        });

        assert_eq!(m.size(), 2);
        assert_eq!(m.get(&s("b")), Ok(Value::Int(2)));
        assert_eq!(m.get(&s("c")), Ok(Value::Int(3)));
        assert!(!has_key(&m, &s("a")));
    }

    #[test]
    fn test_map_values_builds_fresh_map() {
        let original = abc();
        let doubled = map_values(&original, |_, v| {
            match v {
                Value::Int(n) => Value::Int(n * 2),
                other => other.clone(),
            }
        });

        assert!(!doubled.ptr_eq(&original));
        assert_eq!(doubled.get(&s("c")), Ok(Value::Int(6)));
        assert_eq!(original.get(&s("c")), Ok(Value::Int(3)));
    }

    #[test]
    fn test_keys_and_values_follow_to_list() {
        let m = abc();
        let listed = m.to_list();

        let expected_keys: Vec<Value> =
            listed.iter().map(|(k, _)| k.clone()).collect();
        let expected_values: Vec<Value> =
            listed.iter().map(|(_, v)| v.clone()).collect();

        assert_eq!(keys(&m), expected_keys);
        assert_eq!(values(&m), expected_values);
        assert_eq!(sorted(keys(&m)), vec!["\"a\"", "\"b\"", "\"c\""]);
    }

    #[test]
    fn test_take_skips_missing() {
        let taken = take(&abc(), &vec![s("a"), s("zz")]);
        assert_eq!(taken.size(), 1);
        assert_eq!(taken.get(&s("a")), Ok(Value::Int(1)));
    }

    #[test]
    fn test_merge_prefers_new_entries() {
        let m1 = from_list([(s("a"), Value::Int(1)), (s("b"), Value::Int(2))]);
        let m2 = from_list([(s("b"), Value::Int(20)), (s("c"), Value::Int(30))]);

        let merged = merge(&m1, &m2);
        assert_eq!(merged.size(), 3);
        assert_eq!(merged.get(&s("a")), Ok(Value::Int(1)));
        assert_eq!(merged.get(&s("b")), Ok(Value::Int(20)));
        assert_eq!(merged.get(&s("c")), Ok(Value::Int(30)));
    }

    #[test]
    fn test_drop() {
        let m = drop(&abc(), &vec![s("a"), s("c"), s("nope")]);
        assert_eq!(sorted(keys(&m)), vec!["\"b\""]);
    }

    #[test]
    fn test_listed_entry_points() {
        let pairs = Value::list([
            Value::pair("a", 1isize),
            Value::pair("b", 2isize),
        ]);
        let m = from_value_list(&pairs).unwrap();
        assert_eq!(m.size(), 2);

        let m = drop_listed(&m, &Value::list([s("a")])).unwrap();
        assert_eq!(to_value_list(&m), Value::list([Value::pair("b", 2isize)]));

        let taken = take_listed(&m, &Value::list([s("b")])).unwrap();
        assert_eq!(taken.get(&s("b")), Ok(Value::Int(2)));
    }

    #[test]
    fn test_malformed_sequences_abort() {
        let not_a_list = Value::pair("a", 1isize);
        assert!(matches!(
            from_value_list(&not_a_list),
            Err(MapError::MalformedSequence { .. })
        ));

        let bad_element = Value::list([Value::pair("a", 1isize), s("b")]);
        let err = from_value_list(&bad_element).unwrap_err();
        assert_eq!(
            err,
            MapError::MalformedSequence {
                expected: "#(key, value)".to_string(),
                actual: "\"b\"".to_string(),
            }
        );

        assert!(take_listed(&abc(), &Value::Nil).is_err());
        assert!(drop_listed(&abc(), &Value::Int(0)).is_err());
    }

    #[test]
    fn test_from_list_with_cache() {
        let cache = TokenCache::shared(CacheConfig::default());
        let key = Value::tuple([s("x")]);
        let m = from_list_with_cache([(key.clone(), Value::Nil)], cache.clone());

        assert!(has_key(&m, &key));
        assert_eq!(cache.borrow().stats().hits, 1);
        assert!(Rc::ptr_eq(&m.cache(), &cache));
    }

    #[test]
    fn test_derived_maps_share_cache() {
        let key = Value::list([Value::Int(1)]);
        let m = from_list([(key.clone(), Value::Nil)]);
        let filtered = filter(&m, |_, _| true);

        filtered.get(&key).unwrap();
        assert_eq!(m.cache().borrow().stats().hits, 2);
    }
}
