use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

use itertools::Itertools;

use crate::identity::{CacheConfig, KeyToken, SharedTokenCache, TokenCache};
use crate::value::{NotFound, Value};

/// A mutable map with structural key equality.
///
/// `Map` is a handle: clones share one table, so a mutation through any
/// handle is visible through all of them. `insert` and `delete` hand back
/// the same handle they were called on.
#[derive(Debug, Clone)]
pub struct Map(Rc<InnerMap>);

/// The actual map data
#[derive(Debug)]
struct InnerMap {
    cache: SharedTokenCache,
    entries: RefCell<HashMap<KeyToken, Entry>>,
}

/// The original key is kept next to the value, since tokens can't be
/// turned back into keys.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub key: Value,
    pub value: Value,
}

impl Default for Map {
    fn default() -> Self {
        Map::new()
    }
}

impl Map {
    pub fn new() -> Self {
        Map::with_cache(TokenCache::shared(CacheConfig::default()))
    }

    /// An empty map deriving its key tokens through `cache`
    pub fn with_cache(cache: SharedTokenCache) -> Self {
        Map(Rc::new(InnerMap {
            cache,
            entries: RefCell::new(HashMap::new()),
        }))
    }

    /// A new, separate, empty map that shares this one's token cache
    pub fn empty_like(&self) -> Self {
        Map::with_cache(self.cache())
    }

    pub fn cache(&self) -> SharedTokenCache {
        self.0.cache.clone()
    }

    /// True if both handles refer to the same table
    pub fn ptr_eq(&self, other: &Map) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn token_of(&self, key: &Value) -> KeyToken {
        self.0
            .cache
            .borrow_mut()
            .token_of(key)
    }

    /**************\
    |* Primitives *|
    \**************/
    pub fn size(&self) -> usize {
        self.0.entries.borrow().len()
    }

    pub fn insert(&self, key: Value, value: Value) -> Map {
        let token = self.token_of(&key);
        self.0
            .entries
            .borrow_mut()
            .insert(token, Entry { key, value });
        self.clone()
    }

    pub fn get(&self, key: &Value) -> Result<Value, NotFound> {
        let token = self.token_of(key);
        self.0
            .entries
            .borrow()
            .get(&token)
            .map(|entry| entry.value.clone())
            .ok_or_else(|| NotFound(key.clone()))
    }

    /// Removing an absent key is a no-op
    pub fn delete(&self, key: &Value) -> Map {
        let token = self.token_of(key);
        self.0
            .entries
            .borrow_mut()
            .remove(&token);
        self.clone()
    }

    /// Every (key, value) pair, in table order. Table order is unspecified.
    pub fn to_list(&self) -> Vec<(Value, Value)> {
        self.0
            .entries
            .borrow()
            .values()
            .map(|entry| (entry.key.clone(), entry.value.clone()))
            .collect()
    }
}

impl Display for Map {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let entries = self
            .to_list()
            .into_iter()
            .map(|(k, v)| Value::pair(k, v))
            .join(", ");
        write!(f, "map.from_list([{entries}])")
    }
}
