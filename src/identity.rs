use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::rc::{Rc, Weak};

use log::{debug, trace};

use crate::value::{Instance, Record, Value, ValueKind};

/// Stable stand-in for a key's structural identity; this is what the map's
/// table is actually keyed by. Not invertible.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyToken(Rc<str>);

impl KeyToken {
    fn render(value: &Value) -> Self {
        KeyToken(value.to_string().into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for KeyToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

pub type SharedTokenCache = Rc<RefCell<TokenCache>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Minimum number of memos before stale ones are swept out.
    /// After each sweep the next one is scheduled at twice the live count.
    pub sweep_threshold: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            sweep_threshold: 1024,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub swept: u64,
}

/*******************\
|* Instance memos  *|
\*******************/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum CompoundTag {
    Bytes,
    List,
    Tuple,
    Record,
}

/// A list and a tuple may share one allocation, so the address alone isn't
/// enough to identify the instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct InstanceKey {
    addr: usize,
    tag: CompoundTag,
}

#[derive(Debug)]
enum WeakInstance {
    Bytes(Weak<[u8]>),
    Seq(Weak<[Value]>),
    Record(Weak<Record>),
}

impl WeakInstance {
    fn is_alive(&self) -> bool {
        match self {
            WeakInstance::Bytes(w) => w.strong_count() > 0,
            WeakInstance::Seq(w) => w.strong_count() > 0,
            WeakInstance::Record(w) => w.strong_count() > 0,
        }
    }
}

#[derive(Debug)]
struct Memo {
    // keeps the allocation (not the value) around, so `addr` can't be
    // reused by another instance while this memo exists
    instance: WeakInstance,
    token: KeyToken,
}

fn addr_of<T: ?Sized>(rc: &Rc<T>) -> usize {
    Rc::as_ptr(rc).cast::<()>() as usize
}

fn instance_key(instance: &Instance<'_>) -> InstanceKey {
    let (addr, tag) = match *instance {
        Instance::Bytes(rc) => (addr_of(rc), CompoundTag::Bytes),
        Instance::List(rc) => (addr_of(rc), CompoundTag::List),
        Instance::Tuple(rc) => (addr_of(rc), CompoundTag::Tuple),
        Instance::Record(rc) => (addr_of(rc), CompoundTag::Record),
    };
    InstanceKey { addr, tag }
}

fn downgrade(instance: &Instance<'_>) -> WeakInstance {
    match *instance {
        Instance::Bytes(rc) => WeakInstance::Bytes(Rc::downgrade(rc)),
        Instance::List(rc) | Instance::Tuple(rc) => {
            WeakInstance::Seq(Rc::downgrade(rc))
        },
        Instance::Record(rc) => WeakInstance::Record(Rc::downgrade(rc)),
    }
}

/*****************\
|* Token cache   *|
\*****************/

/// Derives key tokens, memoizing compound values per instance.
///
/// Primitives render straight to their textual form every time. Compound
/// values are rendered once per live instance; a structurally equal but
/// separate instance pays for its own rendering and lands on the same token.
#[derive(Debug)]
pub struct TokenCache {
    config: CacheConfig,
    memos: HashMap<InstanceKey, Memo>,
    next_sweep: usize,
    stats: CacheStats,
}

impl Default for TokenCache {
    fn default() -> Self {
        TokenCache::with_config(CacheConfig::default())
    }
}

impl TokenCache {
    pub fn new() -> Self {
        TokenCache::default()
    }

    pub fn with_config(config: CacheConfig) -> Self {
        TokenCache {
            config,
            memos: HashMap::new(),
            next_sweep: config.sweep_threshold.max(1),
            stats: CacheStats::default(),
        }
    }

    /// Convenience - a fresh cache behind a shareable handle
    pub fn shared(config: CacheConfig) -> SharedTokenCache {
        Rc::new(RefCell::new(TokenCache::with_config(config)))
    }

    pub fn token_of(&mut self, value: &Value) -> KeyToken {
        match value.kind() {
            ValueKind::Primitive => KeyToken::render(value),
            ValueKind::Compound(instance) => {
                self.compound_token(value, &instance)
            },
        }
    }

    fn compound_token(
        &mut self,
        value: &Value,
        instance: &Instance<'_>,
    ) -> KeyToken {
        let key = instance_key(instance);
        if let Some(memo) = self.memos.get(&key) {
            if memo.instance.is_alive() {
                self.stats.hits += 1;
                return memo.token.clone();
            }
        }

        self.stats.misses += 1;
        let token = KeyToken::render(value);
        trace!("token cache miss at {:#x}: {token}", key.addr);
        self.memos.insert(
            key,
            Memo {
                instance: downgrade(instance),
                token: token.clone(),
            },
        );

        if self.memos.len() >= self.next_sweep {
            self.sweep();
        }
        token
    }

    /// Drop memos whose instance is gone. Returns how many were removed.
    pub fn sweep(&mut self) -> usize {
        let before = self.memos.len();
        self.memos
            .retain(|_, memo| memo.instance.is_alive());
        let removed = before - self.memos.len();

        self.stats.swept += removed as u64;
        self.next_sweep = (self.memos.len() * 2)
            .max(self.config.sweep_threshold)
            .max(1);
        debug!(
            "swept {removed} stale token memos, {} live, next sweep at {}",
            self.memos.len(),
            self.next_sweep
        );
        removed
    }

    /// Number of memos held, stale ones included
    pub fn len(&self) -> usize {
        self.memos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memos.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn config(&self) -> CacheConfig {
        self.config
    }
}
