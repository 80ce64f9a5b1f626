//! Path lookups memoised per owning machine type.

use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum KeyKind {
    Type(TypeId),
    Named,
}

/// Stable identity of a machine *type*.
///
/// Two instances of one machine type produce equal keys, so they share
/// whatever a [`PathCache`] holds under that key.
///
/// # Example
///
/// ```rust
/// use statetree::core::TypeKey;
///
/// struct Door;
/// struct Window;
///
/// assert_eq!(TypeKey::of::<Door>(), TypeKey::of::<Door>());
/// assert_ne!(TypeKey::of::<Door>(), TypeKey::of::<Window>());
/// assert_eq!(TypeKey::named("door"), TypeKey::named("door"));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeKey {
    kind: KeyKind,
    name: &'static str,
}

impl TypeKey {
    /// Key derived from a Rust type.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            kind: KeyKind::Type(TypeId::of::<T>()),
            name: type_name::<T>(),
        }
    }

    /// Key from an explicit, registered name.
    pub const fn named(name: &'static str) -> Self {
        Self {
            kind: KeyKind::Named,
            name,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeKey").field(&self.name).finish()
    }
}

/// Secondary index from `(owner type, path)` to a previously resolved value.
///
/// Entries are never evicted: the cache grows with every distinct path
/// queried for every owner type. Because it is keyed by type rather than
/// instance, all machines of one type see each other's entries. If two such
/// machines would resolve a path differently, the second one gets the first
/// one's answer.
///
/// There is no internal locking. Hosts that share a cache across threads
/// wrap it in a mutex.
///
/// # Example
///
/// ```rust
/// use statetree::core::{PathCache, TypeKey};
///
/// let key = TypeKey::named("door");
/// let mut cache = PathCache::new();
///
/// cache.set(key, "open.ajar", 3);
/// assert_eq!(cache.get(key, "open.ajar"), Some(&3));
/// assert_eq!(cache.get(key, "closed"), None);
/// ```
#[derive(Clone, Debug)]
pub struct PathCache<V> {
    entries: HashMap<TypeKey, HashMap<String, V>>,
}

impl<V> PathCache<V> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Store `value` for `path`, replacing anything already there.
    pub fn set(&mut self, key: TypeKey, path: impl Into<String>, value: V) {
        self.entries
            .entry(key)
            .or_default()
            .insert(path.into(), value);
    }

    /// Stored value, or `None` when either the owner type or the path was
    /// never set.
    pub fn get(&self, key: TypeKey, path: &str) -> Option<&V> {
        self.entries.get(&key)?.get(path)
    }

    /// Stored value, computing and storing it first on a miss.
    pub fn get_or_insert_with<F>(&mut self, key: TypeKey, path: &str, f: F) -> &V
    where
        F: FnOnce() -> V,
    {
        let owner = self.entries.entry(key).or_default();
        if !owner.contains_key(path) {
            tracing::trace!(owner = key.name(), path, "path cache miss");
        }
        owner.entry(path.to_string()).or_insert_with(f)
    }

    /// Total number of cached paths across all owner types.
    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of owner types with at least one sub-map.
    pub fn owner_count(&self) -> usize {
        self.entries.len()
    }
}

impl<V> Default for PathCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct DoorMachine;
    struct LightMachine;

    #[test]
    fn set_then_get_round_trips() {
        let mut cache = PathCache::new();
        let key = TypeKey::of::<DoorMachine>();

        cache.set(key, "open", "resolved");

        assert_eq!(cache.get(key, "open"), Some(&"resolved"));
    }

    #[test]
    fn unset_path_is_absent() {
        let mut cache = PathCache::new();
        let key = TypeKey::of::<DoorMachine>();
        cache.set(key, "open", 1);

        assert_eq!(cache.get(key, "closed"), None);
    }

    #[test]
    fn unknown_owner_is_absent() {
        let cache: PathCache<u8> = PathCache::new();
        assert_eq!(cache.get(TypeKey::of::<DoorMachine>(), "open"), None);
    }

    #[test]
    fn set_overwrites_existing_entry() {
        let mut cache = PathCache::new();
        let key = TypeKey::named("door");

        cache.set(key, "open", 1);
        cache.set(key, "open", 2);

        assert_eq!(cache.get(key, "open"), Some(&2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn owner_types_are_isolated() {
        let mut cache = PathCache::new();
        cache.set(TypeKey::of::<DoorMachine>(), "on", 1);

        assert_eq!(cache.get(TypeKey::of::<LightMachine>(), "on"), None);
        assert_eq!(cache.owner_count(), 1);
    }

    #[test]
    fn get_or_insert_with_computes_once() {
        let mut cache = PathCache::new();
        let key = TypeKey::named("door");
        let mut calls = 0;

        cache.get_or_insert_with(key, "a.b", || {
            calls += 1;
            10
        });
        let value = *cache.get_or_insert_with(key, "a.b", || {
            calls += 1;
            20
        });

        assert_eq!(value, 10);
        assert_eq!(calls, 1);
    }

    #[test]
    fn entries_are_never_evicted() {
        let mut cache = PathCache::new();
        let key = TypeKey::named("door");

        for i in 0..500 {
            cache.set(key, format!("s{i}"), i);
        }

        assert_eq!(cache.len(), 500);
        assert_eq!(cache.get(key, "s0"), Some(&0));
    }

    #[test]
    fn named_and_type_keys_differ() {
        assert_ne!(TypeKey::named("DoorMachine"), TypeKey::of::<DoorMachine>());
    }
}
