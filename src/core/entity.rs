//! Object identity
//!
//! A level file refers to objects by line position, and positions change on
//! every insert and remove. Connections therefore point at an [`ObjectKey`],
//! a process-unique identity minted when an object is created, and are only
//! turned into positional ids when the level is written out.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::hash::BuildHasher;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_KEY: AtomicU64 = AtomicU64::new(1);

/// Stable identity of one game object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectKey(u64);

impl ObjectKey {
    /// Mint a key that no other object in this process carries
    pub fn fresh() -> Self {
        ObjectKey(NEXT_KEY.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Receipt for an object placed in a level
///
/// `id` is the position at the time of placement. It goes stale after
/// structural edits in front of the object; `key` does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectHandle {
    pub key: ObjectKey,
    pub id: usize,
}

impl From<ObjectHandle> for ObjectKey {
    fn from(handle: ObjectHandle) -> Self {
        handle.key
    }
}

impl From<&ObjectHandle> for ObjectKey {
    fn from(handle: &ObjectHandle) -> Self {
        handle.key
    }
}

/// Maps object identities to their current positional ids
pub trait ResolveId {
    fn resolve_id(&self, key: ObjectKey) -> Option<usize>;
}

/// Resolves nothing; for serializing objects that have no connections
pub struct NoObjects;

impl ResolveId for NoObjects {
    fn resolve_id(&self, _key: ObjectKey) -> Option<usize> {
        None
    }
}

impl<S: BuildHasher> ResolveId for HashMap<ObjectKey, usize, S> {
    fn resolve_id(&self, key: ObjectKey) -> Option<usize> {
        self.get(&key).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_keys_are_distinct() {
        let a = ObjectKey::fresh();
        let b = ObjectKey::fresh();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn test_handle_converts_to_key() {
        let key = ObjectKey::fresh();
        let handle = ObjectHandle { key, id: 3 };
        assert_eq!(ObjectKey::from(handle), key);
        assert_eq!(ObjectKey::from(&handle), key);
    }

    #[test]
    fn test_no_objects_resolves_nothing() {
        assert_eq!(NoObjects.resolve_id(ObjectKey::fresh()), None);
    }

    #[test]
    fn test_map_resolves_known_keys() {
        let key = ObjectKey::fresh();
        let ids: HashMap<ObjectKey, usize> = [(key, 4)].into_iter().collect();
        assert_eq!(ids.resolve_id(key), Some(4));
        assert_eq!(ids.resolve_id(ObjectKey::fresh()), None);
    }
}
