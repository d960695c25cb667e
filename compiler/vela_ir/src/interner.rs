//! Sharded string interner for identifier storage.
//!
//! Provides O(1) interning and lookup with per-shard locking. Interned
//! strings live for the lifetime of the process; the interner hands out
//! stable `Name` handles that compare by integer equality.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::Name;

/// Per-shard storage for interned strings.
struct InternShard {
    /// Map from string content to local index.
    map: FxHashMap<&'static str, u32>,
    /// Storage for string contents.
    strings: Vec<&'static str>,
}

impl InternShard {
    fn new() -> Self {
        Self {
            map: FxHashMap::default(),
            strings: Vec::with_capacity(256),
        }
    }

    fn with_empty() -> Self {
        let mut shard = Self::new();
        // Pre-intern empty string at index 0 so Name::EMPTY resolves.
        let empty: &'static str = "";
        shard.map.insert(empty, 0);
        shard.strings.push(empty);
        shard
    }
}

/// Sharded string interner.
///
/// Uses `RwLock` per shard, so a shared reference suffices for both
/// interning and lookup.
pub struct StringInterner {
    shards: [RwLock<InternShard>; Name::NUM_SHARDS],
    /// Total count of interned strings across all shards (O(1) `len()`).
    total_count: AtomicUsize,
}

impl StringInterner {
    /// Create a new interner.
    pub fn new() -> Self {
        let shards = std::array::from_fn(|i| {
            if i == 0 {
                RwLock::new(InternShard::with_empty())
            } else {
                RwLock::new(InternShard::new())
            }
        });

        Self {
            shards,
            // Start with 1 for the empty string pre-interned in shard 0.
            total_count: AtomicUsize::new(1),
        }
    }

    /// Compute shard for a string based on its hash.
    #[inline]
    fn shard_for(s: &str) -> usize {
        // The empty string must land in shard 0 where it is pre-interned.
        let mut hash = 0u32;
        for byte in s.bytes().take(8) {
            hash = hash.wrapping_mul(31).wrapping_add(u32::from(byte));
        }
        (hash as usize) % Name::NUM_SHARDS
    }

    /// Intern a string, returning its `Name`.
    pub fn intern(&self, s: &str) -> Name {
        let shard_idx = Self::shard_for(s);
        let shard = &self.shards[shard_idx];

        // Fast path: already interned.
        {
            let guard = shard.read();
            if let Some(&local) = guard.map.get(s) {
                return Name::new(shard_idx as u32, local);
            }
        }

        let mut guard = shard.write();
        // Re-check: another thread may have interned while we upgraded.
        if let Some(&local) = guard.map.get(s) {
            return Name::new(shard_idx as u32, local);
        }

        let local = guard.strings.len() as u32;
        debug_assert!(local <= Name::MAX_LOCAL, "interner shard overflow");
        let stored: &'static str = Box::leak(s.to_owned().into_boxed_str());
        guard.map.insert(stored, local);
        guard.strings.push(stored);
        self.total_count.fetch_add(1, Ordering::Relaxed);
        Name::new(shard_idx as u32, local)
    }

    /// Look up the string for a `Name`.
    ///
    /// # Panics
    ///
    /// Panics if the name was not produced by this interner.
    pub fn lookup(&self, name: Name) -> &'static str {
        let guard = self.shards[name.shard()].read();
        guard.strings[name.local()]
    }

    /// Number of interned strings.
    pub fn len(&self) -> usize {
        self.total_count.load(Ordering::Relaxed)
    }

    /// Check if the interner only holds the pre-interned empty string.
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_is_stable() {
        let interner = StringInterner::new();
        let a = interner.intern("foo");
        let b = interner.intern("foo");
        assert_eq!(a, b);
        assert_eq!(interner.lookup(a), "foo");
    }

    #[test]
    fn distinct_strings_get_distinct_names() {
        let interner = StringInterner::new();
        assert_ne!(interner.intern("get"), interner.intern("set"));
    }

    #[test]
    fn empty_string_is_name_empty() {
        let interner = StringInterner::new();
        assert_eq!(interner.intern(""), Name::EMPTY);
        assert_eq!(interner.lookup(Name::EMPTY), "");
    }
}
