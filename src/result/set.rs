//! # Thread-safe keyed bag of values.
//!
//! [`ResultSet`] is what multi-key waits return: one entry per fired key.
//!
//! ## Rules
//! - All operations are safe under concurrent callers, no external locking
//! - [`ResultSet::range`] walks a snapshot taken when it starts; writes made
//!   during the walk may or may not be visible, entries present before it
//!   are visited exactly once
//! - No ordering guarantee over keys
//! - Typed accessors fail with [`ResultError::TypeMismatch`] on the wrong kind

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use dashmap::DashMap;

use crate::error::ResultError;
use crate::result::value::{Value, ValueKind};

/// Concurrent mapping from key to [`Value`].
///
/// Cloning yields another handle to the same underlying map.
///
/// # Example
/// ```rust
/// use keywait::{ResultError, ResultSet};
///
/// let set = ResultSet::new();
/// set.set("answer", 42_isize);
///
/// assert_eq!(set.get_int("answer"), Ok(Some(42)));
/// assert_eq!(set.get_int("missing"), Ok(None));
/// assert!(matches!(
///     set.get_string("answer"),
///     Err(ResultError::TypeMismatch { .. })
/// ));
/// ```
pub struct ResultSet<K> {
    map: Arc<DashMap<K, Value>>,
}

impl<K> Clone for ResultSet<K> {
    fn clone(&self) -> Self {
        Self {
            map: Arc::clone(&self.map),
        }
    }
}

impl<K: Eq + Hash> Default for ResultSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash + fmt::Debug> fmt::Debug for ResultSet<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.map.iter().map(|e| (format!("{:?}", e.key()), e.value().clone())))
            .finish()
    }
}

macro_rules! typed_getters {
    ($($(#[$doc:meta])* $name:ident -> $ty:ty = $variant:ident;)*) => {
        $(
            $(#[$doc])*
            pub fn $name<Q>(&self, key: &Q) -> Result<Option<$ty>, ResultError>
            where
                K: Borrow<Q>,
                Q: Hash + Eq + ?Sized,
            {
                match self.get(key) {
                    None => Ok(None),
                    Some(Value::$variant(v)) => Ok(Some(v)),
                    Some(other) => Err(ResultError::TypeMismatch {
                        expected: ValueKind::$variant,
                        found: other.kind(),
                    }),
                }
            }
        )*
    };
}

impl<K: Eq + Hash> ResultSet<K> {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self {
            map: Arc::new(DashMap::new()),
        }
    }

    /// Inserts or overwrites the value under `key`.
    pub fn set(&self, key: K, value: impl Into<Value>) {
        self.map.insert(key, value.into());
    }

    /// Returns a copy of the value under `key`, if any.
    pub fn get<Q>(&self, key: &Q) -> Option<Value>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.get(key).map(|v| v.value().clone())
    }

    /// Returns `true` if `key` has a value.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the set holds no entries.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    typed_getters! {
        /// Reads an `isize` stored as [`Value::Int`].
        get_int -> isize = Int;
        /// Reads an `i8`.
        get_i8 -> i8 = I8;
        /// Reads an `i16`.
        get_i16 -> i16 = I16;
        /// Reads an `i32`.
        get_i32 -> i32 = I32;
        /// Reads an `i64`.
        get_i64 -> i64 = I64;
        /// Reads a `usize` stored as [`Value::Uint`].
        get_uint -> usize = Uint;
        /// Reads a `u8`.
        get_u8 -> u8 = U8;
        /// Reads a `u16`.
        get_u16 -> u16 = U16;
        /// Reads a `u32`.
        get_u32 -> u32 = U32;
        /// Reads a `u64`.
        get_u64 -> u64 = U64;
        /// Reads an `f32`.
        get_f32 -> f32 = F32;
        /// Reads an `f64`.
        get_f64 -> f64 = F64;
        /// Reads a `String`.
        get_string -> String = String;
        /// Reads a `bool`.
        get_bool -> bool = Bool;
    }
}

impl<K: Eq + Hash + Clone> ResultSet<K> {
    /// Visits every entry of a snapshot taken at call time.
    ///
    /// Returning `false` from `visitor` stops the walk early. The visitor may
    /// read or write this set; it runs with no lock held.
    pub fn range<F>(&self, mut visitor: F)
    where
        F: FnMut(&K, &Value) -> bool,
    {
        for (key, value) in self.snapshot() {
            if !visitor(&key, &value) {
                break;
            }
        }
    }

    /// Returns the keys currently present.
    pub fn keys(&self) -> Vec<K> {
        self.map.iter().map(|e| e.key().clone()).collect()
    }

    /// Copies every entry of `other` into this set, overwriting duplicates.
    pub fn merge(&self, other: &ResultSet<K>) {
        other.range(|k, v| {
            self.map.insert(k.clone(), v.clone());
            true
        });
    }

    /// Copies the current entries into a plain `HashMap`.
    pub fn into_map(self) -> HashMap<K, Value> {
        self.snapshot().into_iter().collect()
    }

    fn snapshot(&self) -> Vec<(K, Value)> {
        self.map
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_int() {
        let set = ResultSet::new();
        set.set("k", 42_isize);
        assert_eq!(set.get_int("k"), Ok(Some(42)));
        assert_eq!(
            set.get_string("k"),
            Err(ResultError::TypeMismatch {
                expected: ValueKind::String,
                found: ValueKind::Int,
            })
        );
    }

    #[test]
    fn fixed_width_accessors_are_strict() {
        let set = ResultSet::new();
        set.set(1_u8, 7_i32);
        assert_eq!(set.get_i32(&1), Ok(Some(7)));
        assert!(set.get_i64(&1).is_err());
        assert!(set.get_int(&1).is_err());
        assert_eq!(set.get_u16(&2), Ok(None));
    }

    #[test]
    fn overwrite_replaces_value() {
        let set = ResultSet::new();
        set.set("flag", false);
        set.set("flag", true);
        assert_eq!(set.get_bool("flag"), Ok(Some(true)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn range_visits_each_entry_once() {
        let set = ResultSet::new();
        for i in 0..10_u32 {
            set.set(i, i);
        }
        let mut seen = Vec::new();
        set.range(|k, _| {
            seen.push(*k);
            true
        });
        seen.sort_unstable();
        assert_eq!(seen, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn range_stops_early_and_tolerates_writes() {
        let set = ResultSet::new();
        set.set(1_u32, "a");
        set.set(2_u32, "b");
        let mut visited = 0;
        set.range(|k, _| {
            visited += 1;
            set.set(k + 100, "written during range");
            false
        });
        assert_eq!(visited, 1);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn merge_and_into_map() {
        let a = ResultSet::new();
        let b = ResultSet::new();
        a.set("x", 1_i64);
        b.set("y", 2.5_f64);
        a.merge(&b);

        let map = a.into_map();
        assert_eq!(map.get("x"), Some(&Value::I64(1)));
        assert_eq!(map.get("y"), Some(&Value::F64(2.5)));
    }

    #[test]
    fn concurrent_writers() {
        let set = ResultSet::new();
        std::thread::scope(|s| {
            for t in 0..4_u32 {
                let set = set.clone();
                s.spawn(move || {
                    for i in 0..100_u32 {
                        set.set(t * 1000 + i, i);
                    }
                });
            }
        });
        assert_eq!(set.len(), 400);
    }
}
