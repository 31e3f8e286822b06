#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod error;

/// A reporter-aware key-value map built on [`HashTable`].
///
/// The map hashes keys with a configurable `BuildHasher` and tells an optional
/// [`Reporter`] about expansions, failed lookups and, on request, every `set`
/// and `get`.
pub mod hash_map;

pub mod hash_table;

/// Hooks for observing what a [`HashMap`] does.
pub mod reporter;

pub use error::TableError;
pub use hash_map::Entry;
pub use hash_map::HashMap;
pub use hash_table::HashTable;
pub use reporter::NoReporter;
pub use reporter::Observer;
pub use reporter::Reporter;
pub use reporter::TracingReporter;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// The hasher builder used by [`DefaultHashMap`].
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else if #[cfg(feature = "std")] {
        /// The hasher builder used by [`DefaultHashMap`].
        pub type DefaultHashBuilder = std::hash::RandomState;
    }
}

/// A [`HashMap`] with the default hasher and no reporter.
///
/// # Examples
///
/// ```rust
/// use probe_table::DefaultHashMap;
///
/// let mut map = DefaultHashMap::new();
/// map.set("answer", 42)?;
/// assert_eq!(map.get(&"answer"), Ok(&42));
/// # Ok::<(), probe_table::TableError>(())
/// ```
#[cfg(any(feature = "foldhash", feature = "std"))]
pub type DefaultHashMap<K, V> = HashMap<K, V, DefaultHashBuilder>;
