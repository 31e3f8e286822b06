use core::fmt::Debug;
use core::fmt::Display;
use core::fmt::Write;
use core::hash::BuildHasher;
use core::hash::Hash;

use crate::error::TableError;
use crate::hash_table::Entry as TableEntry;
use crate::hash_table::HashTable;
use crate::reporter::NoReporter;
use crate::reporter::Observer;

/// A hash map implemented using the linear-probing [`HashTable`] as the
/// underlying storage.
///
/// `HashMap<K, V, S, R>` stores key-value pairs where keys implement
/// `Hash + Eq` and uses a configurable hasher builder `S` to hash keys. An
/// optional [`Reporter`](crate::Reporter) `R` is told about expansions and
/// failed lookups, and about every `set` and successful `get` once
/// [`report_basic_calls`](Self::report_basic_calls) is enabled.
///
/// A reporter formats keys and values with `Debug`, so `K` and `V` must be
/// `Debug` when `R` is a reporter. With the default [`NoReporter`] they need
/// not be.
///
/// # Examples
///
/// ```rust
/// # use core::hash::BuildHasherDefault;
/// # use siphasher::sip::SipHasher;
/// #
/// # use probe_table::HashMap;
/// # use probe_table::TableError;
/// #
/// let mut map: HashMap<&str, u32, BuildHasherDefault<SipHasher>> = HashMap::new();
/// map.set("one", 1)?;
/// map.set("two", 2)?;
///
/// assert_eq!(map.get(&"one"), Ok(&1));
/// assert_eq!(map.get(&"three"), Err(TableError::KeyNotFound));
///
/// let mut listing = String::new();
/// map.dump(&mut listing)?;
/// assert!(listing.starts_with('{'));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone)]
pub struct HashMap<K, V, S, R = NoReporter> {
    table: HashTable<(K, V)>,
    hash_builder: S,
    reporter: R,
    report_basic_calls: bool,
}

impl<K, V, S, R> Debug for HashMap<K, V, S, R>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S, R> HashMap<K, V, S, R> {
    /// Returns the number of elements in the map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasherDefault;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use probe_table::HashMap;
    /// #
    /// let mut map: HashMap<_, _, BuildHasherDefault<SipHasher>> = HashMap::new();
    /// assert_eq!(map.len(), 0);
    /// map.set(1, "a")?;
    /// assert_eq!(map.len(), 1);
    /// # Ok::<(), probe_table::TableError>(())
    /// ```
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no elements.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of slots in the underlying table.
    ///
    /// The map never holds more than half as many elements as it has slots.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Removes all elements and shrinks the map back to
    /// [`INITIAL_CAPACITY`](crate::hash_table::INITIAL_CAPACITY) slots.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Enables or disables reporting of successful `set` and `get` calls.
    ///
    /// Disabled by default. Expansions and failed lookups are always
    /// reported.
    pub fn report_basic_calls(&mut self, enabled: bool) {
        self.report_basic_calls = enabled;
    }

    /// Reseeds the generator that picks how far the map grows.
    pub fn reseed_growth(&mut self, seed: u64) {
        self.table.reseed_growth(seed);
    }

    /// Returns a reference to the map's reporter.
    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Returns an iterator over the key-value pairs of the map, in slot
    /// order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasherDefault;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use probe_table::HashMap;
    /// #
    /// let mut map: HashMap<_, _, BuildHasherDefault<SipHasher>> = HashMap::new();
    /// map.set(1, "a")?;
    /// map.set(2, "b")?;
    ///
    /// for (key, value) in map.iter() {
    ///     println!("Key: {}, Value: {}", key, value);
    /// }
    /// # Ok::<(), probe_table::TableError>(())
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over the keys of the map.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values of the map.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Returns an iterator that removes and yields all key-value pairs from the
    /// map.
    ///
    /// After calling `drain()`, the map will be empty.
    pub fn drain(&mut self) -> Drain<'_, K, V> {
        Drain {
            inner: self.table.drain(),
        }
    }

    /// Returns detailed utilization statistics of the underlying table.
    ///
    /// Available with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> crate::hash_table::DebugStats {
        self.table.debug_stats()
    }

    /// Writes every stored pair as `index:key(hash):value`, separated by
    /// `", "` and enclosed in braces, in slot order, followed by a newline.
    ///
    /// This is a debugging aid, not a serialization format.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use core::hash::Hasher;
    /// #
    /// # use probe_table::HashMap;
    /// #
    /// # #[derive(Default)]
    /// # struct Identity(u64);
    /// # impl Hasher for Identity {
    /// #     fn finish(&self) -> u64 { self.0 }
    /// #     fn write(&mut self, _: &[u8]) { unimplemented!() }
    /// #     fn write_u64(&mut self, n: u64) { self.0 = n; }
    /// # }
    /// # #[derive(Default)]
    /// # struct IdentityBuilder;
    /// # impl BuildHasher for IdentityBuilder {
    /// #     type Hasher = Identity;
    /// #     fn build_hasher(&self) -> Identity { Identity::default() }
    /// # }
    /// #
    /// let mut map: HashMap<u64, &str, IdentityBuilder> = HashMap::new();
    /// map.set(46, "b")?;
    /// map.set(3, "a")?;
    ///
    /// let mut listing = String::new();
    /// map.dump(&mut listing)?;
    /// assert_eq!(listing, "{3:3(3):a, 5:46(46):b}\n");
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn dump<W: Write>(&self, pen: &mut W) -> core::fmt::Result
    where
        K: Display,
        V: Display,
    {
        pen.write_char('{')?;
        for (printed, (index, hash, (key, value))) in self.table.iter_indexed().enumerate() {
            if printed > 0 {
                pen.write_str(", ")?;
            }
            write!(pen, "{index}:{key}({hash}):{value}")?;
        }
        pen.write_str("}\n")
    }
}

impl<K, V, S> HashMap<K, V, S, NoReporter>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Creates a new hash map with the given hasher builder and no reporter.
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_hasher_and_reporter(hash_builder, NoReporter)
    }
}

impl<K, V, S> HashMap<K, V, S, NoReporter>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    /// Creates a new hash map using the default hasher builder and no
    /// reporter.
    pub fn new() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> Default for HashMap<K, V, S, NoReporter>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S, R> HashMap<K, V, S, R>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    /// Creates a new hash map using the default hasher builder that reports
    /// its activity to `reporter`.
    pub fn with_reporter(reporter: R) -> Self {
        Self::with_hasher_and_reporter(S::default(), reporter)
    }
}

impl<K, V, S, R> HashMap<K, V, S, R>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Creates a new hash map with the given hasher builder that reports its
    /// activity to `reporter`.
    pub fn with_hasher_and_reporter(hash_builder: S, reporter: R) -> Self {
        #[allow(unused_mut)]
        let mut table = HashTable::new();
        // Without an OS generator, derive the growth seed from the hasher.
        #[cfg(not(feature = "std"))]
        table.reseed_growth(hash_builder.hash_one(crate::hash_table::INITIAL_CAPACITY));

        Self {
            table,
            hash_builder,
            reporter,
            report_basic_calls: false,
        }
    }
}

impl<K, V, S, R> HashMap<K, V, S, R>
where
    K: Hash + Eq,
    S: BuildHasher,
    R: Observer<K, V>,
{
    fn grow_if_needed(&mut self) -> Result<(), TableError> {
        if let Some(capacity) = self.table.grow_if_needed()? {
            Observer::<K, V>::expanded(&self.reporter, capacity);
        }
        Ok(())
    }

    /// Associates `value` with `key`.
    ///
    /// Grows the map first if one more element would exceed the load factor.
    /// If the key was already present its value is overwritten in place and
    /// the old value is returned.
    ///
    /// # Errors
    ///
    /// [`TableError::TableFull`] if the underlying table lost track of its
    /// free slots.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasherDefault;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use probe_table::HashMap;
    /// #
    /// let mut map: HashMap<_, _, BuildHasherDefault<SipHasher>> = HashMap::new();
    /// assert_eq!(map.set(37, "a")?, None);
    /// assert_eq!(map.set(37, "b")?, Some("a"));
    /// assert_eq!(map.get(&37), Ok(&"b"));
    /// assert_eq!(map.len(), 1);
    /// # Ok::<(), probe_table::TableError>(())
    /// ```
    pub fn set(&mut self, key: K, value: V) -> Result<Option<V>, TableError> {
        self.grow_if_needed()?;

        let basic = self.report_basic_calls;
        let hash = self.hash_builder.hash_one(&key);
        match self.table.entry(hash, |(k, _)| k == &key)? {
            TableEntry::Occupied(mut entry) => {
                let index = entry.index();
                let pair = entry.get_mut();
                let old_value = core::mem::replace(&mut pair.1, value);
                if basic {
                    self.reporter.stored(index, &pair.0, &pair.1);
                }
                Ok(Some(old_value))
            }
            TableEntry::Vacant(entry) => {
                let index = entry.index();
                let pair = entry.insert((key, value));
                if basic {
                    self.reporter.stored(index, &pair.0, &pair.1);
                }
                Ok(None)
            }
        }
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// # Errors
    ///
    /// [`TableError::KeyNotFound`] if the key has no entry. The failure is
    /// always reported.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasherDefault;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use probe_table::HashMap;
    /// # use probe_table::TableError;
    /// #
    /// let mut map: HashMap<_, _, BuildHasherDefault<SipHasher>> = HashMap::new();
    /// map.set(1, "a")?;
    /// assert_eq!(map.get(&1), Ok(&"a"));
    /// assert_eq!(map.get(&2), Err(TableError::KeyNotFound));
    /// # Ok::<(), TableError>(())
    /// ```
    pub fn get(&self, key: &K) -> Result<&V, TableError> {
        let hash = self.hash_builder.hash_one(key);
        match self.table.find(hash, |(k, _)| k == key) {
            Some((_, value)) => {
                if self.report_basic_calls {
                    self.reporter.found(key, value);
                }
                Ok(value)
            }
            None => {
                Observer::<K, V>::missed(&self.reporter, key);
                Err(TableError::KeyNotFound)
            }
        }
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// Nothing is reported.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let hash = self.hash_builder.hash_one(key);
        self.table.find_mut(hash, |(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns `true` if the map contains a value for the specified key.
    ///
    /// Nothing is reported.
    pub fn contains_key(&self, key: &K) -> bool {
        let hash = self.hash_builder.hash_one(key);
        self.table.find(hash, |(k, _)| k == key).is_some()
    }

    /// Removes a key from the map, returning the value at the key if the key
    /// was previously in the map.
    ///
    /// Removing an absent key is a no-op.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasherDefault;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use probe_table::HashMap;
    /// #
    /// let mut map: HashMap<_, _, BuildHasherDefault<SipHasher>> = HashMap::new();
    /// map.set(1, "a")?;
    /// assert_eq!(map.remove(&1), Some("a"));
    /// assert_eq!(map.remove(&1), None);
    /// # Ok::<(), probe_table::TableError>(())
    /// ```
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes a key from the map, returning the stored key and value if the
    /// key was previously in the map.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let hash = self.hash_builder.hash_one(key);
        self.table.remove(hash, |(k, _)| k == key)
    }

    /// Gets the given key's corresponding entry in the map for in-place
    /// manipulation.
    ///
    /// Grows the map first, like [`set`](Self::set). Expansions are reported,
    /// writes through the entry are not.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasherDefault;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use probe_table::HashMap;
    /// #
    /// let mut map: HashMap<_, u32, BuildHasherDefault<SipHasher>> = HashMap::new();
    ///
    /// for word in ["a", "b", "a"] {
    ///     *map.entry(word)?.or_default() += 1;
    /// }
    ///
    /// assert_eq!(map.get(&"a"), Ok(&2));
    /// assert_eq!(map.get(&"b"), Ok(&1));
    /// # Ok::<(), probe_table::TableError>(())
    /// ```
    pub fn entry(&mut self, key: K) -> Result<Entry<'_, K, V>, TableError> {
        self.grow_if_needed()?;

        let hash = self.hash_builder.hash_one(&key);
        Ok(match self.table.entry(hash, |(k, _)| k == &key)? {
            TableEntry::Occupied(entry) => Entry::Occupied(OccupiedEntry { entry }),
            TableEntry::Vacant(entry) => Entry::Vacant(VacantEntry { entry, key }),
        })
    }
}

/// A view into a single entry in the map, which may either be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashMap`].
///
/// [`entry`]: HashMap::entry
pub enum Entry<'a, K, V> {
    /// A vacant entry.
    Vacant(VacantEntry<'a, K, V>),
    /// An occupied entry.
    Occupied(OccupiedEntry<'a, K, V>),
}

impl<'a, K, V> Entry<'a, K, V> {
    /// Inserts a default value if the entry is vacant and returns a mutable
    /// reference.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts a value computed from a closure if the entry is vacant and
    /// returns a mutable reference.
    pub fn or_insert_with<F>(self, default: F) -> &'a mut V
    where
        F: FnOnce() -> V,
    {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Provides in-place mutable access to an occupied entry before any
    /// potential inserts.
    pub fn and_modify<F>(self, f: F) -> Self
    where
        F: FnOnce(&mut V),
    {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }

    /// Returns a reference to this entry's key.
    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(entry) => entry.key(),
            Entry::Vacant(entry) => entry.key(),
        }
    }
}

impl<'a, K, V> Entry<'a, K, V>
where
    V: Default,
{
    /// Inserts the default value if the entry is vacant and returns a mutable
    /// reference.
    pub fn or_default(self) -> &'a mut V {
        self.or_insert_with(Default::default)
    }
}

/// A view into a vacant entry in the map.
pub struct VacantEntry<'a, K, V> {
    entry: crate::hash_table::VacantEntry<'a, (K, V)>,
    key: K,
}

impl<'a, K, V> VacantEntry<'a, K, V> {
    /// Gets a reference to the key that would be used when inserting a value.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Take ownership of the key.
    pub fn into_key(self) -> K {
        self.key
    }

    /// Returns the slot index the pair will be written to.
    pub fn index(&self) -> usize {
        self.entry.index()
    }

    /// Inserts the value into the map and returns a mutable reference to it.
    pub fn insert(self, value: V) -> &'a mut V {
        &mut self.entry.insert((self.key, value)).1
    }
}

/// A view into an occupied entry in the map.
pub struct OccupiedEntry<'a, K, V> {
    entry: crate::hash_table::OccupiedEntry<'a, (K, V)>,
}

impl<'a, K, V> OccupiedEntry<'a, K, V> {
    /// Gets a reference to the key in the entry.
    pub fn key(&self) -> &K {
        &self.entry.get().0
    }

    /// Returns the slot index holding the pair.
    pub fn index(&self) -> usize {
        self.entry.index()
    }

    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &V {
        &self.entry.get().1
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.entry.get_mut().1
    }

    /// Converts the entry into a mutable reference to the value.
    pub fn into_mut(self) -> &'a mut V {
        &mut self.entry.into_mut().1
    }

    /// Inserts a value into the entry and returns the old value.
    pub fn insert(&mut self, value: V) -> V {
        core::mem::replace(&mut self.entry.get_mut().1, value)
    }

    /// Removes the entry from the map and returns the value.
    pub fn remove(self) -> V {
        self.entry.remove().1
    }

    /// Removes the entry from the map and returns the key and value.
    pub fn remove_entry(self) -> (K, V) {
        self.entry.remove()
    }
}

impl<'a, K, V, S, R> IntoIterator for &'a HashMap<K, V, S, R> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the key-value pairs of a `HashMap`.
pub struct Iter<'a, K, V> {
    inner: crate::hash_table::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// An iterator over the keys of a `HashMap`.
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

/// An iterator over the values of a `HashMap`.
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

/// A draining iterator over the key-value pairs of a `HashMap`.
pub struct Drain<'a, K, V> {
    inner: crate::hash_table::Drain<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Drain<'a, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Drain<'_, K, V> {}
