use alloc::vec::Vec;
use core::fmt::Debug;
use core::marker::PhantomData;
use core::mem;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::error::TableError;

/// Number of slots in a freshly constructed or cleared table.
pub const INITIAL_CAPACITY: usize = 41;

/// Maximum ratio of live entries to slots.
///
/// Growth runs before any insert that would push the table past this ratio.
pub const LOAD_FACTOR: f64 = 0.5;

/// Exclusive upper bound of the random number of slots added on top of
/// doubling when the table grows.
pub const GROWTH_JITTER: usize = 10;

// LOAD_FACTOR as an exact fraction.
const LOAD_FACTOR_NUMERATOR: usize = 1;
const LOAD_FACTOR_DENOMINATOR: usize = 2;

// Live values plus tombstones above this fraction of the slots trigger a
// same-size rebuild. Each rebuild frees at least a quarter of the table.
const USED_LIMIT_NUMERATOR: usize = 3;
const USED_LIMIT_DENOMINATOR: usize = 4;

#[cfg(not(feature = "std"))]
const DEFAULT_GROWTH_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

#[inline(always)]
fn exceeds_load_factor(populated: usize, capacity: usize) -> bool {
    populated.saturating_mul(LOAD_FACTOR_DENOMINATOR)
        > capacity.saturating_mul(LOAD_FACTOR_NUMERATOR)
}

#[inline(always)]
fn exceeds_used_limit(used: usize, capacity: usize) -> bool {
    used.saturating_mul(USED_LIMIT_DENOMINATOR) > capacity.saturating_mul(USED_LIMIT_NUMERATOR)
}

#[inline(always)]
fn home_index(hash: u64, capacity: usize) -> usize {
    (hash % capacity as u64) as usize
}

cfg_if::cfg_if! {
    if #[cfg(feature = "std")] {
        fn growth_rng() -> SmallRng {
            SmallRng::from_os_rng()
        }
    } else {
        fn growth_rng() -> SmallRng {
            SmallRng::seed_from_u64(DEFAULT_GROWTH_SEED)
        }
    }
}

#[derive(Clone)]
enum Slot<V> {
    Empty,
    Occupied { hash: u64, value: V },
    Tombstone,
}

impl<V> Slot<V> {
    #[inline(always)]
    fn value(&self) -> Option<&V> {
        match self {
            Slot::Occupied { value, .. } => Some(value),
            Slot::Empty | Slot::Tombstone => None,
        }
    }

    #[inline(always)]
    fn value_mut(&mut self) -> Option<&mut V> {
        match self {
            Slot::Occupied { value, .. } => Some(value),
            Slot::Empty | Slot::Tombstone => None,
        }
    }
}

fn empty_slots<V>(capacity: usize) -> Vec<Slot<V>> {
    core::iter::repeat_with(|| Slot::Empty)
        .take(capacity)
        .collect()
}

/// Outcome of walking a probe sequence with [`HashTable::locate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    /// The occupied slot at this index holds a matching value.
    Found(usize),
    /// No slot holds a matching value. This is the first empty or tombstone
    /// slot on the probe sequence, where a new value belongs.
    InsertionPoint(usize),
}

/// Debug statistics for hash table analysis.
///
/// Available in tests or with the `stats` feature.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone, PartialEq)]
pub struct DebugStats {
    /// Number of live entries
    pub populated: usize,
    /// Total number of slots
    pub capacity: usize,
    /// Number of slots holding a tombstone
    pub tombstones: usize,
    /// Number of never-occupied slots
    pub empty: usize,
    /// Live entries per slot
    pub load_factor: f64,
    /// `probe_histogram[d]` counts entries stored `d` slots past their home
    /// slot
    pub probe_histogram: Vec<usize>,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Longest distance between an entry and its home slot.
    pub fn max_probe_length(&self) -> usize {
        self.probe_histogram.len().saturating_sub(1)
    }

    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor)",
            self.populated,
            self.capacity,
            self.load_factor * 100.0
        );
        println!(
            "Slots: {} empty, {} tombstones",
            self.empty, self.tombstones
        );
        println!("Probe lengths:");
        for (distance, count) in self.probe_histogram.iter().enumerate() {
            println!("{:>4} | {}", distance, count);
        }
    }
}

/// A hash table using open addressing with linear probing.
///
/// `HashTable<V>` stores values of type `V` in a single array of slots.
/// Callers supply both the hash value and an equality predicate for each
/// operation. A value lives in the first free slot at or after
/// `hash % capacity`, wrapping around the end of the array. Removed values
/// leave a tombstone behind so that lookups for values further along the same
/// probe sequence keep working.
///
/// The table starts with [`INITIAL_CAPACITY`] slots and keeps the ratio of
/// live values to slots at or below [`LOAD_FACTOR`]. When an insert would
/// exceed it, the table grows to twice its capacity plus a small random
/// amount, dropping all tombstones on the way. When live values and
/// tombstones together would fill more than three quarters of the slots, the
/// table is rebuilt at its current capacity instead.
///
/// ## Example
///
/// ```rust
/// # use core::hash::Hash;
/// # use core::hash::Hasher;
/// #
/// # use probe_table::hash_table::HashTable;
/// # use siphasher::sip::SipHasher;
/// #
/// # #[derive(Debug, PartialEq)]
/// # struct Person {
/// #     id: u64,
/// #     name: String,
/// # }
/// #
/// # fn hash_id(id: u64) -> u64 {
/// #     let mut hasher = SipHasher::new();
/// #     id.hash(&mut hasher);
/// #     hasher.finish()
/// # }
///
/// let mut table = HashTable::new();
/// let hash = hash_id(123);
///
/// match table.entry(hash, |p: &Person| p.id == 123)? {
///     probe_table::hash_table::Entry::Vacant(entry) => {
///         entry.insert(Person {
///             id: 123,
///             name: "Alice".to_string(),
///         });
///     }
///     probe_table::hash_table::Entry::Occupied(_) => {
///         println!("Person already exists");
///     }
/// }
/// # Ok::<(), probe_table::TableError>(())
/// ```
#[derive(Clone)]
pub struct HashTable<V> {
    slots: Vec<Slot<V>>,
    populated: usize,
    tombstones: usize,
    rng: SmallRng,
}

impl<V> Debug for HashTable<V>
where
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use alloc::format;
        use alloc::string::String;
        use alloc::string::ToString;

        f.debug_struct("HashTable")
            .field(
                "slots",
                &self
                    .slots
                    .iter()
                    .map(|slot| match slot {
                        Slot::Empty => "..".to_string(),
                        Slot::Tombstone => "xx".to_string(),
                        Slot::Occupied { hash, value } => format!("{value:?}#{hash:016x}"),
                    })
                    .collect::<Vec<String>>(),
            )
            .field("populated", &self.populated)
            .field("tombstones", &self.tombstones)
            .field("capacity", &self.slots.len())
            .finish()
    }
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> HashTable<V> {
    /// Creates an empty table with [`INITIAL_CAPACITY`] slots.
    ///
    /// With the `std` feature the growth generator is seeded from the
    /// operating system.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_table::hash_table::HashTable;
    /// # use probe_table::hash_table::INITIAL_CAPACITY;
    /// #
    /// let table: HashTable<String> = HashTable::new();
    /// assert!(table.is_empty());
    /// assert_eq!(table.capacity(), INITIAL_CAPACITY);
    /// ```
    pub fn new() -> Self {
        Self::with_rng(growth_rng())
    }

    /// Creates an empty table whose growth sizes are drawn from a generator
    /// seeded with `seed`.
    ///
    /// Two tables built with the same seed grow to the same capacities.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed))
    }

    fn with_rng(rng: SmallRng) -> Self {
        Self {
            slots: empty_slots(INITIAL_CAPACITY),
            populated: 0,
            tombstones: 0,
            rng,
        }
    }

    /// Reseeds the generator used to pick growth sizes.
    pub fn reseed_growth(&mut self, seed: u64) {
        self.rng = SmallRng::seed_from_u64(seed);
    }

    /// Returns an iterator over all values in the table.
    ///
    /// Values are yielded in ascending slot order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_table::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.entry(7, |&v: &u32| v == 1)?.or_insert(1);
    /// table.entry(3, |&v: &u32| v == 2)?.or_insert(2);
    ///
    /// let values: Vec<u32> = table.iter().copied().collect();
    /// assert_eq!(values, [2, 1]);
    /// # Ok::<(), probe_table::TableError>(())
    /// ```
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            inner: self.iter_indexed(),
        }
    }

    /// Returns an iterator over `(slot index, hash, value)` for every live
    /// value, in ascending slot order.
    pub fn iter_indexed(&self) -> IndexedIter<'_, V> {
        IndexedIter {
            slots: self.slots.iter().enumerate(),
            remaining: self.populated,
        }
    }

    /// Returns an iterator that removes and yields all values from the table.
    ///
    /// The table is empty as soon as `drain()` returns and keeps its current
    /// capacity.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_table::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.entry(1, |s: &String| s == "key1")?.or_insert("key1".to_string());
    ///
    /// let values: Vec<String> = table.drain().collect();
    /// assert!(table.is_empty());
    /// assert_eq!(values, ["key1"]);
    /// # Ok::<(), probe_table::TableError>(())
    /// ```
    pub fn drain(&mut self) -> Drain<'_, V> {
        let capacity = self.slots.len();
        let slots = mem::replace(&mut self.slots, empty_slots(capacity));
        let remaining = mem::take(&mut self.populated);
        self.tombstones = 0;

        Drain {
            slots: slots.into_iter(),
            remaining,
            _table: PhantomData,
        }
    }

    /// Returns `true` if the table contains no values.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns the number of values in the table.
    ///
    /// Tombstones are not counted.
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns the number of slots in the table.
    ///
    /// At most `capacity() * LOAD_FACTOR` of them hold values.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Removes all values and shrinks the table back to
    /// [`INITIAL_CAPACITY`] slots.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_table::hash_table::HashTable;
    /// # use probe_table::hash_table::INITIAL_CAPACITY;
    /// #
    /// let mut table = HashTable::new();
    /// for n in 0..100u64 {
    ///     table.entry(n, |&v| v == n)?.or_insert(n);
    /// }
    /// assert!(table.capacity() > INITIAL_CAPACITY);
    ///
    /// table.clear();
    /// assert!(table.is_empty());
    /// assert_eq!(table.capacity(), INITIAL_CAPACITY);
    /// # Ok::<(), probe_table::TableError>(())
    /// ```
    pub fn clear(&mut self) {
        self.slots = empty_slots(INITIAL_CAPACITY);
        self.populated = 0;
        self.tombstones = 0;
    }

    /// Walks the probe sequence for `hash`, looking for a value matching
    /// `eq`.
    ///
    /// Probing starts at `hash % capacity()` and moves forward one slot at a
    /// time, wrapping at the end, for at most `capacity()` slots. It stops at
    /// the first matching value or the first empty slot. Tombstones are
    /// skipped, but the first one seen is returned as the insertion point.
    ///
    /// # Errors
    ///
    /// [`TableError::TableFull`] if every slot is occupied by a non-matching
    /// value. The load factor makes this unreachable for tables grown through
    /// [`entry`](Self::entry).
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_table::hash_table::HashTable;
    /// # use probe_table::hash_table::Probe;
    /// #
    /// let mut table = HashTable::new();
    /// table.entry(5, |&v: &char| v == 'a')?.or_insert('a');
    ///
    /// assert_eq!(table.locate(5, |&v| v == 'a')?, Probe::Found(5));
    /// assert_eq!(table.locate(5, |&v| v == 'b')?, Probe::InsertionPoint(6));
    /// # Ok::<(), probe_table::TableError>(())
    /// ```
    pub fn locate(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Result<Probe, TableError> {
        let capacity = self.slots.len();
        let mut index = home_index(hash, capacity);
        let mut first_tombstone = None;

        for _ in 0..capacity {
            match &self.slots[index] {
                Slot::Empty => {
                    return Ok(Probe::InsertionPoint(first_tombstone.unwrap_or(index)));
                }
                Slot::Occupied {
                    hash: stored,
                    value,
                } => {
                    if *stored == hash && eq(value) {
                        return Ok(Probe::Found(index));
                    }
                }
                Slot::Tombstone => {
                    if first_tombstone.is_none() {
                        first_tombstone = Some(index);
                    }
                }
            }

            index += 1;
            if index == capacity {
                index = 0;
            }
        }

        // Every slot was checked, so a remembered tombstone is a valid home.
        match first_tombstone {
            Some(index) => Ok(Probe::InsertionPoint(index)),
            None => {
                tracing::error!(
                    capacity,
                    populated = self.populated,
                    "probe sequence exhausted every slot"
                );
                Err(TableError::TableFull { capacity })
            }
        }
    }

    /// Finds a value in the table.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_table::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.entry(42, |&v: &u64| v == 42)?.or_insert(42);
    ///
    /// assert_eq!(table.find(42, |&v| v == 42), Some(&42));
    /// assert_eq!(table.find(99, |&v| v == 99), None);
    /// # Ok::<(), probe_table::TableError>(())
    /// ```
    pub fn find(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&V> {
        match self.locate(hash, eq) {
            Ok(Probe::Found(index)) => self.slots[index].value(),
            Ok(Probe::InsertionPoint(_)) | Err(_) => None,
        }
    }

    /// Finds a value in the table and returns a mutable reference to it.
    pub fn find_mut(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&mut V> {
        match self.locate(hash, eq) {
            Ok(Probe::Found(index)) => self.slots[index].value_mut(),
            Ok(Probe::InsertionPoint(_)) | Err(_) => None,
        }
    }

    /// Removes and returns a value from the table.
    ///
    /// The slot becomes a tombstone. Removing a value that is not present does
    /// nothing and returns `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_table::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.entry(42, |&n: &u64| n == 42)?.or_insert(42);
    ///
    /// assert_eq!(table.remove(42, |&n| n == 42), Some(42));
    /// assert!(table.is_empty());
    /// assert_eq!(table.remove(42, |&n| n == 42), None);
    /// # Ok::<(), probe_table::TableError>(())
    /// ```
    pub fn remove(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<V> {
        match self.locate(hash, eq) {
            Ok(Probe::Found(index)) => self.take(index),
            Ok(Probe::InsertionPoint(_)) | Err(_) => None,
        }
    }

    fn take(&mut self, index: usize) -> Option<V> {
        match mem::replace(&mut self.slots[index], Slot::Tombstone) {
            Slot::Occupied { value, .. } => {
                self.populated -= 1;
                self.tombstones += 1;
                Some(value)
            }
            other => {
                self.slots[index] = other;
                None
            }
        }
    }

    /// Gets an entry for the given hash and equality predicate.
    ///
    /// Grows the table first if one more value would exceed the load factor,
    /// so inserting through a vacant entry always keeps the invariant.
    ///
    /// # Errors
    ///
    /// [`TableError::TableFull`] if probing fails; see
    /// [`locate`](Self::locate).
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_table::hash_table::Entry;
    /// # use probe_table::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    ///
    /// match table.entry(17, |s: &String| s == "hello")? {
    ///     Entry::Vacant(entry) => {
    ///         entry.insert("hello".to_string());
    ///     }
    ///     Entry::Occupied(mut entry) => {
    ///         *entry.get_mut() = "updated".to_string();
    ///     }
    /// }
    ///
    /// table
    ///     .entry(17, |s: &String| s == "hello")?
    ///     .or_insert("ignored".to_string());
    /// assert_eq!(table.len(), 1);
    /// # Ok::<(), probe_table::TableError>(())
    /// ```
    pub fn entry(
        &mut self,
        hash: u64,
        eq: impl Fn(&V) -> bool,
    ) -> Result<Entry<'_, V>, TableError> {
        self.grow_if_needed()?;
        self.entry_impl(hash, eq)
    }

    fn entry_impl(
        &mut self,
        hash: u64,
        eq: impl Fn(&V) -> bool,
    ) -> Result<Entry<'_, V>, TableError> {
        match self.locate(hash, eq)? {
            Probe::Found(index) => Ok(Entry::Occupied(OccupiedEntry { table: self, index })),
            Probe::InsertionPoint(index) => Ok(Entry::Vacant(VacantEntry {
                table: self,
                hash,
                index,
            })),
        }
    }

    /// Grows the table if inserting one more value would exceed
    /// [`LOAD_FACTOR`].
    ///
    /// Returns the new capacity if the table grew. If it does not need to
    /// grow but live values and tombstones together fill three quarters of
    /// the slots, the table is rebuilt at its current capacity to drop the
    /// tombstones, and `None` is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_table::hash_table::HashTable;
    /// #
    /// let mut table: HashTable<u64> = HashTable::with_seed(3);
    /// for round in 0..1000u64 {
    ///     table.entry(round, |&v| v == round)?.or_insert(round);
    ///     table.remove(round, |&v| v == round);
    /// }
    /// assert!(table.is_empty());
    /// assert_eq!(table.capacity(), 41);
    /// # Ok::<(), probe_table::TableError>(())
    /// ```
    pub fn grow_if_needed(&mut self) -> Result<Option<usize>, TableError> {
        let capacity = self.slots.len();
        if exceeds_load_factor(self.populated + 1, capacity) {
            return self.expand().map(Some);
        }

        if exceeds_used_limit(self.populated + self.tombstones + 1, capacity) {
            let tombstones = self.tombstones;
            self.relocate(capacity)?;
            tracing::debug!(
                capacity,
                tombstones,
                populated = self.populated,
                "dropped tombstones"
            );
        }

        Ok(None)
    }

    /// Moves every value into a new array of `2 * capacity() + r` slots,
    /// where `r` is drawn from `0..GROWTH_JITTER`, and returns the new
    /// capacity.
    ///
    /// Tombstones are not carried over.
    pub fn expand(&mut self) -> Result<usize, TableError> {
        let old_capacity = self.slots.len();
        let jitter = self.rng.random_range(0..GROWTH_JITTER);
        let new_capacity = old_capacity.saturating_mul(2).saturating_add(jitter);

        self.relocate(new_capacity)?;

        tracing::debug!(
            old_capacity,
            new_capacity,
            populated = self.populated,
            "expanded table"
        );

        Ok(new_capacity)
    }

    fn relocate(&mut self, capacity: usize) -> Result<(), TableError> {
        let old_slots = mem::replace(&mut self.slots, empty_slots(capacity));
        self.tombstones = 0;

        for slot in old_slots {
            if let Slot::Occupied { hash, value } = slot {
                // Values are unique, so the first free slot is the right one.
                let (Probe::InsertionPoint(index) | Probe::Found(index)) =
                    self.locate(hash, |_| false)?;
                self.slots[index] = Slot::Occupied { hash, value };
            }
        }

        Ok(())
    }

    /// Returns detailed utilization statistics for debugging.
    ///
    /// Available in tests or with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        let capacity = self.slots.len();
        let mut probe_histogram = Vec::new();
        let mut empty = 0;

        for (index, slot) in self.slots.iter().enumerate() {
            match slot {
                Slot::Empty => empty += 1,
                Slot::Tombstone => {}
                Slot::Occupied { hash, .. } => {
                    let distance = (index + capacity - home_index(*hash, capacity)) % capacity;
                    if probe_histogram.len() <= distance {
                        probe_histogram.resize(distance + 1, 0);
                    }
                    probe_histogram[distance] += 1;
                }
            }
        }

        DebugStats {
            populated: self.populated,
            capacity,
            tombstones: self.tombstones,
            empty,
            load_factor: self.populated as f64 / capacity as f64,
            probe_histogram,
        }
    }
}

/// A view into a single entry in the hash table, which may be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashTable`].
///
/// [`entry`]: HashTable::entry
pub enum Entry<'a, V> {
    /// A vacant entry - no matching value is present in the table
    Vacant(VacantEntry<'a, V>),
    /// An occupied entry - a matching value is present in the table
    Occupied(OccupiedEntry<'a, V>),
}

impl<'a, V> Entry<'a, V> {
    /// Inserts `default` if the entry is vacant and returns a mutable
    /// reference to the value.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts the result of `default` if the entry is vacant and returns a
    /// mutable reference to the value.
    pub fn or_insert_with(self, default: impl FnOnce() -> V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Calls `f` on the value if the entry is occupied.
    pub fn and_modify(self, f: impl FnOnce(&mut V)) -> Self {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }

    /// Returns the slot index this entry refers to.
    pub fn index(&self) -> usize {
        match self {
            Entry::Occupied(entry) => entry.index(),
            Entry::Vacant(entry) => entry.index(),
        }
    }
}

impl<'a, V> Entry<'a, V>
where
    V: Default,
{
    /// Inserts the default value if the entry is vacant and returns a mutable
    /// reference to the value.
    pub fn or_default(self) -> &'a mut V {
        self.or_insert_with(Default::default)
    }
}

/// A view into a vacant entry in a [`HashTable`].
pub struct VacantEntry<'a, V> {
    table: &'a mut HashTable<V>,
    hash: u64,
    index: usize,
}

impl<'a, V> VacantEntry<'a, V> {
    /// Returns the slot index the value will be written to.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Inserts a value into the table and returns a mutable reference to it.
    pub fn insert(self, value: V) -> &'a mut V {
        let table = self.table;
        if matches!(table.slots[self.index], Slot::Tombstone) {
            tracing::trace!(index = self.index, "reusing tombstone");
            table.tombstones -= 1;
        }
        table.populated += 1;

        let slot = &mut table.slots[self.index];
        *slot = Slot::Occupied {
            hash: self.hash,
            value,
        };
        match slot {
            Slot::Occupied { value, .. } => value,
            Slot::Empty | Slot::Tombstone => unreachable!("slot was just occupied"),
        }
    }
}

/// A view into an occupied entry in a [`HashTable`].
pub struct OccupiedEntry<'a, V> {
    table: &'a mut HashTable<V>,
    index: usize,
}

impl<'a, V> OccupiedEntry<'a, V> {
    /// Returns the slot index holding the value.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &V {
        match self.table.slots[self.index].value() {
            Some(value) => value,
            None => unreachable!("occupied entry points at a live slot"),
        }
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        match self.table.slots[self.index].value_mut() {
            Some(value) => value,
            None => unreachable!("occupied entry points at a live slot"),
        }
    }

    /// Converts the entry into a mutable reference to the value with the
    /// lifetime of the table.
    pub fn into_mut(self) -> &'a mut V {
        let table = self.table;
        match table.slots[self.index].value_mut() {
            Some(value) => value,
            None => unreachable!("occupied entry points at a live slot"),
        }
    }

    /// Removes the value from the table, leaving a tombstone, and returns it.
    pub fn remove(self) -> V {
        match self.table.take(self.index) {
            Some(value) => value,
            None => unreachable!("occupied entry points at a live slot"),
        }
    }
}

/// An iterator over `(slot index, hash, value)` for every value in a
/// [`HashTable`].
///
/// This struct is created by [`HashTable::iter_indexed`].
pub struct IndexedIter<'a, V> {
    slots: core::iter::Enumerate<core::slice::Iter<'a, Slot<V>>>,
    remaining: usize,
}

impl<'a, V> Iterator for IndexedIter<'a, V> {
    type Item = (usize, u64, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        for (index, slot) in self.slots.by_ref() {
            if let Slot::Occupied { hash, value } = slot {
                self.remaining -= 1;
                return Some((index, *hash, value));
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for IndexedIter<'_, V> {}

/// An iterator over the values in a [`HashTable`].
///
/// This struct is created by [`HashTable::iter`].
pub struct Iter<'a, V> {
    inner: IndexedIter<'a, V>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, _, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

/// A draining iterator over the values in a [`HashTable`].
///
/// This struct is created by [`HashTable::drain`]. Values not consumed are
/// dropped together with the iterator.
pub struct Drain<'a, V> {
    slots: alloc::vec::IntoIter<Slot<V>>,
    remaining: usize,
    _table: PhantomData<&'a mut HashTable<V>>,
}

impl<V> Iterator for Drain<'_, V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        for slot in self.slots.by_ref() {
            if let Slot::Occupied { value, .. } = slot {
                self.remaining -= 1;
                return Some(value);
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Drain<'_, V> {}
