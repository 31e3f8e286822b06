use thiserror::Error;

/// Errors returned by [`HashTable`](crate::HashTable) and
/// [`HashMap`](crate::HashMap) operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TableError {
    /// The requested key has no entry in the map.
    ///
    /// This is the only error expected in normal use. Callers usually treat it
    /// as "absent".
    #[error("key not found")]
    KeyNotFound,
    /// Probing visited every slot without finding the key, an empty slot, or a
    /// tombstone.
    ///
    /// The load factor keeps at least half of the slots free, so this means
    /// the table's internal bookkeeping is broken.
    #[error("probe sequence exhausted all {capacity} slots")]
    TableFull {
        /// Number of slots in the table when probing failed.
        capacity: usize,
    },
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(TableError::KeyNotFound.to_string(), "key not found");
        assert_eq!(
            TableError::TableFull { capacity: 41 }.to_string(),
            "probe sequence exhausted all 41 slots"
        );
    }
}
