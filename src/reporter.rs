use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt::Arguments;
use core::fmt::Debug;

/// Receives human-readable descriptions of what a [`HashMap`] is doing.
///
/// The map calls [`report`] for every expansion and every failed `get`, and,
/// when [`report_basic_calls`] is enabled, for every successful `set` and
/// `get`. Reporting is best-effort: the map never looks at what the reporter
/// does with a message.
///
/// [`HashMap`]: crate::HashMap
/// [`report`]: Reporter::report
/// [`report_basic_calls`]: crate::HashMap::report_basic_calls
pub trait Reporter {
    /// Handles a single message.
    fn report(&self, message: &str);

    /// Returns `false` if every message would be discarded.
    ///
    /// The map skips formatting messages for inactive reporters.
    fn is_active(&self) -> bool {
        true
    }
}

/// The events a [`HashMap`] emits, as seen by its reporter parameter.
///
/// Every [`Reporter`] observes maps whose keys and values are `Debug` by
/// formatting each event into a message. [`NoReporter`] observes any map and
/// ignores everything, so a map without a reporter places no formatting
/// bounds on its keys or values.
///
/// [`HashMap`]: crate::HashMap
pub trait Observer<K, V> {
    /// The table grew to `capacity` slots.
    fn expanded(&self, capacity: usize);

    /// `set` wrote `key` and `value` to slot `index`.
    fn stored(&self, index: usize, key: &K, value: &V);

    /// `get` found `value` for `key`.
    fn found(&self, key: &K, value: &V);

    /// `get` found nothing for `key`.
    fn missed(&self, key: &K);
}

fn emit<R: Reporter + ?Sized>(reporter: &R, message: Arguments<'_>) {
    if reporter.is_active() {
        reporter.report(&alloc::fmt::format(message));
    }
}

impl<K, V, R> Observer<K, V> for R
where
    K: Debug,
    V: Debug,
    R: Reporter,
{
    fn expanded(&self, capacity: usize) {
        emit(self, format_args!("Expanding to {capacity} elements."));
    }

    fn stored(&self, index: usize, key: &K, value: &V) {
        emit(self, format_args!("pairs[{index}] = {key:?}:{value:?}"));
    }

    fn found(&self, key: &K, value: &V) {
        emit(self, format_args!("get({key:?}) => {value:?}"));
    }

    fn missed(&self, key: &K) {
        emit(self, format_args!("get({key:?}) failed"));
    }
}

/// The absent reporter. Discards everything.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NoReporter;

impl<K, V> Observer<K, V> for NoReporter {
    #[inline(always)]
    fn expanded(&self, _capacity: usize) {}

    #[inline(always)]
    fn stored(&self, _index: usize, _key: &K, _value: &V) {}

    #[inline(always)]
    fn found(&self, _key: &K, _value: &V) {}

    #[inline(always)]
    fn missed(&self, _key: &K) {}
}

/// Forwards every message to `tracing` as an `INFO` event with target
/// `probe_table::reporter`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, message: &str) {
        tracing::info!(target: "probe_table::reporter", "{message}");
    }
}

/// Collects every message in order.
///
/// # Examples
///
/// ```rust
/// use core::cell::RefCell;
///
/// use probe_table::HashMap;
/// use probe_table::reporter::Reporter;
/// # use siphasher::sip::SipHasher;
/// # use core::hash::BuildHasherDefault;
///
/// let log = RefCell::new(Vec::<String>::new());
/// let map: HashMap<u32, u32, BuildHasherDefault<SipHasher>, _> =
///     HashMap::with_hasher_and_reporter(Default::default(), &log);
/// assert!(map.get(&7).is_err());
/// assert_eq!(log.borrow().as_slice(), ["get(7) failed"]);
/// ```
impl Reporter for RefCell<Vec<String>> {
    fn report(&self, message: &str) {
        self.borrow_mut().push(String::from(message));
    }
}

impl<R: Reporter + ?Sized> Reporter for &R {
    #[inline]
    fn report(&self, message: &str) {
        (**self).report(message)
    }

    #[inline]
    fn is_active(&self) -> bool {
        (**self).is_active()
    }
}
