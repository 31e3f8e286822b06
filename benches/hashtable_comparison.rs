use alloc::format;
use core::hash::BuildHasherDefault;
use core::hash::Hash;
use core::hash::Hasher;
use core::hint::black_box;

use criterion::AxisScale;
use criterion::BatchSize;
use criterion::Criterion;
use criterion::PlotConfiguration;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use hashbrown::hash_table::Entry as HashbrownEntry;
use hashbrown::hash_table::HashTable as HashbrownHashTable;
use probe_table::HashMap as ProbeHashMap;
use probe_table::HashTable as ProbeHashTable;
use probe_table::hash_table::Entry as ProbeEntry;
use rand::Rng;
use rand::SeedableRng;
use rand::TryRngCore;
use rand::rngs::OsRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand_distr::Zipf;
use siphasher::sip::SipHasher;

extern crate alloc;

trait KeyValuePair: Clone {
    fn new(key: u64) -> Self;

    fn hash_key(&self) -> u64;
    fn eq_key(&self, other: &Self) -> bool;
}

#[derive(Clone)]
struct TestItem {
    key: String,
    _value: u64,
}

impl KeyValuePair for TestItem {
    fn new(key: u64) -> Self {
        black_box(Self {
            key: format!("key_{:016X}", key),
            _value: key,
        })
    }

    fn hash_key(&self) -> u64 {
        let mut hasher = SipHasher::new();
        self.key.hash(&mut hasher);
        hasher.finish()
    }

    fn eq_key(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

#[derive(Clone)]
struct SmallTestItem {
    key: u64,
}

impl KeyValuePair for SmallTestItem {
    fn new(key: u64) -> Self {
        black_box(Self { key })
    }

    fn hash_key(&self) -> u64 {
        let mut hasher = SipHasher::new();
        self.key.hash(&mut hasher);
        hasher.finish()
    }

    fn eq_key(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

#[derive(Clone, Copy)]
enum Operation {
    Insert,
    Remove,
    Find,
}

const SIZES: &[usize] = &[
    (1 << 10),
    (1 << 11),
    (1 << 12),
    (1 << 13),
    (1 << 14),
    (1 << 15),
    (1 << 16),
];

fn probe_insert<TestItem: KeyValuePair>(
    table: &mut ProbeHashTable<TestItem>,
    hash: u64,
    item: TestItem,
) {
    match table.entry(hash, |v| v.eq_key(&item)).unwrap() {
        ProbeEntry::Vacant(entry) => {
            black_box(entry.insert(item));
        }
        ProbeEntry::Occupied(mut occupied) => {
            *occupied.get_mut() = item;
        }
    }
}

fn hashbrown_insert<TestItem: KeyValuePair>(
    table: &mut HashbrownHashTable<TestItem>,
    hash: u64,
    item: TestItem,
) {
    match table.entry(hash, |v| v.eq_key(&item), |v| v.hash_key()) {
        HashbrownEntry::Vacant(entry) => {
            black_box(entry.insert(item));
        }
        HashbrownEntry::Occupied(mut occupied) => {
            *occupied.get_mut() = item;
        }
    }
}

fn bench_insert_random<TestItem: KeyValuePair, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!(
        "insert_random_{}",
        core::any::type_name::<TestItem>()
    ));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    let mut rng = OsRng;

    for &size in SIZES[..=MAX_SIZE].iter() {
        let hash_and_item = (0..size)
            .map(|_| {
                let key = rng.try_next_u64().unwrap();
                let item = TestItem::new(key);
                let hash = item.hash_key();
                (hash, item)
            })
            .collect::<Vec<(u64, TestItem)>>();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("probe_table/{size}"), |b| {
            b.iter_batched(
                || {
                    let mut hash_and_item = hash_and_item.clone();
                    hash_and_item.shuffle(&mut SmallRng::from_os_rng());
                    hash_and_item
                },
                |hash_and_item| {
                    let mut table = ProbeHashTable::<TestItem>::new();
                    for (hash, item) in hash_and_item {
                        probe_insert(&mut table, hash, item);
                    }
                    black_box(table)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || {
                    let mut hash_and_item = hash_and_item.clone();
                    hash_and_item.shuffle(&mut SmallRng::from_os_rng());
                    hash_and_item
                },
                |hash_and_item| {
                    let mut table = HashbrownHashTable::<TestItem>::with_capacity(0);
                    for (hash, item) in hash_and_item {
                        hashbrown_insert(&mut table, hash, item);
                    }
                    black_box(table)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_find_hit_miss<TestItem: KeyValuePair, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!(
        "find_hit_miss_{}",
        core::any::type_name::<TestItem>()
    ));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES[..=MAX_SIZE].iter() {
        let hash_and_item = (0..size * 2)
            .map(|key| {
                let item = TestItem::new(key as u64);
                let hash = item.hash_key();
                (hash, item)
            })
            .collect::<Vec<(u64, TestItem)>>();

        let mut probe = ProbeHashTable::<TestItem>::new();
        let mut hashbrown_table = HashbrownHashTable::<TestItem>::with_capacity(0);
        for (hash, item) in hash_and_item.iter().step_by(2).cloned() {
            probe_insert(&mut probe, hash, item.clone());
            hashbrown_insert(&mut hashbrown_table, hash, item);
        }

        group.throughput(Throughput::Elements(hash_and_item.len() as u64));
        group.bench_function(format!("probe_table/{size}"), |b| {
            b.iter_batched(
                || {
                    let mut hash_and_item = hash_and_item.clone();
                    hash_and_item.shuffle(&mut SmallRng::from_os_rng());
                    hash_and_item
                },
                |hash_and_item| {
                    for (hash, key) in hash_and_item.iter() {
                        black_box(probe.find(*hash, |v| v.eq_key(key)));
                    }
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || {
                    let mut hash_and_item = hash_and_item.clone();
                    hash_and_item.shuffle(&mut SmallRng::from_os_rng());
                    hash_and_item
                },
                |hash_and_item| {
                    for (hash, key) in hash_and_item.iter() {
                        black_box(hashbrown_table.find(*hash, |v| v.eq_key(key)));
                    }
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_churn<TestItem: KeyValuePair, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("churn_{}", core::any::type_name::<TestItem>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES[..=MAX_SIZE].iter() {
        let insertions_and_removals = (0..size)
            .flat_map(|i| {
                let key = i as u64;
                let item = TestItem::new(key);
                let hash = item.hash_key();
                [(hash, item.clone()), (hash, item)]
            })
            .collect::<Vec<(u64, TestItem)>>();

        group.throughput(Throughput::Elements(size as u64 * 2));
        group.bench_function(format!("probe_table/{size}"), |b| {
            b.iter_batched(
                || {
                    let mut hash_and_item = insertions_and_removals.clone();
                    hash_and_item.shuffle(&mut SmallRng::from_os_rng());
                    hash_and_item
                },
                |hash_and_item| {
                    let mut table = ProbeHashTable::<TestItem>::new();
                    for (hash, item) in hash_and_item {
                        match table.entry(hash, |v| v.eq_key(&item)).unwrap() {
                            ProbeEntry::Vacant(entry) => {
                                entry.insert(item);
                            }
                            ProbeEntry::Occupied(entry) => {
                                black_box(entry.remove());
                            }
                        }
                    }
                    black_box(table)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || {
                    let mut hash_and_item = insertions_and_removals.clone();
                    hash_and_item.shuffle(&mut SmallRng::from_os_rng());
                    hash_and_item
                },
                |hash_and_item| {
                    let mut table = HashbrownHashTable::<TestItem>::with_capacity(0);
                    for (hash, item) in hash_and_item {
                        match table.entry(hash, |v| v.eq_key(&item), |v| v.hash_key()) {
                            HashbrownEntry::Vacant(entry) => {
                                black_box(entry.insert(item));
                            }
                            HashbrownEntry::Occupied(entry) => {
                                black_box(entry.remove().0);
                            }
                        }
                    }
                    black_box(table)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_mixed_probabilistic_zipf<TestItem: KeyValuePair, const MAX_SIZE: usize>(
    c: &mut Criterion,
) {
    for exponent in [1.0, 1.3] {
        let mut group = c.benchmark_group(format!(
            "mixed_probabilistic_zipf_{:.01}_{}",
            exponent,
            core::any::type_name::<TestItem>()
        ));
        group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

        const KEY_SPACE_MULTIPLIER: u64 = 2;

        for &size in SIZES[..=MAX_SIZE].iter() {
            let mut rng = SmallRng::from_os_rng();
            let op_distr = Zipf::new(3.0, exponent).unwrap();
            let insert_distr = Zipf::new(size as f32 - 1.0, 1.0).unwrap();
            let find_remove_distr =
                Zipf::new(size as f32 * KEY_SPACE_MULTIPLIER as f32 - 1.0, 1.0).unwrap();

            // Keys are drawn up front so both tables see the same workload.
            let operations = (0..size * 3)
                .map(|_| {
                    let op_choice: f64 = rng.sample(op_distr);
                    let (operation, key) = if op_choice <= 1.0 {
                        (Operation::Find, rng.sample(find_remove_distr))
                    } else if op_choice <= 2.0 {
                        (Operation::Insert, rng.sample(insert_distr))
                    } else {
                        (Operation::Remove, rng.sample(find_remove_distr))
                    };
                    let item = TestItem::new(key as u64);
                    (operation, item.hash_key(), item)
                })
                .collect::<Vec<(Operation, u64, TestItem)>>();

            group.throughput(Throughput::Elements(operations.len() as u64));
            group.bench_function(format!("probe_table/{size}"), |b| {
                b.iter_batched(
                    || operations.clone(),
                    |operations| {
                        let mut table = ProbeHashTable::<TestItem>::new();
                        for (operation, hash, item) in operations {
                            match operation {
                                Operation::Insert => probe_insert(&mut table, hash, item),
                                Operation::Remove => {
                                    black_box(table.remove(hash, |v| v.eq_key(&item)));
                                }
                                Operation::Find => {
                                    black_box(table.find(hash, |v| v.eq_key(&item)));
                                }
                            }
                        }
                        black_box(table)
                    },
                    BatchSize::SmallInput,
                )
            });

            group.bench_function(format!("hashbrown/{size}"), |b| {
                b.iter_batched(
                    || operations.clone(),
                    |operations| {
                        let mut table = HashbrownHashTable::<TestItem>::with_capacity(0);
                        for (operation, hash, item) in operations {
                            match operation {
                                Operation::Insert => hashbrown_insert(&mut table, hash, item),
                                Operation::Remove => {
                                    let result = match table.find_entry(hash, |v| v.eq_key(&item))
                                    {
                                        Ok(entry) => Some(entry.remove().0),
                                        Err(_) => None,
                                    };
                                    black_box(result);
                                }
                                Operation::Find => {
                                    black_box(table.find(hash, |v| v.eq_key(&item)));
                                }
                            }
                        }
                        black_box(table)
                    },
                    BatchSize::SmallInput,
                )
            });
        }

        group.finish();
    }
}

fn bench_map_set_get<const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_set_get");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES[..=MAX_SIZE].iter() {
        let mut keys = (0..size as u64).collect::<Vec<u64>>();
        keys.shuffle(&mut SmallRng::from_os_rng());

        group.throughput(Throughput::Elements(size as u64 * 2));
        group.bench_function(format!("probe_table/{size}"), |b| {
            b.iter(|| {
                let mut map: ProbeHashMap<u64, u64, BuildHasherDefault<SipHasher>> =
                    ProbeHashMap::new();
                for &key in &keys {
                    map.set(key, key).unwrap();
                }
                for &key in &keys {
                    black_box(map.get(&key).unwrap());
                }
                black_box(map)
            })
        });

        group.bench_function(format!("std/{size}"), |b| {
            b.iter(|| {
                let mut map: std::collections::HashMap<u64, u64, BuildHasherDefault<SipHasher>> =
                    std::collections::HashMap::default();
                for &key in &keys {
                    map.insert(key, key);
                }
                for &key in &keys {
                    black_box(map.get(&key).unwrap());
                }
                black_box(map)
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_insert_random::<SmallTestItem, 6>,
    bench_insert_random::<TestItem, 6>,
    bench_find_hit_miss::<SmallTestItem, 6>,
    bench_find_hit_miss::<TestItem, 6>,
    bench_churn::<SmallTestItem, 6>,
    bench_churn::<TestItem, 6>,
    bench_mixed_probabilistic_zipf::<SmallTestItem, 6>,
    bench_mixed_probabilistic_zipf::<TestItem, 6>,
    bench_map_set_get::<6>,
);

criterion_main!(benches);
