use clap::Parser;
use probe_table::DefaultHashBuilder;
use probe_table::HashMap;
use probe_table::TableError;
use probe_table::TracingReporter;

#[derive(Parser, Debug)]
struct Args {
    /// Number of keys to insert.
    #[arg(short = 'n', long = "count", default_value_t = 1000)]
    count: u64,

    /// Remove every n-th key after inserting.
    #[arg(short = 'r', long = "remove_every", default_value_t = 3)]
    remove_every: u64,

    /// Report every successful set and get.
    #[arg(short = 'b', long = "basic_calls")]
    basic_calls: bool,

    /// Seed for the growth generator.
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Print the slot listing at the end.
    #[arg(short = 'd', long = "dump")]
    dump: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let args = Args::parse();

    let mut map: HashMap<u64, u64, DefaultHashBuilder, TracingReporter> =
        HashMap::with_reporter(TracingReporter);
    map.report_basic_calls(args.basic_calls);
    if let Some(seed) = args.seed {
        map.reseed_growth(seed);
    }

    for key in 0..args.count {
        map.set(key, key * key)?;
    }
    println!("Inserted {} keys into {} slots", map.len(), map.capacity());

    if args.remove_every > 0 {
        let removed = (0..args.count)
            .step_by(args.remove_every as usize)
            .filter(|key| map.remove(key).is_some())
            .count();
        println!("Removed {removed} keys, {} remain", map.len());
    }

    let mut misses = 0;
    for key in 0..args.count {
        match map.get(&key) {
            Ok(value) => assert_eq!(*value, key * key),
            Err(TableError::KeyNotFound) => misses += 1,
            Err(err) => return Err(err.into()),
        }
    }
    println!("Lookups missed {misses} of {} keys", args.count);

    map.debug_stats().print();

    if args.dump {
        let mut listing = String::new();
        map.dump(&mut listing)?;
        print!("{listing}");
    }

    Ok(())
}
