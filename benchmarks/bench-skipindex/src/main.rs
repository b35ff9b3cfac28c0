use std::time::{Duration, Instant};

use oorandom::Rand32;
use tracing::Level;

use anchored_skipindex::{Promotion, SearchMode, SkipIndex, SkipIndexOptions};


const NUM_KEYS: u32 = 200_000;
const SEED: u64 = 0x_BE_0C_4A_11;


fn main() {
    for (numerator, denominator) in [(1, 2), (1, 3), (1, 4)] {
        let options = SkipIndexOptions {
            promotion_numerator:   numerator,
            promotion_denominator: denominator,
            seed:                  SEED,
        };

        match SkipIndex::with_options(options) {
            Ok(index) => bench_index(index, numerator, denominator),
            Err(error) => println!("skipping bias {numerator}/{denominator}: {error}"),
        }
    }
}

fn bench_index<P: Promotion>(
    mut index:   SkipIndex<u32, u32, P>,
    numerator:   u32,
    denominator: u32,
) {
    println!("bias {numerator}/{denominator}, {NUM_KEYS} keys");

    let mut prng = Rand32::new(SEED);
    let mut keys: Vec<u32> = (0..NUM_KEYS).collect();
    shuffle(&mut prng, &mut keys);

    let (elapsed, ()) = time(|| {
        for &key in &keys {
            index.insert(key, key);
        }
    });
    report("insert", elapsed, index.levels());

    shuffle(&mut prng, &mut keys);
    let (elapsed, found) = time(|| {
        keys.iter()
            .filter(|&key| index.find(key, 0, SearchMode::Exact).is_some())
            .count()
    });
    report("find", elapsed, found);

    let (elapsed, found) = time(|| {
        keys.iter()
            .filter(|&key| index.find(key, 16, SearchMode::Exact).is_some())
            .count()
    });
    report("find (limit 16)", elapsed, found);

    let (elapsed, checksum) = time(|| {
        index.sort().into_iter().fold(0_u32, |sum, &value| sum.wrapping_add(value))
    });
    report("sort", elapsed, checksum);

    shuffle(&mut prng, &mut keys);
    let (elapsed, deleted) = time(|| {
        keys.iter()
            .filter(|&key| index.delete(key).is_some())
            .count()
    });
    report("delete", elapsed, deleted);

    tracing::event!(Level::INFO, numerator, denominator, levels = index.levels(), "finished");
}

fn time<T>(f: impl FnOnce() -> T) -> (Duration, T) {
    let start = Instant::now();
    let output = f();
    (start.elapsed(), output)
}

fn report(phase: &str, elapsed: Duration, result: impl std::fmt::Display) {
    println!("  {phase:<16} {:>10.2?}  ({result})", elapsed);
}

fn shuffle(prng: &mut Rand32, keys: &mut [u32]) {
    for i in (1..keys.len()).rev() {
        #[expect(clippy::cast_possible_truncation, reason = "there are fewer than 2^32 keys")]
        let upper = (i + 1) as u32;
        let j = prng.rand_range(0..upper) as usize;
        keys.swap(i, j);
    }
}
