//! Sample roster for trying the engine out.

use rand::seq::SliceRandom;
use rand::Rng;

/// Names the sample roster is drawn from
pub const SAMPLE_POOL: [&str; 15] = [
    "Alice", "Bruno", "Chloe", "Dmitri", "Elena", "Farah", "Gus", "Hana", "Ivan", "Jade", "Kofi",
    "Lena", "Mateo", "Nia", "Oscar",
];

/// Members in a sample roster
pub const SAMPLE_SIZE: usize = 10;

/// Draw `count` distinct names from [`SAMPLE_POOL`], capped at the pool size
pub fn sample_names<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<String> {
    let mut pool = SAMPLE_POOL.to_vec();
    pool.shuffle(rng);
    pool.into_iter()
        .take(count)
        .map(str::to_string)
        .collect()
}

/// Sample roster as raw text, one name per line
pub fn sample_roster<R: Rng + ?Sized>(rng: &mut R) -> String {
    sample_names(SAMPLE_SIZE, rng).join("\n")
}
