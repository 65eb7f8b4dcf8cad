use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// `count` uniform values in `[min, max]`. A seed makes the draw reproducible.
pub fn generate_uniform(count: usize, min: f64, max: f64, seed: Option<u64>) -> Vec<f64> {
    let mut rng = match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_rng(&mut rand::rng()),
    };
    (0..count).map(|_| rng.random_range(min..=max)).collect()
}
