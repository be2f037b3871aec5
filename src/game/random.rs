//! Random payoff matrices for tests and benchmarks.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game::matrix::PayoffMatrix;

/// A `rows`×`cols` matrix with entries drawn uniformly from `[low, high)`.
///
/// # Panics
/// Panics if either dimension is zero or `low >= high`.
pub fn random_matrix<R: Rng>(
    rows: usize,
    cols: usize,
    low: f64,
    high: f64,
    rng: &mut R,
) -> PayoffMatrix {
    assert!(rows > 0 && cols > 0, "matrix needs at least one row and column");
    assert!(low < high, "empty payoff range");

    let data = (0..rows)
        .map(|_| (0..cols).map(|_| rng.gen_range(low..high)).collect())
        .collect();
    PayoffMatrix::new(data).expect("finite entries in a non-empty grid")
}

/// Reproducible random matrix with integer-valued payoffs in `[-10, 10]`.
///
/// # Panics
/// Panics if either dimension is zero.
pub fn seeded_matrix(rows: usize, cols: usize, seed: u64) -> PayoffMatrix {
    assert!(rows > 0 && cols > 0, "matrix needs at least one row and column");
    let mut rng = StdRng::seed_from_u64(seed);
    let data = (0..rows)
        .map(|_| (0..cols).map(|_| rng.gen_range(-10i32..=10) as f64).collect())
        .collect();
    PayoffMatrix::new(data).expect("finite entries in a non-empty grid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_is_reproducible() {
        assert_eq!(seeded_matrix(3, 4, 7), seeded_matrix(3, 4, 7));
        assert_eq!(seeded_matrix(3, 4, 7).shape(), (3, 4));
    }

    #[test]
    fn test_random_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let m = random_matrix(5, 2, -1.0, 1.0, &mut rng);
        assert!(m.iter_rows().flatten().all(|&x| (-1.0..1.0).contains(&x)));
    }
}
