//! Random draws used while building trees.
//!
//! Every function takes the random stream explicitly; nothing here touches a
//! global generator, so a seeded stream fully determines the output.

use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;
use rand_distr::StandardNormal;

/// Draw `k` distinct integers from `[1, N]` in random order.
///
/// Uses Floyd's algorithm so only `k` draws are needed regardless of `n`,
/// followed by a shuffle so the output order is random as well.
///
/// # Panics
/// If `k < 1` or `k > n`.
pub fn sample_without_replacement<R: Rng + ?Sized>(k: usize, n: usize, rng: &mut R) -> Vec<usize> {
    assert!(
        k >= 1 && k <= n,
        "cannot sample {k} distinct values from [1, {n}]"
    );

    let mut seen = HashSet::with_capacity(k);
    // Insertion order, not hash order, feeds the shuffle.
    let mut picked = Vec::with_capacity(k);
    for r in (n - k + 1)..=n {
        let v = rng.random_range(1..=r);
        let v = if seen.insert(v) {
            v
        } else {
            seen.insert(r);
            r
        };
        picked.push(v);
    }
    picked.shuffle(rng);
    picked
}

/// Uniform draw from the closed interval `[lo, hi]`.
///
/// Works for any finite bounds, including spans too wide to represent
/// (`hi - lo` overflowing to infinity).
///
/// # Panics
/// If `lo > hi` or either bound is NaN.
#[inline]
pub fn uniform<R: Rng + ?Sized>(lo: f64, hi: f64, rng: &mut R) -> f64 {
    assert!(lo <= hi, "empty interval [{lo}, {hi}]");
    let t: f64 = rng.random();
    let span = hi - lo;
    let v = if span.is_finite() {
        lo + t * span
    } else {
        lo * (1.0 - t) + hi * t
    };
    v.clamp(lo, hi)
}

#[inline]
pub fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.sample(StandardNormal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn full_draw_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut drawn = sample_without_replacement(10, 10, &mut rng);
        drawn.sort_unstable();
        assert_eq!(drawn, (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn same_seed_same_draw() {
        let a = sample_without_replacement(20, 1000, &mut StdRng::seed_from_u64(11));
        let b = sample_without_replacement(20, 1000, &mut StdRng::seed_from_u64(11));
        assert_eq!(a, b);
    }

    #[test]
    fn order_is_not_sorted() {
        // A sorted full permutation of 50 elements after a shuffle would be a
        // 1 in 50! coincidence.
        let drawn = sample_without_replacement(50, 50, &mut StdRng::seed_from_u64(5));
        let mut sorted = drawn.clone();
        sorted.sort_unstable();
        assert_ne!(drawn, sorted);
    }

    #[test]
    #[should_panic(expected = "cannot sample")]
    fn more_than_universe_panics() {
        sample_without_replacement(5, 4, &mut StdRng::seed_from_u64(0));
    }

    #[test]
    #[should_panic(expected = "cannot sample")]
    fn empty_draw_panics() {
        sample_without_replacement(0, 4, &mut StdRng::seed_from_u64(0));
    }

    #[test]
    fn uniform_degenerate_range() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(uniform(2.5, 2.5, &mut rng), 2.5);
        for _ in 0..100 {
            let v = uniform(-1.0, 3.0, &mut rng);
            assert!((-1.0..=3.0).contains(&v));
        }
    }

    #[test]
    fn uniform_span_wider_than_f64() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..100 {
            let v = uniform(-1e308, 1e308, &mut rng);
            assert!(v.is_finite());
            assert!((-1e308..=1e308).contains(&v));
        }
        let v = uniform(f64::MIN, f64::MAX, &mut rng);
        assert!(v.is_finite());
    }

    #[test]
    #[should_panic(expected = "empty interval")]
    fn uniform_reversed_bounds_panics() {
        uniform(1.0, 0.0, &mut StdRng::seed_from_u64(0));
    }

    #[test]
    fn standard_normal_moments() {
        let mut rng = StdRng::seed_from_u64(9);
        let n = 20_000;
        let draws: Vec<f64> = (0..n).map(|_| standard_normal(&mut rng)).collect();
        let mean = draws.iter().sum::<f64>() / n as f64;
        let var = draws.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / n as f64;
        assert!(mean.abs() < 0.05, "mean = {mean}");
        assert!((var - 1.0).abs() < 0.05, "var = {var}");
    }

    proptest! {
        #[test]
        fn draws_are_distinct_and_in_range(n in 1usize..200, frac in 0.0f64..1.0, seed: u64) {
            let k = ((n as f64 * frac) as usize).clamp(1, n);
            let drawn = sample_without_replacement(k, n, &mut StdRng::seed_from_u64(seed));
            prop_assert_eq!(drawn.len(), k);
            prop_assert!(drawn.iter().all(|&v| (1..=n).contains(&v)));
            let unique: HashSet<_> = drawn.iter().copied().collect();
            prop_assert_eq!(unique.len(), k);
        }
    }
}
