// Weighted draw over a token -> count table.
//
// Draws an integer uniformly in [0, total) and walks the cumulative counts
// in key order. Integer arithmetic keeps the draw exact and identical on
// every platform for a given seed. An empty table is an error, never a
// default token.

use crate::error::MelodyError;
use crate::markov::TransitionCounts;
use crate::token::Token;
use birthsong_prng::RandomSource;

/// Pick one token with probability `count / sum(counts)`.
pub fn sample_weighted<'a>(
    weights: &'a TransitionCounts,
    rng: &mut impl RandomSource,
) -> Result<&'a Token, MelodyError> {
    let total: u64 = weights.values().map(|&c| u64::from(c)).sum();
    if total == 0 {
        return Err(MelodyError::EmptyDistribution);
    }

    let target = rng.range_u64(0, total);
    let mut cumulative = 0u64;
    for (token, &count) in weights {
        cumulative += u64::from(count);
        if target < cumulative {
            return Ok(token);
        }
    }
    unreachable!("target {target} below total {total} must fall inside a bucket")
}

#[cfg(test)]
mod tests {
    use super::*;
    use birthsong_prng::MelodyRng;

    fn table(entries: &[(&str, u32)]) -> TransitionCounts {
        entries.iter().map(|&(t, c)| (Token::from(t), c)).collect()
    }

    /// Always yields the same raw value.
    struct Fixed(u64);

    impl RandomSource for Fixed {
        fn next_u64(&mut self) -> u64 {
            self.0
        }
    }

    #[test]
    fn empty_table_is_an_error() {
        let mut rng = MelodyRng::new(1);
        assert_eq!(
            sample_weighted(&TransitionCounts::new(), &mut rng),
            Err(MelodyError::EmptyDistribution)
        );
    }

    #[test]
    fn single_entry_always_wins() {
        let weights = table(&[("E4", 3)]);
        let mut rng = MelodyRng::new(9);
        for _ in 0..100 {
            assert_eq!(sample_weighted(&weights, &mut rng).unwrap().as_str(), "E4");
        }
    }

    #[test]
    fn buckets_follow_key_order() {
        // Keys iterate A4, C4, G4 with widths 1, 2, 1 over total 4.
        let weights = table(&[("G4", 1), ("A4", 1), ("C4", 2)]);
        let pick = |raw| sample_weighted(&weights, &mut Fixed(raw)).unwrap().as_str().to_string();
        assert_eq!(pick(0), "A4");
        assert_eq!(pick(1), "C4");
        assert_eq!(pick(2), "C4");
        assert_eq!(pick(3), "G4");
    }

    #[test]
    fn frequencies_track_counts() {
        let weights = table(&[("C4", 1), ("E4", 3)]);
        let mut rng = MelodyRng::new(2024);
        let n = 20_000;
        let mut e4 = 0;
        for _ in 0..n {
            if sample_weighted(&weights, &mut rng).unwrap().as_str() == "E4" {
                e4 += 1;
            }
        }
        let share = e4 as f64 / n as f64;
        assert!((0.72..0.78).contains(&share), "E4 share {share:.3}, expected ~0.75");
    }

    #[test]
    fn repeated_calls_are_independent_of_each_other() {
        let weights = table(&[("C4", 1), ("D4", 1), ("E4", 1)]);
        let mut a = MelodyRng::new(77);
        let mut b = MelodyRng::new(77);
        let first: Vec<_> = (0..20).map(|_| sample_weighted(&weights, &mut a).unwrap().clone()).collect();
        let second: Vec<_> = (0..20).map(|_| sample_weighted(&weights, &mut b).unwrap().clone()).collect();
        assert_eq!(first, second);
    }
}
