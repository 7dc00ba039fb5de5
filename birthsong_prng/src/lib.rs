// Seedable randomness for melody generation.
//
// Two pieces live here:
// - `RandomSource`: the trait every sampling call in `birthsong` takes as
//   `&mut impl RandomSource`. Only `next_u64` is required; the bounded-range
//   helpers are provided methods built on top of it, so a test can drive the
//   generator with a scripted source.
// - `MelodyRng`: xoshiro256++ (Blackman & Vigna, 2019) seeded with SplitMix64.
//   Hand-rolled so that a given seed yields the same melody on every platform
//   and compiler version.
//
// No global generator exists. Each caller owns its source; concurrent
// generation calls must each bring their own.
//
// **Determinism.** Integer arithmetic only; no floats anywhere in this crate.

use serde::{Deserialize, Serialize};

/// A source of uniformly distributed 64-bit values.
pub trait RandomSource {
    /// The next raw value. Every bit should be uniformly distributed.
    fn next_u64(&mut self) -> u64;

    /// Uniform integer in `[low, high)`.
    ///
    /// Uses rejection sampling to avoid modulo bias. Panics if `low >= high`.
    fn range_u64(&mut self, low: u64, high: u64) -> u64 {
        assert!(low < high, "range_u64: low must be less than high");
        let span = high - low;
        if span.is_power_of_two() {
            return low + (self.next_u64() & (span - 1));
        }
        // (2^64 - span) % span: values below this would bias the remainder.
        let threshold = span.wrapping_neg() % span;
        loop {
            let r = self.next_u64();
            if r >= threshold {
                return low + (r % span);
            }
        }
    }

    /// Uniform index in `[0, len)`. Panics if `len == 0`.
    fn index(&mut self, len: usize) -> usize {
        self.range_u64(0, len as u64) as usize
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_u64(&mut self) -> u64 {
        (**self).next_u64()
    }
}

/// Xoshiro256++ generator.
///
/// Two instances built from the same seed produce identical streams. The
/// state serializes, so a half-consumed generator can be checkpointed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MelodyRng {
    s: [u64; 4],
}

impl MelodyRng {
    /// Expand a `u64` seed into the 256-bit state with SplitMix64.
    pub fn new(seed: u64) -> Self {
        let mut sm = seed;
        Self {
            s: [
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
            ],
        }
    }

    /// Derive an independent generator for a sub-task (e.g. one per worker
    /// thread). Consumes one value from `self`.
    pub fn fork(&mut self) -> Self {
        Self::new(self.step())
    }

    fn step(&mut self) -> u64 {
        let result = (self.s[0].wrapping_add(self.s[3]))
            .rotate_left(23)
            .wrapping_add(self.s[0]);

        let t = self.s[1] << 17;

        self.s[2] ^= self.s[0];
        self.s[3] ^= self.s[1];
        self.s[1] ^= self.s[2];
        self.s[0] ^= self.s[3];

        self.s[2] ^= t;
        self.s[3] = self.s[3].rotate_left(45);

        result
    }
}

impl RandomSource for MelodyRng {
    fn next_u64(&mut self) -> u64 {
        self.step()
    }
}

/// SplitMix64, used only to expand seeds.
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
