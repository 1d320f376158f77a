use rand::RngCore;

/// Source of uniformly distributed 32-bit words.
///
/// Anything implementing [`rand::RngCore`] is a source, so seeded generators
/// from `rand` plug straight in.
pub trait RandomSource {
    fn next_u32(&mut self) -> u32;

    /// Uniform value in `0..bound` without modulo bias.
    ///
    /// Draws below `2^32 mod bound` are rejected so every residue is equally
    /// likely. `bound` must be non-zero.
    fn below(&mut self, bound: u32) -> u32 {
        debug_assert!(bound > 0, "empty range");
        let threshold = bound.wrapping_neg() % bound;
        loop {
            let value = self.next_u32();
            if value >= threshold {
                return value % bound;
            }
        }
    }
}

impl<R: RngCore + ?Sized> RandomSource for R {
    fn next_u32(&mut self) -> u32 {
        RngCore::next_u32(self)
    }
}

/// Fisher-Yates shuffle driven by [`RandomSource::below`].
pub fn shuffle<T, R: RandomSource + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.below(i as u32 + 1) as usize;
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    /// Replays a fixed list of words.
    struct Script(Vec<u32>);

    impl RandomSource for Script {
        fn next_u32(&mut self) -> u32 {
            self.0.remove(0)
        }
    }

    #[test]
    fn below_rejects_biased_draws() {
        // 2^32 mod 3 == 1, so a zero draw must be thrown away
        let mut rng = Script(alloc::vec![0, 7]);

        assert_eq!(rng.below(3), 1);
        assert!(rng.0.is_empty());
    }

    #[test]
    fn below_power_of_two_never_rejects() {
        let mut rng = Script(alloc::vec![0, 13]);

        assert_eq!(rng.below(8), 0);
        assert_eq!(rng.below(8), 5);
    }

    #[test]
    fn below_stays_in_range() {
        let mut rng = SmallRng::seed_from_u64(3);

        for bound in 1..200 {
            assert!(rng.below(bound) < bound);
        }
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = SmallRng::seed_from_u64(11);
        let mut items: Vec<u32> = (0..64).collect();

        shuffle(&mut items, &mut rng);

        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..64).collect::<Vec<_>>());
        assert_ne!(items, sorted);
    }
}
