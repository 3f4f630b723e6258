//! Seeded pseudo-random number generation
//!
//! Deterministic PRNG so that stochastic strategies replay identically
//! for the same tournament seed. Uses xorshift64*.

use crate::action::Action;

/// Seeded random number generator
///
/// Deterministic: same seed + stream = same sequence
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    /// Create a new RNG from a seed and a stream index
    pub fn new(seed: u64, stream: u64) -> Self {
        let mut state = seed ^ 0x6a09e667f3bcc909;
        state ^= stream.wrapping_mul(0x517cc1b727220a95);
        // xorshift never leaves the all-zero state
        if state == 0 {
            state = 0x9e3779b97f4a7c15;
        }

        // Warm up the generator
        let mut rng = Self { state };
        for _ in 0..8 {
            rng.next_u64();
        }
        rng
    }

    /// Derive an independent child stream, leaving `self` untouched.
    pub fn for_stream(&self, stream: u64) -> Self {
        let mut new_state = self.state ^ stream.wrapping_add(1).wrapping_mul(0x9e3779b97f4a7c15);
        if new_state == 0 {
            new_state = 0x9e3779b97f4a7c15;
        }
        let mut rng = Self { state: new_state };
        rng.next_u64(); // Mix
        rng
    }

    /// Generate next u64
    pub fn next_u64(&mut self) -> u64 {
        // xorshift64*
        self.state ^= self.state >> 12;
        self.state ^= self.state << 25;
        self.state ^= self.state >> 27;
        self.state.wrapping_mul(0x2545f4914f6cdd1d)
    }

    /// Uniform float in `[0, 1)`
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Returns `A` with probability `p`, else `B`.
    ///
    /// No sample is drawn when `p` is 0 or 1, so deterministic
    /// strategies do not advance the generator.
    pub fn random_choice(&mut self, p: f64) -> Action {
        if p <= 0.0 {
            return Action::B;
        }
        if p >= 1.0 {
            return Action::A;
        }
        if self.next_f64() < p {
            Action::A
        } else {
            Action::B
        }
    }

    /// Uniform integer in `[low, high)`; returns `low` for an empty range.
    pub fn randrange(&mut self, low: u64, high: u64) -> u64 {
        if high <= low {
            return low;
        }
        low + self.next_u64() % (high - low)
    }
}

/// A discrete probability distribution built from observed counts.
#[derive(Clone, Debug)]
pub struct Pdf<T> {
    sample_space: Vec<T>,
    cumulative: Vec<f64>,
}

impl<T: Clone> Pdf<T> {
    /// Build from `(outcome, count)` pairs. Zero-count outcomes are never sampled.
    /// Returns `None` when the total count is zero.
    pub fn new(counter: impl IntoIterator<Item = (T, u64)>) -> Option<Self> {
        let (sample_space, counts): (Vec<T>, Vec<u64>) = counter.into_iter().unzip();
        let total: u64 = counts.iter().sum();
        if total == 0 {
            return None;
        }
        let mut running = 0u64;
        let cumulative = counts
            .iter()
            .map(|&c| {
                running += c;
                running as f64 / total as f64
            })
            .collect();
        Some(Self { sample_space, cumulative })
    }

    pub fn probability(&self, index: usize) -> f64 {
        let upper = self.cumulative[index];
        let lower = if index == 0 { 0.0 } else { self.cumulative[index - 1] };
        upper - lower
    }

    pub fn sample(&self, rng: &mut SeededRng) -> T {
        let r = rng.next_f64();
        let index = self
            .cumulative
            .iter()
            .position(|&c| r < c)
            .unwrap_or(self.sample_space.len() - 1);
        self.sample_space[index].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut r1 = SeededRng::new(42, 0);
        let mut r2 = SeededRng::new(42, 0);

        for _ in 0..100 {
            assert_eq!(r1.next_u64(), r2.next_u64());
        }
    }

    #[test]
    fn test_different_seeds() {
        let mut rng1 = SeededRng::new(1, 0);
        let mut rng2 = SeededRng::new(2, 0);

        let vals1: Vec<_> = (0..10).map(|_| rng1.next_u64()).collect();
        let vals2: Vec<_> = (0..10).map(|_| rng2.next_u64()).collect();

        assert_ne!(vals1, vals2);
    }

    #[test]
    fn test_different_streams() {
        let mut rng1 = SeededRng::new(42, 0);
        let mut rng2 = SeededRng::new(42, 1);
        assert_ne!(rng1.next_u64(), rng2.next_u64());

        let base = SeededRng::new(42, 0);
        let mut child_a = base.for_stream(0);
        let mut child_b = base.for_stream(1);
        assert_ne!(child_a.next_u64(), child_b.next_u64());
    }

    #[test]
    fn test_next_f64_range() {
        let mut rng = SeededRng::new(7, 3);
        for _ in 0..1000 {
            let x = rng.next_f64();
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn test_random_choice_extremes_do_not_sample() {
        let mut rng = SeededRng::new(42, 0);
        let before = rng.clone();
        assert_eq!(rng.random_choice(0.0), Action::B);
        assert_eq!(rng.random_choice(1.0), Action::A);
        assert_eq!(rng, before);
    }

    #[test]
    fn test_random_choice_frequency() {
        let mut rng = SeededRng::new(42, 0);
        let hits = (0..10_000).filter(|_| rng.random_choice(0.3) == Action::A).count();
        assert!(hits > 2_700 && hits < 3_300, "got {} A's", hits);
    }

    #[test]
    fn test_randrange() {
        let mut rng = SeededRng::new(42, 0);
        for _ in 0..200 {
            let v = rng.randrange(3, 9);
            assert!((3..9).contains(&v));
        }
        assert_eq!(rng.randrange(5, 5), 5);
    }

    #[test]
    fn test_pdf() {
        assert!(Pdf::<char>::new(vec![('x', 0)]).is_none());

        let pdf = Pdf::new(vec![('x', 1), ('y', 0), ('z', 3)]).unwrap();
        assert_eq!(pdf.probability(0), 0.25);
        assert_eq!(pdf.probability(1), 0.0);
        assert_eq!(pdf.probability(2), 0.75);

        let mut rng = SeededRng::new(42, 0);
        for _ in 0..500 {
            assert_ne!(pdf.sample(&mut rng), 'y');
        }
    }
}
