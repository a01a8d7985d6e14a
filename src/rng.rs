//! Random source used for food placement.
//!
//! Game code only ever asks for "an index below `len`", so tests can swap in
//! a scripted source while the real game uses a seeded `StdRng`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait RandomSource {
    /// Next value, nominally in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Uniform index in `0..len`. Values outside `[0, 1)` (or NaN) from a
    /// misbehaving source are clamped so the result is always in range.
    fn pick_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        let unit = self.next_unit();
        let unit = if unit.is_nan() { 0.0 } else { unit.clamp(0.0, 1.0) };
        ((unit * len as f64) as usize).min(len - 1)
    }
}

/// Seeded generator owned by one game session.
pub struct SessionRng {
    rng: StdRng,
    seed: u64,
}

impl SessionRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn from_entropy() -> Self {
        let seed: u64 = rand::thread_rng().gen();
        Self::new(seed)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SessionRng {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    fn pick_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.rng.gen_range(0..len)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Replays a fixed list of values, cycling when exhausted.
    pub(crate) struct ScriptedRng {
        values: Vec<f64>,
        next: usize,
    }

    impl ScriptedRng {
        pub(crate) fn new(values: Vec<f64>) -> Self {
            Self { values, next: 0 }
        }
    }

    impl RandomSource for ScriptedRng {
        fn next_unit(&mut self) -> f64 {
            if self.values.is_empty() {
                return 0.0;
            }
            let v = self.values[self.next % self.values.len()];
            self.next += 1;
            v
        }
    }

    #[test]
    fn pick_index_clamps_bad_values() {
        let mut rng = ScriptedRng::new(vec![-3.0, 1.0, 7.5, f64::NAN, 0.5]);
        assert_eq!(rng.pick_index(10), 0);
        assert_eq!(rng.pick_index(10), 9);
        assert_eq!(rng.pick_index(10), 9);
        assert_eq!(rng.pick_index(10), 0);
        assert_eq!(rng.pick_index(10), 5);
    }

    #[test]
    fn pick_index_of_empty_range_is_zero() {
        let mut rng = ScriptedRng::new(vec![0.9]);
        assert_eq!(rng.pick_index(0), 0);
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SessionRng::new(42);
        let mut b = SessionRng::new(42);
        for _ in 0..20 {
            assert_eq!(a.pick_index(400), b.pick_index(400));
        }
        assert_eq!(a.seed(), 42);
    }

    #[test]
    fn session_rng_stays_in_range() {
        let mut rng = SessionRng::new(7);
        for len in 1..50 {
            assert!(rng.pick_index(len) < len);
            let u = rng.next_unit();
            assert!((0.0..1.0).contains(&u));
        }
    }
}
