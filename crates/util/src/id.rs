use rand::{rngs::OsRng, RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::strings::to_base36;

/// Generator of session-unique entry ids.
///
/// Each id is `{random}-{millis}-{counter}` in base 36: a xoshiro256**
/// sample, the wall-clock time in milliseconds, and a per-generator counter.
/// The counter alone makes ids from one generator pairwise distinct; the
/// random and time parts keep ids from separate sessions apart.
///
/// # Examples
///
/// ```
/// use calendrift_util::id::IdGenerator;
///
/// let mut ids = IdGenerator::new();
/// let a = ids.next_id();
/// let b = ids.next_id();
/// assert_ne!(a, b);
/// ```
pub struct IdGenerator {
    /// The seed used to initialize the PRNG.
    pub seed: [u8; 32],
    rng: Xoshiro256StarStar,
    counter: u64,
}

impl IdGenerator {
    /// Create a generator seeded from `OsRng`.
    pub fn new() -> Self {
        let mut seed = [0u8; 32];
        OsRng.fill_bytes(&mut seed);
        Self::with_seed(seed)
    }

    /// Create a generator with a fixed seed, for reproducible sequences.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self {
            seed,
            rng: Xoshiro256StarStar::from_seed(seed),
            counter: 0,
        }
    }

    /// Number of ids handed out so far.
    pub fn issued(&self) -> u64 {
        self.counter
    }

    /// Produce the next id.
    pub fn next_id(&mut self) -> String {
        let random = self.rng.next_u64();
        self.counter = self.counter.wrapping_add(1);
        format!(
            "{}-{}-{}",
            to_base36(random),
            to_base36(now_millis()),
            to_base36(self.counter)
        )
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for IdGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdGenerator")
            .field("counter", &self.counter)
            .finish_non_exhaustive()
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_unique_within_generator() {
        let mut ids = IdGenerator::new();
        let seen: HashSet<String> = (0..10_000).map(|_| ids.next_id()).collect();
        assert_eq!(seen.len(), 10_000);
        assert_eq!(ids.issued(), 10_000);
    }

    #[test]
    fn test_ids_have_three_base36_parts() {
        let mut ids = IdGenerator::new();
        let id = ids.next_id();
        let parts: Vec<&str> = id.split('-').collect();
        assert_eq!(parts.len(), 3);
        for part in parts {
            assert!(!part.is_empty());
            assert!(part.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
        }
    }

    #[test]
    fn test_same_seed_same_random_part() {
        let seed = [7u8; 32];
        let mut a = IdGenerator::with_seed(seed);
        let mut b = IdGenerator::with_seed(seed);
        for _ in 0..10 {
            let ia = a.next_id();
            let ib = b.next_id();
            assert_eq!(ia.split('-').next(), ib.split('-').next());
        }
    }

    #[test]
    fn test_counter_suffix_increments() {
        let mut ids = IdGenerator::with_seed([1u8; 32]);
        let first = ids.next_id();
        let second = ids.next_id();
        assert!(first.ends_with("-1"));
        assert!(second.ends_with("-2"));
    }
}
