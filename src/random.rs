//! Injectable random selection
//!
//! Task selection and quote rotation both pick uniformly from a sequence;
//! the trait seam lets tests assert exact selections.

use rand::Rng;

/// Uniform index selection over a sequence of the given length
pub trait Chooser: Send + Sync {
    /// Pick an index in `0..len`; None when the sequence is empty
    fn choose(&self, len: usize) -> Option<usize>;
}

/// Thread-rng backed chooser used in production
pub struct RandChooser;

impl Chooser for RandChooser {
    fn choose(&self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(rand::rng().random_range(0..len))
    }
}

/// Always picks the same index (modulo length); for deterministic tests
pub struct FixedChooser {
    index: usize,
}

impl FixedChooser {
    pub fn new(index: usize) -> Self {
        Self { index }
    }
}

impl Chooser for FixedChooser {
    fn choose(&self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(self.index % len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rand_chooser_in_bounds() {
        let chooser = RandChooser;
        for _ in 0..100 {
            let picked = chooser.choose(5).unwrap();
            assert!(picked < 5);
        }
        assert!(chooser.choose(0).is_none());
    }

    #[test]
    fn test_fixed_chooser_wraps() {
        let chooser = FixedChooser::new(7);
        assert_eq!(chooser.choose(5), Some(2));
        assert_eq!(chooser.choose(1), Some(0));
        assert!(chooser.choose(0).is_none());
    }
}
