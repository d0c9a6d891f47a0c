//! # Random Assistant Replies
//!
//! The dashboard's assistant answers with a randomly chosen suggestion.

use metaval_core::ResponseProvider;
use metaval_core::assistant::ASSISTANT_SUGGESTIONS;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Picks a reply uniformly from a fixed list.
#[derive(Debug, Clone)]
pub struct RandomResponses {
    replies: Vec<String>,
    rng: StdRng,
}

impl Default for RandomResponses {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomResponses {
    /// Built-in suggestions, seeded from the thread RNG.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_rng(&mut rand::rng()))
    }

    /// Built-in suggestions with a reproducible seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            replies: ASSISTANT_SUGGESTIONS.iter().map(|s| (*s).to_string()).collect(),
            rng,
        }
    }
}

impl ResponseProvider for RandomResponses {
    fn respond(&mut self, _prompt: &str) -> String {
        let index = self.rng.random_range(0..self.replies.len());
        self.replies.get(index).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replies_come_from_suggestions() {
        let mut provider = RandomResponses::seeded(7);
        for _ in 0..20 {
            let reply = provider.respond("anything");
            assert!(ASSISTANT_SUGGESTIONS.contains(&reply.as_str()));
        }
    }

    #[test]
    fn same_seed_same_replies() {
        let mut a = RandomResponses::seeded(42);
        let mut b = RandomResponses::seeded(42);
        let left: Vec<_> = (0..5).map(|_| a.respond("x")).collect();
        let right: Vec<_> = (0..5).map(|_| b.respond("x")).collect();
        assert_eq!(left, right);
    }
}
