//! Randomized negative sampling over the known-question id space.

use std::collections::HashSet;

use rand::{Rng, RngCore};

use crate::errors::ConvertError;
use crate::types::QuestionId;

/// Small deterministic RNG used for reproducible sampling.
#[derive(Clone, Debug)]
pub struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    /// Create a generator with a fixed seed.
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Create a generator seeded from the thread RNG.
    pub fn from_entropy() -> Self {
        Self::new(rand::rng().next_u64())
    }

    fn next_u64_internal(&mut self) -> u64 {
        let mut z = self.state.wrapping_add(0x9E3779B97F4A7C15);
        self.state = z;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
        z ^ (z >> 31)
    }
}

impl RngCore for DeterministicRng {
    fn next_u32(&mut self) -> u32 {
        self.next_u64_internal() as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.next_u64_internal()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let mut offset = 0;
        while offset < dest.len() {
            let value = self.next_u64_internal();
            let bytes = value.to_le_bytes();
            let remaining = dest.len() - offset;
            let copy_len = remaining.min(bytes.len());
            dest[offset..offset + copy_len].copy_from_slice(&bytes[..copy_len]);
            offset += copy_len;
        }
    }
}

/// Per-pivot pool of dissimilar candidates.
///
/// Built as the complement of the pivot's exclusion set over the full id
/// space, then shrunk as samples are drawn so a candidate is never paired
/// twice against the same pivot. Scoped to one pivot's processing.
pub struct NegativePool {
    remaining: Vec<QuestionId>,
}

impl NegativePool {
    /// Build the pool for ids `0..total` minus `excluded`.
    pub fn new(total: usize, excluded: &HashSet<QuestionId>) -> Self {
        Self {
            remaining: (0..total).filter(|id| !excluded.contains(id)).collect(),
        }
    }

    /// Candidates still available for drawing.
    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    /// True if no candidates remain.
    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Draw `count` distinct ids uniformly at random, removing them from the
    /// pool. Fails without drawing when the pool is too small; `slug` names
    /// the pivot in the error.
    pub fn draw<R: Rng + ?Sized>(
        &mut self,
        count: usize,
        rng: &mut R,
        slug: &str,
    ) -> Result<Vec<QuestionId>, ConvertError> {
        if self.remaining.len() < count {
            return Err(ConvertError::UndersizedNegativePool {
                slug: slug.to_string(),
                available: self.remaining.len(),
                requested: count,
            });
        }
        let picked = rand::seq::index::sample(rng, self.remaining.len(), count);
        let drawn: Vec<QuestionId> = picked.iter().map(|idx| self.remaining[idx]).collect();
        // Remove highest positions first so swap_remove does not shift the rest.
        let mut positions: Vec<usize> = picked.iter().collect();
        positions.sort_unstable_by(|a, b| b.cmp(a));
        for position in positions {
            self.remaining.swap_remove(position);
        }
        Ok(drawn)
    }
}
