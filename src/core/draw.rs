use crate::domain::model::Submission;
use crate::utils::error::{LuckyDrawError, Result};
use rand::Rng;

pub const DEFAULT_MIN_ENTRIES: usize = 4;

/// Uniform random pick gated on a minimum number of valid entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LuckyDraw {
    min_entries: usize,
}

impl LuckyDraw {
    pub fn new(min_entries: usize) -> Self {
        Self { min_entries }
    }

    pub fn min_entries(&self) -> usize {
        self.min_entries
    }

    pub fn pick<'a, R: Rng>(
        &self,
        entries: &'a [Submission],
        rng: &mut R,
    ) -> Result<&'a Submission> {
        // min_entries 為 0 時仍不可從空集合抽取
        if entries.len() < self.min_entries || entries.is_empty() {
            return Err(LuckyDrawError::NotEnoughEntries {
                required: self.min_entries.max(1),
                available: entries.len(),
            });
        }

        let idx = rng.random_range(0..entries.len());
        Ok(&entries[idx])
    }
}

impl Default for LuckyDraw {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_ENTRIES)
    }
}
