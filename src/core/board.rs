use crate::core::draw::LuckyDraw;
use crate::core::fields::{contact_card, valid_entries};
use crate::domain::model::{ContactCard, FieldKeys, Submission};
use crate::utils::error::{LuckyDrawError, Result};
use rand::Rng;

pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch entries.";

/// View state of the lucky-draw screen.
#[derive(Debug, Clone)]
pub struct DrawBoard {
    entries: Vec<Submission>,
    loading: bool,
    error: Option<String>,
    winner: Option<Submission>,
    draw_error: Option<String>,
    keys: FieldKeys,
    draw: LuckyDraw,
}

impl DrawBoard {
    /// A fresh board starts in the loading state, before the first fetch lands.
    pub fn new(keys: FieldKeys, draw: LuckyDraw) -> Self {
        Self {
            entries: Vec::new(),
            loading: true,
            error: None,
            winner: None,
            draw_error: None,
            keys,
            draw,
        }
    }

    pub fn begin_refresh(&mut self) {
        self.loading = true;
        self.error = None;
        self.winner = None;
        self.draw_error = None;
    }

    pub fn finish_refresh(&mut self, result: Result<Vec<Submission>>) {
        match result {
            Ok(submissions) => {
                let total = submissions.len();
                self.entries = valid_entries(submissions, &self.keys);
                tracing::debug!("Kept {} of {} submissions", self.entries.len(), total);
                self.loading = false;
            }
            Err(e) => self.fail_refresh(&e),
        }
    }

    /// Records a failed fetch without taking ownership of the error, so the
    /// caller can still hand the original error on.
    pub fn fail_refresh(&mut self, error: &LuckyDrawError) {
        let message = match error {
            LuckyDrawError::ServiceError { message } => {
                tracing::warn!("Backend reported an error: {}", message);
                message.clone()
            }
            other => {
                tracing::warn!("Fetching entries failed: {}", other);
                FETCH_FAILED_MESSAGE.to_string()
            }
        };
        self.error = Some(message);
        self.entries.clear();
        self.loading = false;
    }

    pub fn draw_winner<R: Rng>(&mut self, rng: &mut R) -> Option<&Submission> {
        self.winner = None;
        self.draw_error = None;

        match self.draw.pick(&self.entries, rng) {
            Ok(winner) => {
                self.winner = Some(winner.clone());
            }
            Err(e) => {
                tracing::info!("Draw refused: {}", e);
                self.draw_error = Some(e.to_string());
            }
        }
        self.winner.as_ref()
    }

    pub fn entries(&self) -> &[Submission] {
        &self.entries
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn winner(&self) -> Option<&Submission> {
        self.winner.as_ref()
    }

    pub fn draw_error(&self) -> Option<&str> {
        self.draw_error.as_deref()
    }

    pub fn field_keys(&self) -> &FieldKeys {
        &self.keys
    }

    pub fn min_entries(&self) -> usize {
        self.draw.min_entries()
    }

    pub fn cards(&self) -> Vec<ContactCard> {
        self.entries
            .iter()
            .map(|entry| contact_card(entry, &self.keys))
            .collect()
    }

    pub fn winner_card(&self) -> Option<ContactCard> {
        self.winner
            .as_ref()
            .map(|winner| contact_card(winner, &self.keys))
    }
}

impl Default for DrawBoard {
    fn default() -> Self {
        Self::new(FieldKeys::default(), LuckyDraw::default())
    }
}
