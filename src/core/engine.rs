use crate::core::board::DrawBoard;
use crate::core::draw::LuckyDraw;
use crate::core::export::export_entries;
use crate::domain::model::{FieldKeys, Submission};
use crate::domain::ports::{Storage, SubmissionSource};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use std::time::Duration;
use tokio::time::{interval, Interval, MissedTickBehavior};

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(10);

/// Owns the submission source and the board, and drives the refresh cycle.
pub struct DrawEngine<S: SubmissionSource> {
    source: S,
    board: DrawBoard,
    refresh_interval: Duration,
    monitor: SystemMonitor,
}

impl<S: SubmissionSource> DrawEngine<S> {
    pub fn new(source: S, keys: FieldKeys, draw: LuckyDraw) -> Self {
        Self {
            source,
            board: DrawBoard::new(keys, draw),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            monitor: SystemMonitor::default(),
        }
    }

    pub fn with_refresh_interval(mut self, refresh_interval: Duration) -> Self {
        self.refresh_interval = refresh_interval;
        self
    }

    pub fn with_monitoring(mut self, enabled: bool) -> Self {
        self.monitor = SystemMonitor::new(enabled);
        self
    }

    pub fn board(&self) -> &DrawBoard {
        &self.board
    }

    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    /// First tick fires immediately; late ticks are pushed back rather than bunched up.
    pub fn ticker(&self) -> Interval {
        let mut ticker = interval(self.refresh_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker
    }

    /// Refetches and updates the board. A failed fetch is recorded on the board
    /// and the original error is still returned to the caller.
    pub async fn refresh(&mut self) -> Result<()> {
        self.board.begin_refresh();

        let result = match self.source.fetch_submissions().await {
            Ok(submissions) => {
                self.board.finish_refresh(Ok(submissions));
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    "❌ Fetch failed: {} (Category: {:?}, retry on next tick: {})",
                    e,
                    e.category(),
                    e.is_retryable()
                );
                tracing::debug!("💡 {}", e.recovery_suggestion());
                self.board.fail_refresh(&e);
                Err(e)
            }
        };

        tracing::info!("🔄 {} valid entries", self.board.entries().len());
        self.monitor.log_stats("Refresh");
        result
    }

    pub fn draw(&mut self) -> Option<&Submission> {
        let winner = self.board.draw_winner(&mut rand::rng());
        if let Some(winner) = winner {
            tracing::info!(
                "🎉 Winner drawn (id: {})",
                winner
                    .id
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| "-".to_string())
            );
        }
        winner
    }

    pub async fn export<St: Storage>(&self, storage: &St) -> Result<String> {
        let path =
            export_entries(storage, self.board.entries(), self.board.field_keys()).await?;
        tracing::info!("📁 Exported {} entries to {}", self.board.entries().len(), path);
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::{ErrorCategory, LuckyDrawError};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    struct ScriptedSource {
        responses: Mutex<VecDeque<Result<Vec<Submission>>>>,
    }

    impl ScriptedSource {
        fn new(responses: Vec<Result<Vec<Submission>>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
            }
        }
    }

    #[async_trait]
    impl SubmissionSource for ScriptedSource {
        async fn fetch_submissions(&self) -> Result<Vec<Submission>> {
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    fn entries(n: usize) -> Vec<Submission> {
        (0..n)
            .map(|i| {
                Submission::new(
                    serde_json::from_value(json!({
                        "name": format!("user{}", i),
                        "email": format!("user{}@example.com", i),
                        "phone": "555"
                    }))
                    .unwrap(),
                )
            })
            .collect()
    }

    fn engine(responses: Vec<Result<Vec<Submission>>>) -> DrawEngine<ScriptedSource> {
        DrawEngine::new(
            ScriptedSource::new(responses),
            FieldKeys::default(),
            LuckyDraw::default(),
        )
    }

    #[tokio::test]
    async fn test_refresh_then_draw() {
        let mut engine = engine(vec![Ok(entries(5))]);
        assert!(engine.board().is_loading());

        assert!(engine.refresh().await.is_ok());
        let board = engine.board();
        assert!(!board.is_loading());
        assert_eq!(board.entries().len(), 5);

        let winner = engine.draw().cloned().unwrap();
        assert!(engine.board().entries().contains(&winner));
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_running() {
        let mut engine = engine(vec![
            Ok(entries(5)),
            Err(LuckyDrawError::HttpStatusError { status: 502 }),
            Ok(entries(4)),
        ]);

        engine.refresh().await.unwrap();
        engine.draw();
        assert!(engine.board().winner().is_some());

        let err = engine.refresh().await.unwrap_err();
        assert!(matches!(err, LuckyDrawError::HttpStatusError { status: 502 }));
        assert_eq!(err.category(), ErrorCategory::Network);

        let board = engine.board();
        assert_eq!(board.error(), Some("Failed to fetch entries."));
        assert!(board.entries().is_empty());
        assert!(board.winner().is_none());

        engine.refresh().await.unwrap();
        let board = engine.board();
        assert!(board.error().is_none());
        assert_eq!(board.entries().len(), 4);
    }

    #[tokio::test]
    async fn test_refresh_hands_back_backend_error() {
        let mut engine = engine(vec![Err(LuckyDrawError::ServiceError {
            message: "JWT expired".to_string(),
        })]);

        let err = engine.refresh().await.unwrap_err();
        assert!(matches!(err, LuckyDrawError::ServiceError { .. }));
        assert_eq!(engine.board().error(), Some("JWT expired"));
    }

    #[tokio::test]
    async fn test_draw_before_enough_entries() {
        let mut engine = engine(vec![Ok(entries(3))]);
        engine.refresh().await.unwrap();

        assert!(engine.draw().is_none());
        assert!(engine.board().draw_error().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_fires_immediately_then_on_interval() {
        let engine = engine(vec![]).with_refresh_interval(Duration::from_secs(10));
        let mut ticker = engine.ticker();

        let start = tokio::time::Instant::now();
        ticker.tick().await;
        assert_eq!(start.elapsed(), Duration::ZERO);

        ticker.tick().await;
        assert_eq!(start.elapsed(), Duration::from_secs(10));
    }
}
