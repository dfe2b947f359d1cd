use async_trait::async_trait;
use lucky_draw::app::session::lines_channel;
use lucky_draw::core::export::EXPORT_FILENAME;
use lucky_draw::core::{FieldKeys, Submission, SubmissionSource};
use lucky_draw::{DrawEngine, LocalStorage, LuckyDraw, LuckyDrawError, Result, Session};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::io::Cursor;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::mpsc;
use tokio_test::{assert_err, assert_ok};

/// Serves `valid` contestants, or a backend error on the listed fetch numbers.
#[derive(Clone)]
struct CountingSource {
    calls: Arc<AtomicUsize>,
    valid: usize,
    fail_on: Vec<usize>,
}

impl CountingSource {
    fn new(valid: usize) -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            valid,
            fail_on: vec![],
        }
    }
}

#[async_trait]
impl SubmissionSource for CountingSource {
    async fn fetch_submissions(&self) -> Result<Vec<Submission>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on.contains(&call) {
            return Err(LuckyDrawError::ServiceError {
                message: format!("fetch {} failed", call),
            });
        }
        Ok((0..self.valid)
            .map(|i| {
                Submission::new(
                    serde_json::from_value(json!({
                        "name": format!("Player {}", i),
                        "email": format!("p{}@example.com", i),
                        "phone": format!("555-01{:02}", i)
                    }))
                    .unwrap(),
                )
            })
            .collect())
    }
}

/// Operator input that ends after `script`.
fn typed(script: &'static str) -> mpsc::Receiver<String> {
    lines_channel(Cursor::new(script))
}

fn session(source: CountingSource, output: &TempDir) -> Session<CountingSource, LocalStorage> {
    let engine = DrawEngine::new(source, FieldKeys::default(), LuckyDraw::default())
        .with_refresh_interval(Duration::from_secs(10));
    let storage = LocalStorage::new(output.path().to_str().unwrap().to_string());
    Session::new(engine, storage)
}

#[tokio::test]
async fn test_commands_drive_the_board() {
    let temp_dir = TempDir::new().unwrap();
    let source = CountingSource::new(5);
    let calls = source.calls.clone();
    let mut session = session(source, &temp_dir);

    let mut out = Vec::new();
    assert_ok!(
        session
            .run(typed("list\n\nd\nbogus\nexport\nrefresh\nq\nd\n"), &mut out)
            .await
    );

    // 啟動時抓取一次，再加上 refresh 指令
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("Commands:"));
    assert_eq!(text.matches("Lucky Winner").count(), 1);
    assert!(text.contains("Unknown command 'bogus'"));
    assert!(text.contains("Saved entries to"));
    assert!(temp_dir.path().join(EXPORT_FILENAME).exists());

    // refresh 之後先前的得獎者被清除；quit 之後的 d 不會執行
    assert!(session.engine().board().winner().is_none());
}

#[tokio::test]
async fn test_draw_refused_in_session() {
    let temp_dir = TempDir::new().unwrap();
    let mut session = session(CountingSource::new(3), &temp_dir);

    let mut out = Vec::new();
    assert_ok!(session.run(typed("d\n"), &mut out).await);

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("! At least 4 valid entries are required for the lucky draw."));
    assert!(!text.contains("Lucky Winner"));
}

#[tokio::test(start_paused = true)]
async fn test_periodic_refresh_recovers_from_errors() {
    let temp_dir = TempDir::new().unwrap();
    let mut source = CountingSource::new(4);
    source.fail_on = vec![2];
    let calls = source.calls.clone();
    let mut session = session(source, &temp_dir);

    // 保留送出端，輸入永不結束
    let (_operator, lines) = mpsc::channel::<String>(1);
    let mut out = Vec::new();

    tokio::select! {
        result = session.run(lines, &mut out) => panic!("session ended early: {:?}", result),
        _ = tokio::time::sleep(Duration::from_secs(35)) => {}
    }

    // 0s, 10s, 20s, 30s
    assert_eq!(calls.load(Ordering::SeqCst), 4);

    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.matches("! fetch 2 failed").count(), 1);

    let board = session.engine().board();
    assert!(board.error().is_none());
    assert_eq!(board.entries().len(), 4);
}

#[tokio::test]
async fn test_run_once_reports_backend_error() {
    let temp_dir = TempDir::new().unwrap();
    let mut source = CountingSource::new(4);
    source.fail_on = vec![1];
    let mut session = session(source, &temp_dir);

    let mut out = Vec::new();
    let err = assert_err!(session.run_once(true, true, &mut out).await);
    assert!(matches!(err, LuckyDrawError::ServiceError { .. }));
    assert_eq!(err.to_string(), "fetch 1 failed");
    assert!(!temp_dir.path().join(EXPORT_FILENAME).exists());

    // 表格與錯誤訊息仍會印出
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("! fetch 1 failed"));
}

#[tokio::test]
async fn test_session_ends_when_operator_hangs_up() {
    let temp_dir = TempDir::new().unwrap();
    let source = CountingSource::new(4);
    let calls = source.calls.clone();
    let mut session = session(source, &temp_dir);

    let (operator, lines) = mpsc::channel::<String>(4);
    operator.send("l".to_string()).await.unwrap();
    drop(operator);

    let mut out = Vec::new();
    assert_ok!(session.run(lines, &mut out).await);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
