use crate::core::engine::DrawEngine;
use crate::core::render::{render_draw_result, render_table, render_winner};
use crate::domain::ports::{Storage, SubmissionSource};
use crate::utils::error::{LuckyDrawError, Result};
use std::io::{BufRead, Write};
use tokio::sync::mpsc;

pub const HELP_TEXT: &str = "Commands: [d]raw, [r]efresh, [l]ist, [e]xport, [h]elp, [q]uit";

const INPUT_BUFFER: usize = 16;

/// Reads `reader` line by line on its own thread and forwards each line.
///
/// Blocking reads stay off the runtime, so a pending read on stdin never holds
/// up shutdown. The thread stops at end of input, on a read error, or once the
/// receiver is dropped.
pub fn lines_channel<R>(reader: R) -> mpsc::Receiver<String>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel(INPUT_BUFFER);
    std::thread::spawn(move || {
        for line in reader.lines() {
            match line {
                Ok(line) => {
                    if tx.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!("⚠️ Failed to read operator input: {}", e);
                    break;
                }
            }
        }
    });
    rx
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Draw,
    Refresh,
    List,
    Export,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    /// Blank lines parse to `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let word = line.trim().to_lowercase();
        let command = match word.as_str() {
            "" => return None,
            "d" | "draw" => Self::Draw,
            "r" | "refresh" => Self::Refresh,
            "l" | "list" => Self::List,
            "e" | "export" => Self::Export,
            "h" | "help" | "?" => Self::Help,
            "q" | "quit" | "exit" => Self::Quit,
            _ => Self::Unknown(line.trim().to_string()),
        };
        Some(command)
    }
}

/// Operator console: refreshes on the engine's interval and reacts to typed commands.
pub struct Session<S: SubmissionSource, St: Storage> {
    engine: DrawEngine<S>,
    storage: St,
}

impl<S: SubmissionSource, St: Storage> Session<S, St> {
    pub fn new(engine: DrawEngine<S>, storage: St) -> Self {
        Self { engine, storage }
    }

    pub fn engine(&self) -> &DrawEngine<S> {
        &self.engine
    }

    /// Runs until `quit` or until every sender of `lines` is gone.
    pub async fn run<W: Write>(
        &mut self,
        mut lines: mpsc::Receiver<String>,
        out: &mut W,
    ) -> Result<()> {
        let mut ticker = self.engine.ticker();
        writeln!(out, "{}", HELP_TEXT)?;

        loop {
            tokio::select! {
                // 計時器優先，啟動時第一次 tick 立即觸發抓取
                biased;
                _ = ticker.tick() => {
                    self.refresh(out).await?;
                }
                line = lines.recv() => {
                    let Some(line) = line else {
                        tracing::debug!("Input closed, leaving session");
                        break;
                    };
                    let Some(command) = Command::parse(&line) else {
                        continue;
                    };
                    if !self.handle(command, out).await? {
                        break;
                    }
                }
            }
        }

        Ok(())
    }

    /// Returns `false` when the session should end.
    async fn handle<W: Write>(&mut self, command: Command, out: &mut W) -> Result<bool> {
        tracing::debug!("Command: {:?}", command);
        match command {
            Command::Draw => {
                self.engine.draw();
                if let Some(result) = render_draw_result(self.engine.board()) {
                    writeln!(out, "{}\n", result)?;
                }
            }
            Command::Refresh => self.refresh(out).await?,
            Command::List => writeln!(out, "{}\n", render_table(self.engine.board()))?,
            Command::Export => match self.engine.export(&self.storage).await {
                Ok(path) => writeln!(out, "Saved entries to {}", path)?,
                Err(e) => {
                    tracing::error!("❌ Export failed: {}", e);
                    writeln!(out, "! {}", e.user_friendly_message())?;
                }
            },
            Command::Help => writeln!(out, "{}", HELP_TEXT)?,
            Command::Quit => return Ok(false),
            Command::Unknown(word) => {
                writeln!(out, "Unknown command '{}'. {}", word, HELP_TEXT)?;
            }
        }
        out.flush()?;
        Ok(true)
    }

    /// 抓取失敗已記在 board 上，表格照樣印出，下一個 tick 再試
    async fn refresh<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let _ = self.engine.refresh().await;
        self.print_table(out)
    }

    fn print_table<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "{}\n", render_table(self.engine.board()))?;
        out.flush()?;
        Ok(())
    }

    /// Single fetch, optional draw and export. The original fetch error or a
    /// refused draw is returned as `Err`.
    pub async fn run_once<W: Write>(
        &mut self,
        draw: bool,
        export: bool,
        out: &mut W,
    ) -> Result<()> {
        let fetched = self.engine.refresh().await;
        self.print_table(out)?;
        fetched?;

        if export {
            let path = self.engine.export(&self.storage).await?;
            writeln!(out, "Saved entries to {}", path)?;
        }

        if draw {
            self.engine.draw();
            let board = self.engine.board();
            match board.winner_card() {
                Some(card) => writeln!(out, "{}", render_winner(&card))?,
                None => {
                    return Err(LuckyDrawError::NotEnoughEntries {
                        required: board.min_entries(),
                        available: board.entries().len(),
                    })
                }
            }
        }

        out.flush()?;
        Ok(())
    }
}
