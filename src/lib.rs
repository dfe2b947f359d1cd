pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{http::HttpSubmissionSource, storage::LocalStorage};
pub use app::session::Session;
pub use config::toml_config::{LoadedTomlConfig, TomlConfig};
pub use self::core::{board::DrawBoard, draw::LuckyDraw, engine::DrawEngine};
pub use utils::error::{LuckyDrawError, Result};
