pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::domain::model::FieldKeys;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "cli")]
use std::time::Duration;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "lucky-draw")]
#[command(about = "Watch quiz submissions and draw a lucky winner")]
pub struct CliConfig {
    #[arg(long, env = "LUCKY_DRAW_API_ENDPOINT", default_value = "")]
    pub api_endpoint: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    /// Request header in `Name: value` form; repeatable
    #[arg(long = "header", value_name = "NAME: VALUE")]
    pub headers: Vec<String>,

    #[arg(long, default_value = "30")]
    pub timeout_secs: u64,

    #[arg(long, default_value = "10")]
    pub refresh_secs: u64,

    #[arg(long, default_value = "4")]
    pub min_entries: usize,

    /// Load settings from a TOML file instead of the flags above
    #[arg(short, long)]
    pub config: Option<String>,

    /// Fetch once, print the table and exit
    #[arg(long)]
    pub once: bool,

    /// Draw a winner after the one-shot fetch
    #[arg(long, requires = "once")]
    pub draw: bool,

    /// Write the valid entries to CSV after the one-shot fetch
    #[arg(long, requires = "once")]
    pub export: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[arg(long, help = "Log process CPU/memory after each refresh")]
    pub monitor: bool,

    #[arg(skip)]
    pub field_keys: FieldKeys,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn api_endpoint(&self) -> &str {
        &self.api_endpoint
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn headers(&self) -> Result<Vec<(String, String)>> {
        self.headers
            .iter()
            .map(|spec| validation::parse_header("header", spec))
            .collect()
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_secs)
    }

    fn min_entries(&self) -> usize {
        self.min_entries
    }

    fn field_keys(&self) -> &FieldKeys {
        &self.field_keys
    }

    fn monitoring_enabled(&self) -> bool {
        self.monitor
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_endpoint("api_endpoint", &self.api_endpoint)?;
        validation::validate_output_path("output_path", &self.output_path)?;
        validation::validate_at_least("timeout_secs", self.timeout_secs, 1)?;
        validation::validate_at_least("refresh_secs", self.refresh_secs, 1)?;
        validation::validate_at_least("min_entries", self.min_entries as u64, 1)?;
        self.headers()?;
        Ok(())
    }
}
