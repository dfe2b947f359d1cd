use crate::core::ConfigProvider;
use crate::domain::model::FieldKeys;
use crate::utils::error::{LuckyDrawError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub source: SourceConfig,
    #[serde(default)]
    pub draw: DrawConfig,
    #[serde(default)]
    pub fields: FieldsConfig,
    #[serde(default)]
    pub output: OutputConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub endpoint: String,
    pub timeout_seconds: Option<u64>,
    pub headers: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DrawConfig {
    pub min_entries: Option<usize>,
    pub refresh_interval_seconds: Option<u64>,
}

/// Overrides for the prioritized response keys; omitted lists keep their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldsConfig {
    pub name: Option<Vec<String>>,
    pub email: Option<Vec<String>>,
    pub phone: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub output_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
        }
    }
}

fn default_output_path() -> String {
    "./output".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

/// A parsed config file plus the field keys resolved from it.
#[derive(Debug, Clone)]
pub struct LoadedTomlConfig {
    pub raw: TomlConfig,
    field_keys: FieldKeys,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<LoadedTomlConfig> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<LoadedTomlConfig> {
        let processed_content = Self::substitute_env_vars(content)?;

        let raw: TomlConfig =
            toml::from_str(&processed_content).map_err(|e| LuckyDrawError::ConfigValidationError {
                field: "toml_parsing".to_string(),
                message: format!("TOML parsing error: {}", e),
            })?;
        Ok(LoadedTomlConfig::new(raw))
    }

    /// 替換環境變數 (例如 ${API_KEY})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = match ENV_VAR.get() {
            Some(re) => re,
            None => {
                let compiled = Regex::new(r"\$\{([^}]+)\}").map_err(|e| {
                    LuckyDrawError::ProcessingError {
                        message: format!("env substitution pattern: {}", e),
                    }
                })?;
                ENV_VAR.get_or_init(|| compiled)
            }
        };

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl LoadedTomlConfig {
    pub fn new(raw: TomlConfig) -> Self {
        let defaults = FieldKeys::default();
        let fields = raw.fields.clone();
        let field_keys = FieldKeys {
            name: fields.name.unwrap_or(defaults.name),
            email: fields.email.unwrap_or(defaults.email),
            phone: fields.phone.unwrap_or(defaults.phone),
        };
        Self { raw, field_keys }
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_endpoint("source.endpoint", &self.raw.source.endpoint)?;
        validation::validate_output_path("output.output_path", &self.raw.output.output_path)?;

        if let Some(timeout) = self.raw.source.timeout_seconds {
            validation::validate_at_least("source.timeout_seconds", timeout, 1)?;
        }
        if let Some(interval) = self.raw.draw.refresh_interval_seconds {
            validation::validate_at_least("draw.refresh_interval_seconds", interval, 1)?;
        }
        if let Some(min) = self.raw.draw.min_entries {
            validation::validate_at_least("draw.min_entries", min as u64, 1)?;
        }

        validation::validate_key_list("fields.name", &self.field_keys.name)?;
        validation::validate_key_list("fields.email", &self.field_keys.email)?;
        validation::validate_key_list("fields.phone", &self.field_keys.phone)?;

        for name in self.raw.source.headers.iter().flatten().map(|(name, _)| name) {
            validation::validate_header_name("source.headers", name)?;
        }

        Ok(())
    }
}

impl ConfigProvider for LoadedTomlConfig {
    fn api_endpoint(&self) -> &str {
        &self.raw.source.endpoint
    }

    fn output_path(&self) -> &str {
        &self.raw.output.output_path
    }

    fn headers(&self) -> Result<Vec<(String, String)>> {
        Ok(self
            .raw
            .source
            .headers
            .iter()
            .flatten()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect())
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.raw.source.timeout_seconds.unwrap_or(30))
    }

    fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.raw.draw.refresh_interval_seconds.unwrap_or(10))
    }

    fn min_entries(&self) -> usize {
        self.raw
            .draw
            .min_entries
            .unwrap_or(crate::core::draw::DEFAULT_MIN_ENTRIES)
    }

    fn field_keys(&self) -> &FieldKeys {
        &self.field_keys
    }

    fn monitoring_enabled(&self) -> bool {
        self.raw.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl Validate for LoadedTomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
