use crate::utils::error::{LuckyDrawError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl ToString, reason: impl Into<String>) -> LuckyDrawError {
    LuckyDrawError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// The submissions endpoint: required, http(s), with a host.
///
/// A blank value means the endpoint was never configured, which is reported as
/// missing rather than malformed. A leftover `${VAR}` means the variable was
/// not set when the TOML file was loaded.
pub fn validate_endpoint(field: &str, endpoint: &str) -> Result<Url> {
    let endpoint = endpoint.trim();
    if endpoint.is_empty() {
        return Err(LuckyDrawError::MissingConfigError {
            field: field.to_string(),
        });
    }
    if endpoint.contains("${") {
        return Err(invalid(field, endpoint, "Unresolved environment variable"));
    }

    let url = Url::parse(endpoint)
        .map_err(|e| invalid(field, endpoint, format!("Invalid URL: {}", e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(
            field,
            endpoint,
            format!("Submissions are fetched over http(s), not {}", url.scheme()),
        ));
    }
    if url.host_str().unwrap_or_default().is_empty() {
        return Err(invalid(field, endpoint, "URL has no host"));
    }
    Ok(url)
}

/// CSV exports land under this directory.
pub fn validate_output_path(field: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(invalid(field, path, "Output path cannot be empty"));
    }
    if path.contains('\0') {
        return Err(invalid(field, path.escape_default(), "Output path contains NUL bytes"));
    }
    Ok(())
}

/// Seconds, counts, and other settings where zero would stall or disable the draw.
pub fn validate_at_least(field: &str, value: u64, min: u64) -> Result<()> {
    if value < min {
        return Err(invalid(field, value, format!("Must be at least {}", min)));
    }
    Ok(())
}

/// 欄位候選鍵列表不可為空，也不可含空白鍵
pub fn validate_key_list(field: &str, keys: &[String]) -> Result<()> {
    if keys.is_empty() {
        return Err(LuckyDrawError::ConfigValidationError {
            field: field.to_string(),
            message: "At least one response key is required".to_string(),
        });
    }
    if let Some(idx) = keys.iter().position(|key| key.trim().is_empty()) {
        return Err(invalid(
            field,
            &keys[idx],
            format!("Response key #{} is blank", idx + 1),
        ));
    }
    Ok(())
}

/// Header names go on the wire as a single token.
pub fn validate_header_name(field: &str, name: &str) -> Result<()> {
    if name.is_empty() || name.contains(char::is_whitespace) {
        return Err(invalid(field, name, "Header name must be a single non-empty token"));
    }
    Ok(())
}

/// Splits a `Name: value` header spec. The value may itself contain colons.
pub fn parse_header(field: &str, spec: &str) -> Result<(String, String)> {
    let (name, value) = spec
        .split_once(':')
        .ok_or_else(|| invalid(field, spec, "Header must be in 'Name: value' form"))?;
    let name = name.trim();
    validate_header_name(field, name)?;

    Ok((name.to_string(), value.trim().to_string()))
}
