use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Free-form answers keyed by question; values may be strings, numbers or lists.
pub type UserResponses = HashMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubmissionId {
    Number(i64),
    Text(String),
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// One backend row. Fields of an unexpected shape decode as absent rather than
/// failing the row, so such entries are simply filtered out later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    #[serde(default, deserialize_with = "lenient_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<SubmissionId>,

    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<String>,

    #[serde(default, deserialize_with = "lenient_responses")]
    pub user_responses: UserResponses,
}

impl Submission {
    pub fn new(responses: UserResponses) -> Self {
        Self {
            id: None,
            created_at: None,
            user_responses: responses,
        }
    }

    pub fn with_id(mut self, id: SubmissionId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_created_at(mut self, created_at: impl Into<String>) -> Self {
        self.created_at = Some(created_at.into());
        self
    }
}

// 非物件 (null、字串化的 jsonb、數字) 一律視為空表
fn lenient_responses<'de, D>(deserializer: D) -> Result<UserResponses, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Object(map) => Ok(map.into_iter().collect()),
        _ => Ok(UserResponses::new()),
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<SubmissionId>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(Some(SubmissionId::Text(s))),
        Value::Number(n) => Ok(n.as_i64().map(SubmissionId::Number)),
        _ => Ok(None),
    }
}

/// Prioritized response keys for the three contact fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldKeys {
    pub name: Vec<String>,
    pub email: Vec<String>,
    pub phone: Vec<String>,
}

impl Default for FieldKeys {
    fn default() -> Self {
        Self {
            name: vec![
                "name".to_string(),
                "Please provide your details below to enter our lucky draw.".to_string(),
            ],
            email: vec!["email".to_string(), "question11".to_string()],
            phone: vec!["phone".to_string(), "Phone".to_string()],
        }
    }
}

/// Resolved contact details of one valid entry, ready for display or export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactCard {
    pub id: Option<SubmissionId>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub created_at: Option<String>,
}
