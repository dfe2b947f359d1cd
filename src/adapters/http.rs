use crate::domain::model::Submission;
use crate::domain::ports::{ConfigProvider, SubmissionSource};
use crate::utils::error::{LuckyDrawError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

/// Accepted response bodies: a bare row array or a `{data, error}` envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SubmissionsResponse {
    Rows(Vec<Value>),
    Envelope {
        #[serde(default)]
        data: Option<Vec<Value>>,
        #[serde(default)]
        error: Option<ServiceErrorBody>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ServiceErrorBody {
    Message(String),
    Detailed { message: String },
}

impl ServiceErrorBody {
    fn into_message(self) -> String {
        match self {
            Self::Message(message) | Self::Detailed { message } => message,
        }
    }
}

pub struct HttpSubmissionSource {
    client: Client,
    endpoint: String,
}

impl HttpSubmissionSource {
    pub fn new(endpoint: impl Into<String>, client: Client) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let mut headers = HeaderMap::new();
        for (name, value) in config.headers()? {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                LuckyDrawError::InvalidConfigValueError {
                    field: "headers".to_string(),
                    value: name.clone(),
                    reason: e.to_string(),
                }
            })?;
            let mut header_value = HeaderValue::from_str(&value).map_err(|e| {
                LuckyDrawError::InvalidConfigValueError {
                    field: "headers".to_string(),
                    value: name.clone(),
                    reason: e.to_string(),
                }
            })?;
            header_value.set_sensitive(true);
            headers.insert(header_name, header_value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self::new(config.api_endpoint(), client))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

pub fn parse_submissions(body: &[u8]) -> Result<Vec<Submission>> {
    let rows = match serde_json::from_slice::<SubmissionsResponse>(body)? {
        SubmissionsResponse::Rows(rows) => rows,
        SubmissionsResponse::Envelope {
            error: Some(error), ..
        } => {
            return Err(LuckyDrawError::ServiceError {
                message: error.into_message(),
            })
        }
        SubmissionsResponse::Envelope { data, error: None } => data.unwrap_or_default(),
    };
    Ok(decode_rows(rows))
}

/// Decodes rows one by one; a row that is not an object is dropped, not fatal.
fn decode_rows(rows: Vec<Value>) -> Vec<Submission> {
    rows.into_iter()
        .enumerate()
        .filter_map(|(idx, row)| {
            if !row.is_object() {
                tracing::warn!("Skipping submission row {}: not a JSON object", idx);
                return None;
            }
            serde_json::from_value::<Submission>(row)
                .map_err(|e| tracing::warn!("Skipping submission row {}: {}", idx, e))
                .ok()
        })
        .collect()
}

#[async_trait]
impl SubmissionSource for HttpSubmissionSource {
    async fn fetch_submissions(&self) -> Result<Vec<Submission>> {
        tracing::debug!("Making API request to: {}", self.endpoint);
        let response = self.client.get(&self.endpoint).send().await?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);
        if !status.is_success() {
            return Err(LuckyDrawError::HttpStatusError {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let submissions = parse_submissions(&body)?;
        tracing::debug!("Received {} submissions", submissions.len());
        Ok(submissions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[test]
    fn test_parse_bare_array() {
        let body = json!([
            {"id": 1, "user_responses": {"name": "Ann"}},
            {"id": "x", "created_at": "2025-01-01T00:00:00Z", "user_responses": {}}
        ])
        .to_string();
        let rows = parse_submissions(body.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_parse_envelope_variants() {
        let ok = json!({"data": [{"user_responses": {"name": "Ann"}}], "error": null}).to_string();
        assert_eq!(parse_submissions(ok.as_bytes()).unwrap().len(), 1);

        let empty = json!({"data": null, "error": null}).to_string();
        assert!(parse_submissions(empty.as_bytes()).unwrap().is_empty());

        let failed = json!({"data": null, "error": "JWT expired"}).to_string();
        match parse_submissions(failed.as_bytes()) {
            Err(LuckyDrawError::ServiceError { message }) => assert_eq!(message, "JWT expired"),
            other => panic!("unexpected: {:?}", other),
        }

        let detailed =
            json!({"data": null, "error": {"message": "timeout", "code": "57014"}}).to_string();
        match parse_submissions(detailed.as_bytes()) {
            Err(LuckyDrawError::ServiceError { message }) => assert_eq!(message, "timeout"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_malformed_rows_do_not_hide_good_ones() {
        let body = json!([
            {"id": 1, "user_responses": {"name": "Ann", "email": "a@x", "phone": "1"}},
            {"id": 2, "user_responses": "{\"name\":\"Bo\"}"},
            {"id": 3, "created_at": 1740823200,
             "user_responses": {"name": "Cy", "email": "c@x", "phone": "3"}},
            "garbage",
            {"id": 4, "user_responses": {"name": "Di", "email": "d@x", "phone": "4"}}
        ])
        .to_string();

        let rows = parse_submissions(body.as_bytes()).unwrap();
        assert_eq!(rows.len(), 4);
        assert!(rows[1].user_responses.is_empty());
        assert_eq!(rows[2].created_at, None);

        let keys = crate::domain::model::FieldKeys::default();
        let valid = crate::core::fields::valid_entries(rows, &keys);
        assert_eq!(valid.len(), 3);
    }

    #[test]
    fn test_parse_rejects_other_shapes() {
        assert!(matches!(
            parse_submissions(b"\"hello\""),
            Err(LuckyDrawError::SerializationError(_))
        ));
        assert!(parse_submissions(b"not json").is_err());
    }

    #[tokio::test]
    async fn test_fetch_submissions_success() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/quiz_submissions");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!([
                    {"id": 1, "user_responses": {"name": "Ann", "email": "a@x", "phone": "1"}}
                ]));
        });

        let source = HttpSubmissionSource::new(server.url("/quiz_submissions"), Client::new());
        let rows = source.fetch_submissions().await.unwrap();

        api_mock.assert();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_submissions_http_error() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/quiz_submissions");
            then.status(500);
        });

        let source = HttpSubmissionSource::new(server.url("/quiz_submissions"), Client::new());
        let err = source.fetch_submissions().await.unwrap_err();

        api_mock.assert();
        assert!(matches!(err, LuckyDrawError::HttpStatusError { status: 500 }));
    }
}
