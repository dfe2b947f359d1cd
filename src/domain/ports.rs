use crate::domain::model::{FieldKeys, Submission};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Human-readable location of `path` for log and console output.
    fn describe(&self, path: &str) -> String {
        path.to_string()
    }
}

pub trait ConfigProvider: Send + Sync {
    fn api_endpoint(&self) -> &str;
    fn output_path(&self) -> &str;
    fn headers(&self) -> Result<Vec<(String, String)>>;
    fn request_timeout(&self) -> Duration;
    fn refresh_interval(&self) -> Duration;
    fn min_entries(&self) -> usize;
    fn field_keys(&self) -> &FieldKeys;
    fn monitoring_enabled(&self) -> bool;
}

/// Where quiz submissions come from.
///
/// `Err(LuckyDrawError::ServiceError)` means the backend answered with its own
/// error message; every other error is a failure to reach or decode it.
#[async_trait]
pub trait SubmissionSource: Send + Sync {
    async fn fetch_submissions(&self) -> Result<Vec<Submission>>;
}
