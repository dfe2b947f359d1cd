pub mod board;
pub mod draw;
pub mod engine;
pub mod export;
pub mod fields;
pub mod render;

pub use crate::domain::model::{ContactCard, FieldKeys, Submission, SubmissionId};
pub use crate::domain::ports::{ConfigProvider, Storage, SubmissionSource};
pub use crate::utils::error::Result;
