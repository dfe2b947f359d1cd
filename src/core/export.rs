use crate::core::fields::contact_card;
use crate::core::render::format_submitted_at;
use crate::domain::model::{FieldKeys, Submission};
use crate::domain::ports::Storage;
use crate::utils::error::{LuckyDrawError, Result};
use serde::Serialize;

pub const EXPORT_FILENAME: &str = "lucky_draw_entries.csv";

#[derive(Serialize)]
struct ExportRow<'a> {
    id: String,
    name: &'a str,
    email: &'a str,
    phone: &'a str,
    submitted_at: String,
}

/// One CSV line per entry, contact fields resolved through `keys`.
pub fn entries_to_csv(entries: &[Submission], keys: &FieldKeys) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    if entries.is_empty() {
        // serialize 只在第一筆資料時寫表頭
        writer.write_record(["id", "name", "email", "phone", "submitted_at"])?;
    }
    for entry in entries {
        let card = contact_card(entry, keys);
        writer.serialize(ExportRow {
            id: card.id.as_ref().map(ToString::to_string).unwrap_or_default(),
            name: &card.name,
            email: &card.email,
            phone: &card.phone,
            submitted_at: format_submitted_at(card.created_at.as_deref()),
        })?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| LuckyDrawError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| LuckyDrawError::ProcessingError {
        message: format!("CSV output is not UTF-8: {}", e),
    })
}

/// Writes the snapshot through `storage` and returns where it went.
pub async fn export_entries<S: Storage>(
    storage: &S,
    entries: &[Submission],
    keys: &FieldKeys,
) -> Result<String> {
    let content = entries_to_csv(entries, keys)?;
    tracing::debug!("Writing {} entries ({} bytes)", entries.len(), content.len());
    storage.write_file(EXPORT_FILENAME, content.as_bytes()).await?;
    Ok(storage.describe(EXPORT_FILENAME))
}
