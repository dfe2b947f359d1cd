use crate::domain::model::{ContactCard, FieldKeys, Submission, UserResponses};
use serde_json::Value;

/// A response counts only when it is a string with something besides whitespace.
pub fn is_valid_string(value: &Value) -> bool {
    matches!(value, Value::String(s) if !s.trim().is_empty())
}

/// Returns the first valid response among `keys`, untrimmed, or an empty string.
pub fn get_field<S: AsRef<str>>(responses: &UserResponses, keys: &[S]) -> String {
    keys.iter()
        .filter_map(|key| responses.get(key.as_ref()))
        .find(|value| is_valid_string(value))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_default()
}

pub fn is_valid_entry(submission: &Submission, keys: &FieldKeys) -> bool {
    let responses = &submission.user_responses;
    [&keys.name, &keys.email, &keys.phone]
        .into_iter()
        .all(|candidates| !get_field(responses, candidates).trim().is_empty())
}

/// Keeps entries with a name, email and phone, in their original order.
pub fn valid_entries(submissions: Vec<Submission>, keys: &FieldKeys) -> Vec<Submission> {
    submissions
        .into_iter()
        .filter(|entry| is_valid_entry(entry, keys))
        .collect()
}

pub fn contact_card(submission: &Submission, keys: &FieldKeys) -> ContactCard {
    let responses = &submission.user_responses;
    ContactCard {
        id: submission.id.clone(),
        name: get_field(responses, &keys.name),
        email: get_field(responses, &keys.email),
        phone: get_field(responses, &keys.phone),
        created_at: submission.created_at.clone(),
    }
}
