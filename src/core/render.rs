use crate::core::board::DrawBoard;
use crate::domain::model::ContactCard;
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};

pub const TABLE_CAPTION: &str = "A list of valid lucky draw entries.";
pub const LOADING_ROW: &str = "Loading...";
pub const EMPTY_ROW: &str = "No valid entries found.";

const HEADERS: [&str; 4] = ["Name", "Email", "Phone", "Submitted At"];
const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats a submission timestamp in local time.
///
/// RFC 3339 input is converted from its offset, naive input is read as local
/// time, and anything else is returned as-is.
pub fn format_submitted_at(created_at: Option<&str>) -> String {
    let Some(raw) = created_at else {
        return String::new();
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.with_timezone(&Local).format(DISPLAY_FORMAT).to_string();
    }

    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, pattern) {
            if let Some(local) = Local.from_local_datetime(&naive).earliest() {
                return local.format(DISPLAY_FORMAT).to_string();
            }
        }
    }

    raw.to_string()
}

fn width(text: &str) -> usize {
    text.chars().count()
}

fn pad_right(text: &str, len: usize) -> String {
    format!("{}{}", text, " ".repeat(len.saturating_sub(width(text))))
}

fn pad_left(text: &str, len: usize) -> String {
    format!("{}{}", " ".repeat(len.saturating_sub(width(text))), text)
}

fn row(cells: &[String; 4], widths: &[usize; 4]) -> String {
    format!(
        "| {} | {} | {} | {} |",
        pad_right(&cells[0], widths[0]),
        pad_right(&cells[1], widths[1]),
        pad_right(&cells[2], widths[2]),
        pad_left(&cells[3], widths[3]),
    )
}

pub fn render_table(board: &DrawBoard) -> String {
    let rows: Vec<[String; 4]> = board
        .cards()
        .into_iter()
        .map(|card| {
            [
                card.name,
                card.email,
                card.phone,
                format_submitted_at(card.created_at.as_deref()),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(width);
    for cells in &rows {
        for (w, cell) in widths.iter_mut().zip(cells) {
            *w = (*w).max(width(cell));
        }
    }
    // 四欄內容寬度加上 " | " 分隔
    let inner = widths.iter().sum::<usize>() + 3 * (widths.len() - 1);
    let rule = format!("+{}+", "-".repeat(inner + 2));

    let mut lines = Vec::new();
    if let Some(error) = board.error() {
        lines.push(format!("! {}", error));
    }
    lines.push(rule.clone());
    lines.push(row(&HEADERS.map(str::to_string), &widths));
    lines.push(rule.clone());

    if board.is_loading() {
        lines.push(format!("| {} |", pad_right(LOADING_ROW, inner)));
    } else if rows.is_empty() {
        let pad = inner.saturating_sub(width(EMPTY_ROW));
        lines.push(format!(
            "| {}{}{} |",
            " ".repeat(pad / 2),
            EMPTY_ROW,
            " ".repeat(pad - pad / 2)
        ));
    } else {
        lines.extend(rows.iter().map(|cells| row(cells, &widths)));
    }

    lines.push(rule);
    lines.push(format!("  {} ({} shown)", TABLE_CAPTION, rows.len()));
    lines.join("\n")
}

pub fn render_winner(card: &ContactCard) -> String {
    [
        "🎉 Lucky Winner 🎉".to_string(),
        card.name.clone(),
        format!("Email: {}", card.email),
        format!("Phone: {}", card.phone),
        format!(
            "Submitted: {}",
            format_submitted_at(card.created_at.as_deref())
        ),
    ]
    .join("\n")
}

/// Winner card, draw error, or nothing when no draw has been attempted.
pub fn render_draw_result(board: &DrawBoard) -> Option<String> {
    if let Some(card) = board.winner_card() {
        return Some(render_winner(&card));
    }
    board.draw_error().map(|e| format!("! {}", e))
}
