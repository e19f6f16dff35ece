use crate::kernel::services::ports::SuggestionRequest;
use crate::models::TextBuffer;

/// Context window around the cursor: up to `lines_before` whole lines above
/// the cursor line, the cursor line split at the cursor, and up to
/// `lines_after` whole lines below. `None` for a blank document.
pub fn build_context(
    buffer: &TextBuffer,
    file_name: &str,
    lines_before: usize,
    lines_after: usize,
) -> Option<SuggestionRequest> {
    if buffer.is_blank() {
        return None;
    }

    let cursor = buffer.cursor();
    let row = buffer.cursor_line();
    let line = buffer.line_text(row).unwrap_or_default();
    let column = cursor.saturating_sub(buffer.line_start(row));
    let split = line
        .char_indices()
        .nth(column)
        .map_or(line.len(), |(byte, _)| byte);

    let first = row.saturating_sub(lines_before);
    let previous_lines = (first..row)
        .filter_map(|r| buffer.line_text(r))
        .collect::<Vec<_>>()
        .join("\n");

    let last = row
        .saturating_add(lines_after)
        .min(buffer.len_lines().saturating_sub(1));
    let next_lines = (row + 1..=last)
        .filter_map(|r| buffer.line_text(r))
        .collect::<Vec<_>>()
        .join("\n");

    Some(SuggestionRequest {
        file_name: file_name.to_string(),
        previous_lines,
        text_before_cursor: line[..split].to_string(),
        text_after_cursor: line[split..].to_string(),
        next_lines,
    })
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/assist/context.rs"]
mod tests;
