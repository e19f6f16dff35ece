//! Prompt templates for the two assist flows.

use crate::kernel::services::ports::{QuickEditRequest, SuggestionRequest};

const SUGGESTION_TEMPLATE: &str = r#"You complete source code. Produce the text that belongs exactly at the cursor.

<context>
<file_name>{file_name}</file_name>
<code_before_cursor>
{previous_lines}
{before_cursor}
</code_before_cursor>
<code_after_cursor>
{after_cursor}
{next_lines}
</code_after_cursor>
</context>

<rules>
- Insert only what bridges the code before the cursor to the code after it.
- Never repeat anything already present after the cursor.
- Return an empty string when the code is already complete or the next step is unclear.
- Output raw code only. No prose, no comments about the change, no markdown fences.
</rules>

Respond with a JSON object of the form {"suggestion": "<code to insert>"}."#;

const QUICK_EDIT_TEMPLATE: &str = r#"You edit a selected region of a source file according to an instruction.

<context>
<file_name>{file_name}</file_name>
<selected_code>
{selected_code}
</selected_code>
<surrounding_context>
{full_code}
</surrounding_context>
{documentation}
</context>

<user_request>
{instruction}
</user_request>

<rules>
- Return only the code that replaces the selection.
- Keep the indentation and formatting style of the original.
- Pick the most reasonable reading of an ambiguous request.
- If the request does not apply to the selection, return the selection unchanged.
- No markdown fences and no explanatory comments unless asked for.
</rules>

Respond with a JSON object of the form {"editedCode": "<replacement code>"}."#;

pub fn suggestion_prompt(req: &SuggestionRequest) -> String {
    fill(
        SUGGESTION_TEMPLATE,
        &[
            ("file_name", &req.file_name),
            ("previous_lines", &req.previous_lines),
            ("before_cursor", &req.text_before_cursor),
            ("after_cursor", &req.text_after_cursor),
            ("next_lines", &req.next_lines),
        ],
    )
}

pub fn quick_edit_prompt(req: &QuickEditRequest, documentation: &str) -> String {
    fill(
        QUICK_EDIT_TEMPLATE,
        &[
            ("file_name", &req.file_name),
            ("selected_code", &req.selected_code),
            ("full_code", &req.full_code),
            ("documentation", documentation),
            ("instruction", &req.instruction),
        ],
    )
}

/// Wraps fetched pages as `<doc>` entries inside one `<documentation>` block.
/// Empty input yields an empty string.
pub fn documentation_block(docs: &[(String, String)]) -> String {
    if docs.is_empty() {
        return String::new();
    }
    let body = docs
        .iter()
        .map(|(url, text)| format!("<doc url=\"{url}\">\n{text}\n</doc>"))
        .collect::<Vec<_>>()
        .join("\n\n");
    format!("<documentation>\n{body}\n</documentation>")
}

/// Single left-to-right pass over `{key}` placeholders. Substituted values are
/// never rescanned, so user text containing braces is inserted verbatim.
/// Unknown placeholders (like the JSON shape hints) are left as-is.
pub(crate) fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(
        template.len() + values.iter().map(|(_, v)| v.len()).sum::<usize>(),
    );
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open + 1..];
        let hit = tail.find('}').and_then(|close| {
            let key = &tail[..close];
            values
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (close, *value))
        });
        match hit {
            Some((close, value)) => {
                out.push_str(value);
                rest = &tail[close + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/assist/prompts.rs"]
mod tests;
