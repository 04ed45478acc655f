use unicode_width::UnicodeWidthChar;

use crate::types::PendingAction;

/// Convert a text string to editor lines, preserving a trailing newline as an
/// empty final line so the cursor can be positioned after the last content line.
pub(crate) fn text_to_lines(text: &str) -> Vec<String> {
    if text.is_empty() {
        return vec![String::new()];
    }
    let mut lines: Vec<String> = text.lines().map(ToString::to_string).collect();
    if text.ends_with('\n') {
        lines.push(String::new());
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Inverse of `text_to_lines`: the trailing empty line becomes the final
/// newline again, so buffers round-trip unchanged through the editor.
pub(crate) fn lines_to_text(lines: &[String]) -> String {
    lines.join("\n")
}

/// True when `path` sits strictly below `prefix` at a segment boundary:
/// "src/a.py" is under "src", "srcx/a.py" is not, and "src" itself is not.
pub(crate) fn is_under(path: &str, prefix: &str) -> bool {
    path.len() > prefix.len() && path.starts_with(prefix) && path.as_bytes()[prefix.len()] == b'/'
}

pub(crate) fn parent_of(path: &str) -> Option<&str> {
    path.rfind('/').map(|idx| &path[..idx])
}

pub(crate) fn file_name(path: &str) -> &str {
    path.rfind('/').map_or(path, |idx| &path[idx + 1..])
}

pub(crate) fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}/{name}")
    }
}

pub(crate) fn pending_hint(pending: &PendingAction) -> String {
    match pending {
        PendingAction::None => String::new(),
        PendingAction::Quit => "Unsaved changes. Enter quit anyway, Esc cancel".to_string(),
        PendingAction::CloseTab(_) => {
            "Unsaved changes. Enter save+close, d discard+close, Esc cancel".to_string()
        }
        PendingAction::Delete { path, is_dir } => {
            let kind = if *is_dir { "folder" } else { "file" };
            format!("Delete {kind} {}? Enter confirm, Esc cancel", file_name(path))
        }
    }
}

/// Clip a string to a display width, appending an ellipsis when truncated.
pub(crate) fn truncate_to_width(s: &str, width: usize) -> String {
    let mut acc = 0usize;
    let mut out = String::new();
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if acc + w > width.saturating_sub(1) {
            out.push('…');
            return out;
        }
        acc += w;
        out.push(ch);
    }
    out
}

pub(crate) fn to_u16_saturating(v: usize) -> u16 {
    u16::try_from(v).unwrap_or(u16::MAX)
}
