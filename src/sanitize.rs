use std::sync::OnceLock;

use regex::Regex;

const FILENAME_CHARS: [char; 5] = ['/', ':', '\\', '>', '<'];
const PATHNAME_CHARS: [char; 4] = [':', '\\', '>', '<'];

fn spaces() -> &'static Regex {
    static SPACES: OnceLock<Regex> = OnceLock::new();
    SPACES.get_or_init(|| Regex::new(" {2,}").expect("static regex"))
}

fn replace_and_collapse(text: &str, unsafe_chars: &[char]) -> String {
    let replaced: String = text
        .chars()
        .map(|c| if unsafe_chars.contains(&c) { ' ' } else { c })
        .collect();
    spaces().replace_all(&replaced, " ").into_owned()
}

/// Replaces `/ : \ > <` with a space and collapses runs of spaces.
pub fn sanitize_filename(text: &str) -> String {
    replace_and_collapse(text, &FILENAME_CHARS)
}

/// Like [`sanitize_filename`] but keeps `/` so nested paths survive.
pub fn sanitize_pathname(text: &str) -> String {
    replace_and_collapse(text, &PATHNAME_CHARS)
}

/// Keeps an attachment name as uploaded apart from the characters that
/// could leave the attachments directory. Whitespace is not collapsed.
pub fn sanitize_attachment_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| if FILENAME_CHARS.contains(&c) { '_' } else { c })
        .collect();
    match replaced.trim() {
        "" | "." | ".." => "attachment".to_string(),
        _ => replaced,
    }
}
