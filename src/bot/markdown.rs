//! Telegram MarkdownV2 helpers

const SPECIAL_CHARS: [char; 19] = [
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
    '\\',
];

/// Escape every character MarkdownV2 treats as markup.
pub fn escape_markdown_v2(text: &str) -> String {
    let mut result = String::with_capacity(text.len() * 2);
    for ch in text.chars() {
        if SPECIAL_CHARS.contains(&ch) {
            result.push('\\');
        }
        result.push(ch);
    }
    result
}

pub fn bold(text: &str) -> String {
    format!("*{}*", escape_markdown_v2(text))
}

pub fn italic(text: &str) -> String {
    format!("_{}_", escape_markdown_v2(text))
}
