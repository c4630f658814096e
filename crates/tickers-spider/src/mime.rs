/// Only the head of a buffer is inspected.
const SNIFF_LEN: usize = 512;

pub const JSON: &str = "application/json";
pub const TEXT: &str = "text/plain; charset=utf-8";
pub const BINARY: &str = "application/octet-stream";

/// Guess the content type of `buffer` from its first bytes.
///
/// Known magic numbers win; otherwise UTF-8 text opening with `{` or `[` is JSON, other text is
/// plain text and anything else is an octet stream.
pub fn sniff(buffer: &[u8]) -> &'static str {
    let head = &buffer[..buffer.len().min(SNIFF_LEN)];

    if let Some(kind) = infer::get(head) {
        return kind.mime_type();
    }

    let Some(text) = utf8_prefix(head) else {
        return BINARY;
    };
    if text.chars().any(|c| c.is_control() && !c.is_ascii_whitespace()) {
        return BINARY;
    }

    match text.trim_start().bytes().next() {
        Some(b'{') | Some(b'[') => JSON,
        _ => TEXT,
    }
}

// Cutting at SNIFF_LEN may split a multi-byte character; that tail is not an encoding error.
fn utf8_prefix(head: &[u8]) -> Option<&str> {
    match std::str::from_utf8(head) {
        Ok(text) => Some(text),
        Err(err) if err.error_len().is_none() => std::str::from_utf8(&head[..err.valid_up_to()]).ok(),
        Err(_) => None,
    }
}
