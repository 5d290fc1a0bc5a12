//! Control-character stripping for review bodies sent to the browser.

use std::borrow::Cow;

/// C0 controls, DEL plus C1 controls, and the soft hyphen.
fn is_illegal(c: char) -> bool {
    matches!(c, '\u{0000}'..='\u{001F}' | '\u{007F}'..='\u{009F}' | '\u{00AD}')
}

/// Remove control characters and soft hyphens from `text`.
///
/// Borrows when there is nothing to strip. Idempotent.
#[must_use]
pub fn sanitize_text(text: &str) -> Cow<'_, str> {
    if text.chars().any(is_illegal) {
        Cow::Owned(text.chars().filter(|&c| !is_illegal(c)).collect())
    } else {
        Cow::Borrowed(text)
    }
}
