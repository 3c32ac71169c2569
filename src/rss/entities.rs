//! HTML entity decoding for feed text.
//!
//! Feed titles and descriptions often arrive escaped once more than the
//! XML layer undoes (`&amp;lt;b&amp;gt;`). Decoding is repeated until the
//! text stops changing, so the result never contains a decodable entity
//! and decoding it again is a no-op.

/// Decode HTML entities in `text` until a fixpoint is reached.
///
/// Uses the full HTML5 entity table, including legacy entities without a
/// trailing `;`. Invalid numeric references follow the HTML5 rules
/// (U+FFFD, or the windows-1252 character for the C1 range). Unknown
/// names and bare ampersands are kept as-is.
pub fn unescape_html(text: &str) -> String {
    let mut current = htmlize::unescape(text).into_owned();
    loop {
        let next = htmlize::unescape(current.as_str()).into_owned();
        if next == current {
            return current;
        }
        current = next;
    }
}
