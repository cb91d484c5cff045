//! Cleanup of raw model output.

const OPENING_QUOTES: &[char] = &['"', '\'', '\u{201C}', '\u{2018}'];
const CLOSING_QUOTES: &[char] = &['"', '\'', '\u{201D}', '\u{2019}'];

/// Strips quotation marks wrapping the whole text and trims whitespace.
///
/// Quotes are only removed in pairs (one at each end), repeatedly, so
/// dialogue ending in a closing quote keeps it. The result is a fixed point:
/// `sanitize(sanitize(x)) == sanitize(x)`.
pub fn sanitize(raw: &str) -> String {
    let mut text = raw.trim();

    loop {
        let mut chars = text.chars();
        let (Some(first), Some(last)) = (chars.next(), chars.next_back()) else {
            break;
        };
        if !OPENING_QUOTES.contains(&first) || !CLOSING_QUOTES.contains(&last) {
            break;
        }
        text = text[first.len_utf8()..text.len() - last.len_utf8()].trim();
    }

    text.to_string()
}
