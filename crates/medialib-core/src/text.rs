// ── Search text normalization ──
//
// Free-text search is accent- and case-insensitive: "Ecole" finds
// "École". Both sides of a comparison go through `fold`.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Strip diacritics: decompose (NFD) and drop combining marks.
///
/// Ligatures that have no decomposition are spelled out.
pub fn remove_accents(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.nfd() {
        match c {
            c if is_combining_mark(c) => {}
            'œ' => out.push_str("oe"),
            'Œ' => out.push_str("OE"),
            'æ' => out.push_str("ae"),
            'Æ' => out.push_str("AE"),
            c => out.push(c),
        }
    }
    out
}

/// Accent-stripped, lowercased form used for substring matching.
pub fn fold(input: &str) -> String {
    remove_accents(input).to_lowercase()
}
