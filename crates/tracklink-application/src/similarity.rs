// SPDX-License-Identifier: GPL-3.0-or-later

//! Bounded textual similarity used to score fuzzy metadata candidates.

use strsim::normalized_levenshtein;

/// Case-insensitive similarity between two strings in `[0, 1]`.
///
/// Levenshtein distance normalized by the longer string's length:
/// `1 - distance / max(len)`. Two empty strings score `0.0`; an empty field
/// never supports a meaningful match. Total for any input pair.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();

    if a.is_empty() && b.is_empty() {
        return 0.0;
    }

    normalized_levenshtein(&a, &b)
}
