//! Answer normalization and grading.
//!
//! Canonicalizes a free-text algebraic answer written as a product of
//! parenthesized factors, e.g. `(x-3)(x+3)`, so that factor order, letter
//! case, whitespace, and outer-parenthesis conventions do not affect grading.
//!
//! This performs no algebraic understanding. Answers that are algebraically
//! equivalent but spelled under a different factoring scheme will not match;
//! that is an accepted limitation of the comparison, not a bug.

/// The canonical form of an answer: a sorted list of factor substrings.
///
/// Usable for equality comparison only, not for re-display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalAnswer(Vec<String>);

impl CanonicalAnswer {
    /// The sorted factor substrings.
    pub fn factors(&self) -> &[String] {
        &self.0
    }
}

/// Canonicalize an answer for comparison.
///
/// Lowercases, removes all whitespace, strips at most one leading `(` and one
/// trailing `)`, splits on the `)(` boundary between factors, and sorts the
/// resulting factors lexicographically.
///
/// Inputs not shaped as a parenthesized product (single terms, malformed
/// text, the empty string) normalize to a single-element list.
pub fn normalize(text: &str) -> CanonicalAnswer {
    let compact: String = text.to_lowercase().chars().filter(|c| !c.is_whitespace()).collect();

    let inner = compact.strip_prefix('(').unwrap_or(&compact);
    let inner = inner.strip_suffix(')').unwrap_or(inner);

    let mut factors: Vec<String> = inner.split(")(").map(str::to_string).collect();
    factors.sort_unstable();
    CanonicalAnswer(factors)
}

/// Grade a submitted answer against the expected one.
///
/// Returns `true` iff the two canonical forms are equal. Pure, no failure
/// modes; malformed input still normalizes to some canonical form.
pub fn grade(submitted: &str, expected: &str) -> bool {
    normalize(submitted) == normalize(expected)
}
