//! Term normalization for free-text search input.

use serde::Serialize;

/// Lowercases, trims, replaces every non-word character with a space and
/// collapses whitespace runs. Word characters are Unicode letters and digits,
/// so accented terms ("développeur") survive intact. Underscores are treated as
/// separators, which also keeps SQL pattern wildcards out of the result.
pub fn normalize_term(raw: &str) -> String {
    let replaced: String = raw
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalized terms for a single search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchTerms {
    pub skills: String,
    /// `None` when the desired role is absent or normalizes to nothing.
    pub desired_role: Option<String>,
}

impl SearchTerms {
    pub fn from_raw(skills: &str, desired_role: Option<&str>) -> Self {
        let desired_role = desired_role
            .map(normalize_term)
            .filter(|term| !term.is_empty());

        Self {
            skills: normalize_term(skills),
            desired_role,
        }
    }

    pub fn has_skills(&self) -> bool {
        !self.skills.is_empty()
    }
}
