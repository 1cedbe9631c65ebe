//! Relevance Ranking — pluggable, trait-based scorer over formatted results.
//!
//! Default: `KeywordBonusScorer` (additive substring bonuses, deterministic).
//! `AppState` holds an `Arc<dyn RelevanceScorer>` chosen at startup.

use serde::{Deserialize, Serialize};

use crate::matching::normalize::SearchTerms;
use crate::models::job::MatchResult;

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Scores one result against the search terms. Implementations must be pure:
/// identical arguments give identical scores.
pub trait RelevanceScorer: Send + Sync {
    fn score(&self, result: &MatchResult, terms: &SearchTerms) -> u32;

    /// Backend label, logged with each search.
    fn name(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// KeywordBonusScorer
// ────────────────────────────────────────────────────────────────────────────

/// Bonus awarded per matching (term, field) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusWeights {
    pub skills_in_title: u32,
    pub skills_in_posting_title: u32,
    pub role_in_title: u32,
    pub role_in_posting_title: u32,
    pub skills_in_family_type: u32,
    pub skills_in_subfamily: u32,
}

impl Default for BonusWeights {
    fn default() -> Self {
        Self {
            skills_in_title: 15,
            skills_in_posting_title: 12,
            role_in_title: 20,
            role_in_posting_title: 18,
            skills_in_family_type: 8,
            skills_in_subfamily: 5,
        }
    }
}

/// Sums a fixed bonus for every field that contains a search term
/// (case-insensitive substring). Empty terms and empty fields never match.
#[derive(Debug, Clone, Default)]
pub struct KeywordBonusScorer {
    pub weights: BonusWeights,
}

fn contains_term(field: &str, term: &str) -> bool {
    !term.is_empty() && !field.is_empty() && field.to_lowercase().contains(&term.to_lowercase())
}

impl RelevanceScorer for KeywordBonusScorer {
    fn score(&self, result: &MatchResult, terms: &SearchTerms) -> u32 {
        let w = &self.weights;
        let skills = terms.skills.as_str();
        let role = terms.desired_role.as_deref().unwrap_or("");

        let bonuses = [
            (contains_term(&result.title, skills), w.skills_in_title),
            (
                contains_term(&result.posting_title, skills),
                w.skills_in_posting_title,
            ),
            (contains_term(&result.title, role), w.role_in_title),
            (
                contains_term(&result.posting_title, role),
                w.role_in_posting_title,
            ),
            (
                contains_term(&result.family_type, skills),
                w.skills_in_family_type,
            ),
            (
                contains_term(&result.subfamily_desc, skills),
                w.skills_in_subfamily,
            ),
        ];

        bonuses
            .iter()
            .filter(|(matched, _)| *matched)
            .fold(0u32, |total, (_, bonus)| total.saturating_add(*bonus))
    }

    fn name(&self) -> &'static str {
        "keyword_bonus"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Ranking
// ────────────────────────────────────────────────────────────────────────────

/// Scores every result and sorts by score descending.
/// The sort is stable, so ties keep their incoming (title ascending) order.
pub fn rank(
    mut results: Vec<MatchResult>,
    terms: &SearchTerms,
    scorer: &dyn RelevanceScorer,
) -> Vec<MatchResult> {
    for result in &mut results {
        result.score = scorer.score(result, terms);
    }
    results.sort_by(|a, b| b.score.cmp(&a.score));
    results
}
