//! Job search pipeline.
//!
//! Flow: normalize terms → build filter → fetch rows → format → rank.
//!
//! A store failure degrades the search to an empty result set instead of
//! failing the request; the caller decides how to present that.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use crate::db::JobStore;
use crate::errors::AppError;
use crate::matching::format::format_rows;
use crate::matching::normalize::SearchTerms;
use crate::matching::query::build_search_filter;
use crate::matching::ranking::{rank, RelevanceScorer};
use crate::models::job::MatchResult;

/// Raw search input as submitted by a user.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub skills: String,
    #[serde(default)]
    pub desired_role: Option<String>,
}

/// Result of a search that passed validation.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub jobs: Vec<MatchResult>,
    /// True when the store could not be queried and `jobs` is empty because of it.
    pub degraded: bool,
}

#[derive(Clone)]
pub struct JobMatcher {
    store: Arc<dyn JobStore>,
    scorer: Arc<dyn RelevanceScorer>,
    result_limit: u32,
}

impl JobMatcher {
    pub fn new(store: Arc<dyn JobStore>, scorer: Arc<dyn RelevanceScorer>, result_limit: u32) -> Self {
        Self {
            store,
            scorer,
            result_limit,
        }
    }

    /// Runs a full search.
    ///
    /// Returns `AppError::Validation` without touching the store when the skills
    /// term is empty (after trimming, or after normalization).
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchOutcome, AppError> {
        let skills = request.skills.trim();
        let desired_role = request.desired_role.as_deref().map(str::trim);

        if skills.is_empty() {
            return Err(AppError::Validation(
                "Please enter at least one skill.".to_string(),
            ));
        }

        let terms = SearchTerms::from_raw(skills, desired_role);
        if !terms.has_skills() {
            return Err(AppError::Validation(
                "Skills must contain at least one letter or digit.".to_string(),
            ));
        }

        let span = info_span!("job_search", search_id = %Uuid::new_v4());
        self.run(terms, skills, desired_role.unwrap_or(""))
            .instrument(span)
            .await
    }

    async fn run(
        &self,
        terms: SearchTerms,
        raw_skills: &str,
        raw_role: &str,
    ) -> Result<SearchOutcome, AppError> {
        let filter = build_search_filter(&terms, self.result_limit);

        let rows = match self.store.fetch_jobs(&filter).await {
            Ok(rows) => rows,
            Err(e) => {
                error!("Job search failed for '{raw_skills}' / '{raw_role}': {e}");
                return Ok(SearchOutcome {
                    jobs: Vec::new(),
                    degraded: true,
                });
            }
        };

        let jobs = rank(format_rows(rows), &terms, self.scorer.as_ref());
        info!(
            scorer = self.scorer.name(),
            "Found {} jobs for '{raw_skills}' / '{raw_role}'",
            jobs.len()
        );

        Ok(SearchOutcome {
            jobs,
            degraded: false,
        })
    }
}
