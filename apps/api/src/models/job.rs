use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row of the denormalized job search query, values verbatim from the store.
/// Every joined column is nullable (LEFT JOIN).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub job_title: Option<String>,
    pub job_code: Option<String>,
    pub posting_title: Option<String>,
    pub structure_ref: Option<String>,
    pub org_unit_code: Option<String>,
    pub subfamily_desc: Option<String>,
    pub family_type: Option<String>,
    pub family_desc: Option<String>,
}

/// A formatted, display-safe search result. Every field is a plain string,
/// missing source values have already been replaced with their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub title: String,
    pub external_code: String,
    pub posting_title: String,
    pub structure_ref: String,
    pub org_unit_code: String,
    pub subfamily_desc: String,
    pub family_type: String,
    pub family_desc: String,
    /// Legacy display fields kept for older page layouts.
    pub description: String,
    pub domain: String,
    pub required_skills: String,
    pub required_level: String,
    /// Relevance score assigned by the ranker. 0 until ranked.
    pub score: u32,
}

/// Taxonomy link of a single job, used for distribution statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
pub struct TaxonomyRow {
    pub family_desc: Option<String>,
    pub subfamily_desc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct JobSample {
    pub title: Option<String>,
    pub external_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityCounts {
    pub jobs: i64,
    pub job_postings: i64,
    pub subfamilies: i64,
    pub families: i64,
}

/// Snapshot of store reachability returned by the diagnostics endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreDiagnostics {
    pub db_version: String,
    pub counts: EntityCounts,
    pub sample_jobs: Vec<JobSample>,
    pub checked_at: DateTime<Utc>,
}
