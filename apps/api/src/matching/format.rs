//! Result Formatter — raw store rows to display-safe `MatchResult`s.

use crate::models::job::{JobRow, MatchResult};

pub const TITLE_PLACEHOLDER: &str = "Not specified";
pub const CODE_PLACEHOLDER: &str = "N/A";

/// Treats NULL and empty strings alike.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

pub fn format_row(row: JobRow) -> MatchResult {
    let title = present(row.job_title).unwrap_or_else(|| TITLE_PLACEHOLDER.to_string());
    let external_code = present(row.job_code).unwrap_or_else(|| CODE_PLACEHOLDER.to_string());

    let posting_title = present(row.posting_title).unwrap_or_default();
    let structure_ref = present(row.structure_ref).unwrap_or_default();
    let org_unit_code = present(row.org_unit_code).unwrap_or_default();
    let subfamily_desc = present(row.subfamily_desc);
    let family_type = present(row.family_type).unwrap_or_default();
    let family_desc = present(row.family_desc);

    let description = subfamily_desc
        .clone()
        .or_else(|| family_desc.clone())
        .unwrap_or_default();
    let required_skills = match (&family_desc, &subfamily_desc) {
        (Some(family), Some(subfamily)) => format!("{family} - {subfamily}"),
        _ => String::new(),
    };

    MatchResult {
        title,
        external_code,
        posting_title,
        required_level: structure_ref.clone(),
        structure_ref,
        org_unit_code,
        subfamily_desc: subfamily_desc.unwrap_or_default(),
        domain: family_type.clone(),
        family_type,
        family_desc: family_desc.unwrap_or_default(),
        description,
        required_skills,
        score: 0,
    }
}

pub fn format_rows(rows: Vec<JobRow>) -> Vec<MatchResult> {
    rows.into_iter().map(format_row).collect()
}
