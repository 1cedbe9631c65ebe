use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::job::TaxonomyRow;

/// Number of sub-families reported in `top_subfamilies`.
pub const TOP_SUBFAMILIES: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyDistribution {
    /// Jobs linked to a sub-family.
    pub total_jobs: u64,
    pub families: Vec<CategoryCount>,
    pub top_subfamilies: Vec<CategoryCount>,
}

/// Counts occurrences of each label, skipping missing ones.
/// Sorted by count descending, then label ascending.
fn value_counts<'a>(labels: impl Iterator<Item = Option<&'a str>>) -> Vec<CategoryCount> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for label in labels.flatten().filter(|l| !l.is_empty()) {
        *counts.entry(label).or_insert(0) += 1;
    }

    let mut sorted: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(label, count)| CategoryCount {
            label: label.to_string(),
            count,
        })
        .collect();
    sorted.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    sorted
}

pub fn compute_distribution(rows: &[TaxonomyRow], top_n: usize) -> TaxonomyDistribution {
    let families = value_counts(rows.iter().map(|r| r.family_desc.as_deref()));
    let mut top_subfamilies = value_counts(rows.iter().map(|r| r.subfamily_desc.as_deref()));
    top_subfamilies.truncate(top_n);

    TaxonomyDistribution {
        total_jobs: rows.len() as u64,
        families,
        top_subfamilies,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(family: Option<&str>, subfamily: Option<&str>) -> TaxonomyRow {
        TaxonomyRow {
            family_desc: family.map(str::to_string),
            subfamily_desc: subfamily.map(str::to_string),
        }
    }

    #[test]
    fn test_family_counts_sorted_by_count_then_label() {
        let rows = vec![
            row(Some("Finances"), Some("Comptabilité")),
            row(Some("Numérique"), Some("Développement")),
            row(Some("Numérique"), Some("Infrastructure")),
            row(Some("Achats"), Some("Marchés")),
        ];
        let dist = compute_distribution(&rows, TOP_SUBFAMILIES);
        assert_eq!(dist.total_jobs, 4);
        assert_eq!(
            dist.families,
            vec![
                CategoryCount { label: "Numérique".to_string(), count: 2 },
                CategoryCount { label: "Achats".to_string(), count: 1 },
                CategoryCount { label: "Finances".to_string(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_missing_labels_skipped_but_counted_in_total() {
        let rows = vec![row(None, Some("Paie")), row(Some(""), None)];
        let dist = compute_distribution(&rows, TOP_SUBFAMILIES);
        assert_eq!(dist.total_jobs, 2);
        assert!(dist.families.is_empty());
        assert_eq!(dist.top_subfamilies.len(), 1);
        assert_eq!(dist.top_subfamilies[0].label, "Paie");
    }

    #[test]
    fn test_subfamilies_truncated_to_top_n() {
        let rows: Vec<TaxonomyRow> = (0..15)
            .map(|i| row(Some("F"), Some(&format!("Sous-famille {i:02}"))))
            .collect();
        let dist = compute_distribution(&rows, TOP_SUBFAMILIES);
        assert_eq!(dist.top_subfamilies.len(), 10);
        assert_eq!(dist.top_subfamilies[0].label, "Sous-famille 00");
        assert_eq!(dist.families[0].count, 15);
    }

    #[test]
    fn test_empty_input() {
        let dist = compute_distribution(&[], TOP_SUBFAMILIES);
        assert_eq!(dist.total_jobs, 0);
        assert!(dist.families.is_empty());
        assert!(dist.top_subfamilies.is_empty());
    }
}
