//! Query Builder — structured search filter over the denormalized job record set.
//!
//! `build_search_filter` produces a `SearchFilter` value (joins + predicate groups +
//! ordering + cap). `SearchFilter::compile` turns it into parameterized Postgres SQL.
//! Nothing here touches a connection, so query construction is testable offline.

use crate::matching::normalize::SearchTerms;

/// Default row cap for a search.
pub const DEFAULT_RESULT_LIMIT: u32 = 50;

// ────────────────────────────────────────────────────────────────────────────
// Schema descriptors
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Job,
    JobPosting,
    SubFamily,
    Family,
}

impl Table {
    pub fn name(self) -> &'static str {
        match self {
            Table::Job => "emploi",
            Table::JobPosting => "fiches_poste",
            Table::SubFamily => "sous_familles",
            Table::Family => "familles",
        }
    }

    pub fn alias(self) -> &'static str {
        match self {
            Table::Job => "e",
            Table::JobPosting => "fp",
            Table::SubFamily => "sf",
            Table::Family => "f",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    JobTitle,
    JobCode,
    JobSubFamilyId,
    PostingTitle,
    PostingCode,
    PostingStructureRef,
    PostingOrgUnit,
    SubFamilyId,
    SubFamilyFamilyId,
    SubFamilyDescription,
    FamilyId,
    FamilyType,
    FamilyDescription,
}

impl Column {
    pub fn table(self) -> Table {
        match self {
            Column::JobTitle | Column::JobCode | Column::JobSubFamilyId => Table::Job,
            Column::PostingTitle
            | Column::PostingCode
            | Column::PostingStructureRef
            | Column::PostingOrgUnit => Table::JobPosting,
            Column::SubFamilyId | Column::SubFamilyFamilyId | Column::SubFamilyDescription => {
                Table::SubFamily
            }
            Column::FamilyId | Column::FamilyType | Column::FamilyDescription => Table::Family,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Column::JobTitle | Column::PostingTitle => "intitule",
            Column::JobCode | Column::PostingCode => "code_tiahre",
            Column::JobSubFamilyId | Column::SubFamilyId => "id_sousf",
            Column::PostingStructureRef => "structure_ref",
            Column::PostingOrgUnit => "code_uo",
            Column::SubFamilyFamilyId | Column::FamilyId => "id_f",
            Column::SubFamilyDescription | Column::FamilyDescription => "description",
            Column::FamilyType => "type_f",
        }
    }

    /// `alias.column`, e.g. `fp.intitule`.
    pub fn qualified(self) -> String {
        format!("{}.{}", self.table().alias(), self.name())
    }
}

/// Projected columns of a search, in order, with the output alias each maps to.
/// Aliases match the fields of `JobRow`.
pub const SEARCH_PROJECTION: [(Column, &str); 8] = [
    (Column::JobTitle, "job_title"),
    (Column::JobCode, "job_code"),
    (Column::PostingTitle, "posting_title"),
    (Column::PostingStructureRef, "structure_ref"),
    (Column::PostingOrgUnit, "org_unit_code"),
    (Column::SubFamilyDescription, "subfamily_desc"),
    (Column::FamilyType, "family_type"),
    (Column::FamilyDescription, "family_desc"),
];

const SKILLS_COLUMNS: [Column; 5] = [
    Column::JobTitle,
    Column::PostingTitle,
    Column::SubFamilyDescription,
    Column::FamilyType,
    Column::FamilyDescription,
];

const DESIRED_ROLE_COLUMNS: [Column; 2] = [Column::JobTitle, Column::PostingTitle];

// ────────────────────────────────────────────────────────────────────────────
// Filter value
// ────────────────────────────────────────────────────────────────────────────

/// `LEFT JOIN table ON left = right`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    pub table: Table,
    pub left: Column,
    pub right: Column,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Case-insensitive pattern match (`ILIKE`).
    ILike { column: Column, pattern: String },
}

/// Predicates OR'd together. Groups within a filter are AND'd.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredicateGroup {
    pub predicates: Vec<Predicate>,
}

impl PredicateGroup {
    fn contains_term(columns: &[Column], term: &str) -> Self {
        let pattern = format!("%{term}%");
        Self {
            predicates: columns
                .iter()
                .map(|&column| Predicate::ILike {
                    column,
                    pattern: pattern.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter {
    pub base: Table,
    pub joins: Vec<Join>,
    pub groups: Vec<PredicateGroup>,
    /// Sort keys, all ascending.
    pub order_by: Vec<Column>,
    pub limit: u32,
}

/// Parameterized SQL ready to be bound, params in placeholder order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledQuery {
    pub sql: String,
    pub params: Vec<String>,
}

/// Builds the search filter for normalized terms.
///
/// The skills group is only added when the skills term is non-empty; callers
/// reject empty skills before getting here.
pub fn build_search_filter(terms: &SearchTerms, limit: u32) -> SearchFilter {
    let mut groups = Vec::new();

    if terms.has_skills() {
        groups.push(PredicateGroup::contains_term(&SKILLS_COLUMNS, &terms.skills));
    }
    if let Some(role) = terms.desired_role.as_deref().filter(|r| !r.is_empty()) {
        groups.push(PredicateGroup::contains_term(&DESIRED_ROLE_COLUMNS, role));
    }

    SearchFilter {
        base: Table::Job,
        joins: vec![
            Join {
                table: Table::JobPosting,
                left: Column::JobCode,
                right: Column::PostingCode,
            },
            Join {
                table: Table::SubFamily,
                left: Column::JobSubFamilyId,
                right: Column::SubFamilyId,
            },
            Join {
                table: Table::Family,
                left: Column::SubFamilyFamilyId,
                right: Column::FamilyId,
            },
        ],
        groups,
        order_by: vec![Column::JobTitle],
        limit,
    }
}

impl SearchFilter {
    /// Compiles to Postgres SQL with `$n` placeholders.
    /// Projected columns are cast to text so every value decodes as `Option<String>`.
    pub fn compile(&self) -> CompiledQuery {
        let mut sql = String::from("SELECT DISTINCT ");
        let projection: Vec<String> = SEARCH_PROJECTION
            .iter()
            .map(|(column, alias)| format!("{}::text AS {alias}", column.qualified()))
            .collect();
        sql.push_str(&projection.join(", "));

        sql.push_str(&format!(" FROM {} {}", self.base.name(), self.base.alias()));
        for join in &self.joins {
            sql.push_str(&format!(
                " LEFT JOIN {} {} ON {} = {}",
                join.table.name(),
                join.table.alias(),
                join.left.qualified(),
                join.right.qualified()
            ));
        }

        let mut params = Vec::new();
        let clauses: Vec<String> = self
            .groups
            .iter()
            .filter(|group| !group.predicates.is_empty())
            .map(|group| {
                let conditions: Vec<String> = group
                    .predicates
                    .iter()
                    .map(|predicate| match predicate {
                        Predicate::ILike { column, pattern } => {
                            params.push(pattern.clone());
                            format!("{} ILIKE ${}", column.qualified(), params.len())
                        }
                    })
                    .collect();
                format!("({})", conditions.join(" OR "))
            })
            .collect();
        if !clauses.is_empty() {
            sql.push_str(&format!(" WHERE {}", clauses.join(" AND ")));
        }

        if !self.order_by.is_empty() {
            let order: Vec<String> = self
                .order_by
                .iter()
                .map(|column| {
                    // DISTINCT requires ORDER BY expressions to appear in the select list.
                    let alias = SEARCH_PROJECTION
                        .iter()
                        .find(|(c, _)| c == column)
                        .map(|(_, alias)| alias.to_string())
                        .unwrap_or_else(|| column.qualified());
                    format!("{alias} ASC")
                })
                .collect();
            sql.push_str(&format!(" ORDER BY {}", order.join(", ")));
        }

        sql.push_str(&format!(" LIMIT {}", self.limit));

        CompiledQuery { sql, params }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(skills: &str, role: Option<&str>) -> SearchTerms {
        SearchTerms::from_raw(skills, role)
    }

    #[test]
    fn test_skills_only_builds_single_group_over_five_columns() {
        let filter = build_search_filter(&terms("python", None), DEFAULT_RESULT_LIMIT);
        assert_eq!(filter.groups.len(), 1);
        let columns: Vec<Column> = filter.groups[0]
            .predicates
            .iter()
            .map(|Predicate::ILike { column, .. }| *column)
            .collect();
        assert_eq!(columns, SKILLS_COLUMNS.to_vec());
        assert!(filter.groups[0]
            .predicates
            .iter()
            .all(|Predicate::ILike { pattern, .. }| pattern == "%python%"));
    }

    #[test]
    fn test_desired_role_adds_second_group_on_titles() {
        let filter = build_search_filter(&terms("sql", Some("Data Analyst")), 50);
        assert_eq!(filter.groups.len(), 2);
        let role_group = &filter.groups[1];
        assert_eq!(role_group.predicates.len(), 2);
        assert_eq!(
            role_group.predicates[0],
            Predicate::ILike {
                column: Column::JobTitle,
                pattern: "%data analyst%".to_string()
            }
        );
        assert_eq!(
            role_group.predicates[1],
            Predicate::ILike {
                column: Column::PostingTitle,
                pattern: "%data analyst%".to_string()
            }
        );
    }

    #[test]
    fn test_joins_are_left_joins_in_chain_order() {
        let filter = build_search_filter(&terms("rh", None), 50);
        let tables: Vec<Table> = filter.joins.iter().map(|j| j.table).collect();
        assert_eq!(
            tables,
            vec![Table::JobPosting, Table::SubFamily, Table::Family]
        );
        assert_eq!(filter.joins[0].left, Column::JobCode);
        assert_eq!(filter.joins[0].right, Column::PostingCode);
        assert_eq!(filter.base, Table::Job);
    }

    #[test]
    fn test_order_and_limit() {
        let filter = build_search_filter(&terms("rh", None), 50);
        assert_eq!(filter.order_by, vec![Column::JobTitle]);
        assert_eq!(filter.limit, 50);
    }

    #[test]
    fn test_compile_groups_and_placeholders() {
        let compiled = build_search_filter(&terms("python", Some("dev")), 50).compile();

        assert_eq!(compiled.params.len(), 7);
        assert!(compiled.params[..5].iter().all(|p| p == "%python%"));
        assert!(compiled.params[5..].iter().all(|p| p == "%dev%"));

        assert!(compiled.sql.contains(
            "WHERE (e.intitule ILIKE $1 OR fp.intitule ILIKE $2 OR sf.description ILIKE $3 \
             OR f.type_f ILIKE $4 OR f.description ILIKE $5) \
             AND (e.intitule ILIKE $6 OR fp.intitule ILIKE $7)"
        ));
        assert!(compiled.sql.ends_with("ORDER BY job_title ASC LIMIT 50"));
    }

    #[test]
    fn test_compile_join_clauses() {
        let compiled = build_search_filter(&terms("python", None), 50).compile();
        assert!(compiled.sql.contains(
            "FROM emploi e \
             LEFT JOIN fiches_poste fp ON e.code_tiahre = fp.code_tiahre \
             LEFT JOIN sous_familles sf ON e.id_sousf = sf.id_sousf \
             LEFT JOIN familles f ON sf.id_f = f.id_f"
        ));
        assert!(compiled.sql.starts_with("SELECT DISTINCT e.intitule::text AS job_title"));
    }

    #[test]
    fn test_terms_never_inlined_in_sql() {
        let compiled = build_search_filter(&terms("drop table", None), 50).compile();
        assert!(!compiled.sql.contains("drop table"));
        assert_eq!(compiled.params[0], "%drop table%");
    }

    #[test]
    fn test_no_groups_compiles_without_where() {
        let filter = build_search_filter(&terms("", None), 10);
        assert!(filter.groups.is_empty());
        let compiled = filter.compile();
        assert!(!compiled.sql.contains("WHERE"));
        assert!(compiled.params.is_empty());
        assert!(compiled.sql.ends_with("LIMIT 10"));
    }
}
