use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;
use tracing::{debug, info, warn};

use crate::errors::DataAccessError;
use crate::matching::query::SearchFilter;
use crate::models::job::{EntityCounts, JobRow, JobSample, StoreDiagnostics, TaxonomyRow};

/// Read-only access to the external job catalogue.
///
/// Carried in `AppState` as `Arc<dyn JobStore>`.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Runs a search filter and returns the raw rows, nulls preserved.
    async fn fetch_jobs(&self, filter: &SearchFilter) -> Result<Vec<JobRow>, DataAccessError>;

    /// Family / sub-family link of every job that has a sub-family.
    async fn fetch_taxonomy(&self) -> Result<Vec<TaxonomyRow>, DataAccessError>;

    async fn diagnostics(&self) -> Result<StoreDiagnostics, DataAccessError>;
}

/// PostgreSQL-backed store. Every call opens its own connection and closes it
/// before returning; there is no pool.
pub struct PgJobStore {
    options: PgConnectOptions,
}

impl PgJobStore {
    pub fn new(options: PgConnectOptions) -> Self {
        Self { options }
    }

    async fn connect(&self) -> Result<PgConnection, DataAccessError> {
        debug!("Opening job store connection");
        PgConnection::connect_with(&self.options)
            .await
            .map_err(DataAccessError::Connect)
    }
}

async fn close(conn: PgConnection) {
    if let Err(e) = conn.close().await {
        warn!("Failed to close job store connection cleanly: {e}");
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn fetch_jobs(&self, filter: &SearchFilter) -> Result<Vec<JobRow>, DataAccessError> {
        let compiled = filter.compile();
        debug!(sql = %compiled.sql, params = ?compiled.params, "Executing job search");

        let mut conn = self.connect().await?;

        let mut query = sqlx::query_as::<_, JobRow>(&compiled.sql);
        for param in &compiled.params {
            query = query.bind(param.as_str());
        }
        let rows = query.fetch_all(&mut conn).await;

        close(conn).await;
        rows.map_err(DataAccessError::Query)
    }

    async fn fetch_taxonomy(&self) -> Result<Vec<TaxonomyRow>, DataAccessError> {
        let mut conn = self.connect().await?;

        let rows = sqlx::query_as::<_, TaxonomyRow>(
            r#"
            SELECT f.description::text AS family_desc,
                   sf.description::text AS subfamily_desc
            FROM emploi e
            JOIN sous_familles sf ON e.id_sousf = sf.id_sousf
            LEFT JOIN familles f ON sf.id_f = f.id_f
            "#,
        )
        .fetch_all(&mut conn)
        .await;

        close(conn).await;
        rows.map_err(DataAccessError::Query)
    }

    async fn diagnostics(&self) -> Result<StoreDiagnostics, DataAccessError> {
        let mut conn = self.connect().await?;
        let result = collect_diagnostics(&mut conn).await;
        close(conn).await;

        let diagnostics = result.map_err(DataAccessError::Query)?;
        info!(
            "Job store reachable: {} jobs, {} postings, {} sub-families, {} families",
            diagnostics.counts.jobs,
            diagnostics.counts.job_postings,
            diagnostics.counts.subfamilies,
            diagnostics.counts.families
        );
        Ok(diagnostics)
    }
}

async fn collect_diagnostics(conn: &mut PgConnection) -> Result<StoreDiagnostics, sqlx::Error> {
    let db_version: String = sqlx::query_scalar("SELECT version()")
        .fetch_one(&mut *conn)
        .await?;

    let counts = EntityCounts {
        jobs: count_rows(conn, "SELECT COUNT(*) FROM emploi").await?,
        job_postings: count_rows(conn, "SELECT COUNT(*) FROM fiches_poste").await?,
        subfamilies: count_rows(conn, "SELECT COUNT(*) FROM sous_familles").await?,
        families: count_rows(conn, "SELECT COUNT(*) FROM familles").await?,
    };

    let sample_jobs = sqlx::query_as::<_, JobSample>(
        "SELECT intitule::text AS title, code_tiahre::text AS external_code FROM emploi LIMIT 5",
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(StoreDiagnostics {
        db_version,
        counts,
        sample_jobs,
        checked_at: Utc::now(),
    })
}

async fn count_rows(conn: &mut PgConnection, sql: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(sql).fetch_one(&mut *conn).await
}

#[cfg(test)]
pub mod testing {
    //! In-memory `JobStore` that evaluates `SearchFilter`s over fixture rows.

    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::matching::query::{Column, Predicate};

    #[derive(Default)]
    pub struct InMemoryJobStore {
        rows: Vec<JobRow>,
        taxonomy: Vec<TaxonomyRow>,
        unreachable: bool,
        search_calls: AtomicUsize,
    }

    impl InMemoryJobStore {
        pub fn with_rows(rows: Vec<JobRow>) -> Self {
            Self {
                rows,
                ..Self::default()
            }
        }

        pub fn with_taxonomy(taxonomy: Vec<TaxonomyRow>) -> Self {
            Self {
                taxonomy,
                ..Self::default()
            }
        }

        pub fn unreachable() -> Self {
            Self {
                unreachable: true,
                ..Self::default()
            }
        }

        pub fn search_calls(&self) -> usize {
            self.search_calls.load(Ordering::SeqCst)
        }

        fn check_reachable(&self) -> Result<(), DataAccessError> {
            if self.unreachable {
                return Err(DataAccessError::Connect(sqlx::Error::Io(
                    std::io::Error::from(std::io::ErrorKind::ConnectionRefused),
                )));
            }
            Ok(())
        }
    }

    fn column_value(row: &JobRow, column: Column) -> Option<&str> {
        match column {
            Column::JobTitle => row.job_title.as_deref(),
            Column::JobCode => row.job_code.as_deref(),
            Column::PostingTitle => row.posting_title.as_deref(),
            Column::PostingStructureRef => row.structure_ref.as_deref(),
            Column::PostingOrgUnit => row.org_unit_code.as_deref(),
            Column::SubFamilyDescription => row.subfamily_desc.as_deref(),
            Column::FamilyType => row.family_type.as_deref(),
            Column::FamilyDescription => row.family_desc.as_deref(),
            _ => None,
        }
    }

    fn matches(row: &JobRow, predicate: &Predicate) -> bool {
        match predicate {
            Predicate::ILike { column, pattern } => {
                let needle = pattern.trim_matches('%').to_lowercase();
                column_value(row, *column)
                    .map(|value| value.to_lowercase().contains(&needle))
                    .unwrap_or(false)
            }
        }
    }

    #[async_trait]
    impl JobStore for InMemoryJobStore {
        async fn fetch_jobs(&self, filter: &SearchFilter) -> Result<Vec<JobRow>, DataAccessError> {
            self.search_calls.fetch_add(1, Ordering::SeqCst);
            self.check_reachable()?;

            let mut rows: Vec<JobRow> = self
                .rows
                .iter()
                .filter(|row| {
                    filter
                        .groups
                        .iter()
                        .all(|group| group.predicates.iter().any(|p| matches(row, p)))
                })
                .cloned()
                .collect();

            for column in filter.order_by.iter().rev() {
                rows.sort_by(|a, b| column_value(a, *column).cmp(&column_value(b, *column)));
            }
            rows.truncate(filter.limit as usize);
            Ok(rows)
        }

        async fn fetch_taxonomy(&self) -> Result<Vec<TaxonomyRow>, DataAccessError> {
            self.check_reachable()?;
            Ok(self.taxonomy.clone())
        }

        async fn diagnostics(&self) -> Result<StoreDiagnostics, DataAccessError> {
            self.check_reachable()?;
            Ok(StoreDiagnostics {
                db_version: "in-memory".to_string(),
                counts: EntityCounts {
                    jobs: self.rows.len() as i64,
                    ..EntityCounts::default()
                },
                sample_jobs: self
                    .rows
                    .iter()
                    .take(5)
                    .map(|row| JobSample {
                        title: row.job_title.clone(),
                        external_code: row.job_code.clone(),
                    })
                    .collect(),
                checked_at: Utc::now(),
            })
        }
    }
}
