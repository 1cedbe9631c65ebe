//! Axum route handlers for job search: the HTML form page and the JSON API.

use askama::Template;
use anyhow::anyhow;
use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection},
        State,
    },
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use serde::Serialize;
use tracing::{error, warn};

use crate::errors::AppError;
use crate::matching::matcher::{SearchOutcome, SearchRequest};
use crate::models::job::MatchResult;
use crate::state::AppState;

const UNAVAILABLE_MESSAGE: &str =
    "The job catalogue is currently unavailable. Please try again later.";
const FAILURE_MESSAGE: &str = "An error occurred during the search. Please try again.";
const INVALID_FORM_MESSAGE: &str = "The search form could not be read. Please try again.";

// ────────────────────────────────────────────────────────────────────────────
// Page / response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Template, Default)]
#[template(path = "index.html")]
pub struct IndexPage {
    /// `None` before any search; `Some` (possibly empty) afterwards.
    pub jobs: Option<Vec<MatchResult>>,
    pub error: Option<String>,
    pub skills: String,
    pub desired_role: String,
    pub search_performed: bool,
}

impl IndexPage {
    fn failed(request: &SearchRequest, message: impl Into<String>) -> Self {
        Self {
            jobs: Some(Vec::new()),
            error: Some(message.into()),
            skills: request.skills.clone(),
            desired_role: request.desired_role.clone().unwrap_or_default(),
            search_performed: false,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub count: usize,
    pub jobs: Vec<MatchResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// Runs the search on its own task so a panic anywhere in the pipeline
/// surfaces as `AppError::Internal` instead of dropping the connection.
async fn run_search(state: &AppState, request: SearchRequest) -> Result<SearchOutcome, AppError> {
    let matcher = state.matcher.clone();
    tokio::spawn(async move { matcher.search(&request).await })
        .await
        .map_err(|e| AppError::Internal(anyhow!("search task failed: {e}")))?
}

/// GET /
pub async fn handle_index() -> Result<Html<String>, AppError> {
    Ok(Html(IndexPage::default().render()?))
}

/// POST /
///
/// Form search. Every failure renders the page with a message and no results.
pub async fn handle_search_form(
    State(state): State<AppState>,
    form: Result<Form<SearchRequest>, FormRejection>,
) -> Result<Html<String>, AppError> {
    let request = match form {
        Ok(Form(request)) => request,
        Err(rejection) => {
            warn!("Rejected search form: {}", rejection.body_text());
            let page = IndexPage::failed(&SearchRequest::default(), INVALID_FORM_MESSAGE);
            return Ok(Html(page.render()?));
        }
    };

    let page = match run_search(&state, request.clone()).await {
        Ok(outcome) if outcome.degraded => IndexPage::failed(&request, UNAVAILABLE_MESSAGE),
        Ok(outcome) => IndexPage {
            jobs: Some(outcome.jobs),
            error: None,
            skills: request.skills.trim().to_string(),
            desired_role: request
                .desired_role
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
            search_performed: true,
        },
        Err(AppError::Validation(message)) => IndexPage::failed(&request, message),
        Err(e) => {
            error!("Search failed: {e}");
            IndexPage::failed(&request, FAILURE_MESSAGE)
        }
    };

    Ok(Html(page.render()?))
}

/// POST /api/search
///
/// JSON search. A store outage yields `success: false` with an empty job list.
pub async fn handle_api_search(
    State(state): State<AppState>,
    body: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, AppError> {
    let Json(request) = body.map_err(|rejection| {
        AppError::Validation(format!("Invalid search request: {}", rejection.body_text()))
    })?;
    let outcome = run_search(&state, request).await?;

    let response = if outcome.degraded {
        SearchResponse {
            success: false,
            count: 0,
            jobs: Vec::new(),
            message: Some(UNAVAILABLE_MESSAGE.to_string()),
        }
    } else {
        SearchResponse {
            success: true,
            count: outcome.jobs.len(),
            jobs: outcome.jobs,
            message: None,
        }
    };

    Ok(Json(response))
}

/// Fallback for unknown paths: the search page carrying the not-found message and status.
pub async fn handle_not_found() -> Response {
    let not_found = AppError::NotFound("Page not found".to_string());
    let page = IndexPage {
        error: Some(not_found.public_message()),
        ..IndexPage::default()
    };
    match page.render() {
        Ok(html) => (not_found.status(), Html(html)).into_response(),
        Err(e) => AppError::from(e).into_response(),
    }
}
