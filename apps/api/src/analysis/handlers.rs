//! Axum route handlers for the Analysis API.

use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::{JsonRejection, QueryRejection},
        Multipart, Query, State,
    },
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::engine::{JobTarget, MatchResult, PreparedTarget, ScoringMode};
use crate::analysis::export::{export_rows, to_csv, ExportColumns};
use crate::analysis::pipeline::{analyze_document, rank_documents, rank_texts, CandidateDocument};
use crate::analysis::ranking::RankingEntry;
use crate::catalog::{FallbackPolicy, RoleProfile};
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalyzeTextRequest {
    pub candidate_id: Option<String>,
    pub resume_text: String,
    #[serde(flatten)]
    pub target: JobTarget,
}

#[derive(Debug, Deserialize)]
pub struct CandidateText {
    pub candidate_id: String,
    pub resume_text: String,
}

#[derive(Debug, Deserialize)]
pub struct RankTextRequest {
    pub candidates: Vec<CandidateText>,
    #[serde(flatten)]
    pub target: JobTarget,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

#[derive(Debug, Default, Deserialize)]
pub struct RankQuery {
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default)]
    pub columns: ExportColumns,
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub analysis_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub result: MatchResult,
}

#[derive(Debug, Serialize)]
pub struct RankingResponse {
    pub analysis_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub mode: ScoringMode,
    pub matched_role: Option<String>,
    pub required_skills: Vec<String>,
    pub rankings: Vec<RankingEntry>,
}

#[derive(Debug, Serialize)]
pub struct RolesResponse {
    pub roles: Vec<RoleProfile>,
    pub fallback_policy: FallbackPolicy,
}

/// Fields collected from a multipart upload.
#[derive(Debug, Default)]
struct Upload {
    target: JobTarget,
    candidate_id: Option<String>,
    documents: Vec<CandidateDocument>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/roles
///
/// Lists catalog roles in resolution order.
pub async fn handle_list_roles(State(state): State<AppState>) -> Json<RolesResponse> {
    Json(RolesResponse {
        roles: state.engine.catalog().roles().to_vec(),
        fallback_policy: state.config.role_fallback,
    })
}

/// POST /api/v1/analyze
///
/// Multipart: one `resume` file plus `job_title` / `job_description` / `mode`.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let mut upload = read_upload(multipart?).await?;
    if upload.documents.len() != 1 {
        return Err(AppError::Validation(
            "exactly one 'resume' file is required".to_string(),
        ));
    }

    let target = state.engine.prepare(&upload.target)?;
    let mut document = upload.documents.remove(0);
    if let Some(candidate_id) = upload.candidate_id {
        document.candidate_id = candidate_id;
    }

    let result =
        analyze_document(&state.engine, state.extractor.as_ref(), document, &target).await;

    Ok(Json(analysis_response(result)))
}

/// POST /api/v1/analyze/text
///
/// JSON variant of `/analyze` for already-extracted résumé text.
pub async fn handle_analyze_text(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeTextRequest>, JsonRejection>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let Json(request) = payload?;
    let target = state.engine.prepare(&request.target)?;
    let candidate_id = request
        .candidate_id
        .unwrap_or_else(|| "candidate-1".to_string());

    let result = state
        .engine
        .evaluate(&candidate_id, &request.resume_text, &target);

    Ok(Json(analysis_response(result)))
}

/// POST /api/v1/rank
///
/// Multipart: repeated `resume` files plus the target fields. `?format=csv` for export.
pub async fn handle_rank(
    State(state): State<AppState>,
    query: Result<Query<RankQuery>, QueryRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, AppError> {
    let Query(query) = query?;
    let upload = read_upload(multipart?).await?;
    if upload.documents.is_empty() {
        return Err(AppError::Validation(
            "at least one 'resume' file is required".to_string(),
        ));
    }

    let target = state.engine.prepare(&upload.target)?;
    let rankings = rank_documents(
        &state.engine,
        state.extractor.as_ref(),
        upload.documents,
        &target,
    )
    .await;

    Ok(ranking_output(&target, rankings, &query))
}

/// POST /api/v1/rank/text
///
/// JSON variant of `/rank`.
pub async fn handle_rank_text(
    State(state): State<AppState>,
    query: Result<Query<RankQuery>, QueryRejection>,
    payload: Result<Json<RankTextRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Query(query) = query?;
    let Json(request) = payload?;
    if request.candidates.is_empty() {
        return Err(AppError::Validation(
            "candidates cannot be empty".to_string(),
        ));
    }

    let target = state.engine.prepare(&request.target)?;
    let candidates: Vec<(String, String)> = request
        .candidates
        .into_iter()
        .map(|c| (c.candidate_id, c.resume_text))
        .collect();
    let rankings = rank_texts(&state.engine, &candidates, &target);

    Ok(ranking_output(&target, rankings, &query))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn analysis_response(result: MatchResult) -> AnalysisResponse {
    AnalysisResponse {
        analysis_id: Uuid::new_v4(),
        analyzed_at: Utc::now(),
        result,
    }
}

fn ranking_output(target: &PreparedTarget, rankings: Vec<RankingEntry>, query: &RankQuery) -> Response {
    match query.format {
        OutputFormat::Csv => {
            let csv = to_csv(&export_rows(&rankings, query.columns), query.columns);
            (
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                    (
                        header::CONTENT_DISPOSITION,
                        "attachment; filename=\"ranking.csv\"",
                    ),
                ],
                csv,
            )
                .into_response()
        }
        OutputFormat::Json => Json(RankingResponse {
            analysis_id: Uuid::new_v4(),
            analyzed_at: Utc::now(),
            mode: target.mode,
            matched_role: target.resolved.matched_role.clone(),
            required_skills: target.resolved.required_skills.clone(),
            rankings,
        })
        .into_response(),
    }
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload, AppError> {
    let mut upload = Upload::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                let candidate_id = field
                    .file_name()
                    .filter(|f| !f.trim().is_empty())
                    .map(String::from)
                    .unwrap_or_else(|| format!("candidate-{}", upload.documents.len() + 1));
                let content = field.bytes().await?;
                upload.documents.push(CandidateDocument {
                    candidate_id,
                    content,
                });
            }
            "job_title" => upload.target.job_title = Some(field.text().await?),
            "job_description" => upload.target.job_description = Some(field.text().await?),
            "candidate_id" => upload.candidate_id = Some(field.text().await?),
            "mode" => {
                let raw = field.text().await?;
                if !raw.trim().is_empty() {
                    upload.target.mode =
                        Some(raw.parse::<ScoringMode>().map_err(AppError::Validation)?);
                }
            }
            other => tracing::debug!(field = other, "Ignoring unknown multipart field"),
        }
    }

    Ok(upload)
}
