use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::allocation::{
    recommend, run_allocation, simulate_skill_gain, skill_gaps, summarize, AllocationRun,
    AllocationThresholds, MatchSummary, Recommendation, SkillGainResult, SkillGap,
};
use crate::catalog::{provider_from_config, DataProvider, OpportunityFilter};
use crate::config::Config;
use crate::profile::{
    describe_issues, normalize_opportunities, normalize_opportunity, normalize_profile,
    normalize_profiles, validate_profile, Opportunity, OpportunityInput, Profile, ProfileInput,
};
use crate::scoring::{
    rank_candidates, rank_opportunities, score_matrix, MatchResult, MatchScorer, MatchWeights,
    RankedCandidate, RankedMatch,
};

#[derive(Clone)]
pub struct ApiState {
    config: Config,
    scorer: MatchScorer,
    provider: Arc<dyn DataProvider>,
}

impl ApiState {
    pub fn new(config: Config, provider: Arc<dyn DataProvider>) -> Self {
        Self {
            scorer: MatchScorer::new(&config.weights),
            config,
            provider,
        }
    }

    /// Request-level weights win over the configured split.
    fn scorer_for(&self, weights: Option<&MatchWeights>) -> MatchScorer {
        weights.map(MatchScorer::new).unwrap_or(self.scorer)
    }

    fn profiles_or_catalog(
        &self,
        inputs: Option<Vec<ProfileInput>>,
    ) -> std::result::Result<Vec<Profile>, ApiError> {
        match inputs {
            Some(inputs) => Ok(normalize_profiles(inputs)),
            None => self.provider.profiles().map_err(ApiError::internal),
        }
    }

    fn opportunities_or_catalog(
        &self,
        inputs: Option<Vec<OpportunityInput>>,
    ) -> std::result::Result<Vec<Opportunity>, ApiError> {
        match inputs {
            Some(inputs) => Ok(normalize_opportunities(inputs)),
            None => self.provider.opportunities().map_err(ApiError::internal),
        }
    }
}

#[derive(Debug, Serialize)]
struct ApiResponse<T: Serialize> {
    ok: bool,
    data: T,
}

#[derive(Debug, Serialize)]
struct ApiErrorBody {
    ok: bool,
    error: String,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn internal(error: impl std::fmt::Display) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ApiErrorBody {
            ok: false,
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<ApiResponse<T>>, ApiError>;

#[derive(Debug, Clone, Deserialize)]
struct ScoreRequest {
    profile: ProfileInput,
    opportunity: OpportunityInput,
    weights: Option<MatchWeights>,
}

#[derive(Debug, Clone, Deserialize)]
struct RankRequest {
    profile: ProfileInput,
    opportunities: Option<Vec<OpportunityInput>>,
    #[serde(default)]
    filter: OpportunityFilter,
    weights: Option<MatchWeights>,
    #[serde(default = "default_gap_limit")]
    gap_limit: usize,
}

#[derive(Debug, Clone, Deserialize)]
struct CandidatesRequest {
    opportunity: OpportunityInput,
    profiles: Option<Vec<ProfileInput>>,
    weights: Option<MatchWeights>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RecommendRequest {
    profiles: Option<Vec<ProfileInput>>,
    opportunities: Option<Vec<OpportunityInput>>,
    min_score: Option<u8>,
    top: Option<usize>,
    weights: Option<MatchWeights>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct AllocateRequest {
    profiles: Option<Vec<ProfileInput>>,
    opportunities: Option<Vec<OpportunityInput>>,
    thresholds: Option<AllocationThresholds>,
    weights: Option<MatchWeights>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SummaryRequest {
    profiles: Option<Vec<ProfileInput>>,
    opportunities: Option<Vec<OpportunityInput>>,
    weights: Option<MatchWeights>,
}

#[derive(Debug, Clone, Deserialize)]
struct WhatIfRequest {
    profile: ProfileInput,
    skills: Vec<String>,
    opportunities: Option<Vec<OpportunityInput>>,
    weights: Option<MatchWeights>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Debug, Serialize)]
struct CatalogResponse {
    source: String,
    profiles: Vec<Profile>,
    opportunities: Vec<Opportunity>,
}

#[derive(Debug, Serialize)]
struct RankResponse {
    profile_id: String,
    matches: Vec<RankedMatch>,
    skill_gaps: Vec<SkillGap>,
}

#[derive(Debug, Serialize)]
struct CandidatesResponse {
    opportunity_id: String,
    candidates: Vec<RankedCandidate>,
}

#[derive(Debug, Serialize)]
struct RecommendResponse {
    recommendations: Vec<Recommendation>,
}

pub fn router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/v1/config", get(show_config))
        .route("/v1/catalog", get(catalog))
        .route("/v1/score", post(score_pair))
        .route("/v1/rank", post(rank))
        .route("/v1/candidates", post(candidates))
        .route("/v1/recommend", post(recommendations))
        .route("/v1/allocate", post(allocate))
        .route("/v1/summary", post(summary))
        .route("/v1/whatif", post(whatif))
        .layer(cors)
        .with_state(state)
}

pub async fn run_server(config: Config, bind: SocketAddr) -> Result<()> {
    let provider = provider_from_config(&config.catalog)?;
    let app = router(ApiState::new(config, provider));

    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("REST API listening on http://{bind}");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> Json<ApiResponse<HealthResponse>> {
    ok(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn show_config(State(state): State<ApiState>) -> Json<ApiResponse<Config>> {
    ok(state.config)
}

async fn catalog(State(state): State<ApiState>) -> ApiResult<CatalogResponse> {
    Ok(ok(CatalogResponse {
        source: state.provider.name().to_string(),
        profiles: state.provider.profiles().map_err(ApiError::internal)?,
        opportunities: state.provider.opportunities().map_err(ApiError::internal)?,
    }))
}

async fn score_pair(
    State(state): State<ApiState>,
    Json(request): Json<ScoreRequest>,
) -> ApiResult<MatchResult> {
    let profile = normalize_profile(request.profile, 0);
    let opportunity = normalize_opportunity(request.opportunity, 0);
    let scorer = state.scorer_for(request.weights.as_ref());
    Ok(ok(scorer.score(&profile, &opportunity)))
}

async fn rank(
    State(state): State<ApiState>,
    Json(request): Json<RankRequest>,
) -> ApiResult<RankResponse> {
    let profile = normalize_profile(request.profile, 0);
    validate_profile(&profile).map_err(|issues| ApiError::bad_request(describe_issues(&issues)))?;

    let opportunities = request.filter.apply(&state.opportunities_or_catalog(request.opportunities)?);
    let scorer = state.scorer_for(request.weights.as_ref());
    let ranked = rank_opportunities(&scorer, &profile, &opportunities);
    let gaps = skill_gaps(&ranked, request.gap_limit);
    let matches = request.filter.apply_min_score(ranked);

    Ok(ok(RankResponse {
        profile_id: profile.id,
        matches,
        skill_gaps: gaps,
    }))
}

async fn candidates(
    State(state): State<ApiState>,
    Json(request): Json<CandidatesRequest>,
) -> ApiResult<CandidatesResponse> {
    let opportunity = normalize_opportunity(request.opportunity, 0);
    let profiles = state.profiles_or_catalog(request.profiles)?;
    let scorer = state.scorer_for(request.weights.as_ref());
    Ok(ok(CandidatesResponse {
        candidates: rank_candidates(&scorer, &opportunity, &profiles),
        opportunity_id: opportunity.id,
    }))
}

async fn recommendations(
    State(state): State<ApiState>,
    Json(request): Json<RecommendRequest>,
) -> ApiResult<RecommendResponse> {
    let profiles = state.profiles_or_catalog(request.profiles)?;
    let opportunities = state.opportunities_or_catalog(request.opportunities)?;
    let scorer = state.scorer_for(request.weights.as_ref());
    let min_score = request.min_score.unwrap_or(state.config.ranking.min_score);
    let top = request.top.unwrap_or(state.config.ranking.top).max(1);
    Ok(ok(RecommendResponse {
        recommendations: recommend(&scorer, &profiles, &opportunities, min_score, top),
    }))
}

async fn allocate(
    State(state): State<ApiState>,
    Json(request): Json<AllocateRequest>,
) -> ApiResult<AllocationRun> {
    let profiles = state.profiles_or_catalog(request.profiles)?;
    let opportunities = state.opportunities_or_catalog(request.opportunities)?;
    let scorer = state.scorer_for(request.weights.as_ref());
    let thresholds = request.thresholds.unwrap_or_else(|| state.config.thresholds());
    if thresholds.waitlist > thresholds.pending {
        return Err(ApiError::bad_request(
            "waitlist threshold cannot exceed pending threshold",
        ));
    }
    Ok(ok(run_allocation(
        &scorer,
        &profiles,
        &opportunities,
        thresholds,
    )))
}

async fn summary(
    State(state): State<ApiState>,
    Json(request): Json<SummaryRequest>,
) -> ApiResult<MatchSummary> {
    let profiles = state.profiles_or_catalog(request.profiles)?;
    let opportunities = state.opportunities_or_catalog(request.opportunities)?;
    let scorer = state.scorer_for(request.weights.as_ref());
    let matrix = score_matrix(&scorer, &profiles, &opportunities);
    Ok(ok(summarize(&matrix)))
}

async fn whatif(
    State(state): State<ApiState>,
    Json(request): Json<WhatIfRequest>,
) -> ApiResult<SkillGainResult> {
    if request.skills.iter().all(|s| s.trim().is_empty()) {
        return Err(ApiError::bad_request("at least one skill is required"));
    }
    let profile = normalize_profile(request.profile, 0);
    let opportunities = state.opportunities_or_catalog(request.opportunities)?;
    let scorer = state.scorer_for(request.weights.as_ref());
    Ok(ok(simulate_skill_gain(
        &scorer,
        &profile,
        &opportunities,
        &request.skills,
    )))
}

fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse { ok: true, data })
}

fn default_gap_limit() -> usize {
    5
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::catalog::BuiltinCatalog;

    fn app() -> Router {
        let provider = BuiltinCatalog::load().expect("builtin catalog");
        router(ApiState::new(Config::default(), Arc::new(provider)))
    }

    fn call(request: Request<Body>) -> (StatusCode, Value) {
        tokio_test::block_on(async {
            let response = app().oneshot(request).await.expect("router dispatch");
            let status = response.status();
            let body = to_bytes(response.into_body(), 1024 * 1024)
                .await
                .expect("body");
            let payload: Value = serde_json::from_slice(&body).expect("json");
            (status, payload)
        })
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .expect("request")
    }

    #[test]
    fn health_reports_ok() {
        let (status, payload) = call(get("/health"));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["ok"], true);
        assert_eq!(payload["data"]["status"], "ok");
    }

    #[test]
    fn catalog_lists_builtin_data() {
        let (status, payload) = call(get("/v1/catalog"));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["data"]["source"], "builtin");
        assert_eq!(payload["data"]["opportunities"].as_array().map(Vec::len), Some(13));
    }

    #[test]
    fn score_accepts_dashboard_shapes() {
        let (status, payload) = call(post_json(
            "/v1/score",
            json!({
                "profile": {
                    "name": "Arjun",
                    "skills": ["React", "JavaScript"],
                    "cgpa": 8.2,
                    "preferences": {
                        "location": ["Bangalore", "Remote"],
                        "domains": ["Frontend Development"]
                    }
                },
                "opportunity": {
                    "requirements": {
                        "skills": ["React", "JavaScript", "HTML", "CSS", "TypeScript"],
                        "minCgpa": 7.0
                    },
                    "location": "Bangalore, India",
                    "isRemote": false,
                    "domain": "Frontend Development"
                }
            }),
        ));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["data"]["score"], 70);
        assert_eq!(payload["data"]["reasons"].as_array().map(Vec::len), Some(4));
    }

    #[test]
    fn rank_rejects_incomplete_profiles() {
        let (status, payload) = call(post_json(
            "/v1/rank",
            json!({ "profile": { "name": "", "skills": [] } }),
        ));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(payload["ok"], false);
        assert!(payload["error"]
            .as_str()
            .unwrap_or_default()
            .contains("profile name is required"));
    }

    #[test]
    fn rank_filters_remote_roles() {
        let (status, payload) = call(post_json(
            "/v1/rank",
            json!({
                "profile": { "name": "Sneha", "skills": ["React", "Node.js"], "cgpa": 8.4 },
                "filter": { "remote_only": true }
            }),
        ));
        assert_eq!(status, StatusCode::OK);
        let matches = payload["data"]["matches"].as_array().cloned().unwrap_or_default();
        assert!(!matches.is_empty());
        assert_eq!(matches[0]["position"], 1);
        assert!(payload["data"]["skill_gaps"].is_array());
    }

    #[test]
    fn allocate_rejects_inverted_thresholds() {
        let (status, _) = call(post_json(
            "/v1/allocate",
            json!({ "thresholds": { "pending": 40, "waitlist": 60 } }),
        ));
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn recommend_uses_catalog_by_default() {
        let (status, payload) = call(post_json("/v1/recommend", json!({})));
        assert_eq!(status, StatusCode::OK);
        let recs = payload["data"]["recommendations"]
            .as_array()
            .cloned()
            .unwrap_or_default();
        assert!(!recs.is_empty() && recs.len() <= 5);
        assert!(recs.iter().all(|r| r["match_score"].as_u64().unwrap_or(0) >= 40));
    }

    #[test]
    fn summary_counts_every_pair() {
        let (status, payload) = call(post_json("/v1/summary", json!({})));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["data"]["pairs_scored"], 65);
    }

    #[test]
    fn whatif_requires_skills() {
        let (status, _) = call(post_json(
            "/v1/whatif",
            json!({ "profile": { "name": "A" }, "skills": [" "] }),
        ));
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
