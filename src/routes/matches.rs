use crate::core::resolver::{MatchResolver, ProfileAccessor, StoreError, SwipeError};
use crate::core::teams::TeamBuilder;
use crate::models::{
    CandidateFilter, ErrorResponse, HealthResponse, Profile, RecordSwipeRequest,
    RecordSwipeResponse, ScoreRequest, ScoreResponse, SuggestTeamsRequest, SuggestTeamsResponse,
    SwipeHistoryQuery, SwipeHistoryResponse,
};
use crate::services::{PgStore, ProfileCache};
use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub profiles: Arc<dyn ProfileAccessor>,
    pub resolver: MatchResolver,
    pub teams: TeamBuilder,
    pub cache: Option<Arc<ProfileCache>>,
    /// Present when the durable stores are Postgres-backed; used by the
    /// health probe.
    pub postgres: Option<Arc<PgStore>>,
    /// How many candidates to pull from the directory per team request.
    pub candidate_pool_limit: usize,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/compatibility/score", web::post().to(score_pair))
        .route("/teams/suggest", web::post().to(suggest_teams))
        .route("/swipes", web::post().to(record_swipe))
        .route("/swipes/history", web::get().to(swipe_history));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = match &state.postgres {
        Some(pg) => pg.health_check().await.unwrap_or(false),
        None => true,
    };

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Compatibility score endpoint
///
/// POST /api/v1/compatibility/score
///
/// Request body:
/// ```json
/// {
///   "requesterId": "string",
///   "candidateId": "string",
///   "matchType": "mentor|mentee|cofounder|teammate"
/// }
/// ```
async fn score_pair(state: web::Data<AppState>, req: web::Json<ScoreRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    let requester = match load_profile(&state, &req.requester_id).await {
        Ok(profile) => profile,
        Err(e) => return store_error_response(&req.requester_id, e),
    };
    let candidate = match load_profile(&state, &req.candidate_id).await {
        Ok(profile) => profile,
        Err(e) => return store_error_response(&req.candidate_id, e),
    };

    let score = crate::core::scoring::score(&requester, &candidate, req.match_type);

    tracing::debug!(
        "Scored {} vs {} ({:?}): {}",
        req.requester_id,
        req.candidate_id,
        req.match_type,
        score.total
    );

    HttpResponse::Ok().json(ScoreResponse {
        requester_id: req.requester_id.clone(),
        candidate_id: req.candidate_id.clone(),
        score,
    })
}

/// Team suggestion endpoint
///
/// POST /api/v1/teams/suggest
///
/// Request body:
/// ```json
/// {
///   "requesterId": "string",
///   "requiredSkills": ["string"],
///   "teamSize": 3,
///   "matchType": "teammate"
/// }
/// ```
async fn suggest_teams(
    state: web::Data<AppState>,
    req: web::Json<SuggestTeamsRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    let requester = match load_profile(&state, &req.requester_id).await {
        Ok(profile) => profile,
        Err(e) => return store_error_response(&req.requester_id, e),
    };

    let filter = CandidateFilter {
        seeking: req.match_type.complementary(),
        exclude_user_ids: vec![req.requester_id.clone()],
        limit: state.candidate_pool_limit,
    };
    let candidates = match state.profiles.list_candidates(&filter).await {
        Ok(candidates) => candidates,
        Err(e) => {
            tracing::error!("Failed to list candidates for {}: {}", req.requester_id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to list candidates".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    tracing::debug!(
        "Team search for {}: {} candidates in pool",
        req.requester_id,
        candidates.len()
    );

    let result = state.teams.suggest_teams(
        &requester,
        candidates,
        &req.required_skills,
        req.team_size,
        req.match_type,
    );

    HttpResponse::Ok().json(SuggestTeamsResponse {
        suggestions: result.suggestions,
        candidates_considered: result.candidates_considered,
    })
}

/// Record swipe endpoint
///
/// POST /api/v1/swipes
///
/// Request body:
/// ```json
/// {
///   "actorId": "string",
///   "targetId": "string",
///   "action": "like|pass|super_like",
///   "matchType": "mentor|mentee|cofounder|teammate"
/// }
/// ```
async fn record_swipe(
    state: web::Data<AppState>,
    req: web::Json<RecordSwipeRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    match state
        .resolver
        .record_swipe(&req.actor_id, &req.target_id, req.action, req.match_type)
        .await
    {
        Ok(outcome) => HttpResponse::Ok().json(RecordSwipeResponse {
            swipe_id: outcome.swipe_id,
            matched: outcome.matched,
            match_id: outcome.match_id,
        }),
        Err(e) => swipe_error_response(e),
    }
}

/// Swipe history endpoint
///
/// GET /api/v1/swipes/history?userId={userId}&matchType={matchType}
///
/// Returns the user's full swipe history, newest first, for client-side
/// synchronization and audit.
async fn swipe_history(
    state: web::Data<AppState>,
    query: web::Query<SwipeHistoryQuery>,
) -> impl Responder {
    match state
        .resolver
        .swipe_history(&query.user_id, query.match_type)
        .await
    {
        Ok(swipes) => HttpResponse::Ok().json(SwipeHistoryResponse {
            user_id: query.user_id.clone(),
            count: swipes.len(),
            swipes,
        }),
        Err(e) => swipe_error_response(e),
    }
}

/// Fetch a profile, going through the snapshot cache when configured
async fn load_profile(state: &AppState, user_id: &str) -> Result<Profile, StoreError> {
    if let Some(cache) = &state.cache {
        if let Some(profile) = cache.get_profile(user_id).await {
            return Ok(profile);
        }
    }

    let profile = state.profiles.get_profile(user_id).await?;

    if let Some(cache) = &state.cache {
        if let Err(e) = cache.put_profile(&profile).await {
            tracing::warn!("Failed to cache profile {}: {}", user_id, e);
        }
    }

    Ok(profile)
}

fn validation_failed(errors: validator::ValidationErrors) -> HttpResponse {
    tracing::info!("Request validation failed: {:?}", errors);
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

fn store_error_response(user_id: &str, e: StoreError) -> HttpResponse {
    match e {
        StoreError::NotFound(message) => HttpResponse::NotFound().json(ErrorResponse {
            error: "Profile not found".to_string(),
            message,
            status_code: 404,
        }),
        StoreError::Unavailable(message) => {
            tracing::error!("Store failure while loading {}: {}", user_id, message);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Store unavailable".to_string(),
                message,
                status_code: 500,
            })
        }
    }
}

fn swipe_error_response(e: SwipeError) -> HttpResponse {
    match e {
        SwipeError::Validation(message) => HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message,
            status_code: 400,
        }),
        SwipeError::NotFound(message) => HttpResponse::NotFound().json(ErrorResponse {
            error: "Not found".to_string(),
            message,
            status_code: 404,
        }),
        SwipeError::Store(inner) => {
            tracing::error!("Swipe failed on store error: {}", inner);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to record swipe".to_string(),
                message: inner.to_string(),
                status_code: 500,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_check_response() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
            timestamp: chrono::Utc::now(),
        };

        assert_eq!(response.status, "healthy");
    }

    #[test]
    fn test_swipe_error_maps_to_status() {
        let bad = swipe_error_response(SwipeError::Validation("self swipe".into()));
        assert_eq!(bad.status(), actix_web::http::StatusCode::BAD_REQUEST);

        let missing = swipe_error_response(SwipeError::NotFound("profile".into()));
        assert_eq!(missing.status(), actix_web::http::StatusCode::NOT_FOUND);

        let broken = swipe_error_response(SwipeError::Store(StoreError::Unavailable(
            "connection refused".into(),
        )));
        assert_eq!(
            broken.status(),
            actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
