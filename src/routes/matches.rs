use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::core::{is_matchable, LoadMatcher, MatchError};
use crate::models::{BestMatchResponse, ErrorResponse, HealthResponse, MatchLoadsRequest, MatchLoadsResponse};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub matcher: LoadMatcher,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/loads/match", web::post().to(match_loads))
        .route("/loads/best", web::post().to(best_match));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Match loads endpoint
///
/// POST /api/v1/loads/match
///
/// Request body:
/// ```json
/// {
///   "requirements": { "truck_type": "open", "tonnage": 8, "current_location": "Jigani" },
///   "loads": [{ "id": "load_001", "origin": "Jigani", "destination": "Nizampur", "truck_type": "open" }],
///   "limit": 10
/// }
/// ```
async fn match_loads(
    state: web::Data<AppState>,
    req: web::Json<MatchLoadsRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for match_loads request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let request = req.into_inner();

    tracing::info!(
        "Matching requirements {} against {} loads",
        request.requirements.id,
        request.loads.len()
    );

    let mut matches = match state
        .matcher
        .find_matching_loads(&request.requirements, &request.loads)
    {
        Ok(matches) => matches,
        Err(e) => return invalid_input(e),
    };

    // Decide on the full ranking before the response is truncated
    let action = state.matcher.recommend_action(&request.requirements, &matches);

    if let Some(limit) = request.limit {
        matches.truncate(limit as usize);
    }

    let response = MatchLoadsResponse {
        total_loads: request.loads.len(),
        available_loads: request.loads.iter().filter(|load| is_matchable(load)).count(),
        matches,
        action,
    };

    tracing::info!(
        "Returning {} matches for requirements {} (action: {})",
        response.matches.len(),
        request.requirements.id,
        response.action.action
    );

    HttpResponse::Ok().json(response)
}

/// Best match endpoint
///
/// POST /api/v1/loads/best
///
/// Same body as `/loads/match`; `limit` is ignored.
async fn best_match(
    state: web::Data<AppState>,
    req: web::Json<MatchLoadsRequest>,
) -> impl Responder {
    match state.matcher.get_best_match(&req.requirements, &req.loads) {
        Ok(best_match) => HttpResponse::Ok().json(BestMatchResponse { best_match }),
        Err(e) => invalid_input(e),
    }
}

fn invalid_input(error: MatchError) -> HttpResponse {
    let kind = match error {
        MatchError::InvalidRequirements(_) => "Invalid requirements",
        MatchError::InvalidLoad { .. } => "Invalid load",
        MatchError::InvalidLoadCollection(_) => "Invalid load collection",
    };

    HttpResponse::UnprocessableEntity().json(ErrorResponse {
        error: kind.to_string(),
        message: error.to_string(),
        status_code: 422,
    })
}
