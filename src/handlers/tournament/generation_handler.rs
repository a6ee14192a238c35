use actix_web::{web, HttpResponse, Result};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::bracket::service::BracketService;
use crate::handlers::tournament::{actor_from_claims, bracket_error_response};
use crate::middleware::auth::Claims;

/// Generate a knockout bracket (single or double elimination, per the
/// tournament's configuration).
pub async fn generate_knockout(
    tournament_id: Uuid,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let Some(actor) = actor_from_claims(&claims) else {
        return Ok(HttpResponse::Unauthorized().json(json!({
            "success": false,
            "message": "Invalid token subject"
        })));
    };

    let service = BracketService::new(pool.get_ref().clone());
    match service.generate_knockout(tournament_id, actor).await {
        Ok(summary) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": summary
        }))),
        Err(e) => {
            tracing::warn!(
                "Knockout generation rejected for tournament {}: {}",
                tournament_id,
                e
            );
            Ok(bracket_error_response(&e))
        }
    }
}

/// Generate a compass draw: main draw plus consolation quadrants.
pub async fn generate_compass(
    tournament_id: Uuid,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let Some(actor) = actor_from_claims(&claims) else {
        return Ok(HttpResponse::Unauthorized().json(json!({
            "success": false,
            "message": "Invalid token subject"
        })));
    };

    let service = BracketService::new(pool.get_ref().clone());
    match service.generate_compass(tournament_id, actor).await {
        Ok(summary) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": summary
        }))),
        Err(e) => {
            tracing::warn!(
                "Compass generation rejected for tournament {}: {}",
                tournament_id,
                e
            );
            Ok(bracket_error_response(&e))
        }
    }
}

/// Generate the round-robin group stage.
pub async fn generate_groups(
    tournament_id: Uuid,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let Some(actor) = actor_from_claims(&claims) else {
        return Ok(HttpResponse::Unauthorized().json(json!({
            "success": false,
            "message": "Invalid token subject"
        })));
    };

    let service = BracketService::new(pool.get_ref().clone());
    match service.generate_groups(tournament_id, actor).await {
        Ok(summary) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": summary
        }))),
        Err(e) => {
            tracing::warn!(
                "Group generation rejected for tournament {}: {}",
                tournament_id,
                e
            );
            Ok(bracket_error_response(&e))
        }
    }
}

/// Delete a generated bracket so the organizer can regenerate.
pub async fn reset_bracket(
    tournament_id: Uuid,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let Some(actor) = actor_from_claims(&claims) else {
        return Ok(HttpResponse::Unauthorized().json(json!({
            "success": false,
            "message": "Invalid token subject"
        })));
    };

    let service = BracketService::new(pool.get_ref().clone());
    match service.reset_bracket(tournament_id, actor).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Bracket reset"
        }))),
        Err(e) => Ok(bracket_error_response(&e)),
    }
}
