use actix_web::{web, HttpResponse, Result};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::bracket::service::BracketService;
use crate::handlers::tournament::bracket_error_response;

/// Get tournament standings: points descending, game difference breaking
/// ties.
pub async fn get_standings(tournament_id: Uuid, pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let service = BracketService::new(pool.get_ref().clone());

    match service.standings(tournament_id).await {
        Ok(standings) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": standings
        }))),
        Err(e) => {
            tracing::warn!(
                "Failed to load standings for tournament {}: {}",
                tournament_id,
                e
            );
            Ok(bracket_error_response(&e))
        }
    }
}

/// Get standings for a single round-robin group, same ordering.
pub async fn get_group_standings(
    tournament_id: Uuid,
    group_number: i32,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse> {
    let service = BracketService::new(pool.get_ref().clone());

    match service.group_standings(tournament_id, group_number).await {
        Ok(standings) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": standings
        }))),
        Err(e) => Ok(bracket_error_response(&e)),
    }
}
