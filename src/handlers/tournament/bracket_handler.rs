use actix_web::{web, HttpResponse, Result};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::bracket::service::BracketService;
use crate::handlers::tournament::bracket_error_response;

/// Get the full bracket of a tournament, grouped per bracket kind.
pub async fn get_bracket(tournament_id: Uuid, pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let service = BracketService::new(pool.get_ref().clone());

    match service.bracket(tournament_id).await {
        Ok(bracket) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": bracket
        }))),
        Err(e) => {
            tracing::warn!("Failed to load bracket for tournament {}: {}", tournament_id, e);
            Ok(bracket_error_response(&e))
        }
    }
}
