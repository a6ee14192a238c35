pub mod bracket_handler;
pub mod generation_handler;
pub mod standings_handler;

use actix_web::HttpResponse;
use serde_json::json;

use crate::bracket::error::BracketError;
use crate::bracket::service::Actor;
use crate::middleware::auth::Claims;

/// Map an engine error onto the HTTP surface: rejections keep their message,
/// server-side failures are logged and answered generically.
pub(crate) fn bracket_error_response(err: &BracketError) -> HttpResponse {
    match err {
        BracketError::TournamentNotFound(_) => HttpResponse::NotFound().json(json!({
            "success": false,
            "message": "Tournament not found"
        })),
        BracketError::AccessDenied => HttpResponse::Forbidden().json(json!({
            "success": false,
            "message": err.to_string()
        })),
        e if e.is_rejection() => HttpResponse::BadRequest().json(json!({
            "success": false,
            "message": err.to_string()
        })),
        _ => {
            tracing::error!("Bracket operation failed: {:?}", err);
            HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Internal server error"
            }))
        }
    }
}

/// The acting user behind a request, or `None` for a malformed subject.
pub(crate) fn actor_from_claims(claims: &Claims) -> Option<Actor> {
    Some(Actor {
        user_id: claims.user_id()?,
        role: claims.role,
    })
}
