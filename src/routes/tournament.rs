// src/routes/tournament.rs
use actix_web::{delete, get, post, web, HttpResponse, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::handlers::tournament::{bracket_handler, generation_handler, standings_handler};
use crate::middleware::auth::Claims;

/// Generate a knockout bracket for a tournament
#[post("/{tournament_id}/generate/knockout")]
async fn generate_knockout(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let tournament_id = path.into_inner();
    generation_handler::generate_knockout(tournament_id, pool, claims).await
}

/// Generate a compass draw for a tournament
#[post("/{tournament_id}/generate/compass")]
async fn generate_compass(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let tournament_id = path.into_inner();
    generation_handler::generate_compass(tournament_id, pool, claims).await
}

/// Generate the round-robin group stage for a tournament
#[post("/{tournament_id}/generate/groups")]
async fn generate_groups(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let tournament_id = path.into_inner();
    generation_handler::generate_groups(tournament_id, pool, claims).await
}

/// Get the generated bracket
#[get("/{tournament_id}/bracket")]
async fn get_bracket(path: web::Path<Uuid>, pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let tournament_id = path.into_inner();
    bracket_handler::get_bracket(tournament_id, pool).await
}

/// Get tournament standings
#[get("/{tournament_id}/standings")]
async fn get_standings(path: web::Path<Uuid>, pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let tournament_id = path.into_inner();
    standings_handler::get_standings(tournament_id, pool).await
}

/// Get standings for one round-robin group
#[get("/{tournament_id}/groups/{group_number}/standings")]
async fn get_group_standings(
    path: web::Path<(Uuid, i32)>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse> {
    let (tournament_id, group_number) = path.into_inner();
    standings_handler::get_group_standings(tournament_id, group_number, pool).await
}

/// Delete the generated bracket so it can be regenerated
#[delete("/{tournament_id}/bracket")]
async fn reset_bracket(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let tournament_id = path.into_inner();
    generation_handler::reset_bracket(tournament_id, pool, claims).await
}
