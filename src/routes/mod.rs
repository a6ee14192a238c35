use actix_web::web;

pub mod backend_health;
pub mod tournament;

use crate::middleware::auth::AuthMiddleware;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(backend_health::backend_health);

    // Tournament routes (require authentication; generation and reset
    // additionally require the organizer or an admin)
    cfg.service(
        web::scope("/tournaments")
            .wrap(AuthMiddleware)
            .service(tournament::generate_knockout)
            .service(tournament::generate_compass)
            .service(tournament::generate_groups)
            .service(tournament::get_bracket)
            .service(tournament::get_standings)
            .service(tournament::get_group_standings)
            .service(tournament::reset_bracket),
    );
}
