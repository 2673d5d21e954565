// Route exports
pub mod assignments;
pub mod roster;

use actix_web::web;

pub use assignments::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(assignments::configure)
            .configure(roster::configure),
    );
}
