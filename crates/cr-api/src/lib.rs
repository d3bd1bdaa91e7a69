//! # cr-api
//!
//! The web routing and orchestration layer for the city-rights register.

pub mod error;
pub mod handlers;
pub mod middleware;

pub use error::ApiError;
pub use handlers::AppState;

use actix_web::web;

/// Configures the routes for the register.
///
/// # Developer Note
/// We use a scoped configuration to allow the main binary to mount
/// the pages under a different prefix if needed.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("")
            // Homepage with the random banner
            .route("/", web::get().to(handlers::index))
            // Prefix search (e.g., /find?q=haar)
            .route("/find", web::get().to(handlers::find))
            // All cities that are not banned
            .route("/cities", web::get().to(handlers::cities))
            // The "City View" (e.g., /city/<uuid>)
            .route("/city/{id}", web::get().to(handlers::city))
            // The "Granter View" (e.g., /granter/<uuid>)
            .route("/granter/{id}", web::get().to(handlers::granter))
            .default_service(web::to(handlers::not_found)),
    );
}
