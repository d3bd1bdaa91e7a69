//! # City Rights Binary
//!
//! The entry point that assembles the application based on compile-time features.

use actix_files::Files;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use cr_api::handlers::AppState;
use cr_config::Settings;

// Feature-gated imports
#[cfg(feature = "db-sqlite")]
use cr_db_sqlite::SqliteCityRightsRepo;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load settings (.env, config/default.toml, CITY_RIGHTS__* variables)
    let settings = Settings::load().context("Failed to load settings")?;
    env_logger::init_from_env(env_logger::Env::new().default_filter_or(&settings.log.level));
    if let Some(path) = &settings.env_file {
        log::debug!("Loaded environment from {}", path.display());
    }

    // 2. Initialize Database Implementation
    #[cfg(feature = "db-sqlite")]
    let repo = {
        let pool = cr_db_sqlite::connect(&settings.database.url, settings.database.max_connections)
            .await
            .context("Failed to init SQLite")?;
        SqliteCityRightsRepo::new(pool)
    };

    // 3. Wrap in AppState (Using dynamic dispatch for maximum flexibility)
    let state = web::Data::new(AppState { repo: Box::new(repo) });

    let (host, port) = settings.bind_address();
    let static_dir = settings.server.static_dir.clone();
    log::info!("City rights register starting on http://{host}:{port}");

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(cr_api::middleware::security_headers())
            .wrap(cr_api::middleware::normalize_path())
            .wrap(cr_api::middleware::standard_middleware())
            .service(Files::new("/static", &static_dir))
            .configure(cr_api::configure_routes)
    })
    .bind((host.as_str(), port))
    .with_context(|| format!("Failed to bind {host}:{port}"))?
    .run()
    .await?;

    Ok(())
}
