//! # cr-api Handlers
//!
//! This module coordinates the flow between HTTP requests and Core traits.

use actix_web::{web, HttpRequest, HttpResponse};
use askama::Template;
use cr_core::banner::sample_banner;
use cr_core::error::AppError;
use cr_core::traits::CityRightsRepo;
use cr_ui::{CityListTemplate, CityTemplate, GranterTemplate, IndexTemplate};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

/// State shared across all Actix-web workers.
pub struct AppState {
    pub repo: Box<dyn CityRightsRepo>,
}

#[derive(Debug, Deserialize)]
pub struct FindQuery {
    pub q: Option<String>,
}

fn render(template: impl Template) -> Result<HttpResponse, ApiError> {
    let html = template
        .render()
        .map_err(|e| AppError::Internal(format!("template rendering failed: {e}")))?;
    Ok(HttpResponse::Ok().content_type("text/html; charset=utf-8").body(html))
}

/// Malformed ids cannot exist, so they are reported as missing.
fn parse_id(kind: &str, raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError(AppError::NotFound(kind.into(), raw.into())))
}

/// Renders the homepage: every city by grant date, plus three random
/// cities or granters for the header.
pub async fn index(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let cities = data.repo.list_cities_by_grant_date().await?;
    let granters = data.repo.list_granters().await?;
    let banner = sample_banner(&granters, &cities, &mut rand::thread_rng());

    render(IndexTemplate {
        title: "City rights",
        cities: &cities,
        banner: &banner,
    })
}

/// Case-insensitive prefix search on city names (e.g. /find?q=haar).
pub async fn find(
    data: web::Data<AppState>,
    query: web::Query<FindQuery>,
) -> Result<HttpResponse, ApiError> {
    let prefix = query.into_inner().q.unwrap_or_default();
    let cities = data.repo.find_cities_by_prefix(&prefix).await?;
    log::debug!("find {prefix:?}: {} cities", cities.len());

    render(CityListTemplate {
        title: "Search",
        cities: &cities,
        query: &prefix,
    })
}

/// Lists the cities that are not banned, by name.
pub async fn cities(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let cities = data.repo.list_unbanned_cities().await?;

    render(CityListTemplate {
        title: "Cities",
        cities: &cities,
        query: "",
    })
}

/// Renders a specific City (e.g., /city/<uuid>)
pub async fn city(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let raw = path.into_inner();
    let id = parse_id("City", &raw)?;

    let detail = data
        .repo
        .get_city_detail(id)
        .await?
        .ok_or_else(|| AppError::NotFound("City".into(), raw))?;

    render(CityTemplate {
        title: &detail.city.name,
        detail: &detail,
    })
}

/// Renders a specific Granter (e.g., /granter/<uuid>)
pub async fn granter(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let raw = path.into_inner();
    let id = parse_id("Granter", &raw)?;

    let detail = data
        .repo
        .get_granter_detail(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Granter".into(), raw))?;

    let title = detail.granter.display_name();
    render(GranterTemplate {
        title: &title,
        detail: &detail,
    })
}

/// Fallback for unknown routes.
pub async fn not_found(req: HttpRequest) -> Result<HttpResponse, ApiError> {
    Err(ApiError(AppError::NoRoute(req.path().to_string())))
}
