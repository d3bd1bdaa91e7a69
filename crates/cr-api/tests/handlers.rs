//! Handler tests against a mocked repository.

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use chrono::NaiveDate;
use cr_api::{configure_routes, middleware, AppState};
use cr_core::{AppError, City, CityDetail, Granter, GranterDetail, MockCityRightsRepo, TitledGranter};
use uuid::Uuid;

fn city(name: &str, is_city: bool, y: i32, m: u32, d: u32) -> City {
    City {
        is_city: Some(is_city),
        grant_date: NaiveDate::from_ymd_opt(y, m, d),
        ..City::new(name)
    }
}

fn state(repo: MockCityRightsRepo) -> web::Data<AppState> {
    web::Data::new(AppState { repo: Box::new(repo) })
}

async fn get(repo: MockCityRightsRepo, uri: &str) -> (StatusCode, String) {
    let app = test::init_service(
        App::new()
            .app_data(state(repo))
            .wrap(middleware::normalize_path())
            .configure(configure_routes),
    )
    .await;
    let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[actix_web::test]
async fn test_index_lists_cities_and_banner() {
    let mut repo = MockCityRightsRepo::new();
    repo.expect_list_cities_by_grant_date().times(1).returning(|| {
        Ok(vec![
            city("Haarlem", true, 1245, 11, 23),
            city("Wijchen", false, 1599, 12, 31),
            city("Assen", true, 1809, 3, 13),
        ])
    });
    repo.expect_list_granters().times(1).returning(|| Ok(Vec::new()));

    let (status, html) = get(repo, "/").await;
    assert_eq!(status, StatusCode::OK);
    for name in ["Haarlem", "Wijchen", "Assen"] {
        assert!(html.contains(name));
    }
    // Exactly three records, so all of them land in the banner
    assert_eq!(html.matches("class=\"banner-item\"").count(), 3);
}

#[actix_web::test]
async fn test_index_without_enough_records_has_no_banner() {
    let mut repo = MockCityRightsRepo::new();
    repo.expect_list_cities_by_grant_date()
        .returning(|| Ok(vec![city("Haarlem", true, 1245, 11, 23)]));
    repo.expect_list_granters().returning(|| Ok(vec![Granter::new("Willem II", None)]));

    let (status, html) = get(repo, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(!html.contains("class=\"banner\""));
}

#[actix_web::test]
async fn test_find_passes_the_prefix() {
    let mut repo = MockCityRightsRepo::new();
    repo.expect_find_cities_by_prefix()
        .withf(|prefix| prefix == "haar")
        .times(1)
        .returning(|_| Ok(vec![city("Haarlem", true, 1245, 11, 23)]));

    let (status, html) = get(repo, "/find?q=haar").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Haarlem"));
    assert!(html.contains("class=\"flag\""));
}

#[actix_web::test]
async fn test_find_without_query_uses_empty_prefix() {
    let mut repo = MockCityRightsRepo::new();
    repo.expect_find_cities_by_prefix()
        .withf(|prefix| prefix.is_empty())
        .returning(|_| Ok(Vec::new()));

    let (status, html) = get(repo, "/find").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("No cities found."));
}

#[actix_web::test]
async fn test_cities_marks_classical_rights() {
    let mut repo = MockCityRightsRepo::new();
    repo.expect_list_unbanned_cities().returning(|| {
        Ok(vec![
            city("Assen", true, 1809, 3, 13),
            city("Haarlem", true, 1245, 11, 23),
        ])
    });

    let (status, html) = get(repo, "/cities/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(html.matches("class=\"flag\"").count(), 1);
    assert_eq!(html.matches("class=\"circle\"").count(), 1);
}

#[actix_web::test]
async fn test_city_detail() {
    let haarlem = city("Haarlem", true, 1245, 11, 23);
    let id = haarlem.id;
    let granter = Granter::new("Willem II", None);
    let mut repo = MockCityRightsRepo::new();
    repo.expect_get_city_detail()
        .withf(move |requested| *requested == id)
        .returning(move |_| {
            Ok(Some(CityDetail {
                city: haarlem.clone(),
                granter: Some(TitledGranter { granter: granter.clone(), title: None }),
                province: None,
                visit: None,
                countries: Vec::new(),
                traces: Vec::new(),
            }))
        });

    let (status, html) = get(repo, &format!("/city/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Haarlem"));
    assert!(html.contains("Willem II"));
    assert!(html.contains("23 November 1245"));
}

#[actix_web::test]
async fn test_unknown_city_is_404() {
    let mut repo = MockCityRightsRepo::new();
    repo.expect_get_city_detail().returning(|_| Ok(None));

    let (status, html) = get(repo, &format!("/city/{}", Uuid::now_v7())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(html.contains("City not found"));
}

#[actix_web::test]
async fn test_malformed_id_is_404_without_lookup() {
    let mut repo = MockCityRightsRepo::new();
    repo.expect_get_city_detail().never();
    repo.expect_get_granter_detail().never();

    let (status, _) = get(repo, "/city/42").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_storage_fault_is_500_without_details() {
    let mut repo = MockCityRightsRepo::new();
    repo.expect_list_unbanned_cities()
        .returning(|| Err(AppError::Internal("database is locked".into())));

    let (status, html) = get(repo, "/cities").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!html.contains("database is locked"));
}

#[actix_web::test]
async fn test_granter_detail_lists_cities() {
    let granter = Granter::new("Floris V", None);
    let id = granter.id;
    let mut repo = MockCityRightsRepo::new();
    repo.expect_get_granter_detail().returning(move |_| {
        Ok(Some(GranterDetail {
            granter: TitledGranter { granter: granter.clone(), title: None },
            cities: vec![city("Alkmaar", true, 1254, 1, 1)],
        }))
    });

    let (status, html) = get(repo, &format!("/granter/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Floris V"));
    assert!(html.contains("Alkmaar"));
}

#[actix_web::test]
async fn test_unknown_route_is_404() {
    let (status, html) = get(MockCityRightsRepo::new(), "/nowhere").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(html.contains("no page at"));
    assert!(!html.contains("with ID"));
}
