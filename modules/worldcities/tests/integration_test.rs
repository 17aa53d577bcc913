//! Integration tests for the worldcities module: every test gets its own
//! migrated in-memory SQLite database, services run on the real SeaORM
//! repositories, and HTTP behavior goes through the actual router.

use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use rust_decimal::Decimal;
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tower::ServiceExt;

use worldcities::{
    api::rest::routes,
    config::WorldCitiesConfig,
    domain::{
        cities::CitiesService,
        countries::CountriesService,
        error::DomainError,
        model::{City, Country, ListRequest, NewCity, NewCountry},
    },
    infra::storage::{
        cities_repo::SeaOrmCitiesRepository, countries_repo::SeaOrmCountriesRepository,
        migrations::Migrator,
    },
};

struct TestEnv {
    cities: Arc<CitiesService>,
    countries: Arc<CountriesService>,
}

/// Fresh in-memory database with migrations applied.
async fn create_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to test database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

async fn create_test_env() -> TestEnv {
    let db = create_test_db().await;
    let config = WorldCitiesConfig::default();
    TestEnv {
        cities: Arc::new(CitiesService::new(
            Arc::new(SeaOrmCitiesRepository::new(db.clone())),
            config.clone(),
        )),
        countries: Arc::new(CountriesService::new(
            Arc::new(SeaOrmCountriesRepository::new(db)),
            config,
        )),
    }
}

fn test_router(env: &TestEnv) -> Router {
    routes::router(env.cities.clone(), env.countries.clone())
}

fn dec(s: &str) -> Decimal {
    s.parse().expect("decimal literal")
}

async fn seed_country(env: &TestEnv, name: &str, iso2: &str, iso3: &str) -> Country {
    env.countries
        .create(NewCountry {
            name: name.to_string(),
            iso2: iso2.to_string(),
            iso3: iso3.to_string(),
        })
        .await
        .expect("seed country")
}

async fn seed_city(env: &TestEnv, name: &str, lat: &str, lon: &str, country_id: i32) -> City {
    env.cities
        .create(NewCity {
            name: name.to_string(),
            name_ascii: name.to_string(),
            lat: dec(lat),
            lon: dec(lon),
            country_id,
        })
        .await
        .expect("seed city")
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

fn json_req(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

// ---------- service level ----------

#[tokio::test]
async fn test_service_crud_roundtrip() -> Result<()> {
    let env = create_test_env().await;

    let country = seed_country(&env, "Italy", "IT", "ITA").await;
    assert_eq!(country.version, 0);

    let city = seed_city(&env, "Rome", "41.8931", "12.4828", country.id).await;
    assert_eq!(city.version, 0);

    let fetched = env.cities.get(city.id).await?;
    assert_eq!(fetched.name, "Rome");
    assert_eq!(fetched.country_id, country.id);

    let mut updated = fetched.clone();
    updated.name = "Roma".to_string();
    env.cities.update(city.id, updated).await?;

    let fetched = env.cities.get(city.id).await?;
    assert_eq!(fetched.name, "Roma");
    assert_eq!(fetched.version, 1, "version increments on update");

    let deleted = env.cities.delete(city.id).await?;
    assert_eq!(deleted.name, "Roma");
    assert!(matches!(
        env.cities.get(city.id).await,
        Err(DomainError::CityNotFound { .. })
    ));

    Ok(())
}

#[tokio::test]
async fn test_stale_version_update_conflicts_and_leaves_store_unchanged() -> Result<()> {
    let env = create_test_env().await;
    let country = seed_country(&env, "Italy", "IT", "ITA").await;
    let city = seed_city(&env, "Rome", "41.8931", "12.4828", country.id).await;

    // First writer wins.
    let mut first = city.clone();
    first.name = "Roma".to_string();
    env.cities.update(city.id, first).await?;

    // Second writer still holds version 0.
    let mut second = city.clone();
    second.name = "Rom".to_string();
    let err = env.cities.update(city.id, second).await.unwrap_err();
    assert!(matches!(err, DomainError::VersionConflict { .. }));

    let stored = env.cities.get(city.id).await?;
    assert_eq!(stored.name, "Roma", "conflicting write must not apply");
    assert_eq!(stored.version, 1);

    Ok(())
}

#[tokio::test]
async fn test_update_guards() -> Result<()> {
    let env = create_test_env().await;
    let country = seed_country(&env, "Italy", "IT", "ITA").await;
    let city = seed_city(&env, "Rome", "41.8931", "12.4828", country.id).await;

    // Path/body id mismatch.
    let err = env.cities.update(city.id + 1, city.clone()).await.unwrap_err();
    assert!(matches!(err, DomainError::IdMismatch { .. }));

    // Unknown id.
    let mut ghost = city.clone();
    ghost.id = 9999;
    let err = env.cities.update(9999, ghost).await.unwrap_err();
    assert!(matches!(err, DomainError::CityNotFound { id: 9999 }));

    Ok(())
}

#[tokio::test]
async fn test_city_duplicate_check_excludes_self() -> Result<()> {
    let env = create_test_env().await;
    let country = seed_country(&env, "Italy", "IT", "ITA").await;
    let rome = seed_city(&env, "Rome", "41.8931", "12.4828", country.id).await;
    let milan = seed_city(&env, "Milan", "45.4669", "9.1900", country.id).await;

    // Re-saving a record with its own values is not a duplicate.
    assert!(!env.cities.is_dupe(&rome).await?);

    // A different record colliding on the uniqueness key is.
    let mut renamed = milan.clone();
    renamed.name = "Rome".to_string();
    renamed.lat = rome.lat;
    renamed.lon = rome.lon;
    assert!(env.cities.is_dupe(&renamed).await?);

    // Same name elsewhere on the map is fine.
    let mut moved = renamed.clone();
    moved.lat = dec("0.0");
    assert!(!env.cities.is_dupe(&moved).await?);

    Ok(())
}

#[tokio::test]
async fn test_country_dupe_field_selector() -> Result<()> {
    let env = create_test_env().await;
    let italy = seed_country(&env, "Italy", "IT", "ITA").await;
    let france = seed_country(&env, "France", "FR", "FRA").await;

    // Another country already holds the value.
    assert!(env.countries.is_dupe_field(france.id, "name", "Italy").await?);
    assert!(env.countries.is_dupe_field(france.id, "iso2", "IT").await?);
    assert!(env.countries.is_dupe_field(france.id, "ISO3", "ITA").await?);

    // The candidate's own row never matches.
    assert!(!env.countries.is_dupe_field(italy.id, "name", "Italy").await?);

    // Free values and unknown selectors answer false.
    assert!(!env.countries.is_dupe_field(france.id, "name", "Spain").await?);
    assert!(!env.countries.is_dupe_field(france.id, "id", "Italy").await?);

    Ok(())
}

#[tokio::test]
async fn test_listing_projections() -> Result<()> {
    let env = create_test_env().await;
    let italy = seed_country(&env, "Italy", "IT", "ITA").await;
    let france = seed_country(&env, "France", "FR", "FRA").await;
    seed_city(&env, "Rome", "41.8931", "12.4828", italy.id).await;
    seed_city(&env, "Milan", "45.4669", "9.1900", italy.id).await;
    seed_city(&env, "Paris", "48.8567", "2.3522", france.id).await;

    let cities = env.cities.list(ListRequest::default()).await?;
    assert_eq!(cities.total_count(), 3);
    let rome = cities
        .data()
        .iter()
        .find(|c| c.name == "Rome")
        .expect("rome listed");
    assert_eq!(rome.country_name, "Italy");

    let countries = env
        .countries
        .list(ListRequest {
            sort_column: Some("totCities".to_string()),
            sort_order: Some("DESC".to_string()),
            ..Default::default()
        })
        .await?;
    assert_eq!(countries.total_count(), 2);
    assert_eq!(countries.data()[0].name, "Italy");
    assert_eq!(countries.data()[0].tot_cities, 2);
    assert_eq!(countries.data()[1].tot_cities, 1);

    Ok(())
}

#[tokio::test]
async fn test_listing_rejects_unknown_column() {
    let env = create_test_env().await;
    let err = env
        .cities
        .list(ListRequest {
            sort_column: Some("bogus".to_string()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Listing(page_core::PageError::UnknownColumn(ref name)) if name == "bogus"
    ));
}

// ---------- REST level ----------

#[tokio::test]
async fn test_rest_pages_twenty_five_cities() -> Result<()> {
    let env = create_test_env().await;
    let italy = seed_country(&env, "Italy", "IT", "ITA").await;
    for i in 1..=25 {
        seed_city(&env, &format!("City {i:02}"), "10.0", "20.0", italy.id).await;
    }
    let app = test_router(&env);

    let response = app
        .oneshot(get("/api/cities?pageIndex=2&pageSize=10"))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(5));
    assert_eq!(body["totalCount"], 25);
    assert_eq!(body["totalPages"], 3);
    assert_eq!(body["hasPreviousPage"], true);
    assert_eq!(body["hasNextPage"], false);
    assert_eq!(body["pageIndex"], 2);
    assert_eq!(body["pageSize"], 10);

    Ok(())
}

#[tokio::test]
async fn test_rest_default_page_size_is_ten() -> Result<()> {
    let env = create_test_env().await;
    let italy = seed_country(&env, "Italy", "IT", "ITA").await;
    for i in 1..=15 {
        seed_city(&env, &format!("City {i:02}"), "10.0", "20.0", italy.id).await;
    }
    let app = test_router(&env);

    let response = app.oneshot(get("/api/cities")).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(10));
    assert_eq!(body["totalCount"], 15);
    assert_eq!(body["totalPages"], 2);
    assert_eq!(body["hasNextPage"], true);

    Ok(())
}

#[tokio::test]
async fn test_rest_rejects_bogus_sort_column() -> Result<()> {
    let env = create_test_env().await;
    let app = test_router(&env);

    let response = app.oneshot(get("/api/cities?sortColumn=bogus")).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    assert_eq!(content_type, "application/problem+json");

    let body = json_body(response).await;
    assert_eq!(body["code"], "LISTING_UNKNOWN_COLUMN");
    assert!(body["detail"].as_str().unwrap_or("").contains("bogus"));

    Ok(())
}

#[tokio::test]
async fn test_rest_sorts_and_filters_on_projected_country_name() -> Result<()> {
    let env = create_test_env().await;
    let italy = seed_country(&env, "Italy", "IT", "ITA").await;
    let france = seed_country(&env, "France", "FR", "FRA").await;
    seed_city(&env, "Rome", "41.8931", "12.4828", italy.id).await;
    seed_city(&env, "Paris", "48.8567", "2.3522", france.id).await;
    seed_city(&env, "Lyon", "45.7600", "4.8400", france.id).await;
    let app = test_router(&env);

    // Sort by the joined column, descending: Italian city first.
    let response = app
        .clone()
        .oneshot(get("/api/cities?sortColumn=countryName&sortOrder=DESC"))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"][0]["countryName"], "Italy");
    assert_eq!(body["sortColumn"], "countryName");
    assert_eq!(body["sortOrder"], "DESC");

    // Filter on it: pagination metadata reflects the filtered view.
    let response = app
        .oneshot(get(
            "/api/cities?filterColumn=countryName&filterQuery=Fran",
        ))
        .await?;
    let body = json_body(response).await;
    assert_eq!(body["totalCount"], 2);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["filterColumn"], "countryName");
    assert_eq!(body["filterQuery"], "Fran");

    Ok(())
}

#[tokio::test]
async fn test_rest_half_specified_filter_behaves_like_no_filter() -> Result<()> {
    let env = create_test_env().await;
    let italy = seed_country(&env, "Italy", "IT", "ITA").await;
    seed_city(&env, "Rome", "41.8931", "12.4828", italy.id).await;
    seed_city(&env, "Milan", "45.4669", "9.1900", italy.id).await;
    let app = test_router(&env);

    let response = app.oneshot(get("/api/cities?filterColumn=name")).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["totalCount"], 2);
    assert_eq!(body["filterColumn"], serde_json::Value::Null);

    Ok(())
}

#[tokio::test]
async fn test_rest_city_lifecycle() -> Result<()> {
    let env = create_test_env().await;
    let italy = seed_country(&env, "Italy", "IT", "ITA").await;
    let app = test_router(&env);

    // Create.
    let create = serde_json::json!({
        "name": "Naples",
        "nameAscii": "Naples",
        "lat": "40.8333",
        "lon": "14.2500",
        "countryId": italy.id,
    });
    let response = app
        .clone()
        .oneshot(json_req("POST", "/api/cities", &create))
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("location header")
        .to_string();
    let created = json_body(response).await;
    let id = created["id"].as_i64().expect("created id");
    assert_eq!(location, format!("/api/cities/{id}"));
    assert_eq!(created["version"], 0);

    // Read it back through the Location URL.
    let response = app.clone().oneshot(get(&location)).await?;
    assert_eq!(response.status(), StatusCode::OK);

    // Update with the version we read.
    let update = serde_json::json!({
        "id": id,
        "name": "Napoli",
        "nameAscii": "Napoli",
        "lat": "40.8333",
        "lon": "14.2500",
        "countryId": italy.id,
        "version": 0,
    });
    let response = app
        .clone()
        .oneshot(json_req("PUT", &location, &update))
        .await?;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Replaying the same update with the stale version conflicts.
    let response = app
        .clone()
        .oneshot(json_req("PUT", &location, &update))
        .await?;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = json_body(response).await;
    assert_eq!(body["code"], "WORLDCITIES_VERSION_CONFLICT");

    // Path/body id mismatch.
    let response = app
        .clone()
        .oneshot(json_req("PUT", &format!("/api/cities/{}", id + 1), &update))
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Delete returns the record.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(&location)
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["name"], "Napoli");

    // Gone now.
    let response = app.oneshot(get(&location)).await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_rest_dupe_endpoints() -> Result<()> {
    let env = create_test_env().await;
    let italy = seed_country(&env, "Italy", "IT", "ITA").await;
    let rome = seed_city(&env, "Rome", "41.8931", "12.4828", italy.id).await;
    let app = test_router(&env);

    // A new city colliding with Rome's key.
    let probe = serde_json::json!({
        "id": 0,
        "name": "Rome",
        "nameAscii": "Rome",
        "lat": "41.8931",
        "lon": "12.4828",
        "countryId": italy.id,
    });
    let response = app
        .clone()
        .oneshot(json_req("POST", "/api/cities/isDupe", &probe))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, serde_json::json!(true));

    // The same record being edited is not its own duplicate.
    let probe = serde_json::json!({
        "id": rome.id,
        "name": "Rome",
        "nameAscii": "Rome",
        "lat": "41.8931",
        "lon": "12.4828",
        "countryId": italy.id,
    });
    let response = app
        .clone()
        .oneshot(json_req("POST", "/api/cities/isDupe", &probe))
        .await?;
    assert_eq!(json_body(response).await, serde_json::json!(false));

    // Country field probe.
    let probe = serde_json::json!({
        "countryId": 0,
        "fieldName": "iso3",
        "fieldValue": "ITA",
    });
    let response = app
        .oneshot(json_req("POST", "/api/countries/isDupeField", &probe))
        .await?;
    assert_eq!(json_body(response).await, serde_json::json!(true));

    Ok(())
}

#[tokio::test]
async fn test_rest_country_listing_includes_city_counts() -> Result<()> {
    let env = create_test_env().await;
    let italy = seed_country(&env, "Italy", "IT", "ITA").await;
    seed_country(&env, "France", "FR", "FRA").await;
    seed_city(&env, "Rome", "41.8931", "12.4828", italy.id).await;
    seed_city(&env, "Milan", "45.4669", "9.1900", italy.id).await;
    let app = test_router(&env);

    let response = app
        .oneshot(get("/api/countries?sortColumn=name&sortOrder=asc"))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["totalCount"], 2);
    assert_eq!(body["data"][0]["name"], "France");
    assert_eq!(body["data"][0]["totCities"], 0);
    assert_eq!(body["data"][1]["name"], "Italy");
    assert_eq!(body["data"][1]["totCities"], 2);

    Ok(())
}
