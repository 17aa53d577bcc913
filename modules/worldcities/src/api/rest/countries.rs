use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
    Extension,
};
use page_core::PagedResult;
use tracing::debug;

use crate::api::rest::dto::{
    CountryDto, CountryListItemDto, CreateCountryReq, IsDupeFieldReq, ListQuery,
};
use crate::api::rest::error::map_domain_error;
use crate::api::rest::problem::ProblemResponse;
use crate::domain::countries::CountriesService;

/// List countries, paged/sorted/filtered per the query parameters.
pub async fn list_countries(
    Extension(svc): Extension<Arc<CountriesService>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<PagedResult<CountryListItemDto>>, ProblemResponse> {
    debug!("listing countries with query: {:?}", query);

    match svc.list(query.into()).await {
        Ok(page) => Ok(Json(page.map(CountryListItemDto::from))),
        Err(e) => Err(map_domain_error(&e, "/api/countries")),
    }
}

/// Get a specific country by id.
pub async fn get_country(
    Extension(svc): Extension<Arc<CountriesService>>,
    Path(id): Path<i32>,
) -> Result<Json<CountryDto>, ProblemResponse> {
    match svc.get(id).await {
        Ok(country) => Ok(Json(CountryDto::from(country))),
        Err(e) => Err(map_domain_error(&e, &format!("/api/countries/{id}"))),
    }
}

/// Create a new country. Responds 201 with the record and its location.
pub async fn create_country(
    Extension(svc): Extension<Arc<CountriesService>>,
    Json(req): Json<CreateCountryReq>,
) -> Result<impl IntoResponse, ProblemResponse> {
    match svc.create(req.into()).await {
        Ok(country) => {
            let location = format!("/api/countries/{}", country.id);
            Ok((
                StatusCode::CREATED,
                [(header::LOCATION, location)],
                Json(CountryDto::from(country)),
            ))
        }
        Err(e) => Err(map_domain_error(&e, "/api/countries")),
    }
}

/// Replace a country, guarded by id match and version compare-and-swap.
pub async fn update_country(
    Extension(svc): Extension<Arc<CountriesService>>,
    Path(id): Path<i32>,
    Json(dto): Json<CountryDto>,
) -> Result<StatusCode, ProblemResponse> {
    match svc.update(id, dto.into()).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => Err(map_domain_error(&e, &format!("/api/countries/{id}"))),
    }
}

/// Delete a country, returning the removed record.
pub async fn delete_country(
    Extension(svc): Extension<Arc<CountriesService>>,
    Path(id): Path<i32>,
) -> Result<Json<CountryDto>, ProblemResponse> {
    match svc.delete(id).await {
        Ok(country) => Ok(Json(CountryDto::from(country))),
        Err(e) => Err(map_domain_error(&e, &format!("/api/countries/{id}"))),
    }
}

/// Field-selectable duplicate probe (`name` / `iso2` / `iso3`).
pub async fn is_dupe_field(
    Extension(svc): Extension<Arc<CountriesService>>,
    Json(req): Json<IsDupeFieldReq>,
) -> Result<Json<bool>, ProblemResponse> {
    match svc
        .is_dupe_field(req.country_id, &req.field_name, &req.field_value)
        .await
    {
        Ok(dupe) => Ok(Json(dupe)),
        Err(e) => Err(map_domain_error(&e, "/api/countries/isDupeField")),
    }
}
