use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
    Extension,
};
use page_core::PagedResult;
use tracing::debug;

use crate::api::rest::dto::{CityDto, CityListItemDto, CreateCityReq, ListQuery};
use crate::api::rest::error::map_domain_error;
use crate::api::rest::problem::ProblemResponse;
use crate::domain::cities::CitiesService;

/// List cities, paged/sorted/filtered per the query parameters.
pub async fn list_cities(
    Extension(svc): Extension<Arc<CitiesService>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<PagedResult<CityListItemDto>>, ProblemResponse> {
    debug!("listing cities with query: {:?}", query);

    match svc.list(query.into()).await {
        Ok(page) => Ok(Json(page.map(CityListItemDto::from))),
        Err(e) => Err(map_domain_error(&e, "/api/cities")),
    }
}

/// Get a specific city by id.
pub async fn get_city(
    Extension(svc): Extension<Arc<CitiesService>>,
    Path(id): Path<i32>,
) -> Result<Json<CityDto>, ProblemResponse> {
    match svc.get(id).await {
        Ok(city) => Ok(Json(CityDto::from(city))),
        Err(e) => Err(map_domain_error(&e, &format!("/api/cities/{id}"))),
    }
}

/// Create a new city. Responds 201 with the record and its location.
pub async fn create_city(
    Extension(svc): Extension<Arc<CitiesService>>,
    Json(req): Json<CreateCityReq>,
) -> Result<impl IntoResponse, ProblemResponse> {
    match svc.create(req.into()).await {
        Ok(city) => {
            let location = format!("/api/cities/{}", city.id);
            Ok((
                StatusCode::CREATED,
                [(header::LOCATION, location)],
                Json(CityDto::from(city)),
            ))
        }
        Err(e) => Err(map_domain_error(&e, "/api/cities")),
    }
}

/// Replace a city. The path id must match the body id and the body must
/// carry the version the client read; a stale version answers 409.
pub async fn update_city(
    Extension(svc): Extension<Arc<CitiesService>>,
    Path(id): Path<i32>,
    Json(dto): Json<CityDto>,
) -> Result<StatusCode, ProblemResponse> {
    match svc.update(id, dto.into()).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => Err(map_domain_error(&e, &format!("/api/cities/{id}"))),
    }
}

/// Delete a city, returning the removed record.
pub async fn delete_city(
    Extension(svc): Extension<Arc<CitiesService>>,
    Path(id): Path<i32>,
) -> Result<Json<CityDto>, ProblemResponse> {
    match svc.delete(id).await {
        Ok(city) => Ok(Json(CityDto::from(city))),
        Err(e) => Err(map_domain_error(&e, &format!("/api/cities/{id}"))),
    }
}

/// Pre-insert/pre-update duplicate probe for the edit form.
pub async fn is_dupe_city(
    Extension(svc): Extension<Arc<CitiesService>>,
    Json(dto): Json<CityDto>,
) -> Result<Json<bool>, ProblemResponse> {
    match svc.is_dupe(&dto.into()).await {
        Ok(dupe) => Ok(Json(dupe)),
        Err(e) => Err(map_domain_error(&e, "/api/cities/isDupe")),
    }
}
