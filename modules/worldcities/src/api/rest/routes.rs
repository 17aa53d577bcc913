use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};

use crate::api::rest::{cities, countries};
use crate::domain::cities::CitiesService;
use crate::domain::countries::CountriesService;

/// Build the module router.
///
/// The static `isDupe*` segments take precedence over the `{id}` capture.
/// Mutating routes (POST/PUT/DELETE) are expected to sit behind an
/// authentication gate supplied by the host; the duplicate probes are
/// called by the edit form pre-submit and stay open like the reads.
pub fn router(cities_svc: Arc<CitiesService>, countries_svc: Arc<CountriesService>) -> Router {
    Router::new()
        .route(
            "/api/cities",
            get(cities::list_cities).post(cities::create_city),
        )
        .route(
            "/api/cities/{id}",
            get(cities::get_city)
                .put(cities::update_city)
                .delete(cities::delete_city),
        )
        .route("/api/cities/isDupe", post(cities::is_dupe_city))
        .route(
            "/api/countries",
            get(countries::list_countries).post(countries::create_country),
        )
        .route(
            "/api/countries/{id}",
            get(countries::get_country)
                .put(countries::update_country)
                .delete(countries::delete_country),
        )
        .route(
            "/api/countries/isDupeField",
            post(countries::is_dupe_field),
        )
        .layer(Extension(cities_svc))
        .layer(Extension(countries_svc))
}
