use async_trait::async_trait;
use page_core::{PageError, PageRequest, PagedResult};

use crate::domain::model::{
    City, CityListing, Country, CountryDupeField, CountryListing, NewCity, NewCountry,
};

/// Persistence port for cities. Object-safe and async via `async_trait`.
#[async_trait]
pub trait CitiesRepository: Send + Sync {
    /// One page of the city listing projection (country name flattened in).
    async fn list_page(&self, req: &PageRequest) -> Result<PagedResult<CityListing>, PageError>;

    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<City>>;

    /// Insert and return the stored record with its assigned id.
    async fn insert(&self, new: NewCity) -> anyhow::Result<City>;

    /// Compare-and-swap update keyed on `(id, version)` in one statement.
    /// Returns the number of rows affected: 0 means the id is gone or the
    /// version is stale, which the service disambiguates.
    async fn update(&self, city: &City) -> anyhow::Result<u64>;

    /// Delete by id, returning the removed record if it existed.
    async fn delete(&self, id: i32) -> anyhow::Result<Option<City>>;

    async fn exists(&self, id: i32) -> anyhow::Result<bool>;

    /// Does any *other* city (different id) share the candidate's
    /// name/lat/lon/country uniqueness key?
    async fn is_dupe(&self, probe: &City) -> anyhow::Result<bool>;
}

/// Persistence port for countries.
#[async_trait]
pub trait CountriesRepository: Send + Sync {
    /// One page of the country listing projection (city count included).
    async fn list_page(&self, req: &PageRequest)
        -> Result<PagedResult<CountryListing>, PageError>;

    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<Country>>;

    async fn insert(&self, new: NewCountry) -> anyhow::Result<Country>;

    /// Compare-and-swap update, see [`CitiesRepository::update`].
    async fn update(&self, country: &Country) -> anyhow::Result<u64>;

    async fn delete(&self, id: i32) -> anyhow::Result<Option<Country>>;

    async fn exists(&self, id: i32) -> anyhow::Result<bool>;

    /// Is `value` already taken for `field` by a country other than `id`?
    async fn field_in_use(
        &self,
        id: i32,
        field: CountryDupeField,
        value: &str,
    ) -> anyhow::Result<bool>;
}
