use std::sync::Arc;

use page_core::PagedResult;
use tracing::{debug, info, instrument};

use crate::config::WorldCitiesConfig;
use crate::domain::error::DomainError;
use crate::domain::model::{City, CityListing, ListRequest, NewCity};
use crate::domain::page_request;
use crate::domain::repo::CitiesRepository;

use rust_decimal::Decimal;

/// Domain service for cities. Stateless per call; depends only on the
/// repository port, not on infra types.
#[derive(Clone)]
pub struct CitiesService {
    repo: Arc<dyn CitiesRepository>,
    config: WorldCitiesConfig,
}

impl CitiesService {
    pub fn new(repo: Arc<dyn CitiesRepository>, config: WorldCitiesConfig) -> Self {
        Self { repo, config }
    }

    /// Paged, sortable, filterable city listing over the country-name
    /// projection. Column validation errors from the paging layer pass
    /// through untouched.
    #[instrument(name = "worldcities.cities.list", skip(self, raw))]
    pub async fn list(&self, raw: ListRequest) -> Result<PagedResult<CityListing>, DomainError> {
        let req = page_request(&raw, &self.config)?;
        let page = self.repo.list_page(&req).await?;
        debug!(
            rows = page.data().len(),
            total = page.total_count(),
            "listed cities"
        );
        Ok(page)
    }

    #[instrument(name = "worldcities.cities.get", skip(self), fields(city_id = id))]
    pub async fn get(&self, id: i32) -> Result<City, DomainError> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::city_not_found(id))
    }

    #[instrument(name = "worldcities.cities.create", skip(self, new), fields(name = %new.name))]
    pub async fn create(&self, new: NewCity) -> Result<City, DomainError> {
        validate_name(&new.name, &new.name_ascii)?;
        validate_coordinates(new.lat, new.lon)?;

        let city = self
            .repo
            .insert(new)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        info!("created city id={}", city.id);
        Ok(city)
    }

    /// Full-record update guarded by the version counter. The path id must
    /// match the record's own id; a zero-row compare-and-swap means the
    /// record is either gone (`CityNotFound`) or was changed by someone
    /// else (`VersionConflict`).
    #[instrument(name = "worldcities.cities.update", skip(self, city), fields(city_id = path_id))]
    pub async fn update(&self, path_id: i32, city: City) -> Result<(), DomainError> {
        if path_id != city.id {
            return Err(DomainError::id_mismatch(path_id, city.id));
        }
        validate_name(&city.name, &city.name_ascii)?;
        validate_coordinates(city.lat, city.lon)?;

        let rows = self
            .repo
            .update(&city)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        if rows == 0 {
            if !self
                .repo
                .exists(city.id)
                .await
                .map_err(|e| DomainError::database(e.to_string()))?
            {
                return Err(DomainError::city_not_found(city.id));
            }
            return Err(DomainError::version_conflict(city.id));
        }
        info!("updated city id={}", city.id);
        Ok(())
    }

    #[instrument(name = "worldcities.cities.delete", skip(self), fields(city_id = id))]
    pub async fn delete(&self, id: i32) -> Result<City, DomainError> {
        let deleted = self
            .repo
            .delete(id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::city_not_found(id))?;
        info!("deleted city id={}", id);
        Ok(deleted)
    }

    /// Does another city already carry the candidate's
    /// name/lat/lon/country key? The candidate's own id never matches, so
    /// re-saving a record unchanged is not a duplicate.
    #[instrument(name = "worldcities.cities.is_dupe", skip(self, probe))]
    pub async fn is_dupe(&self, probe: &City) -> Result<bool, DomainError> {
        self.repo
            .is_dupe(probe)
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }
}

fn validate_name(name: &str, name_ascii: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("name", "cannot be empty"));
    }
    if name_ascii.trim().is_empty() {
        return Err(DomainError::validation("nameAscii", "cannot be empty"));
    }
    Ok(())
}

fn validate_coordinates(lat: Decimal, lon: Decimal) -> Result<(), DomainError> {
    if lat < Decimal::from(-90) || lat > Decimal::from(90) {
        return Err(DomainError::validation("lat", "must be within [-90, 90]"));
    }
    if lon < Decimal::from(-180) || lon > Decimal::from(180) {
        return Err(DomainError::validation("lon", "must be within [-180, 180]"));
    }
    Ok(())
}
