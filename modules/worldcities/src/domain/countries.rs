use std::sync::Arc;

use page_core::PagedResult;
use tracing::{debug, info, instrument};

use crate::config::WorldCitiesConfig;
use crate::domain::error::DomainError;
use crate::domain::model::{Country, CountryDupeField, CountryListing, ListRequest, NewCountry};
use crate::domain::page_request;
use crate::domain::repo::CountriesRepository;

/// Domain service for countries.
#[derive(Clone)]
pub struct CountriesService {
    repo: Arc<dyn CountriesRepository>,
    config: WorldCitiesConfig,
}

impl CountriesService {
    pub fn new(repo: Arc<dyn CountriesRepository>, config: WorldCitiesConfig) -> Self {
        Self { repo, config }
    }

    /// Paged country listing including the per-country city count.
    #[instrument(name = "worldcities.countries.list", skip(self, raw))]
    pub async fn list(&self, raw: ListRequest) -> Result<PagedResult<CountryListing>, DomainError> {
        let req = page_request(&raw, &self.config)?;
        let page = self.repo.list_page(&req).await?;
        debug!(
            rows = page.data().len(),
            total = page.total_count(),
            "listed countries"
        );
        Ok(page)
    }

    #[instrument(name = "worldcities.countries.get", skip(self), fields(country_id = id))]
    pub async fn get(&self, id: i32) -> Result<Country, DomainError> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::country_not_found(id))
    }

    #[instrument(name = "worldcities.countries.create", skip(self, new), fields(name = %new.name))]
    pub async fn create(&self, new: NewCountry) -> Result<Country, DomainError> {
        validate_country(&new.name, &new.iso2, &new.iso3)?;

        let country = self
            .repo
            .insert(new)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        info!("created country id={}", country.id);
        Ok(country)
    }

    /// Version-guarded full-record update; see the cities counterpart for
    /// the compare-and-swap contract.
    #[instrument(
        name = "worldcities.countries.update",
        skip(self, country),
        fields(country_id = path_id)
    )]
    pub async fn update(&self, path_id: i32, country: Country) -> Result<(), DomainError> {
        if path_id != country.id {
            return Err(DomainError::id_mismatch(path_id, country.id));
        }
        validate_country(&country.name, &country.iso2, &country.iso3)?;

        let rows = self
            .repo
            .update(&country)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        if rows == 0 {
            if !self
                .repo
                .exists(country.id)
                .await
                .map_err(|e| DomainError::database(e.to_string()))?
            {
                return Err(DomainError::country_not_found(country.id));
            }
            return Err(DomainError::version_conflict(country.id));
        }
        info!("updated country id={}", country.id);
        Ok(())
    }

    #[instrument(name = "worldcities.countries.delete", skip(self), fields(country_id = id))]
    pub async fn delete(&self, id: i32) -> Result<Country, DomainError> {
        let deleted = self
            .repo
            .delete(id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::country_not_found(id))?;
        info!("deleted country id={}", id);
        Ok(deleted)
    }

    /// Is `field_value` already taken for the selected field by another
    /// country? Unknown field selectors answer `false`: the selector picks
    /// one of three fixed queries, it is not an open column reference.
    #[instrument(name = "worldcities.countries.is_dupe_field", skip(self, field_value))]
    pub async fn is_dupe_field(
        &self,
        country_id: i32,
        field_name: &str,
        field_value: &str,
    ) -> Result<bool, DomainError> {
        let Some(field) = CountryDupeField::parse(field_name) else {
            return Ok(false);
        };
        self.repo
            .field_in_use(country_id, field, field_value)
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }
}

fn validate_country(name: &str, iso2: &str, iso3: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("name", "cannot be empty"));
    }
    if iso2.len() != 2 || !iso2.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(DomainError::validation("iso2", "must be 2 letters"));
    }
    if iso3.len() != 3 || !iso3.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(DomainError::validation("iso3", "must be 3 letters"));
    }
    Ok(())
}
