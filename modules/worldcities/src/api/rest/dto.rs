use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::model::{
    City, CityListing, Country, CountryListing, ListRequest, NewCity, NewCountry,
};

/// Full city record as stored, version included. PUT round-trips the
/// version the client read; `isDupe` ignores it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityDto {
    pub id: i32,
    pub name: String,
    pub name_ascii: String,
    pub lat: Decimal,
    pub lon: Decimal,
    pub country_id: i32,
    #[serde(default)]
    pub version: i32,
}

/// City listing row with the country display name flattened in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityListItemDto {
    pub id: i32,
    pub name: String,
    pub name_ascii: String,
    pub lat: Decimal,
    pub lon: Decimal,
    pub country_id: i32,
    pub country_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCityReq {
    pub name: String,
    pub name_ascii: String,
    pub lat: Decimal,
    pub lon: Decimal,
    pub country_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryDto {
    pub id: i32,
    pub name: String,
    pub iso2: String,
    pub iso3: String,
    #[serde(default)]
    pub version: i32,
}

/// Country listing row with the count of referencing cities.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryListItemDto {
    pub id: i32,
    pub name: String,
    pub iso2: String,
    pub iso3: String,
    pub tot_cities: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCountryReq {
    pub name: String,
    pub iso2: String,
    pub iso3: String,
}

/// Candidate for the country field-duplicate probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IsDupeFieldReq {
    pub country_id: i32,
    pub field_name: String,
    pub field_value: String,
}

/// Listing query parameters; all optional, defaults pageIndex=0 and
/// pageSize from module config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page_index: Option<i64>,
    pub page_size: Option<i64>,
    pub sort_column: Option<String>,
    pub sort_order: Option<String>,
    pub filter_column: Option<String>,
    pub filter_query: Option<String>,
}

// Conversions between REST DTOs and domain models.

impl From<ListQuery> for ListRequest {
    fn from(q: ListQuery) -> Self {
        Self {
            page_index: q.page_index,
            page_size: q.page_size,
            sort_column: q.sort_column,
            sort_order: q.sort_order,
            filter_column: q.filter_column,
            filter_query: q.filter_query,
        }
    }
}

impl From<City> for CityDto {
    fn from(c: City) -> Self {
        Self {
            id: c.id,
            name: c.name,
            name_ascii: c.name_ascii,
            lat: c.lat,
            lon: c.lon,
            country_id: c.country_id,
            version: c.version,
        }
    }
}

impl From<CityDto> for City {
    fn from(dto: CityDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            name_ascii: dto.name_ascii,
            lat: dto.lat,
            lon: dto.lon,
            country_id: dto.country_id,
            version: dto.version,
        }
    }
}

impl From<CityListing> for CityListItemDto {
    fn from(c: CityListing) -> Self {
        Self {
            id: c.id,
            name: c.name,
            name_ascii: c.name_ascii,
            lat: c.lat,
            lon: c.lon,
            country_id: c.country_id,
            country_name: c.country_name,
        }
    }
}

impl From<CreateCityReq> for NewCity {
    fn from(req: CreateCityReq) -> Self {
        Self {
            name: req.name,
            name_ascii: req.name_ascii,
            lat: req.lat,
            lon: req.lon,
            country_id: req.country_id,
        }
    }
}

impl From<Country> for CountryDto {
    fn from(c: Country) -> Self {
        Self {
            id: c.id,
            name: c.name,
            iso2: c.iso2,
            iso3: c.iso3,
            version: c.version,
        }
    }
}

impl From<CountryDto> for Country {
    fn from(dto: CountryDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            iso2: dto.iso2,
            iso3: dto.iso3,
            version: dto.version,
        }
    }
}

impl From<CountryListing> for CountryListItemDto {
    fn from(c: CountryListing) -> Self {
        Self {
            id: c.id,
            name: c.name,
            iso2: c.iso2,
            iso3: c.iso3,
            tot_cities: c.tot_cities,
        }
    }
}

impl From<CreateCountryReq> for NewCountry {
    fn from(req: CreateCountryReq) -> Self {
        Self {
            name: req.name,
            iso2: req.iso2,
            iso3: req.iso3,
        }
    }
}
