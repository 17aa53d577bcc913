//! Entity ↔ domain conversions.

use crate::domain::model::{City, Country};
use crate::infra::storage::{city, country};

impl From<city::Model> for City {
    fn from(m: city::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            name_ascii: m.name_ascii,
            lat: m.lat,
            lon: m.lon,
            country_id: m.country_id,
            version: m.version,
        }
    }
}

impl From<country::Model> for Country {
    fn from(m: country::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            iso2: m.iso2,
            iso3: m.iso3,
            version: m.version,
        }
    }
}
