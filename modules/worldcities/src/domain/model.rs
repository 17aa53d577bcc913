use rust_decimal::Decimal;

/// A stored city. `version` is the optimistic-concurrency counter; every
/// successful update increments it, and updates carry the version they
/// read so stale writers are detected instead of overwriting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct City {
    pub id: i32,
    /// City name in UTF-8.
    pub name: String,
    /// City name transliterated to ASCII.
    pub name_ascii: String,
    pub lat: Decimal,
    pub lon: Decimal,
    /// References an existing country.
    pub country_id: i32,
    pub version: i32,
}

/// Data for creating a new city; id and version are assigned on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCity {
    pub name: String,
    pub name_ascii: String,
    pub lat: Decimal,
    pub lon: Decimal,
    pub country_id: i32,
}

/// Listing projection of a city, flattening the country display name so
/// listings can sort and filter on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityListing {
    pub id: i32,
    pub name: String,
    pub name_ascii: String,
    pub lat: Decimal,
    pub lon: Decimal,
    pub country_id: i32,
    pub country_name: String,
}

/// A stored country.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Country {
    pub id: i32,
    pub name: String,
    /// ISO 3166-1 alpha-2 code.
    pub iso2: String,
    /// ISO 3166-1 alpha-3 code.
    pub iso3: String,
    pub version: i32,
}

/// Data for creating a new country.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCountry {
    pub name: String,
    pub iso2: String,
    pub iso3: String,
}

/// Listing projection of a country with the count of referencing cities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryListing {
    pub id: i32,
    pub name: String,
    pub iso2: String,
    pub iso3: String,
    pub tot_cities: i64,
}

/// Which country field a duplicate probe checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountryDupeField {
    Name,
    Iso2,
    Iso3,
}

impl CountryDupeField {
    /// Parse the wire selector. Unknown names are `None`; the caller
    /// answers "not a duplicate" for those rather than erroring.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "name" => Some(Self::Name),
            "iso2" => Some(Self::Iso2),
            "iso3" => Some(Self::Iso3),
            _ => None,
        }
    }
}

/// Raw listing parameters as they arrive from the caller, before
/// validation and defaulting.
#[derive(Debug, Clone, Default)]
pub struct ListRequest {
    pub page_index: Option<i64>,
    pub page_size: Option<i64>,
    pub sort_column: Option<String>,
    pub sort_order: Option<String>,
    pub filter_column: Option<String>,
    pub filter_query: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dupe_field_selector_is_case_insensitive_and_closed() {
        assert_eq!(CountryDupeField::parse("Name"), Some(CountryDupeField::Name));
        assert_eq!(CountryDupeField::parse("ISO2"), Some(CountryDupeField::Iso2));
        assert_eq!(CountryDupeField::parse("iso3"), Some(CountryDupeField::Iso3));
        assert_eq!(CountryDupeField::parse("id"), None);
        assert_eq!(CountryDupeField::parse(""), None);
    }
}
