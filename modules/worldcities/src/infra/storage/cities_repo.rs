//! SeaORM-backed repository for cities.

use std::sync::OnceLock;

use anyhow::Context;
use async_trait::async_trait;
use page_core::{PageError, PageRequest, PagedResult};
use page_db::{paginate, ColumnKind, ColumnMap};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QuerySelect, Set,
};

use rust_decimal::Decimal;

use crate::domain::model::{City, CityListing, NewCity};
use crate::domain::repo::CitiesRepository;
use crate::infra::storage::{city, country};

/// Listing row as selected from the joined query.
#[derive(Debug, FromQueryResult)]
struct CityRow {
    id: i32,
    name: String,
    name_ascii: String,
    lat: Decimal,
    lon: Decimal,
    country_id: i32,
    country_name: String,
}

impl From<CityRow> for CityListing {
    fn from(r: CityRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            name_ascii: r.name_ascii,
            lat: r.lat,
            lon: r.lon,
            country_id: r.country_id,
            country_name: r.country_name,
        }
    }
}

/// Whitelisted sort/filter columns for the city listing. The API names are
/// the listing DTO's camelCase field names; `countryName` points at the
/// joined countries table, which is why every entry is table-qualified.
fn columns() -> &'static ColumnMap {
    static COLUMNS: OnceLock<ColumnMap> = OnceLock::new();
    COLUMNS.get_or_init(|| {
        ColumnMap::new()
            .column("id", (city::Entity, city::Column::Id), ColumnKind::Integer)
            .column("name", (city::Entity, city::Column::Name), ColumnKind::Text)
            .column(
                "nameAscii",
                (city::Entity, city::Column::NameAscii),
                ColumnKind::Text,
            )
            .column("lat", (city::Entity, city::Column::Lat), ColumnKind::Decimal)
            .column("lon", (city::Entity, city::Column::Lon), ColumnKind::Decimal)
            .column(
                "countryId",
                (city::Entity, city::Column::CountryId),
                ColumnKind::Integer,
            )
            .column(
                "countryName",
                (country::Entity, country::Column::Name),
                ColumnKind::Text,
            )
    })
}

pub struct SeaOrmCitiesRepository {
    db: DatabaseConnection,
}

impl SeaOrmCitiesRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CitiesRepository for SeaOrmCitiesRepository {
    async fn list_page(&self, req: &PageRequest) -> Result<PagedResult<CityListing>, PageError> {
        let base = city::Entity::find()
            .select_only()
            .column(city::Column::Id)
            .column(city::Column::Name)
            .column(city::Column::NameAscii)
            .column(city::Column::Lat)
            .column(city::Column::Lon)
            .column(city::Column::CountryId)
            .column_as(country::Column::Name, "country_name")
            .inner_join(country::Entity);

        let page: PagedResult<CityRow> = paginate(base, &self.db, columns(), req).await?;
        Ok(page.map(CityListing::from))
    }

    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<City>> {
        let found = city::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find city by id failed")?;
        Ok(found.map(Into::into))
    }

    async fn insert(&self, new: NewCity) -> anyhow::Result<City> {
        let am = city::ActiveModel {
            name: Set(new.name),
            name_ascii: Set(new.name_ascii),
            lat: Set(new.lat),
            lon: Set(new.lon),
            country_id: Set(new.country_id),
            version: Set(0),
            ..Default::default()
        };
        let model = am.insert(&self.db).await.context("insert city failed")?;
        Ok(model.into())
    }

    async fn update(&self, c: &City) -> anyhow::Result<u64> {
        // Single-statement compare-and-swap on (id, version); no lock is
        // held between the caller's read and this write.
        let am = city::ActiveModel {
            name: Set(c.name.clone()),
            name_ascii: Set(c.name_ascii.clone()),
            lat: Set(c.lat),
            lon: Set(c.lon),
            country_id: Set(c.country_id),
            version: Set(c.version + 1),
            ..Default::default()
        };
        let res = city::Entity::update_many()
            .set(am)
            .filter(city::Column::Id.eq(c.id))
            .filter(city::Column::Version.eq(c.version))
            .exec(&self.db)
            .await
            .context("update city failed")?;
        Ok(res.rows_affected)
    }

    async fn delete(&self, id: i32) -> anyhow::Result<Option<City>> {
        let Some(model) = city::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find city before delete failed")?
        else {
            return Ok(None);
        };
        city::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete city failed")?;
        Ok(Some(model.into()))
    }

    async fn exists(&self, id: i32) -> anyhow::Result<bool> {
        let count = city::Entity::find()
            .filter(city::Column::Id.eq(id))
            .count(&self.db)
            .await
            .context("city exists check failed")?;
        Ok(count > 0)
    }

    async fn is_dupe(&self, probe: &City) -> anyhow::Result<bool> {
        let count = city::Entity::find()
            .filter(city::Column::Name.eq(probe.name.as_str()))
            .filter(city::Column::Lat.eq(probe.lat))
            .filter(city::Column::Lon.eq(probe.lon))
            .filter(city::Column::CountryId.eq(probe.country_id))
            .filter(city::Column::Id.ne(probe.id))
            .count(&self.db)
            .await
            .context("city duplicate check failed")?;
        Ok(count > 0)
    }
}
