//! SeaORM-backed repository for countries.

use std::sync::OnceLock;

use anyhow::Context;
use async_trait::async_trait;
use page_core::{PageError, PageRequest, PagedResult};
use page_db::{paginate, ColumnKind, ColumnMap};
use sea_orm::sea_query::{Expr, Func, IntoColumnRef, Query, SimpleExpr, SubQueryStatement};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QuerySelect, Set,
};

use crate::domain::model::{Country, CountryDupeField, CountryListing, NewCountry};
use crate::domain::repo::CountriesRepository;
use crate::infra::storage::{city, country};

#[derive(Debug, FromQueryResult)]
struct CountryRow {
    id: i32,
    name: String,
    iso2: String,
    iso3: String,
    tot_cities: i64,
}

impl From<CountryRow> for CountryListing {
    fn from(r: CountryRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            iso2: r.iso2,
            iso3: r.iso3,
            tot_cities: r.tot_cities,
        }
    }
}

/// Correlated count of cities referencing the current country row. Used
/// both in the projection and as the sort/filter target for `totCities`.
fn tot_cities_expr() -> SimpleExpr {
    let city_id = SimpleExpr::Column((city::Entity, city::Column::Id).into_column_ref());
    let sub = Query::select()
        .expr(Func::count(city_id))
        .from(city::Entity)
        .and_where(
            Expr::col((city::Entity, city::Column::CountryId))
                .equals((country::Entity, country::Column::Id)),
        )
        .to_owned();
    SimpleExpr::SubQuery(None, Box::new(SubQueryStatement::SelectStatement(sub)))
}

fn columns() -> &'static ColumnMap {
    static COLUMNS: OnceLock<ColumnMap> = OnceLock::new();
    COLUMNS.get_or_init(|| {
        ColumnMap::new()
            .column(
                "id",
                (country::Entity, country::Column::Id),
                ColumnKind::Integer,
            )
            .column(
                "name",
                (country::Entity, country::Column::Name),
                ColumnKind::Text,
            )
            .column(
                "iso2",
                (country::Entity, country::Column::Iso2),
                ColumnKind::Text,
            )
            .column(
                "iso3",
                (country::Entity, country::Column::Iso3),
                ColumnKind::Text,
            )
            .expr("totCities", tot_cities_expr(), ColumnKind::Integer)
    })
}

pub struct SeaOrmCountriesRepository {
    db: DatabaseConnection,
}

impl SeaOrmCountriesRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CountriesRepository for SeaOrmCountriesRepository {
    async fn list_page(
        &self,
        req: &PageRequest,
    ) -> Result<PagedResult<CountryListing>, PageError> {
        let base = country::Entity::find()
            .select_only()
            .column(country::Column::Id)
            .column(country::Column::Name)
            .column(country::Column::Iso2)
            .column(country::Column::Iso3)
            .expr_as(tot_cities_expr(), "tot_cities");

        let page: PagedResult<CountryRow> = paginate(base, &self.db, columns(), req).await?;
        Ok(page.map(CountryListing::from))
    }

    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<Country>> {
        let found = country::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find country by id failed")?;
        Ok(found.map(Into::into))
    }

    async fn insert(&self, new: NewCountry) -> anyhow::Result<Country> {
        let am = country::ActiveModel {
            name: Set(new.name),
            iso2: Set(new.iso2),
            iso3: Set(new.iso3),
            version: Set(0),
            ..Default::default()
        };
        let model = am.insert(&self.db).await.context("insert country failed")?;
        Ok(model.into())
    }

    async fn update(&self, c: &Country) -> anyhow::Result<u64> {
        let am = country::ActiveModel {
            name: Set(c.name.clone()),
            iso2: Set(c.iso2.clone()),
            iso3: Set(c.iso3.clone()),
            version: Set(c.version + 1),
            ..Default::default()
        };
        let res = country::Entity::update_many()
            .set(am)
            .filter(country::Column::Id.eq(c.id))
            .filter(country::Column::Version.eq(c.version))
            .exec(&self.db)
            .await
            .context("update country failed")?;
        Ok(res.rows_affected)
    }

    async fn delete(&self, id: i32) -> anyhow::Result<Option<Country>> {
        let Some(model) = country::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find country before delete failed")?
        else {
            return Ok(None);
        };
        country::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete country failed")?;
        Ok(Some(model.into()))
    }

    async fn exists(&self, id: i32) -> anyhow::Result<bool> {
        let count = country::Entity::find()
            .filter(country::Column::Id.eq(id))
            .count(&self.db)
            .await
            .context("country exists check failed")?;
        Ok(count > 0)
    }

    async fn field_in_use(
        &self,
        id: i32,
        field: CountryDupeField,
        value: &str,
    ) -> anyhow::Result<bool> {
        let column = match field {
            CountryDupeField::Name => country::Column::Name,
            CountryDupeField::Iso2 => country::Column::Iso2,
            CountryDupeField::Iso3 => country::Column::Iso3,
        };
        let count = country::Entity::find()
            .filter(column.eq(value))
            .filter(country::Column::Id.ne(id))
            .count(&self.db)
            .await
            .context("country duplicate check failed")?;
        Ok(count > 0)
    }
}
