use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Countries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Countries::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Countries::Name).string().not_null())
                    .col(ColumnDef::new(Countries::Iso2).string_len(2).not_null())
                    .col(ColumnDef::new(Countries::Iso3).string_len(3).not_null())
                    .col(
                        ColumnDef::new(Countries::Version)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_countries_name")
                    .table(Countries::Table)
                    .col(Countries::Name)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("ix_countries_iso2")
                    .table(Countries::Table)
                    .col(Countries::Iso2)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("ix_countries_iso3")
                    .table(Countries::Table)
                    .col(Countries::Iso3)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Cities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Cities::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Cities::Name).string().not_null())
                    .col(ColumnDef::new(Cities::NameAscii).string().not_null())
                    .col(ColumnDef::new(Cities::Lat).decimal_len(7, 4).not_null())
                    .col(ColumnDef::new(Cities::Lon).decimal_len(7, 4).not_null())
                    .col(ColumnDef::new(Cities::CountryId).integer().not_null())
                    .col(
                        ColumnDef::new(Cities::Version)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cities_country_id")
                            .from(Cities::Table, Cities::CountryId)
                            .to(Countries::Table, Countries::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_cities_name")
                    .table(Cities::Table)
                    .col(Cities::Name)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("ix_cities_lat_lon")
                    .table(Cities::Table)
                    .col(Cities::Lat)
                    .col(Cities::Lon)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Cities::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Countries::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Countries {
    Table,
    Id,
    Name,
    Iso2,
    Iso3,
    Version,
}

#[derive(DeriveIden)]
enum Cities {
    Table,
    Id,
    Name,
    NameAscii,
    Lat,
    Lon,
    CountryId,
    Version,
}
