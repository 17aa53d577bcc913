use std::collections::HashMap;

use page_core::PageError;
use sea_orm::sea_query::{IntoColumnRef, SimpleExpr};

/// Value shape of a registered column, used to pick the containment
/// predicate form (text columns match directly, everything else through a
/// text cast).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Integer,
    Decimal,
}

/// A whitelisted listing column: the SQL expression to sort/filter on.
///
/// Stored as a `SimpleExpr` rather than an entity column so projected
/// fields (a joined display name, a correlated-subquery count) are
/// first-class sort and filter targets. Expressions referencing a plain
/// column must be table-qualified; listings run over joins where bare
/// column names turn ambiguous.
#[derive(Clone, Debug)]
pub struct ListColumn {
    expr: SimpleExpr,
    kind: ColumnKind,
}

impl ListColumn {
    pub fn expr(&self) -> SimpleExpr {
        self.expr.clone()
    }

    pub fn kind(&self) -> ColumnKind {
        self.kind
    }
}

/// Closed mapping from API column name to a typed accessor, registered per
/// entity at startup.
///
/// Keys are lowercased, so lookups are case-insensitive; the registered
/// names are the contract. A name missing from the map can only ever
/// produce `PageError::UnknownColumn` — no caller string reaches the SQL
/// layer without passing `resolve`.
#[derive(Clone, Default)]
pub struct ColumnMap {
    map: HashMap<String, ListColumn>,
}

impl ColumnMap {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Register a table-qualified column, e.g.
    /// `(city::Entity, city::Column::Name)`.
    pub fn column(
        self,
        api_name: impl Into<String>,
        col: impl IntoColumnRef,
        kind: ColumnKind,
    ) -> Self {
        self.expr(api_name, SimpleExpr::Column(col.into_column_ref()), kind)
    }

    /// Register an arbitrary expression (subquery, function call).
    pub fn expr(
        mut self,
        api_name: impl Into<String>,
        expr: impl Into<SimpleExpr>,
        kind: ColumnKind,
    ) -> Self {
        self.map.insert(
            api_name.into().to_lowercase(),
            ListColumn {
                expr: expr.into(),
                kind,
            },
        );
        self
    }

    /// Non-strict probe: does the column exist?
    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(&name.to_lowercase())
    }

    /// Strict lookup; unknown names fail loudly with the offending name.
    pub fn resolve(&self, name: &str) -> Result<&ListColumn, PageError> {
        self.map
            .get(&name.to_lowercase())
            .ok_or_else(|| PageError::UnknownColumn(name.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::sea_query::Alias;

    fn map() -> ColumnMap {
        ColumnMap::new().column(
            "countryName",
            (Alias::new("countries"), Alias::new("name")),
            ColumnKind::Text,
        )
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let map = map();
        assert!(map.contains("countryname"));
        assert!(map.contains("COUNTRYNAME"));
        assert!(map.contains("countryName"));
        assert!(map.resolve("CountryName").is_ok());
    }

    #[test]
    fn unknown_name_fails_with_the_offending_name() {
        let err = map().resolve("country_name").unwrap_err();
        assert_eq!(err, PageError::UnknownColumn("country_name".to_owned()));
    }
}
