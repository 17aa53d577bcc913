use page_core::{PageError, PageRequest, PagedResult, SortDir};
use sea_orm::sea_query::{Expr, LikeExpr, Order, SimpleExpr};
use sea_orm::{
    ConnectionTrait, EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select,
};
use tracing::debug;

use crate::columns::{ColumnKind, ColumnMap, ListColumn};

fn like_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '%' | '_' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            c => out.push(c),
        }
    }
    out
}

fn like_contains(s: &str) -> String {
    format!("%{}%", like_escape(s))
}

/// `column CONTAINS query` as a LIKE predicate. Non-text columns are
/// compared through a text cast so the containment semantics hold for
/// identifiers and coordinates too.
fn contains_predicate(col: &ListColumn, query: &str) -> SimpleExpr {
    let target = match col.kind() {
        ColumnKind::Text => col.expr(),
        ColumnKind::Integer | ColumnKind::Decimal => {
            Expr::cust_with_expr("CAST(? AS TEXT)", col.expr())
        }
    };
    Expr::expr(target).like(LikeExpr::new(like_contains(query)).escape('\\'))
}

/// Run one paged listing over a base select.
///
/// The base select carries the projection and any joins; this function
/// composes, in order: the containment filter (when the request has one),
/// the count of the *filtered* set, the ordering, and the offset/limit
/// window, then materializes the page into `R` rows.
///
/// Column names are resolved against `columns` before any statement runs;
/// an unknown sort or filter column aborts with
/// [`PageError::UnknownColumn`]. Without a sort column no ORDER BY is
/// emitted, so row order is backend-defined and not guaranteed stable
/// across calls.
///
/// The count and the fetch are two statements over the same filter, not a
/// transaction; a record inserted between them may or may not appear.
pub async fn paginate<E, R, C>(
    base: Select<E>,
    conn: &C,
    columns: &ColumnMap,
    req: &PageRequest,
) -> Result<PagedResult<R>, PageError>
where
    E: EntityTrait,
    E::Model: Send + Sync,
    R: FromQueryResult + Send + Sync,
    C: ConnectionTrait,
{
    // Resolve caller-supplied names up front: reject before touching the
    // database.
    let filter = req
        .filter()
        .map(|f| columns.resolve(f.column()).map(|col| (col, f.query())))
        .transpose()?;
    let sort = req
        .sort()
        .map(|s| columns.resolve(s.column()).map(|col| (col, s.dir())))
        .transpose()?;

    let mut select = base;

    if let Some((col, query)) = filter {
        select = select.filter(contains_predicate(col, query));
    }

    // Pagination metadata reflects the filtered view, not the raw source.
    let total_count = select
        .clone()
        .count(conn)
        .await
        .map_err(|e| PageError::Db(e.to_string()))?;

    if let Some((col, dir)) = sort {
        let order = match dir {
            SortDir::Asc => Order::Asc,
            SortDir::Desc => Order::Desc,
        };
        select = select.order_by(col.expr(), order);
    }

    let rows = select
        .offset(req.offset())
        .limit(req.page_size())
        .into_model::<R>()
        .all(conn)
        .await
        .map_err(|e| PageError::Db(e.to_string()))?;

    debug!(
        total_count,
        page_index = req.page_index(),
        rows = rows.len(),
        "paged listing materialized"
    );

    Ok(PagedResult::new(rows, total_count, req))
}
