//! Sqlite database operations for the CRUD resources.
//!
//! Each resource maps onto one table whose columns carry the same names as the struct fields. The
//! [`SqliteResource`] trait supplies the table name and knows how to bind its own fields, so one set of generic
//! functions serves every resource.
use log::trace;
use sqlx::{query_builder::Separated, sqlite::SqliteRow, FromRow, QueryBuilder, Sqlite, SqliteConnection};

use crate::{
    db_types::Record,
    resource_types::{Bid, CurvePoint, Rating, Resource, RuleName, Trade},
    ResourceApiError,
};

pub trait SqliteResource: Resource + for<'r> FromRow<'r, SqliteRow> {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];

    /// Binds the field values, in [`COLUMNS`](SqliteResource::COLUMNS) order.
    fn push_values<'args>(&'args self, row: &mut Separated<'_, 'args, Sqlite, &'static str>);

    /// Binds `column = value` pairs for an UPDATE statement.
    fn push_assignments<'args>(&'args self, row: &mut Separated<'_, 'args, Sqlite, &'static str>);
}

macro_rules! sqlite_resource {
    ($resource:ty => $table:literal { $($field:ident),+ $(,)? }) => {
        impl SqliteResource for $resource {
            const TABLE: &'static str = $table;
            const COLUMNS: &'static [&'static str] = &[$(stringify!($field)),+];

            fn push_values<'args>(&'args self, row: &mut Separated<'_, 'args, Sqlite, &'static str>) {
                $( row.push_bind(&self.$field); )+
            }

            fn push_assignments<'args>(&'args self, row: &mut Separated<'_, 'args, Sqlite, &'static str>) {
                $(
                    row.push(concat!(stringify!($field), " = "));
                    row.push_bind_unseparated(&self.$field);
                )+
            }
        }
    };
}

sqlite_resource!(Bid => "bids" {
    account, bid_type, bid_quantity, ask_quantity, bid, ask, benchmark, bid_list_date, commentary, bid_security,
    bid_status, trader, book, creation_name, creation_date, revision_name, revision_date, deal_name, deal_type,
    source_list_id, side,
});

sqlite_resource!(Trade => "trades" {
    account, trade_type, buy_quantity, sell_quantity, buy_price, sell_price, trade_date, trade_security,
    trade_status, trader, benchmark, book, creation_name, creation_date, revision_name, revision_date, deal_name,
    deal_type, source_list_id, side,
});

sqlite_resource!(CurvePoint => "curve_points" { curve_id, as_of_date, term, curve_point_value, creation_date });

sqlite_resource!(Rating => "ratings" { moodys_rating, sand_p_rating, fitch_rating, order_number });

sqlite_resource!(RuleName => "rule_names" { name, description, json, template, sql_str, sql_part });

pub async fn fetch_all<R: SqliteResource>(conn: &mut SqliteConnection) -> Result<Vec<Record<R>>, ResourceApiError> {
    let sql = format!("SELECT * FROM {} ORDER BY id", R::TABLE);
    let records = sqlx::query_as::<_, Record<R>>(&sql).fetch_all(conn).await?;
    trace!("🗃️ Fetched {} {} records", records.len(), R::NAME);
    Ok(records)
}

pub async fn fetch_by_id<R: SqliteResource>(
    id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<Record<R>>, ResourceApiError> {
    let sql = format!("SELECT * FROM {} WHERE id = ?", R::TABLE);
    let record = sqlx::query_as::<_, Record<R>>(&sql).bind(id).fetch_optional(conn).await?;
    Ok(record)
}

pub async fn insert<R: SqliteResource>(data: &R, conn: &mut SqliteConnection) -> Result<Record<R>, ResourceApiError> {
    let mut builder = QueryBuilder::<Sqlite>::new(format!("INSERT INTO {} (", R::TABLE));
    builder.push(R::COLUMNS.join(", "));
    builder.push(") VALUES (");
    data.push_values(&mut builder.separated(", "));
    builder.push(") RETURNING *");
    // RETURNING rows must be drained, or the statement is left unfinished on the pooled connection
    let record =
        builder.build_query_as::<Record<R>>().fetch_all(conn).await?.pop().ok_or(sqlx::Error::RowNotFound)?;
    trace!("🗃️ Inserted {} #{}", R::NAME, record.id);
    Ok(record)
}

pub async fn update<R: SqliteResource>(
    id: i64,
    data: &R,
    conn: &mut SqliteConnection,
) -> Result<Option<Record<R>>, ResourceApiError> {
    let mut builder = QueryBuilder::<Sqlite>::new(format!("UPDATE {} SET ", R::TABLE));
    data.push_assignments(&mut builder.separated(", "));
    builder.push(" WHERE id = ");
    builder.push_bind(id);
    builder.push(" RETURNING *");
    let record = builder.build_query_as::<Record<R>>().fetch_all(conn).await?.pop();
    Ok(record)
}

pub async fn delete<R: SqliteResource>(id: i64, conn: &mut SqliteConnection) -> Result<bool, ResourceApiError> {
    let sql = format!("DELETE FROM {} WHERE id = ?", R::TABLE);
    let result = sqlx::query(&sql).bind(id).execute(conn).await?;
    Ok(result.rows_affected() > 0)
}
