//! Executor-generic SQL accessors backing the Postgres store.

pub mod exclusions;
pub mod papers;
pub mod payment_status;
pub mod subscriptions;
pub mod users;

use chrono::Weekday;
use sqlx::{postgres::PgRow, Row};

use crate::billing::models::weekday_from_index;

pub(crate) fn decode_error(column: &str, message: String) -> sqlx::Error {
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: message.into(),
    }
}

pub(crate) fn weekday_column(row: &PgRow, column: &str) -> Result<Option<Weekday>, sqlx::Error> {
    let raw: Option<i32> = row.try_get(column)?;
    raw.map(|index| {
        weekday_from_index(index)
            .ok_or_else(|| decode_error(column, format!("weekday index {index} outside 0..=6")))
    })
    .transpose()
}
