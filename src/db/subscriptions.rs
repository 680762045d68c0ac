use sqlx::{postgres::PgRow, Executor, Postgres, Row};

use super::{decode_error, weekday_column};
use crate::billing::models::{Frequency, Subscription};

/// Lists subscriptions ordered by id, optionally scoped to a single user.
pub async fn list_subscriptions<'c, E>(
    executor: E,
    user_id: Option<i32>,
) -> Result<Vec<Subscription>, sqlx::Error>
where
    E: Executor<'c, Database = Postgres>,
{
    let rows = sqlx::query(
        r#"
        SELECT
            id,
            user_id,
            paper_id,
            frequency,
            weekday,
            day_of_month,
            start_date,
            end_date
        FROM subscriptions
        WHERE $1::INT IS NULL OR user_id = $1
        ORDER BY id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(executor)
    .await?;

    rows.iter().map(map_row).collect()
}

fn map_row(row: &PgRow) -> Result<Subscription, sqlx::Error> {
    let frequency: String = row.try_get("frequency")?;
    let frequency = Frequency::parse(&frequency)
        .ok_or_else(|| decode_error("frequency", format!("unknown frequency `{frequency}`")))?;
    let day_of_month: Option<i32> = row.try_get("day_of_month")?;
    let day_of_month = day_of_month
        .map(|day| {
            u32::try_from(day)
                .map_err(|_| decode_error("day_of_month", format!("negative day of month {day}")))
        })
        .transpose()?;

    Ok(Subscription {
        id: row.get("id"),
        user_id: row.get("user_id"),
        paper_id: row.get("paper_id"),
        frequency,
        weekday: weekday_column(row, "weekday")?,
        day_of_month,
        start_date: row.try_get("start_date")?,
        end_date: row.try_get("end_date")?,
    })
}
