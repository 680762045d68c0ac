use sqlx::{postgres::PgRow, Executor, Postgres, Row};

use super::decode_error;
use crate::billing::models::{PaymentState, PaymentStatus};

/// Month is 1-based on both the read and the write path.
pub async fn get_payment_status<'c, E>(
    executor: E,
    user_id: i32,
    year: i32,
    month: u32,
) -> Result<Option<PaymentStatus>, sqlx::Error>
where
    E: Executor<'c, Database = Postgres>,
{
    let row = sqlx::query(
        r#"
        SELECT id, user_id, year, month, status, amount_paid, balance
        FROM bill_payment_status
        WHERE user_id = $1 AND year = $2 AND month = $3
        ORDER BY id ASC
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .bind(year)
    .bind(month as i32)
    .fetch_optional(executor)
    .await?;

    row.map(|row| map_row(&row)).transpose()
}

fn map_row(row: &PgRow) -> Result<PaymentStatus, sqlx::Error> {
    let month: i32 = row.try_get("month")?;
    let month = u32::try_from(month)
        .ok()
        .filter(|month| (1..=12).contains(month))
        .ok_or_else(|| decode_error("month", format!("month {month} outside 1..=12")))?;
    let status: String = row.try_get("status")?;

    Ok(PaymentStatus {
        id: row.get("id"),
        user_id: row.get("user_id"),
        year: row.get("year"),
        month,
        status: PaymentState::from_str(&status),
        amount_paid: row.get("amount_paid"),
        balance: row.get("balance"),
    })
}
