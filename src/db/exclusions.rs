use sqlx::{postgres::PgRow, Executor, Postgres, Row};

use crate::billing::models::Exclusion;

pub async fn list_exclusions<'c, E>(executor: E, user_id: i32) -> Result<Vec<Exclusion>, sqlx::Error>
where
    E: Executor<'c, Database = Postgres>,
{
    let rows = sqlx::query(
        r#"
        SELECT id, user_id, paper_id, date_from, date_to
        FROM exclusions
        WHERE user_id = $1
        ORDER BY id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(executor)
    .await?;

    rows.iter().map(map_row).collect()
}

fn map_row(row: &PgRow) -> Result<Exclusion, sqlx::Error> {
    Ok(Exclusion {
        id: row.get("id"),
        user_id: row.get("user_id"),
        paper_id: row.try_get("paper_id")?,
        date_from: row.try_get("date_from")?,
        date_to: row.try_get("date_to")?,
    })
}
