use sqlx::{postgres::PgRow, Executor, Postgres, Row};

use super::weekday_column;
use crate::billing::models::{Paper, PriceRule};

pub async fn get_paper<'c, E>(executor: E, paper_id: i32) -> Result<Option<Paper>, sqlx::Error>
where
    E: Executor<'c, Database = Postgres>,
{
    let row = sqlx::query("SELECT id, name FROM papers WHERE id = $1")
        .bind(paper_id)
        .fetch_optional(executor)
        .await?;

    Ok(row.map(|row| Paper {
        id: row.get("id"),
        name: row.get("name"),
    }))
}

pub async fn list_price_rules<'c, E>(
    executor: E,
    paper_id: i32,
) -> Result<Vec<PriceRule>, sqlx::Error>
where
    E: Executor<'c, Database = Postgres>,
{
    let rows = sqlx::query(
        r#"
        SELECT id, paper_id, day_of_week, price
        FROM paper_prices
        WHERE paper_id = $1
        ORDER BY id ASC
        "#,
    )
    .bind(paper_id)
    .fetch_all(executor)
    .await?;

    rows.iter().map(map_price_rule).collect()
}

fn map_price_rule(row: &PgRow) -> Result<PriceRule, sqlx::Error> {
    Ok(PriceRule {
        id: row.get("id"),
        paper_id: row.get("paper_id"),
        day_of_week: weekday_column(row, "day_of_week")?,
        price: row.get("price"),
    })
}
