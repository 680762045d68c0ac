use sqlx::{postgres::PgRow, Executor, Postgres, Row};

use crate::billing::models::User;

pub async fn get_user<'c, E>(executor: E, user_id: i32) -> Result<Option<User>, sqlx::Error>
where
    E: Executor<'c, Database = Postgres>,
{
    let row = sqlx::query("SELECT id, name, mobile, flat_id, apt_name FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(executor)
        .await?;

    Ok(row.map(|row| map_row(&row)))
}

pub async fn list_users<'c, E>(executor: E) -> Result<Vec<User>, sqlx::Error>
where
    E: Executor<'c, Database = Postgres>,
{
    let rows = sqlx::query("SELECT id, name, mobile, flat_id, apt_name FROM users ORDER BY id ASC")
        .fetch_all(executor)
        .await?;

    Ok(rows.iter().map(map_row).collect())
}

fn map_row(row: &PgRow) -> User {
    User {
        id: row.get("id"),
        name: row.get("name"),
        mobile: row.get("mobile"),
        flat_id: row.get("flat_id"),
        apt_name: row.get("apt_name"),
    }
}
