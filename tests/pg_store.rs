use std::sync::Arc;

use agency::billing::{AgencyStore, Frequency, PaymentState, PriceTier};
use agency::{BillingEngine, PgAgencyStore};
use chrono::{NaiveDate, Weekday};
use sqlx::PgPool;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

async fn seed(pool: &PgPool) -> (i32, i32) {
    sqlx::migrate!("./migrations").run(pool).await.unwrap();

    let user_id: i32 = sqlx::query_scalar(
        "INSERT INTO users (name, mobile, flat_id, apt_name) VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind("Asha")
    .bind("9000000001")
    .bind("A101")
    .bind("Lake View")
    .fetch_one(pool)
    .await
    .unwrap();

    let paper_id: i32 = sqlx::query_scalar("INSERT INTO papers (name) VALUES ($1) RETURNING id")
        .bind("Herald")
        .fetch_one(pool)
        .await
        .unwrap();

    sqlx::query("INSERT INTO paper_prices (paper_id, day_of_week, price) VALUES ($1, NULL, $2), ($1, 6, $3)")
        .bind(paper_id)
        .bind(5.0_f64)
        .bind(8.0_f64)
        .execute(pool)
        .await
        .unwrap();

    sqlx::query(
        "INSERT INTO subscriptions (user_id, paper_id, frequency, start_date) VALUES ($1, $2, 'daily', $3)",
    )
    .bind(user_id)
    .bind(paper_id)
    .bind(date(2024, 1, 1))
    .execute(pool)
    .await
    .unwrap();

    (user_id, paper_id)
}

// key: pg-store-tests -> sqlx store feeding the engine
#[sqlx::test]
#[ignore = "requires DATABASE_URL with Postgres server"]
async fn postgres_rows_decode_into_models(pool: PgPool) {
    let (user_id, paper_id) = seed(&pool).await;
    sqlx::query(
        "INSERT INTO subscriptions (user_id, paper_id, frequency, weekday, start_date) VALUES ($1, $2, 'alternating', 0, $3)",
    )
    .bind(user_id)
    .bind(paper_id)
    .bind(date(2024, 1, 1))
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO exclusions (user_id, paper_id, date_from, date_to) VALUES ($1, NULL, $2, $3)",
    )
    .bind(user_id)
    .bind(date(2024, 2, 1))
    .bind(date(2024, 2, 3))
    .execute(&pool)
    .await
    .unwrap();

    let store = PgAgencyStore::new(pool.clone());

    let user = store.get_user(user_id).await.unwrap().unwrap();
    assert_eq!(user.block(), "A");
    assert!(store.get_user(user_id + 100).await.unwrap().is_none());
    assert_eq!(store.get_paper(paper_id).await.unwrap().unwrap().name, "Herald");

    let rules = store.list_price_rules(paper_id).await.unwrap();
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[0].day_of_week, None);
    assert_eq!(rules[1].day_of_week, Some(Weekday::Sun));

    let subscriptions = store.list_subscriptions(Some(user_id)).await.unwrap();
    assert_eq!(subscriptions.len(), 2);
    assert_eq!(subscriptions[1].frequency, Frequency::Alternating);
    assert_eq!(subscriptions[1].weekday, Some(Weekday::Mon));
    assert_eq!(store.list_subscriptions(None).await.unwrap().len(), 2);
    assert!(store
        .list_subscriptions(Some(user_id + 100))
        .await
        .unwrap()
        .is_empty());

    let exclusions = store.list_exclusions(user_id).await.unwrap();
    assert_eq!(exclusions.len(), 1);
    assert_eq!(exclusions[0].paper_id, None);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL with Postgres server"]
async fn payment_status_months_are_one_based(pool: PgPool) {
    let (user_id, _) = seed(&pool).await;
    sqlx::query(
        "INSERT INTO bill_payment_status (user_id, year, month, status, amount_paid, balance) VALUES ($1, 2024, 2, 'partial', 100, 45)",
    )
    .bind(user_id)
    .execute(&pool)
    .await
    .unwrap();

    let store = PgAgencyStore::new(pool.clone());
    let february = store.payment_status(user_id, 2024, 2).await.unwrap().unwrap();
    assert_eq!(february.month, 2);
    assert_eq!(february.status, PaymentState::Partial);
    assert_eq!(february.balance, 45.0);
    assert!(store.payment_status(user_id, 2024, 1).await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL with Postgres server"]
async fn engine_bills_from_postgres(pool: PgPool) {
    let (user_id, _) = seed(&pool).await;
    sqlx::query(
        "INSERT INTO bill_payment_status (user_id, year, month, status, amount_paid, balance) VALUES ($1, 2024, 1, 'paid', 175, 0)",
    )
    .bind(user_id)
    .execute(&pool)
    .await
    .unwrap();

    let engine = BillingEngine::new(Arc::new(PgAgencyStore::new(pool)));

    // March 2024: 26 weekdays at 5.00 and 5 Sundays at 8.00
    let bill = engine.monthly_bill(user_id, 2024, 3).await.unwrap();
    assert_eq!(bill.total, 170.0);
    assert_eq!(bill.line("Herald", PriceTier::Day(Weekday::Sun)).unwrap().quantity, 5);

    // February 2024: 25 weekdays at 5.00 and 4 Sundays at 8.00
    let pending = engine.pending_balance(user_id, 2024, 3).await.unwrap();
    assert_eq!(pending.pending_lines.len(), 1);
    assert_eq!(pending.pending_total, 157.0);

    let indent = engine.indent(date(2024, 3, 4)).await.unwrap();
    assert_eq!(indent.quantity("Herald", "Lake View", "A"), 1);
}
