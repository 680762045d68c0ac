mod common;

use agency::billing::{PaymentState, PendingSource};
use agency::AppError;
use chrono::Weekday;
use common::*;

// key: arrears-tests -> carry-forward across paid, partial and unrecorded months
fn subscribed_from_january() -> agency::MemoryStore {
    herald_store().with_subscription(starting(daily(1, 1, 1), date(2024, 1, 1)))
}

#[tokio::test]
async fn paid_partial_and_missing_months_contribute_differently() {
    let store = subscribed_from_january()
        .with_payment_status(payment(1, 1, 2024, 1, PaymentState::Paid, 0.0))
        .with_payment_status(payment(2, 1, 2024, 2, PaymentState::Partial, 50.0));

    let pending = engine(store).pending_balance(1, 2024, 4).await.unwrap();

    let labels: Vec<&str> = pending
        .pending_lines
        .iter()
        .map(|line| line.label.as_str())
        .collect();
    assert_eq!(labels, vec!["2024-Feb", "2024-Mar"]);

    let february = &pending.pending_lines[0];
    assert_eq!(february.amount, 50.0);
    assert_eq!(february.source, PendingSource::PartialBalance);

    let march = &pending.pending_lines[1];
    assert_eq!(march.amount, 155.0);
    assert_eq!(march.source, PendingSource::Recomputed);

    assert_eq!(pending.pending_total, 205.0);
}

#[tokio::test]
async fn partial_balance_is_used_even_when_recomputation_differs() {
    // February would recompute to 145.00; the stored balance is authoritative
    let store = subscribed_from_january()
        .with_payment_status(payment(1, 1, 2024, 1, PaymentState::Paid, 0.0))
        .with_payment_status(payment(2, 1, 2024, 2, PaymentState::Partial, 12.5));

    let pending = engine(store).pending_balance(1, 2024, 3).await.unwrap();

    assert_eq!(pending.pending_lines.len(), 1);
    assert_eq!(pending.pending_lines[0].amount, 12.5);
    assert_eq!(pending.pending_total, 12.5);
}

#[tokio::test]
async fn unpaid_rows_are_recomputed_like_missing_ones() {
    let store = subscribed_from_january()
        .with_payment_status(payment(1, 1, 2024, 1, PaymentState::Unpaid, 999.0));

    let pending = engine(store).pending_balance(1, 2024, 2).await.unwrap();

    assert_eq!(pending.pending_lines.len(), 1);
    assert_eq!(pending.pending_lines[0].amount, 155.0);
    assert_eq!(pending.pending_lines[0].source, PendingSource::Recomputed);
}

#[tokio::test]
async fn fully_paid_history_owes_nothing() {
    let store = subscribed_from_january()
        .with_payment_status(payment(1, 1, 2024, 1, PaymentState::Paid, 0.0))
        .with_payment_status(payment(2, 1, 2024, 2, PaymentState::Paid, 0.0));

    let pending = engine(store).pending_balance(1, 2024, 3).await.unwrap();

    assert!(pending.pending_lines.is_empty());
    assert_eq!(pending.pending_total, 0.0);
}

#[tokio::test]
async fn walk_starts_in_the_month_of_the_earliest_start_and_wraps_years() {
    let store = herald_store()
        .with_paper(paper(2, "Mirror"))
        .with_price_rule(fallback_price(2, 2, 2.0))
        .with_subscription(starting(daily(1, 1, 1), date(2024, 1, 5)))
        .with_subscription(starting(weekly(2, 1, 2, Weekday::Sat), date(2023, 11, 15)));

    let pending = engine(store).pending_balance(1, 2024, 2).await.unwrap();

    let months: Vec<(i32, u32)> = pending
        .pending_lines
        .iter()
        .map(|line| (line.year, line.month))
        .collect();
    assert_eq!(months, vec![(2023, 11), (2023, 12), (2024, 1)]);

    // Saturdays on or after 2023-11-15: 18, 25
    assert_eq!(pending.pending_lines[0].amount, 4.0);
    assert_eq!(pending.pending_lines[0].label, "2023-Nov");
    // December 2023 has five Saturdays
    assert_eq!(pending.pending_lines[1].amount, 10.0);
    // January 2024: Herald from the 5th (27 days) plus four Saturdays
    assert_eq!(pending.pending_lines[2].amount, 27.0 * 5.0 + 4.0 * 2.0);
    assert_eq!(pending.pending_total, 4.0 + 10.0 + 143.0);
}

#[tokio::test]
async fn months_with_nothing_billed_are_not_listed() {
    let subscription = ending(
        starting(daily(1, 1, 1), date(2024, 1, 1)),
        date(2024, 1, 31),
    );
    let pending = engine(herald_store().with_subscription(subscription))
        .pending_balance(1, 2024, 4)
        .await
        .unwrap();

    assert_eq!(pending.pending_lines.len(), 1);
    assert_eq!(pending.pending_lines[0].label, "2024-Jan");
}

#[tokio::test]
async fn target_month_itself_is_never_pending() {
    let pending = engine(subscribed_from_january())
        .pending_balance(1, 2024, 1)
        .await
        .unwrap();

    assert!(pending.pending_lines.is_empty());
    assert_eq!(pending.pending_total, 0.0);
}

#[tokio::test]
async fn start_after_target_yields_nothing() {
    let store = herald_store().with_subscription(starting(daily(1, 1, 1), date(2024, 6, 1)));
    let pending = engine(store).pending_balance(1, 2024, 3).await.unwrap();
    assert!(pending.pending_lines.is_empty());
}

#[tokio::test]
async fn user_without_subscriptions_owes_nothing() {
    let pending = engine(herald_store()).pending_balance(1, 2024, 3).await.unwrap();
    assert_eq!(pending, Default::default());
}

#[tokio::test]
async fn subscriptions_without_any_start_date_are_an_integrity_error() {
    let store = herald_store().with_subscription(daily(1, 1, 1));
    let err = engine(store).pending_balance(1, 2024, 3).await.unwrap_err();
    assert!(matches!(err, AppError::DataIntegrity(_)));
}

#[tokio::test]
async fn exclusions_reduce_recomputed_arrears() {
    let store = subscribed_from_january().with_exclusion(exclusion(
        1,
        1,
        Some(1),
        date(2024, 1, 1),
        date(2024, 1, 10),
    ));

    let pending = engine(store).pending_balance(1, 2024, 2).await.unwrap();

    assert_eq!(pending.pending_total, 21.0 * 5.0);
}

#[tokio::test]
async fn missing_user_and_bad_month_are_rejected() {
    let engine = engine(subscribed_from_january());

    let err = engine.pending_balance(7, 2024, 3).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));

    let err = engine.pending_balance(1, 2024, 13).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidArgument(_)));
}
