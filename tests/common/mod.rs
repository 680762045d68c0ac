#![allow(dead_code)]

use std::sync::Arc;

use agency::billing::{
    BillingEngine, Exclusion, Frequency, MemoryStore, Paper, PaymentState, PaymentStatus,
    PriceRule, Subscription, User,
};
use chrono::{NaiveDate, Weekday};

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn engine(store: MemoryStore) -> BillingEngine {
    BillingEngine::new(Arc::new(store))
}

pub fn user(id: i32, flat_id: &str, apt_name: &str) -> User {
    User {
        id,
        name: format!("Resident {id}"),
        mobile: format!("90000000{id:02}"),
        flat_id: flat_id.to_string(),
        apt_name: apt_name.to_string(),
    }
}

pub fn paper(id: i32, name: &str) -> Paper {
    Paper {
        id,
        name: name.to_string(),
    }
}

pub fn fallback_price(id: i32, paper_id: i32, price: f64) -> PriceRule {
    PriceRule {
        id,
        paper_id,
        day_of_week: None,
        price,
    }
}

pub fn day_price(id: i32, paper_id: i32, weekday: Weekday, price: f64) -> PriceRule {
    PriceRule {
        id,
        paper_id,
        day_of_week: Some(weekday),
        price,
    }
}

pub fn daily(id: i32, user_id: i32, paper_id: i32) -> Subscription {
    Subscription {
        id,
        user_id,
        paper_id,
        frequency: Frequency::Daily,
        weekday: None,
        day_of_month: None,
        start_date: None,
        end_date: None,
    }
}

pub fn weekly(id: i32, user_id: i32, paper_id: i32, weekday: Weekday) -> Subscription {
    Subscription {
        frequency: Frequency::Weekly,
        weekday: Some(weekday),
        ..daily(id, user_id, paper_id)
    }
}

pub fn monthly(id: i32, user_id: i32, paper_id: i32, day_of_month: u32) -> Subscription {
    Subscription {
        frequency: Frequency::Monthly,
        day_of_month: Some(day_of_month),
        ..daily(id, user_id, paper_id)
    }
}

pub fn alternating(id: i32, user_id: i32, paper_id: i32, weekday: Weekday) -> Subscription {
    Subscription {
        frequency: Frequency::Alternating,
        weekday: Some(weekday),
        ..daily(id, user_id, paper_id)
    }
}

pub fn starting(mut subscription: Subscription, start: NaiveDate) -> Subscription {
    subscription.start_date = Some(start);
    subscription
}

pub fn ending(mut subscription: Subscription, end: NaiveDate) -> Subscription {
    subscription.end_date = Some(end);
    subscription
}

pub fn exclusion(
    id: i32,
    user_id: i32,
    paper_id: Option<i32>,
    from: NaiveDate,
    to: NaiveDate,
) -> Exclusion {
    Exclusion {
        id,
        user_id,
        paper_id,
        date_from: from,
        date_to: to,
    }
}

pub fn payment(
    id: i32,
    user_id: i32,
    year: i32,
    month: u32,
    status: PaymentState,
    balance: f64,
) -> PaymentStatus {
    PaymentStatus {
        id,
        user_id,
        year,
        month,
        status,
        amount_paid: 0.0,
        balance,
    }
}

/// One resident taking "Herald" (id 1) at a flat 5.00.
pub fn herald_store() -> MemoryStore {
    MemoryStore::new()
        .with_user(user(1, "A101", "Lake View"))
        .with_paper(paper(1, "Herald"))
        .with_price_rule(fallback_price(1, 1, 5.0))
}
