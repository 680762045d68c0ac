use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// key: billing-models -> papers,prices,subscriptions,exclusions,ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paper {
    pub id: i32,
    pub name: String,
}

/// A `day_of_week` of `None` marks the fallback price for the paper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRule {
    pub id: i32,
    pub paper_id: i32,
    pub day_of_week: Option<Weekday>,
    pub price: f64,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Alternating,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Alternating => "alternating",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" => Some(Frequency::Daily),
            "weekly" => Some(Frequency::Weekly),
            "monthly" => Some(Frequency::Monthly),
            "alternating" => Some(Frequency::Alternating),
            _ => None,
        }
    }
}

/// key: billing-subscription-model -> recurring delivery rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: i32,
    pub user_id: i32,
    pub paper_id: i32,
    pub frequency: Frequency,
    pub weekday: Option<Weekday>,
    pub day_of_month: Option<u32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Inclusive suppression window. `paper_id` of `None` covers every paper of the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exclusion {
    pub id: i32,
    pub user_id: i32,
    pub paper_id: Option<i32>,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentState {
    Unpaid,
    Partial,
    Paid,
}

impl PaymentState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentState::Unpaid => "unpaid",
            PaymentState::Partial => "partial",
            PaymentState::Paid => "paid",
        }
    }

    /// Anything that is not recognisably paid or partial is owed in full.
    pub fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "paid" => PaymentState::Paid,
            "partial" => PaymentState::Partial,
            _ => PaymentState::Unpaid,
        }
    }
}

/// key: billing-ledger-model -> one row per (user, year, month), month is 1-based
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentStatus {
    pub id: i32,
    pub user_id: i32,
    pub year: i32,
    pub month: u32,
    pub status: PaymentState,
    pub amount_paid: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub mobile: String,
    pub flat_id: String,
    pub apt_name: String,
}

impl User {
    /// The block is encoded as the first character of the flat identifier.
    pub fn block(&self) -> String {
        self.flat_id.chars().next().map(String::from).unwrap_or_default()
    }
}

/// Maps the stored 0 = Monday .. 6 = Sunday convention onto chrono weekdays.
pub fn weekday_from_index(index: i32) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Mon),
        1 => Some(Weekday::Tue),
        2 => Some(Weekday::Wed),
        3 => Some(Weekday::Thu),
        4 => Some(Weekday::Fri),
        5 => Some(Weekday::Sat),
        6 => Some(Weekday::Sun),
        _ => None,
    }
}

pub fn weekday_index(weekday: Weekday) -> i32 {
    weekday.num_days_from_monday() as i32
}

pub fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}
