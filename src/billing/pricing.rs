use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use super::models::{weekday_label, PriceRule};

/// Which rule a resolved price came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceTier {
    Default,
    Day(Weekday),
}

impl PriceTier {
    pub fn label(&self) -> &'static str {
        match self {
            PriceTier::Default => "default",
            PriceTier::Day(weekday) => weekday_label(*weekday),
        }
    }

    // Default first, then Monday..Sunday
    fn rank(&self) -> u32 {
        match self {
            PriceTier::Default => 0,
            PriceTier::Day(weekday) => weekday.number_from_monday(),
        }
    }
}

impl Ord for PriceTier {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for PriceTier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedPrice {
    pub amount: f64,
    pub tier: PriceTier,
}

impl ResolvedPrice {
    pub const UNPRICED: ResolvedPrice = ResolvedPrice {
        amount: 0.0,
        tier: PriceTier::Default,
    };
}

/// key: billing-pricing -> unit price of a paper on a date
///
/// A rule for the date's weekday wins over the fallback rule; with neither the
/// price is zero. Duplicate candidates resolve to the lowest rule id.
pub fn resolve_price(rules: &[PriceRule], date: NaiveDate) -> ResolvedPrice {
    let weekday = date.weekday();
    let day_specific = rules
        .iter()
        .filter(|rule| rule.day_of_week == Some(weekday))
        .min_by_key(|rule| rule.id);
    if let Some(rule) = day_specific {
        return ResolvedPrice {
            amount: rule.price,
            tier: PriceTier::Day(weekday),
        };
    }

    rules
        .iter()
        .filter(|rule| rule.day_of_week.is_none())
        .min_by_key(|rule| rule.id)
        .map(|rule| ResolvedPrice {
            amount: rule.price,
            tier: PriceTier::Default,
        })
        .unwrap_or(ResolvedPrice::UNPRICED)
}

/// Price rules grouped per paper, loaded once per computation.
#[derive(Debug, Clone, Default)]
pub struct PriceBook {
    rules: HashMap<i32, Vec<PriceRule>>,
}

impl PriceBook {
    pub fn insert(&mut self, paper_id: i32, rules: Vec<PriceRule>) {
        self.rules.insert(paper_id, rules);
    }

    pub fn contains(&self, paper_id: i32) -> bool {
        self.rules.contains_key(&paper_id)
    }

    pub fn resolve(&self, paper_id: i32, date: NaiveDate) -> ResolvedPrice {
        self.rules
            .get(&paper_id)
            .map(|rules| resolve_price(rules, date))
            .unwrap_or(ResolvedPrice::UNPRICED)
    }
}
