use std::collections::BTreeMap;

use serde::{ser::SerializeMap, Serialize, Serializer};
use tracing::debug;

use super::arrears::PendingResult;
use super::models::PaymentState;
use super::period::YearMonth;
use super::pricing::{PriceTier, ResolvedPrice};
use super::service::{BillingEngine, DeliveryPlan};
use crate::error::AppResult;

/// Display rounding; accumulation keeps full precision until output.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Bill lines are keyed by paper and the price tier that produced the charge.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineKey {
    pub paper: String,
    pub tier: PriceTier,
}

impl LineKey {
    /// `"Herald"` for the default tier, `"Herald (Sun)"` for a weekday tier.
    pub fn label(&self) -> String {
        match self.tier {
            PriceTier::Default => self.paper.clone(),
            PriceTier::Day(_) => format!("{} ({})", self.paper, self.tier.label()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillLine {
    pub quantity: u32,
    pub amount: f64,
    pub unit_price: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BillResult {
    #[serde(serialize_with = "serialize_items")]
    pub items: BTreeMap<LineKey, BillLine>,
    pub total: f64,
}

impl BillResult {
    pub fn line(&self, paper: &str, tier: PriceTier) -> Option<&BillLine> {
        self.items.get(&LineKey {
            paper: paper.to_string(),
            tier,
        })
    }
}

fn serialize_items<S>(items: &BTreeMap<LineKey, BillLine>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(items.len()))?;
    for (key, line) in items {
        map.serialize_entry(&key.label(), line)?;
    }
    map.end()
}

/// Running per-line totals for one month of deliveries.
#[derive(Debug, Default)]
pub(crate) struct BillAccumulator {
    lines: BTreeMap<LineKey, BillLine>,
    total: f64,
}

impl BillAccumulator {
    pub fn record(&mut self, paper: &str, price: ResolvedPrice) {
        // zero-priced deliveries still happen but are never billed
        if price.amount == 0.0 {
            return;
        }
        let line = self
            .lines
            .entry(LineKey {
                paper: paper.to_string(),
                tier: price.tier,
            })
            .or_insert(BillLine {
                quantity: 0,
                amount: 0.0,
                unit_price: price.amount,
            });
        line.quantity += 1;
        line.amount += price.amount;
        line.unit_price = price.amount;
        self.total += price.amount;
    }

    pub fn raw_total(&self) -> f64 {
        self.total
    }

    pub fn finish(self) -> BillResult {
        let items = self
            .lines
            .into_iter()
            .map(|(key, line)| {
                let amount = round2(line.amount);
                (key, BillLine { amount, ..line })
            })
            .collect();
        BillResult {
            items,
            total: round2(self.total),
        }
    }
}

/// key: billing-statement -> walk every day of the month for one user
pub(crate) fn tally_month(plan: &DeliveryPlan, period: YearMonth) -> BillAccumulator {
    let mut accumulator = BillAccumulator::default();
    for day in period.days() {
        for (paper, price) in plan.deliveries_on(day) {
            accumulator.record(&paper.name, price);
        }
    }
    accumulator
}

/// Monthly bill combined with carried-forward arrears.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FullBill {
    pub user_id: i32,
    pub year: i32,
    pub month: u32,
    #[serde(serialize_with = "serialize_items")]
    pub items: BTreeMap<LineKey, BillLine>,
    pub total: f64,
    #[serde(flatten)]
    pub pending: PendingResult,
    pub grand_total: f64,
}

/// Proposed ledger row for a user with a non-zero bill, handed to the payment writer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusDraft {
    pub user_id: i32,
    pub user_name: String,
    pub year: i32,
    pub month: u32,
    pub status: PaymentState,
    pub amount_paid: f64,
    pub balance: f64,
}

impl BillingEngine {
    pub async fn monthly_bill(&self, user_id: i32, year: i32, month: u32) -> AppResult<BillResult> {
        let period = YearMonth::new(year, month)?;
        self.require_user(user_id).await?;
        let plan = self.load_plan(user_id).await?;
        let bill = tally_month(&plan, period).finish();
        debug!(
            user_id,
            year,
            month,
            lines = bill.items.len(),
            total = bill.total,
            "computed monthly bill"
        );
        Ok(bill)
    }

    pub async fn full_bill(&self, user_id: i32, year: i32, month: u32) -> AppResult<FullBill> {
        let bill = self.monthly_bill(user_id, year, month).await?;
        let pending = self.pending_balance(user_id, year, month).await?;
        let grand_total = round2(bill.total + pending.pending_total);
        Ok(FullBill {
            user_id,
            year,
            month,
            items: bill.items,
            total: bill.total,
            pending,
            grand_total,
        })
    }

    /// key: billing-drafts -> unpaid ledger proposals for every billable user
    pub async fn payment_drafts(&self, year: i32, month: u32) -> AppResult<Vec<PaymentStatusDraft>> {
        let period = YearMonth::new(year, month)?;
        let users = self.store().list_users().await?;
        let mut drafts = Vec::new();
        for user in users {
            let plan = self.load_plan(user.id).await?;
            let total = round2(tally_month(&plan, period).raw_total());
            if total <= 0.0 {
                continue;
            }
            drafts.push(PaymentStatusDraft {
                user_id: user.id,
                user_name: user.name,
                year,
                month,
                status: PaymentState::Unpaid,
                amount_paid: 0.0,
                balance: total,
            });
        }
        debug!(year, month, drafts = drafts.len(), "prepared payment status drafts");
        Ok(drafts)
    }
}
