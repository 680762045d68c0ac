use serde::Serialize;
use tracing::debug;

use super::models::PaymentState;
use super::period::YearMonth;
use super::service::BillingEngine;
use super::statement::{round2, tally_month};
use crate::error::{AppError, AppResult};

/// Where an arrears figure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingSource {
    /// No ledger row, or an unpaid one: the month was re-billed day by day.
    Recomputed,
    /// Partially paid month: the stored balance is authoritative.
    PartialBalance,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingLine {
    pub label: String,
    pub year: i32,
    pub month: u32,
    pub amount: f64,
    pub source: PendingSource,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingResult {
    pub pending_lines: Vec<PendingLine>,
    pub pending_total: f64,
}

impl BillingEngine {
    /// key: billing-arrears -> unpaid and partial months before the target month
    ///
    /// Walks every month from the one holding the user's earliest subscription
    /// start up to the month before `(year, month)`.
    pub async fn pending_balance(
        &self,
        user_id: i32,
        year: i32,
        month: u32,
    ) -> AppResult<PendingResult> {
        let target = YearMonth::new(year, month)?;
        self.require_user(user_id).await?;

        let plan = self.load_plan(user_id).await?;
        if plan.subscriptions.is_empty() {
            return Ok(PendingResult::default());
        }
        let earliest = plan.earliest_start().ok_or_else(|| {
            AppError::integrity(format!(
                "user {user_id} has subscriptions but none carries a start date"
            ))
        })?;
        let Some(last) = target.pred() else {
            return Ok(PendingResult::default());
        };

        let mut lines = Vec::new();
        let mut total = 0.0;
        for period in YearMonth::containing(earliest).through(last) {
            let status = self
                .store()
                .payment_status(user_id, period.year(), period.month())
                .await?;

            let contribution = match status {
                Some(row) if row.status == PaymentState::Paid => None,
                Some(row) if row.status == PaymentState::Partial => {
                    Some((row.balance, PendingSource::PartialBalance))
                }
                _ => Some((
                    tally_month(&plan, period).raw_total(),
                    PendingSource::Recomputed,
                )),
            };

            let Some((amount, source)) = contribution else {
                continue;
            };
            let owed = match source {
                PendingSource::Recomputed => amount > 0.0,
                PendingSource::PartialBalance => amount != 0.0,
            };
            if !owed {
                continue;
            }

            total += amount;
            lines.push(PendingLine {
                label: period.label(),
                year: period.year(),
                month: period.month(),
                amount: round2(amount),
                source,
            });
        }

        let result = PendingResult {
            pending_lines: lines,
            pending_total: round2(total),
        };
        debug!(
            user_id,
            year,
            month,
            months = result.pending_lines.len(),
            pending_total = result.pending_total,
            "reconciled pending balance"
        );
        Ok(result)
    }
}
