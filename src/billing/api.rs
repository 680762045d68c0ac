use axum::{
    extract::{Extension, Path, Query},
    Json,
};
use chrono::{Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{BillResult, BillingEngine, FullBill, IndentResult, PaymentStatusDraft, PendingResult};
use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub month: Option<u32>,
}

impl PeriodQuery {
    fn require(&self) -> AppResult<(i32, u32)> {
        let year = self
            .year
            .ok_or_else(|| AppError::invalid("query parameter `year` is required"))?;
        let month = self
            .month
            .ok_or_else(|| AppError::invalid("query parameter `month` is required"))?;
        Ok((year, month))
    }
}

#[derive(Debug, Deserialize)]
pub struct IndentQuery {
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyBillEnvelope {
    pub user_id: i32,
    pub year: i32,
    pub month: u32,
    #[serde(flatten)]
    pub bill: BillResult,
}

/// key: billing-api -> rest endpoints
pub async fn monthly_bill(
    Extension(engine): Extension<BillingEngine>,
    Path(user_id): Path<i32>,
    Query(query): Query<PeriodQuery>,
) -> AppResult<Json<MonthlyBillEnvelope>> {
    let (year, month) = query.require()?;
    let bill = engine.monthly_bill(user_id, year, month).await?;
    Ok(Json(MonthlyBillEnvelope {
        user_id,
        year,
        month,
        bill,
    }))
}

pub async fn pending_balance(
    Extension(engine): Extension<BillingEngine>,
    Path(user_id): Path<i32>,
    Query(query): Query<PeriodQuery>,
) -> AppResult<Json<PendingResult>> {
    let (year, month) = query.require()?;
    Ok(Json(engine.pending_balance(user_id, year, month).await?))
}

pub async fn full_bill(
    Extension(engine): Extension<BillingEngine>,
    Path(user_id): Path<i32>,
    Query(query): Query<PeriodQuery>,
) -> AppResult<Json<FullBill>> {
    let (year, month) = query.require()?;
    Ok(Json(engine.full_bill(user_id, year, month).await?))
}

pub async fn payment_drafts(
    Extension(engine): Extension<BillingEngine>,
    Query(query): Query<PeriodQuery>,
) -> AppResult<Json<Vec<PaymentStatusDraft>>> {
    let (year, month) = query.require()?;
    Ok(Json(engine.payment_drafts(year, month).await?))
}

/// Defaults to tomorrow's manifest when no date is given.
pub async fn indent(
    Extension(engine): Extension<BillingEngine>,
    Query(query): Query<IndentQuery>,
) -> AppResult<Json<IndentResult>> {
    let date = match query.date.as_deref() {
        Some(raw) => parse_date(raw)?,
        None => Local::now()
            .date_naive()
            .checked_add_days(Days::new(1))
            .ok_or_else(|| AppError::invalid("no calendar date follows today"))?,
    };
    Ok(Json(engine.indent(date).await?))
}

fn parse_date(raw: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| AppError::invalid(format!("invalid date `{raw}`: {err}")))
}
