use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use super::exclusions::is_excluded;
use super::models::{Exclusion, Paper};
use super::recurrence::applies_on;
use super::service::BillingEngine;
use crate::error::AppResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndentLine {
    pub paper: String,
    pub apt_name: String,
    pub block: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaperTotal {
    pub paper: String,
    pub quantity: u32,
}

/// Delivery manifest for one date. Both lists are sorted by their grouping key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndentResult {
    pub date: NaiveDate,
    pub per_apartment_block: Vec<IndentLine>,
    pub per_paper: Vec<PaperTotal>,
}

impl IndentResult {
    pub fn quantity(&self, paper: &str, apt_name: &str, block: &str) -> u32 {
        self.per_apartment_block
            .iter()
            .find(|line| line.paper == paper && line.apt_name == apt_name && line.block == block)
            .map(|line| line.quantity)
            .unwrap_or(0)
    }

    pub fn paper_total(&self, paper: &str) -> u32 {
        self.per_paper
            .iter()
            .find(|total| total.paper == paper)
            .map(|total| total.quantity)
            .unwrap_or(0)
    }
}

/// Counts delivery units per (paper, apartment, block).
#[derive(Debug, Default)]
pub(crate) struct IndentTally {
    units: BTreeMap<(String, String, String), u32>,
}

impl IndentTally {
    pub fn record(&mut self, paper: &str, apt_name: &str, block: String) {
        *self
            .units
            .entry((paper.to_string(), apt_name.to_string(), block))
            .or_insert(0) += 1;
    }

    pub fn finish(self, date: NaiveDate) -> IndentResult {
        let mut per_paper: BTreeMap<String, u32> = BTreeMap::new();
        for ((paper, _, _), quantity) in &self.units {
            *per_paper.entry(paper.clone()).or_insert(0) += quantity;
        }

        IndentResult {
            date,
            per_apartment_block: self
                .units
                .into_iter()
                .map(|((paper, apt_name, block), quantity)| IndentLine {
                    paper,
                    apt_name,
                    block,
                    quantity,
                })
                .collect(),
            per_paper: per_paper
                .into_iter()
                .map(|(paper, quantity)| PaperTotal { paper, quantity })
                .collect(),
        }
    }
}

impl BillingEngine {
    /// key: billing-indent -> system-wide delivery manifest for a date
    ///
    /// Subscriptions whose user or paper no longer exists are skipped.
    pub async fn indent(&self, date: NaiveDate) -> AppResult<IndentResult> {
        let store = self.store();
        let subscriptions = store.list_subscriptions(None).await?;
        let users: HashMap<i32, _> = store
            .list_users()
            .await?
            .into_iter()
            .map(|user| (user.id, user))
            .collect();

        let mut papers: HashMap<i32, Option<Paper>> = HashMap::new();
        let mut exclusions: HashMap<i32, Vec<Exclusion>> = HashMap::new();
        let mut tally = IndentTally::default();

        for subscription in subscriptions.iter().filter(|sub| applies_on(sub, date)) {
            let Some(user) = users.get(&subscription.user_id) else {
                warn!(
                    subscription = subscription.id,
                    user_id = subscription.user_id,
                    "indent skipped subscription of missing user"
                );
                continue;
            };

            if !exclusions.contains_key(&user.id) {
                exclusions.insert(user.id, store.list_exclusions(user.id).await?);
            }
            let user_exclusions = exclusions.get(&user.id).map(Vec::as_slice).unwrap_or(&[]);
            if is_excluded(user_exclusions, user.id, subscription.paper_id, date) {
                continue;
            }

            if !papers.contains_key(&subscription.paper_id) {
                let paper = store.get_paper(subscription.paper_id).await?;
                papers.insert(subscription.paper_id, paper);
            }
            let Some(Some(paper)) = papers.get(&subscription.paper_id) else {
                warn!(
                    subscription = subscription.id,
                    paper_id = subscription.paper_id,
                    "indent skipped subscription of missing paper"
                );
                continue;
            };

            tally.record(&paper.name, &user.apt_name, user.block());
        }

        let result = tally.finish(date);
        debug!(
            %date,
            locations = result.per_apartment_block.len(),
            papers = result.per_paper.len(),
            "computed indent"
        );
        Ok(result)
    }
}
