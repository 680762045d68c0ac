use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;

use super::exclusions::is_excluded;
use super::models::{Exclusion, Paper, Subscription, User};
use super::pricing::{PriceBook, ResolvedPrice};
use super::recurrence::applies_on;
use super::store::AgencyStore;
use crate::error::{AppError, AppResult};

/// key: billing-service -> bills, arrears and indents over an injected store
///
/// Every call recomputes from the store; nothing is cached between calls.
#[derive(Clone)]
pub struct BillingEngine {
    store: Arc<dyn AgencyStore>,
}

impl BillingEngine {
    pub fn new(store: Arc<dyn AgencyStore>) -> Self {
        Self { store }
    }

    pub(crate) fn store(&self) -> &dyn AgencyStore {
        self.store.as_ref()
    }

    pub(crate) async fn require_user(&self, user_id: i32) -> AppResult<User> {
        self.store
            .get_user(user_id)
            .await?
            .ok_or(AppError::NotFound {
                entity: "user",
                id: user_id,
            })
    }

    /// Loads everything needed to price a user's deliveries: subscriptions,
    /// exclusion windows, and the price rules and names of every subscribed paper.
    pub(crate) async fn load_plan(&self, user_id: i32) -> AppResult<DeliveryPlan> {
        let subscriptions = self.store.list_subscriptions(Some(user_id)).await?;
        let exclusions = self.store.list_exclusions(user_id).await?;

        let mut prices = PriceBook::default();
        let mut papers = HashMap::new();
        for subscription in &subscriptions {
            if prices.contains(subscription.paper_id) {
                continue;
            }
            let paper = self
                .store
                .get_paper(subscription.paper_id)
                .await?
                .ok_or_else(|| {
                    AppError::integrity(format!(
                        "subscription {} references missing paper {}",
                        subscription.id, subscription.paper_id
                    ))
                })?;
            let rules = self.store.list_price_rules(subscription.paper_id).await?;
            prices.insert(subscription.paper_id, rules);
            papers.insert(paper.id, paper);
        }

        Ok(DeliveryPlan {
            user_id,
            subscriptions,
            exclusions,
            prices,
            papers,
        })
    }
}

/// A user's subscriptions with the data needed to price them, loaded once per call.
#[derive(Debug, Clone)]
pub(crate) struct DeliveryPlan {
    pub user_id: i32,
    pub subscriptions: Vec<Subscription>,
    pub exclusions: Vec<Exclusion>,
    pub prices: PriceBook,
    pub papers: HashMap<i32, Paper>,
}

impl DeliveryPlan {
    /// Priced deliveries due on `date`, in subscription order.
    pub fn deliveries_on(
        &self,
        date: NaiveDate,
    ) -> impl Iterator<Item = (&Paper, ResolvedPrice)> + '_ {
        self.subscriptions
            .iter()
            .filter(move |sub| applies_on(sub, date))
            .filter(move |sub| !is_excluded(&self.exclusions, self.user_id, sub.paper_id, date))
            .filter_map(move |sub| {
                let paper = self.papers.get(&sub.paper_id)?;
                Some((paper, self.prices.resolve(sub.paper_id, date)))
            })
    }

    pub fn earliest_start(&self) -> Option<NaiveDate> {
        self.subscriptions
            .iter()
            .filter_map(|sub| sub.start_date)
            .min()
    }
}
