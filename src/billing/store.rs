use async_trait::async_trait;
use sqlx::PgPool;

use super::models::{Exclusion, Paper, PaymentStatus, PriceRule, Subscription, User};
use crate::db;
use crate::error::AppResult;

/// key: billing-store -> read-only collaborator consulted by the engine
///
/// Implementations return rows ordered by id so tie-breaks downstream stay stable.
#[async_trait]
pub trait AgencyStore: Send + Sync {
    /// All subscriptions, or only those of `user_id` when given.
    async fn list_subscriptions(&self, user_id: Option<i32>) -> AppResult<Vec<Subscription>>;
    async fn list_price_rules(&self, paper_id: i32) -> AppResult<Vec<PriceRule>>;
    async fn list_exclusions(&self, user_id: i32) -> AppResult<Vec<Exclusion>>;
    /// `month` is 1-based.
    async fn payment_status(
        &self,
        user_id: i32,
        year: i32,
        month: u32,
    ) -> AppResult<Option<PaymentStatus>>;
    async fn get_user(&self, user_id: i32) -> AppResult<Option<User>>;
    async fn list_users(&self) -> AppResult<Vec<User>>;
    async fn get_paper(&self, paper_id: i32) -> AppResult<Option<Paper>>;
}

/// key: billing-store-postgres -> sqlx backed store
#[derive(Clone)]
pub struct PgAgencyStore {
    pool: PgPool,
}

impl PgAgencyStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AgencyStore for PgAgencyStore {
    async fn list_subscriptions(&self, user_id: Option<i32>) -> AppResult<Vec<Subscription>> {
        Ok(db::subscriptions::list_subscriptions(&self.pool, user_id).await?)
    }

    async fn list_price_rules(&self, paper_id: i32) -> AppResult<Vec<PriceRule>> {
        Ok(db::papers::list_price_rules(&self.pool, paper_id).await?)
    }

    async fn list_exclusions(&self, user_id: i32) -> AppResult<Vec<Exclusion>> {
        Ok(db::exclusions::list_exclusions(&self.pool, user_id).await?)
    }

    async fn payment_status(
        &self,
        user_id: i32,
        year: i32,
        month: u32,
    ) -> AppResult<Option<PaymentStatus>> {
        Ok(db::payment_status::get_payment_status(&self.pool, user_id, year, month).await?)
    }

    async fn get_user(&self, user_id: i32) -> AppResult<Option<User>> {
        Ok(db::users::get_user(&self.pool, user_id).await?)
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        Ok(db::users::list_users(&self.pool).await?)
    }

    async fn get_paper(&self, paper_id: i32) -> AppResult<Option<Paper>> {
        Ok(db::papers::get_paper(&self.pool, paper_id).await?)
    }
}

/// Fixture-backed store holding every table in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    users: Vec<User>,
    papers: Vec<Paper>,
    price_rules: Vec<PriceRule>,
    subscriptions: Vec<Subscription>,
    exclusions: Vec<Exclusion>,
    payment_statuses: Vec<PaymentStatus>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.users.push(user);
        self
    }

    pub fn with_paper(mut self, paper: Paper) -> Self {
        self.papers.push(paper);
        self
    }

    pub fn with_price_rule(mut self, rule: PriceRule) -> Self {
        self.price_rules.push(rule);
        self
    }

    pub fn with_subscription(mut self, subscription: Subscription) -> Self {
        self.subscriptions.push(subscription);
        self
    }

    pub fn with_exclusion(mut self, exclusion: Exclusion) -> Self {
        self.exclusions.push(exclusion);
        self
    }

    pub fn with_payment_status(mut self, status: PaymentStatus) -> Self {
        self.payment_statuses.push(status);
        self
    }
}

fn sorted_by_id<T>(rows: impl Iterator<Item = T>, id: impl Fn(&T) -> i32) -> Vec<T> {
    let mut rows: Vec<T> = rows.collect();
    rows.sort_by_key(|row| id(row));
    rows
}

#[async_trait]
impl AgencyStore for MemoryStore {
    async fn list_subscriptions(&self, user_id: Option<i32>) -> AppResult<Vec<Subscription>> {
        Ok(sorted_by_id(
            self.subscriptions
                .iter()
                .filter(|sub| user_id.map_or(true, |user_id| sub.user_id == user_id))
                .cloned(),
            |sub| sub.id,
        ))
    }

    async fn list_price_rules(&self, paper_id: i32) -> AppResult<Vec<PriceRule>> {
        Ok(sorted_by_id(
            self.price_rules
                .iter()
                .filter(|rule| rule.paper_id == paper_id)
                .cloned(),
            |rule| rule.id,
        ))
    }

    async fn list_exclusions(&self, user_id: i32) -> AppResult<Vec<Exclusion>> {
        Ok(sorted_by_id(
            self.exclusions
                .iter()
                .filter(|exclusion| exclusion.user_id == user_id)
                .cloned(),
            |exclusion| exclusion.id,
        ))
    }

    async fn payment_status(
        &self,
        user_id: i32,
        year: i32,
        month: u32,
    ) -> AppResult<Option<PaymentStatus>> {
        Ok(self
            .payment_statuses
            .iter()
            .filter(|row| row.user_id == user_id && row.year == year && row.month == month)
            .min_by_key(|row| row.id)
            .cloned())
    }

    async fn get_user(&self, user_id: i32) -> AppResult<Option<User>> {
        Ok(self.users.iter().find(|user| user.id == user_id).cloned())
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        Ok(sorted_by_id(self.users.iter().cloned(), |user| user.id))
    }

    async fn get_paper(&self, paper_id: i32) -> AppResult<Option<Paper>> {
        Ok(self.papers.iter().find(|paper| paper.id == paper_id).cloned())
    }
}
