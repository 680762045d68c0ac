//! Billing and delivery planning engine: recurrence, pricing, exclusions,
//! monthly bills, arrears reconciliation, and daily indents.

pub mod api;
pub mod arrears;
pub mod exclusions;
pub mod indent;
pub mod models;
pub mod period;
pub mod pricing;
pub mod recurrence;
pub mod service;
pub mod statement;
pub mod store;

pub use arrears::{PendingLine, PendingResult, PendingSource};
pub use exclusions::is_excluded;
pub use indent::{IndentLine, IndentResult, PaperTotal};
pub use models::{
    Exclusion, Frequency, Paper, PaymentState, PaymentStatus, PriceRule, Subscription, User,
};
pub use period::{MonthRange, YearMonth};
pub use pricing::{resolve_price, PriceBook, PriceTier, ResolvedPrice};
pub use recurrence::applies_on;
pub use service::BillingEngine;
pub use statement::{round2, BillLine, BillResult, FullBill, LineKey, PaymentStatusDraft};
pub use store::{AgencyStore, MemoryStore, PgAgencyStore};
