use chrono::NaiveDate;

use super::models::Exclusion;

impl Exclusion {
    pub fn covers(&self, user_id: i32, paper_id: i32, date: NaiveDate) -> bool {
        self.user_id == user_id
            && self.paper_id.map_or(true, |excluded| excluded == paper_id)
            && self.date_from <= date
            && date <= self.date_to
    }
}

/// key: billing-exclusions -> is a delivery suppressed
pub fn is_excluded(exclusions: &[Exclusion], user_id: i32, paper_id: i32, date: NaiveDate) -> bool {
    exclusions
        .iter()
        .any(|exclusion| exclusion.covers(user_id, paper_id, date))
}
