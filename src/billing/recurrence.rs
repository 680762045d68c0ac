use chrono::{Datelike, NaiveDate};

use super::models::{Frequency, Subscription};

/// key: billing-recurrence -> is a subscription due on a given date
///
/// Fails closed outside `[start_date, end_date]`. Alternating subscriptions run
/// fortnightly on their weekday, matching the ISO-week parity of `start_date`;
/// without a start date they degrade to weekly.
pub fn applies_on(subscription: &Subscription, date: NaiveDate) -> bool {
    if subscription.start_date.map_or(false, |start| date < start) {
        return false;
    }
    if subscription.end_date.map_or(false, |end| date > end) {
        return false;
    }

    match subscription.frequency {
        Frequency::Daily => true,
        Frequency::Weekly => subscription.weekday == Some(date.weekday()),
        // no clamping: day 31 never matches a 30-day month
        Frequency::Monthly => subscription.day_of_month == Some(date.day()),
        Frequency::Alternating => {
            if subscription.weekday != Some(date.weekday()) {
                return false;
            }
            match subscription.start_date {
                Some(start) => iso_week_parity(date) == iso_week_parity(start),
                None => true,
            }
        }
    }
}

fn iso_week_parity(date: NaiveDate) -> u32 {
    date.iso_week().week() % 2
}
