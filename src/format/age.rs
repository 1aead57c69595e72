use crate::format::datetime::DateValue;
use chrono::{Datelike, Local, NaiveDate};

/// Age in whole years on `today`.
///
/// Birth dates in the future are not rejected and give a negative age.
/// `None` for a missing or unparseable birth date.
pub fn calculate_age(birth_date: Option<&DateValue>, today: NaiveDate) -> Option<i32> {
    let birth_date = birth_date.filter(|d| !d.is_empty())?.to_naive()?.date();

    let mut age = today.year() - birth_date.year();
    let month_diff = today.month() as i32 - birth_date.month() as i32;

    if month_diff < 0 || (month_diff == 0 && today.day() < birth_date.day()) {
        age -= 1;
    }

    Some(age)
}

/// Age in whole years as of the local calendar date
pub fn age_today(birth_date: Option<&DateValue>) -> Option<i32> {
    calculate_age(birth_date, Local::now().date_naive())
}
