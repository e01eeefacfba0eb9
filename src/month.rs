//! Resolving month names from requests and the calendar month of sale dates.
//!
//! Every read endpoint is scoped to a calendar month of any year, so the
//! year of a sale date never takes part in a query.

use time::{Month, OffsetDateTime, UtcOffset};

use crate::Error;

const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

/// Resolve a month from user input.
///
/// Accepts full English month names ("March"), three letter abbreviations
/// ("Mar") and month numbers ("3"). Letter case and surrounding whitespace
/// are ignored.
///
/// # Errors
/// Returns [Error::InvalidMonth] for anything else.
pub fn parse_month(text: &str) -> Result<Month, Error> {
    let trimmed = text.trim();

    if let Ok(number) = trimmed.parse::<u8>() {
        return Month::try_from(number).map_err(|_| Error::InvalidMonth(text.to_owned()));
    }

    let lowercase = trimmed.to_ascii_lowercase();

    MONTHS
        .into_iter()
        .find(|month| {
            let name = month.to_string().to_ascii_lowercase();
            lowercase == name || (lowercase.len() == 3 && name.starts_with(&lowercase))
        })
        .ok_or_else(|| Error::InvalidMonth(text.to_owned()))
}

/// Resolve the month from an optional `month` query parameter.
///
/// # Errors
/// Returns [Error::MissingParameter] if `month` is `None`, otherwise the
/// errors of [parse_month].
pub fn require_month(month: Option<&str>) -> Result<Month, Error> {
    month
        .ok_or(Error::MissingParameter("month"))
        .and_then(parse_month)
}

/// The calendar month of `date_of_sale` in UTC.
pub fn sale_month(date_of_sale: OffsetDateTime) -> Month {
    date_of_sale.to_offset(UtcOffset::UTC).month()
}

/// The month index 1-12 used when months are stored as integers.
pub fn month_index(month: Month) -> i64 {
    i64::from(u8::from(month))
}
