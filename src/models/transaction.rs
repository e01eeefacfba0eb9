//! This file defines the type `TransactionRecord`, the one entity of the
//! application: a product that was listed for sale and possibly sold.

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use time::{
    Date, Month, OffsetDateTime, PrimitiveDateTime, UtcOffset,
    format_description::well_known::Rfc3339, macros::format_description,
};

use crate::month::sale_month;

/// Alias for the integer type used for transaction IDs.
///
/// IDs come from the seed data and are not generated by the application.
pub type TransactionId = i64;

/// A product sale as delivered by the seed source.
///
/// The JSON shape uses camel case (`dateOfSale`), matching the seed data and
/// the responses of the read endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    /// The ID supplied by the seed data.
    pub id: TransactionId,
    /// The product name.
    #[serde(default)]
    pub title: String,
    /// A free text description of the product.
    #[serde(default)]
    pub description: String,
    /// The listed price of the product.
    #[serde(deserialize_with = "deserialize_price")]
    pub price: f64,
    /// When the sale happened, normalised to UTC.
    #[serde(
        serialize_with = "serialize_date_of_sale",
        deserialize_with = "deserialize_date_of_sale"
    )]
    pub date_of_sale: OffsetDateTime,
    /// A free-form category label.
    #[serde(default)]
    pub category: String,
    /// Whether the product was sold.
    #[serde(default)]
    pub sold: bool,
}

impl TransactionRecord {
    /// The calendar month of the sale date in UTC, ignoring the year.
    pub fn sale_month(&self) -> Month {
        sale_month(self.date_of_sale)
    }

    /// Whether the sale happened in `month` of any year.
    pub fn is_in_month(&self, month: Month) -> bool {
        self.sale_month() == month
    }

    /// The textual form of the price that free text search matches against.
    ///
    /// This is the shortest representation that round-trips, so `150.0`
    /// becomes `"150"` and `109.95` stays `"109.95"`.
    pub fn price_text(&self) -> String {
        self.price.to_string()
    }

    /// Whether `needle` occurs in the title, description or price text,
    /// ignoring ASCII case.
    ///
    /// `needle` must already be lowercase.
    pub(crate) fn matches_search(&self, needle: &str) -> bool {
        [&self.title, &self.description, &self.price_text()]
            .iter()
            .any(|field| field.to_ascii_lowercase().contains(needle))
    }
}

/// Parse a sale date from the seed data.
///
/// Accepts RFC 3339 date-times, date-times without an offset (taken as UTC)
/// and bare dates (taken as midnight UTC). The result is always in UTC.
pub fn parse_date_of_sale(text: &str) -> Result<OffsetDateTime, time::error::Parse> {
    let text = text.trim();

    if let Ok(date_time) = OffsetDateTime::parse(text, &Rfc3339) {
        return Ok(date_time.to_offset(UtcOffset::UTC));
    }

    if let Ok(date_time) = PrimitiveDateTime::parse(
        text,
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"),
    ) {
        return Ok(date_time.assume_utc());
    }

    let date = Date::parse(text, format_description!("[year]-[month]-[day]"))?;

    Ok(date.midnight().assume_utc())
}

/// Format a sale date as RFC 3339 in UTC, the form used for storage and JSON.
pub fn format_date_of_sale(date_of_sale: OffsetDateTime) -> Result<String, time::error::Format> {
    date_of_sale.to_offset(UtcOffset::UTC).format(&Rfc3339)
}

fn serialize_date_of_sale<S>(
    date_of_sale: &OffsetDateTime,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let text = format_date_of_sale(*date_of_sale).map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&text)
}

fn deserialize_date_of_sale<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    parse_date_of_sale(&text)
        .map_err(|error| de::Error::custom(format!("invalid dateOfSale \"{text}\": {error}")))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPrice {
    Number(f64),
    Text(String),
}

/// Prices are usually numbers, but numeric strings are coerced as well.
///
/// Only finite prices are accepted.
fn deserialize_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let (price, text) = match RawPrice::deserialize(deserializer)? {
        RawPrice::Number(price) => (Some(price), price.to_string()),
        RawPrice::Text(text) => (text.trim().parse::<f64>().ok(), text),
    };

    price
        .filter(|price| price.is_finite())
        .ok_or_else(|| de::Error::custom(format!("invalid price \"{text}\"")))
}
