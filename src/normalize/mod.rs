//! Numeric and string normalization for loosely-typed form fields.
//!
//! The source platform stores every field as free text. Monetary values
//! arrive locale-formatted (`"567,89"`, `"123,45 SEK"`), account codes
//! arrive as `"<digits> - <label>"` picker values, and the organization
//! information arrives as a single pipe-delimited string. The functions
//! here are pure and allocation-light; all of them treat `None` as an
//! absent field and propagate it rather than failing.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use crate::core::{BillingError, OrganizationInfo};

/// Fixed digit prepended to internal customer ids to form a counterpart
/// code.
const COUNTERPART_PREFIX: char = '1';

/// Counterpart codes are right-padded with zeros to this width.
const COUNTERPART_WIDTH: usize = 8;

/// Grammar of the platform's organization-information string:
/// `number | name | street | care-of | zip city | motpart`.
/// The zip is `NNN NN` (the space is optional in practice) and is
/// separated from the city by a single space.
static ORGANIZATION_INFO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*([^|]*?)\s*\|\s*([^|]*?)\s*\|\s*([^|]*?)\s*\|\s*([^|]*?)\s*\|\s*(\d{3}\s?\d{2})\s+([^|]*?)\s*\|\s*([^|]*?)\s*$",
    )
    .expect("organization info pattern is valid")
});

/// Parse a locale-formatted numeric string into a [`Decimal`].
///
/// Everything except digits, comma, and dot is stripped (currency noise),
/// then comma becomes dot. An absent or blank field is `0`; anything
/// still unparseable fails with [`BillingError::NotANumber`].
pub fn to_decimal(text: Option<&str>) -> Result<Decimal, BillingError> {
    let Some(text) = text else {
        return Ok(Decimal::ZERO);
    };
    if text.trim().is_empty() {
        return Ok(Decimal::ZERO);
    }
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.'))
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    cleaned.parse().map_err(|_| BillingError::NotANumber {
        original: text.to_string(),
    })
}

/// The maximal run of ASCII digits at the start of `text`, or `None`
/// when the text does not start with a digit.
pub fn leading_digits(text: &str) -> Option<&str> {
    let end = text
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(text.len(), |(i, _)| i);
    if end == 0 { None } else { Some(&text[..end]) }
}

/// The maximal run of ASCII digits at the end of `text`, or `None` when
/// the text does not end with a digit.
pub fn trailing_digits(text: &str) -> Option<&str> {
    let start = text
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;
    Some(&text[start..])
}

/// Counterpart code from a picker value such as `"123 - 456"`: the
/// trailing digits, right-padded with `0` to eight characters
/// (`"45600000"`). `None` propagates.
pub fn pad_counterpart(text: Option<&str>) -> Option<String> {
    let digits = trailing_digits(text?)?;
    Some(format!("{digits:0<width$}", width = COUNTERPART_WIDTH))
}

/// Counterpart code for internal billing: the customer id with a fixed
/// leading digit prepended. `None` propagates.
pub fn prefix_counterpart(customer_id: Option<&str>) -> Option<String> {
    customer_id.map(|id| format!("{COUNTERPART_PREFIX}{id}"))
}

/// First `max_len` characters of `text`; shorter input passes through
/// unchanged. Cuts on character boundaries, so multi-byte text is safe.
pub fn truncate(text: &str, max_len: usize) -> &str {
    match text.char_indices().nth(max_len) {
        Some((i, _)) => &text[..i],
        None => text,
    }
}

/// [`truncate`] over an optional field; absent and blank values pass
/// through unchanged.
pub fn truncate_opt(text: Option<&str>, max_len: usize) -> Option<String> {
    text.map(|t| truncate(t, max_len).to_string())
}

/// Parse the platform's pipe-delimited organization-information string.
///
/// Grammar: `number | name | street | care-of | zip city | motpart`, each
/// captured group trimmed. The care-of slot is frequently blank and stays
/// an empty string. A string that does not match the grammar fails with
/// [`BillingError::OrganizationInfoFormat`].
pub fn parse_organization_info(text: &str) -> Result<OrganizationInfo, BillingError> {
    let caps =
        ORGANIZATION_INFO
            .captures(text)
            .ok_or_else(|| BillingError::OrganizationInfoFormat {
                input: text.to_string(),
            })?;
    let group = |i: usize| caps.get(i).map_or("", |m| m.as_str()).to_string();
    Ok(OrganizationInfo {
        organization_number: group(1),
        name: group(2),
        street_address: group(3),
        care_of: group(4),
        zip_code: group(5),
        city: group(6),
        motpart: group(7),
    })
}
