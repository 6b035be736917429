//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Formats a rating average with two decimal places.
///
/// Rounding happens here and only here; the stored aggregates keep full
/// precision.
///
/// Usage in templates: `{{ avg|two_places }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn two_places(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format!("{value:.2}"))
}
