//! Per-table query modules plus shared row conversion helpers.
//!
//! Rows are read into plain `*Row` structs inside rusqlite callbacks and
//! converted to model types afterwards, so that vocabulary parse failures
//! surface as `DomainError` rather than as SQLite errors.

pub mod controls;
pub mod evidence;
pub mod pci;
pub mod responses;
pub mod templates;

use std::str::FromStr;

use assurance_core::errors::{AssuranceResult, DomainError, PersistenceError};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

pub(crate) use crate::connection::sqlite_error;

/// Parse a stored wire string back into its closed vocabulary.
pub(crate) fn parse_enum<T>(value: &str) -> AssuranceResult<T>
where
    T: FromStr<Err = DomainError>,
{
    Ok(value.parse::<T>()?)
}

pub(crate) fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_timestamp(table: &'static str, value: &str) -> AssuranceResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| {
            PersistenceError::CorruptRow {
                table,
                message: format!("bad timestamp '{value}': {e}"),
            }
            .into()
        })
}

pub(crate) fn parse_optional_timestamp(
    table: &'static str,
    value: Option<&str>,
) -> AssuranceResult<Option<DateTime<Utc>>> {
    value.map(|v| parse_timestamp(table, v)).transpose()
}

pub(crate) fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub(crate) fn parse_date(table: &'static str, value: &str) -> AssuranceResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| {
        PersistenceError::CorruptRow {
            table,
            message: format!("bad date '{value}': {e}"),
        }
        .into()
    })
}

pub(crate) fn to_version(table: &'static str, value: i64) -> AssuranceResult<u64> {
    u64::try_from(value).map_err(|_| {
        PersistenceError::CorruptRow {
            table,
            message: format!("negative version {value}"),
        }
        .into()
    })
}
