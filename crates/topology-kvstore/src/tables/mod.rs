// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Row codecs for the topology tables. Each submodule owns one table: its default name, the
//! column qualifiers it reads, the row-key conventions used for range bounds, and a `decode`
//! function from a raw [`Row`] to a typed record.

use std::str::FromStr;

use crate::Row;
use crate::error::DecodeError;

pub mod connections;
pub mod crawls;
pub mod node_stats;
pub mod validator_reports;

pub use connections::Link;
pub use node_stats::NodeStat;
pub use validator_reports::ValidatorReport;

/// Suffix appended to a snapshot key to form the exclusive upper bound of the rows filed under
/// it. Every row key under a snapshot continues with a separator that sorts below it.
const SNAPSHOT_RANGE_SUFFIX: char = 'z';

/// A range of row keys: `start` is inclusive, `stop` is exclusive, regardless of the direction
/// the rows are returned in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowRange {
    pub start: String,
    pub stop: String,
    pub descending: bool,
}

impl RowRange {
    pub fn ascending(start: impl Into<String>, stop: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            stop: stop.into(),
            descending: false,
        }
    }

    pub fn descending(start: impl Into<String>, stop: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            stop: stop.into(),
            descending: true,
        }
    }
}

/// The rows keyed under snapshot `key` in the node-stats and connections tables.
pub fn snapshot_range(key: &str) -> RowRange {
    RowRange::ascending(key, format!("{key}{SNAPSHOT_RANGE_SUFFIX}"))
}

/// A column value that is present and non-empty.
pub(crate) fn truthy<'r>(row: &'r Row, column: &str) -> Option<&'r str> {
    row.get(column).filter(|v| !v.is_empty())
}

pub(crate) fn required<'r>(
    table: &'static str,
    row: &'r Row,
    column: &'static str,
) -> Result<&'r str, DecodeError> {
    row.get(column).ok_or_else(|| DecodeError::MissingColumn {
        table,
        key: row.rowkey.clone(),
        column,
    })
}

pub(crate) fn parse<T: FromStr>(
    table: &'static str,
    row: &Row,
    column: &'static str,
    value: &str,
) -> Result<T, DecodeError> {
    value.parse().map_err(|_| DecodeError::InvalidValue {
        table,
        key: row.rowkey.clone(),
        column,
        value: value.to_string(),
    })
}

/// Agreement ratios have to be finite for reports to be ordered.
pub(crate) fn parse_ratio(
    table: &'static str,
    row: &Row,
    column: &'static str,
) -> Result<f64, DecodeError> {
    let value = required(table, row, column)?;
    match parse::<f64>(table, row, column, value)? {
        ratio if ratio.is_finite() => Ok(ratio),
        _ => Err(DecodeError::InvalidValue {
            table,
            key: row.rowkey.clone(),
            column,
            value: value.to_string(),
        }),
    }
}
