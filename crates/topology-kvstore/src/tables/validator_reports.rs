// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Validator reports table: daily agreement statistics per validator. Row keys start with the
//! report's UTC instant formatted `%Y%m%d%H%M%S`.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::Row;
use crate::error::DecodeError;
use crate::tables::{RowRange, parse, parse_ratio, required};

pub const NAME: &str = "validator_reports";

const KEY_TIME_FORMAT: &str = "%Y%m%d%H%M%S";

/// Sorts after every character used in row keys, making the stop row's second inclusive.
const KEY_STOP_SUFFIX: char = '~';

/// No reports predate this row.
const FIRST_REPORT_ROW: &str = "20130101000000";

pub mod col {
    pub const VALIDATION_PUBLIC_KEY: &str = "validation_public_key";
    pub const DATE: &str = "date";
    pub const TOTAL_LEDGERS: &str = "total_ledgers";
    pub const MAIN_NET_AGREEMENT: &str = "main_net_agreement";
    pub const MAIN_NET_LEDGERS: &str = "main_net_ledgers";
    pub const ALT_NET_AGREEMENT: &str = "alt_net_agreement";
    pub const ALT_NET_LEDGERS: &str = "alt_net_ledgers";
    pub const OTHER_LEDGERS: &str = "other_ledgers";
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidatorReport {
    pub validation_public_key: String,
    pub date: String,
    pub total_ledgers: u64,

    /// Published under its historical (misspelled) name.
    #[serde(rename = "main_net_agreeement", alias = "main_net_agreement")]
    pub main_net_agreement: f64,
    pub main_net_ledgers: u64,

    #[serde(rename = "alt_net_agreeement", alias = "alt_net_agreement")]
    pub alt_net_agreement: f64,
    pub alt_net_ledgers: u64,

    pub other_ledgers: u64,
}

/// Range of reports dated between `start` and `end`, both inclusive to the second.
pub fn encode_range(start: DateTime<Utc>, end: DateTime<Utc>) -> RowRange {
    RowRange::ascending(start.format(KEY_TIME_FORMAT).to_string(), encode_stop_row(end))
}

/// Every report dated up to `end`, newest first.
pub fn encode_latest_range(end: DateTime<Utc>) -> RowRange {
    RowRange::descending(FIRST_REPORT_ROW, encode_stop_row(end))
}

fn encode_stop_row(end: DateTime<Utc>) -> String {
    format!("{}{KEY_STOP_SUFFIX}", end.format(KEY_TIME_FORMAT))
}

pub fn decode(row: &Row) -> Result<ValidatorReport, DecodeError> {
    let count = |column: &'static str| {
        parse::<u64>(NAME, row, column, required(NAME, row, column)?)
    };

    Ok(ValidatorReport {
        validation_public_key: required(NAME, row, col::VALIDATION_PUBLIC_KEY)?.to_string(),
        date: required(NAME, row, col::DATE)?.to_string(),
        total_ledgers: count(col::TOTAL_LEDGERS)?,
        main_net_agreement: parse_ratio(NAME, row, col::MAIN_NET_AGREEMENT)?,
        main_net_ledgers: count(col::MAIN_NET_LEDGERS)?,
        alt_net_agreement: parse_ratio(NAME, row, col::ALT_NET_AGREEMENT)?,
        alt_net_ledgers: count(col::ALT_NET_LEDGERS)?,
        other_ledgers: count(col::OTHER_LEDGERS)?,
    })
}

/// The instant a report is dated at, accepting either a full RFC 3339 timestamp or a bare
/// `YYYY-MM-DD` day.
pub fn decode_date(report: &ValidatorReport) -> Result<DateTime<Utc>, DecodeError> {
    if let Ok(date) = DateTime::parse_from_rfc3339(&report.date) {
        return Ok(date.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(&report.date, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| DecodeError::InvalidValue {
            table: NAME,
            key: report.validation_public_key.clone(),
            column: col::DATE,
            value: report.date.clone(),
        })
}

/// Ranks validators by main-net reliability: main-net agreement then ledgers, highest first. Ties
/// go to the validator with the lower alt-net agreement, then fewer alt-net ledgers.
pub fn by_reliability(a: &ValidatorReport, b: &ValidatorReport) -> Ordering {
    b.main_net_agreement
        .total_cmp(&a.main_net_agreement)
        .then_with(|| b.main_net_ledgers.cmp(&a.main_net_ledgers))
        .then_with(|| a.alt_net_agreement.total_cmp(&b.alt_net_agreement))
        .then_with(|| a.alt_net_ledgers.cmp(&b.alt_net_ledgers))
}
