// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("crawl data not found")]
    NotFound,

    /// The store failed the scan. Never retried.
    #[error("Store error: {0:#}")]
    Transport(#[from] anyhow::Error),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// A row the codecs could not turn into a record.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Malformed row key {key:?} in {table}: {reason}")]
    RowKey {
        table: &'static str,
        key: String,
        reason: &'static str,
    },

    #[error("Missing column {column:?} in {table} row {key:?}")]
    MissingColumn {
        table: &'static str,
        key: String,
        column: &'static str,
    },

    #[error("Invalid value {value:?} for column {column:?} in {table} row {key:?}")]
    InvalidValue {
        table: &'static str,
        key: String,
        column: &'static str,
        value: String,
    },
}
