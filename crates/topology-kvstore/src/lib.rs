// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Read side of the network-topology store: crawl snapshots (nodes and peer links) and validator
//! agreement reports, kept in a wide-column store and served a page at a time.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod args;
mod config;
mod error;
mod locator;
mod memory;
mod reader;
mod scan;
pub mod tables;

pub use config::{ReaderConfig, TableNames};
pub use error::{DecodeError, Error};
pub use locator::SnapshotLocator;
pub use memory::MemoryStore;
pub use reader::{
    LinksPage, LinksQuery, NodesQuery, ReportsPage, ReportsQuery, Snapshot, TopologyReader,
};
pub use scan::{Marker, Page, PagedScanner};
pub use tables::{Link, NodeStat, RowRange, ValidatorReport};

/// The two scan primitives the store offers. Implementations own their transport, retries and
/// timeouts; any error they return is surfaced to the caller as [`Error::Transport`].
///
/// Both primitives treat `start_row` as inclusive and `stop_row` as exclusive, and return rows
/// in key order, reversed when `descending` is set.
#[async_trait]
pub trait WideColumnReader: Send + Sync {
    /// Bounded range scan: at most `limit` rows, no continuation.
    async fn scan(&self, request: ScanRequest) -> anyhow::Result<Vec<Row>>;

    /// Paginated range scan. Returns up to `limit` rows and, when the range holds more, a marker
    /// that resumes the scan at the next unread row when passed back in `request.marker`.
    async fn scan_with_marker(&self, request: MarkerScanRequest) -> anyhow::Result<Page<Row>>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanRequest {
    pub table: String,
    pub range: RowRange,
    pub limit: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarkerScanRequest {
    pub table: String,
    pub range: RowRange,
    pub limit: usize,
    pub marker: Option<Marker>,
}

/// A raw row: its key and a sparse map of column qualifier to value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub rowkey: String,

    #[serde(flatten)]
    pub cells: BTreeMap<String, String>,
}

impl Row {
    pub fn new(rowkey: impl Into<String>) -> Self {
        Self {
            rowkey: rowkey.into(),
            cells: BTreeMap::new(),
        }
    }

    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.cells.insert(column.into(), value.into());
        self
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }
}
