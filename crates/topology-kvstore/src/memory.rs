// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;
use std::ops::Bound;

use anyhow::Context as _;
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use crate::{Marker, MarkerScanRequest, Page, Row, RowRange, ScanRequest, WideColumnReader};

/// A read-only, in-memory stand-in for the wide-column store, loaded up front from rows or a
/// JSON dump of the form `{ "<table>": [ { "rowkey": "...", "<column>": "<value>", ... } ] }`.
///
/// Markers it hands out encode the key of the next unread row.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    tables: BTreeMap<String, BTreeMap<String, Row>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(dump: &str) -> anyhow::Result<Self> {
        let tables: BTreeMap<String, Vec<Row>> =
            serde_json::from_str(dump).context("Failed to parse store dump")?;

        let mut store = Self::new();
        for (table, rows) in tables {
            for row in rows {
                store.insert(&table, row);
            }
        }

        Ok(store)
    }

    /// Add `row` to `table`, replacing any row with the same key.
    pub fn insert(&mut self, table: &str, row: Row) {
        self.tables
            .entry(table.to_string())
            .or_default()
            .insert(row.rowkey.clone(), row);
    }

    pub fn with_rows(mut self, table: &str, rows: impl IntoIterator<Item = Row>) -> Self {
        for row in rows {
            self.insert(table, row);
        }
        self
    }

    /// Rows of `table` with keys in `[lower, upper)` (or `[lower, upper]`), in scan order.
    fn rows<'a>(
        &'a self,
        table: &str,
        lower: &'a str,
        upper: Bound<&'a str>,
        descending: bool,
    ) -> Box<dyn Iterator<Item = &'a Row> + Send + 'a> {
        let Some(rows) = self.tables.get(table) else {
            return Box::new(std::iter::empty());
        };

        let inverted = match upper {
            Bound::Included(upper) => lower > upper,
            Bound::Excluded(upper) => lower >= upper,
            Bound::Unbounded => false,
        };

        if inverted {
            return Box::new(std::iter::empty());
        }

        let range = rows
            .range::<str, _>((Bound::Included(lower), upper))
            .map(|(_, row)| row);

        if descending {
            Box::new(range.rev())
        } else {
            Box::new(range)
        }
    }
}

#[async_trait]
impl WideColumnReader for MemoryStore {
    async fn scan(&self, request: ScanRequest) -> anyhow::Result<Vec<Row>> {
        let RowRange {
            start,
            stop,
            descending,
        } = &request.range;

        Ok(self
            .rows(&request.table, start, Bound::Excluded(stop.as_str()), *descending)
            .take(request.limit)
            .cloned()
            .collect())
    }

    async fn scan_with_marker(&self, request: MarkerScanRequest) -> anyhow::Result<Page<Row>> {
        let RowRange {
            start,
            stop,
            descending,
        } = &request.range;

        let resume = request
            .marker
            .as_ref()
            .map(decode_marker)
            .transpose()?;

        // Resuming narrows the range to begin at the next unread row, from whichever end the
        // scan is reading.
        let (lower, upper) = match (&resume, descending) {
            (None, _) => (start.as_str(), Bound::Excluded(stop.as_str())),
            (Some(next), _) if next < start || next >= stop => {
                anyhow::bail!("Marker for row {next:?} is outside the scanned range")
            }
            (Some(next), false) => (next.as_str(), Bound::Excluded(stop.as_str())),
            (Some(next), true) => (start.as_str(), Bound::Included(next.as_str())),
        };

        let mut items: Vec<Row> = self
            .rows(&request.table, lower, upper, *descending)
            .take(request.limit.saturating_add(1))
            .cloned()
            .collect();

        let marker = if items.len() > request.limit {
            items
                .pop()
                .map(|next| Marker::from_store_token(URL_SAFE_NO_PAD.encode(next.rowkey)))
        } else {
            None
        };

        Ok(Page { marker, items })
    }
}

fn decode_marker(marker: &Marker) -> anyhow::Result<String> {
    let bytes = URL_SAFE_NO_PAD
        .decode(marker.store_token())
        .context("Marker is not valid base64")?;
    String::from_utf8(bytes).context("Marker is not a valid row key")
}
