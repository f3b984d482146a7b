// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::Error;
use crate::scan::measure;
use crate::{ReaderConfig, Row, ScanRequest, WideColumnReader, tables};

/// Resolves a date to the crawl snapshot in effect at that date: the most recent one captured at
/// or before it.
pub struct SnapshotLocator<S> {
    store: Arc<S>,
    table: String,
    slow_request_threshold: Duration,
}

impl<S: WideColumnReader> SnapshotLocator<S> {
    pub fn new(store: Arc<S>, config: &ReaderConfig) -> Self {
        Self {
            store,
            table: config.table(&config.tables.crawls),
            slow_request_threshold: config.slow_request_threshold(),
        }
    }

    /// The crawl row (its key and metadata columns) for the latest snapshot at or before
    /// `before_or_at`, or the latest snapshot overall. `None` if there is no such snapshot.
    pub async fn locate(&self, before_or_at: Option<DateTime<Utc>>) -> Result<Option<Row>, Error> {
        let request = ScanRequest {
            table: self.table.clone(),
            range: tables::crawls::encode_range(before_or_at),
            limit: 1,
        };

        let rows = measure(
            self.slow_request_threshold,
            "scan",
            &request,
            self.store.scan(request.clone()),
        )
        .await?;

        let located = rows.into_iter().next();
        debug!(
            ?before_or_at,
            snapshot = located.as_ref().map(|r| r.rowkey.as_str()),
            "Located snapshot"
        );

        Ok(located)
    }
}
