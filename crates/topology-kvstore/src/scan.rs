// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::convert::Infallible;
use std::fmt;
use std::fmt::Debug;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Error;
use crate::{MarkerScanRequest, ReaderConfig, Row, RowRange, WideColumnReader};

/// Continuation token for a paginated scan. Only the store that issued it knows what it means:
/// callers hand it back unchanged to fetch the next page.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Marker(String);

/// One page of a paginated scan. `marker` is `None` when the range is exhausted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    pub items: Vec<T>,
}

/// Fetches one page of raw rows at a time, capping every request at the configured maximum page
/// size.
pub struct PagedScanner<S> {
    store: Arc<S>,
    max_page_size: usize,
    slow_request_threshold: Duration,
}

impl Marker {
    /// Wrap a continuation token minted by a [`WideColumnReader`] implementation.
    pub fn from_store_token(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The store's token, for [`WideColumnReader`] implementations resuming a scan.
    pub fn store_token(&self) -> &str {
        &self.0
    }
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            marker: None,
            items: vec![],
        }
    }

    pub fn try_map<U, E>(self, f: impl FnMut(&T) -> Result<U, E>) -> Result<Page<U>, E> {
        Ok(Page {
            marker: self.marker,
            items: self.items.iter().map(f).collect::<Result<_, _>>()?,
        })
    }
}

impl<S: WideColumnReader> PagedScanner<S> {
    pub fn new(store: Arc<S>, config: &ReaderConfig) -> Self {
        Self {
            store,
            max_page_size: config.max_page_size.max(1),
            slow_request_threshold: config.slow_request_threshold(),
        }
    }

    /// Rows a request for `limit` rows is allowed to fetch.
    pub fn page_size(&self, limit: Option<usize>) -> usize {
        match limit {
            None | Some(0) => self.max_page_size,
            Some(limit) => limit.min(self.max_page_size),
        }
    }

    /// Fetch the page of `table` within `range` that starts at `marker` (or at the start of the
    /// range). Rows are returned verbatim.
    pub async fn scan(
        &self,
        table: String,
        range: RowRange,
        limit: Option<usize>,
        marker: Option<Marker>,
    ) -> Result<Page<Row>, Error> {
        let request = MarkerScanRequest {
            table,
            range,
            limit: self.page_size(limit),
            marker,
        };

        debug!(?request, "Paginated scan");
        measure(
            self.slow_request_threshold,
            "scan_with_marker",
            &request,
            self.store.scan_with_marker(request.clone()),
        )
        .await
    }
}

/// Run the `load` future, measuring how long it takes. If it takes longer than
/// `slow_request_threshold`, log a warning with the details of the request.
pub(crate) async fn measure<T, A: Debug>(
    slow_request_threshold: Duration,
    method: &str,
    args: &A,
    load: impl Future<Output = anyhow::Result<T>>,
) -> Result<T, Error> {
    let start = Instant::now();
    let result = load.await;
    let elapsed = start.elapsed();

    if elapsed > slow_request_threshold {
        warn!(
            elapsed_ms = elapsed.as_millis(),
            threshold_ms = slow_request_threshold.as_millis(),
            method,
            ?args,
            "Slow store request"
        );
    }

    result.map_err(Error::Transport)
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reads back a marker exactly as [`Display`](fmt::Display) printed it.
impl FromStr for Marker {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}
