// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Error;
use crate::scan::measure;
use crate::tables::{self, Link, NodeStat, ValidatorReport};
use crate::{
    Marker, PagedScanner, ReaderConfig, Row, ScanRequest, SnapshotLocator, WideColumnReader,
};

/// Query surface over the topology tables. Each operation is a short sequence of dependent store
/// round-trips, and any failure along the way fails the whole operation.
pub struct TopologyReader<S> {
    config: ReaderConfig,
    store: Arc<S>,
    locator: SnapshotLocator<S>,
    scanner: PagedScanner<S>,
}

#[derive(Clone, Debug, Default)]
pub struct NodesQuery {
    /// Read the snapshot in effect at this instant, or the latest one.
    pub date: Option<DateTime<Utc>>,
    pub limit: Option<usize>,

    /// Also fetch the snapshot's peer links.
    pub links: bool,
    pub marker: Option<Marker>,
}

#[derive(Clone, Debug, Default)]
pub struct LinksQuery {
    /// Read links for this snapshot key directly, ignoring `date`.
    pub crawl_key: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
    pub marker: Option<Marker>,
}

#[derive(Clone, Debug, Default)]
pub struct ReportsQuery {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
    pub marker: Option<Marker>,
}

/// One page of a snapshot's nodes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub date: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    pub nodes: Vec<NodeStat>,

    /// Only present when links were asked for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<Link>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinksPage {
    pub date: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    pub links: Vec<Link>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportsPage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    pub reports: Vec<ValidatorReport>,
}

impl<S: WideColumnReader> TopologyReader<S> {
    pub fn new(store: Arc<S>, config: ReaderConfig) -> Self {
        Self {
            locator: SnapshotLocator::new(store.clone(), &config),
            scanner: PagedScanner::new(store.clone(), &config),
            store,
            config,
        }
    }

    /// A page of the nodes in the snapshot in effect at `query.date`, optionally joined with the
    /// snapshot's links. Fails with [`Error::NotFound`] if no snapshot was captured by then.
    pub async fn topology_nodes(&self, query: NodesQuery) -> Result<Snapshot, Error> {
        let key = self.snapshot_key(query.date).await?;
        let date = tables::crawls::decode_timestamp(&key)?;

        let page = self
            .scanner
            .scan(
                self.config.table(&self.config.tables.node_stats),
                tables::snapshot_range(&key),
                query.limit,
                query.marker,
            )
            .await?
            .try_map(tables::node_stats::decode)?;

        let links = if query.links {
            let joined = self
                .topology_links(LinksQuery {
                    crawl_key: Some(key.clone()),
                    ..Default::default()
                })
                .await?;

            if joined.marker.is_some() {
                warn!(
                    snapshot = %key,
                    links = joined.links.len(),
                    "Joined links truncated at max page size"
                );
            }

            Some(joined.links)
        } else {
            None
        };

        Ok(Snapshot {
            date,
            marker: page.marker,
            nodes: page.items,
            links,
        })
    }

    /// A page of the links in the snapshot named by `query.crawl_key`, or else the snapshot in
    /// effect at `query.date`. Fails with [`Error::NotFound`] if no such snapshot was captured.
    pub async fn topology_links(&self, query: LinksQuery) -> Result<LinksPage, Error> {
        let key = match query.crawl_key {
            Some(key) => key,
            None => self.snapshot_key(query.date).await?,
        };

        let page = self
            .scanner
            .scan(
                self.config.table(&self.config.tables.connections),
                tables::snapshot_range(&key),
                query.limit,
                query.marker,
            )
            .await?
            .try_map(tables::connections::decode)?;

        Ok(LinksPage {
            date: tables::crawls::decode_timestamp(&key)?,
            marker: page.marker,
            links: page.items,
        })
    }

    /// The crawl row for the snapshot in effect at `date`, as stored.
    pub async fn topology_info(&self, date: Option<DateTime<Utc>>) -> Result<Option<Row>, Error> {
        self.locator.locate(date).await
    }

    /// A page of validator reports dated between `query.start` and `query.end`, most reliable
    /// first. Without a start, reads the day of the most recent report.
    pub async fn validator_reports(&self, query: ReportsQuery) -> Result<ReportsPage, Error> {
        self.validator_reports_at(query, Utc::now()).await
    }

    async fn validator_reports_at(
        &self,
        query: ReportsQuery,
        now: DateTime<Utc>,
    ) -> Result<ReportsPage, Error> {
        let end = query.end.unwrap_or(now);
        let start = match query.start {
            Some(start) => start,

            // Read from the start of the day of the latest report dated by `end` up to `end`,
            // which defaults to now.
            None => {
                let Some(latest) = self.latest_report(end).await? else {
                    return Ok(ReportsPage::default());
                };

                let date = tables::validator_reports::decode_date(&latest)?;
                date.date_naive().and_time(NaiveTime::MIN).and_utc()
            }
        };

        let page = self
            .scanner
            .scan(
                self.config.table(&self.config.tables.validator_reports),
                tables::validator_reports::encode_range(start, end),
                query.limit,
                query.marker,
            )
            .await?;

        let mut reports = page
            .items
            .iter()
            .map(tables::validator_reports::decode)
            .collect::<Result<Vec<_>, _>>()?;
        reports.sort_by(tables::validator_reports::by_reliability);

        Ok(ReportsPage {
            marker: page.marker,
            reports,
        })
    }

    async fn latest_report(&self, end: DateTime<Utc>) -> Result<Option<ValidatorReport>, Error> {
        let request = ScanRequest {
            table: self.config.table(&self.config.tables.validator_reports),
            range: tables::validator_reports::encode_latest_range(end),
            limit: 1,
        };

        let rows = measure(
            self.config.slow_request_threshold(),
            "scan",
            &request,
            self.store.scan(request.clone()),
        )
        .await?;

        let latest = rows
            .first()
            .map(tables::validator_reports::decode)
            .transpose()?;

        debug!(
            report = rows.first().map(|r| r.rowkey.as_str()),
            "Latest validator report"
        );

        Ok(latest)
    }

    async fn snapshot_key(&self, date: Option<DateTime<Utc>>) -> Result<String, Error> {
        self.locator
            .locate(date)
            .await?
            .map(|row| row.rowkey)
            .ok_or(Error::NotFound)
    }
}
