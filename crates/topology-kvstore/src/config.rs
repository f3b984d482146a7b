// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::tables;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ReaderConfig {
    /// Namespace prepended to every table name, e.g. `prod_`.
    pub table_prefix: String,

    /// Upper bound on rows returned by a single paginated scan, and the page size used when a
    /// query does not ask for one.
    pub max_page_size: usize,

    /// Store round-trips slower than this are logged.
    pub slow_request_threshold_ms: u64,

    /// Unprefixed table names.
    pub tables: TableNames,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct TableNames {
    /// Snapshot index, one row per crawl.
    pub crawls: String,
    pub node_stats: String,
    pub connections: String,
    pub validator_reports: String,
}

impl ReaderConfig {
    /// Fully qualified name of `table`.
    pub fn table(&self, table: &str) -> String {
        format!("{}{}", self.table_prefix, table)
    }

    pub fn slow_request_threshold(&self) -> Duration {
        Duration::from_millis(self.slow_request_threshold_ms)
    }
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            table_prefix: String::new(),
            max_page_size: 1000,
            slow_request_threshold_ms: 500,
            tables: TableNames::default(),
        }
    }
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            crawls: tables::crawls::NAME.to_string(),
            node_stats: tables::node_stats::NAME.to_string(),
            connections: tables::connections::NAME.to_string(),
            validator_reports: tables::validator_reports::NAME.to_string(),
        }
    }
}
