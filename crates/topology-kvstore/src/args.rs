// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::Marker;

#[derive(clap::Parser, Debug, Clone)]
#[clap(
    name = "topology-kvstore",
    about = "Query network topology snapshots and validator reports"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug, Clone)]
pub enum Command {
    /// Nodes in the snapshot in effect at a date, optionally with their peer links.
    Nodes {
        #[command(flatten)]
        store: StoreArgs,

        /// RFC 3339 instant; defaults to the latest snapshot.
        #[arg(long)]
        date: Option<DateTime<Utc>>,

        #[arg(long)]
        limit: Option<usize>,

        /// Also fetch the snapshot's links.
        #[arg(long)]
        links: bool,

        /// Continue from a previous page.
        #[arg(long)]
        marker: Option<Marker>,
    },

    /// Peer links in a snapshot, chosen by key or by date.
    Links {
        #[command(flatten)]
        store: StoreArgs,

        #[arg(long, conflicts_with = "crawl_key")]
        date: Option<DateTime<Utc>>,

        #[arg(long)]
        crawl_key: Option<String>,

        #[arg(long)]
        limit: Option<usize>,

        #[arg(long)]
        marker: Option<Marker>,
    },

    /// The crawl row for the snapshot in effect at a date.
    Info {
        #[command(flatten)]
        store: StoreArgs,

        #[arg(long)]
        date: Option<DateTime<Utc>>,
    },

    /// Validator agreement reports, most reliable first. Without `--start`, the latest day's.
    ValidatorReports {
        #[command(flatten)]
        store: StoreArgs,

        #[arg(long)]
        start: Option<DateTime<Utc>>,

        #[arg(long)]
        end: Option<DateTime<Utc>>,

        #[arg(long)]
        limit: Option<usize>,

        #[arg(long)]
        marker: Option<Marker>,
    },

    /// Output the default reader configuration as TOML.
    GenerateConfig,
}

#[derive(clap::Args, Debug, Clone)]
pub struct StoreArgs {
    /// JSON dump of the tables to read from.
    #[arg(long)]
    pub data: PathBuf,

    /// Path to the reader's TOML configuration file. Defaults are used if not provided.
    #[arg(long)]
    pub config: Option<PathBuf>,
}
