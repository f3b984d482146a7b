// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tokio::fs;
use topology_kvstore::args::{Args, Command, StoreArgs};
use topology_kvstore::{
    LinksQuery, MemoryStore, NodesQuery, ReaderConfig, ReportsQuery, TopologyReader,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Enable tracing, configured by environment variables. Results go to stdout, so logs don't.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Nodes {
            store,
            date,
            limit,
            links,
            marker,
        } => {
            let reader = open(store).await?;
            let snapshot = reader
                .topology_nodes(NodesQuery {
                    date,
                    limit,
                    links,
                    marker,
                })
                .await?;

            print_json(&snapshot)?;
        }

        Command::Links {
            store,
            date,
            crawl_key,
            limit,
            marker,
        } => {
            let reader = open(store).await?;
            let page = reader
                .topology_links(LinksQuery {
                    crawl_key,
                    date,
                    limit,
                    marker,
                })
                .await?;

            print_json(&page)?;
        }

        Command::Info { store, date } => {
            let reader = open(store).await?;
            print_json(&reader.topology_info(date).await?)?;
        }

        Command::ValidatorReports {
            store,
            start,
            end,
            limit,
            marker,
        } => {
            let reader = open(store).await?;
            let page = reader
                .validator_reports(ReportsQuery {
                    start,
                    end,
                    limit,
                    marker,
                })
                .await?;

            print_json(&page)?;
        }

        Command::GenerateConfig => {
            let config = ReaderConfig::default();
            let config_toml = toml::to_string_pretty(&config)
                .context("Failed to serialize default configuration to TOML.")?;

            println!("{config_toml}");
        }
    }

    Ok(())
}

async fn open(args: StoreArgs) -> anyhow::Result<TopologyReader<MemoryStore>> {
    let config = read_config(args.config).await?;

    let dump = fs::read_to_string(&args.data)
        .await
        .with_context(|| format!("Failed to read store dump {}", args.data.display()))?;
    let store = MemoryStore::from_json(&dump)?;

    info!(data = %args.data.display(), prefix = %config.table_prefix, "Opened store dump");
    Ok(TopologyReader::new(Arc::new(store), config))
}

async fn read_config(path: Option<PathBuf>) -> anyhow::Result<ReaderConfig> {
    if let Some(path) = path {
        let contents = fs::read_to_string(path)
            .await
            .context("Failed to read configuration TOML file")?;

        toml::from_str(&contents).context("Failed to parse configuration TOML file")
    } else {
        Ok(ReaderConfig::default())
    }
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize result")?;
    println!("{json}");
    Ok(())
}
