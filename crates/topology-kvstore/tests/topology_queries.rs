// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use chrono::DateTime;
use serde_json::json;
use topology_kvstore::{
    Error, LinksQuery, MemoryStore, NodesQuery, ReaderConfig, ReportsQuery, TopologyReader,
};

fn dump() -> serde_json::Value {
    json!({
        "mainnet_rawls": [
            {"rowkey": "1450000000000_a", "nodes_count": "2"},
            {"rowkey": "1450086400000_b", "nodes_count": "3"},
        ],
        "mainnet_rawl_node_stats": [
            {"rowkey": "1450000000000_a+n1", "pubkey": "n1", "ipp": "1.2.3.4:51235"},
            {"rowkey": "1450000000000_a+n2", "pubkey": "n2", "version": "0.30.0"},
            {"rowkey": "1450086400000_b+n1", "pubkey": "n1", "uptime": "60", "in_count": "0"},
            {"rowkey": "1450086400000_b+n2", "pubkey": "n2", "in_count": "7"},
            {"rowkey": "1450086400000_b+n3", "pubkey": "n3", "ipp": "5.6.7.8"},
        ],
        "mainnet_onnections": [
            {"rowkey": "1450000000000_a+n1+n2"},
            {"rowkey": "1450086400000_b+n1+n2"},
            {"rowkey": "1450086400000_b+n2+n3"},
            {"rowkey": "1450086400000_b+n3+n1"},
        ],
        "mainnet_validator_reports": [
            {
                "rowkey": "20151214000000|v1",
                "validation_public_key": "v1",
                "date": "2015-12-14",
                "total_ledgers": "100",
                "main_net_agreement": "0.9",
                "main_net_ledgers": "90",
                "alt_net_agreement": "0",
                "alt_net_ledgers": "0",
                "other_ledgers": "10",
            },
            {
                "rowkey": "20151214000000|v2",
                "validation_public_key": "v2",
                "date": "2015-12-14",
                "total_ledgers": "100",
                "main_net_agreement": "1.0",
                "main_net_ledgers": "100",
                "alt_net_agreement": "0",
                "alt_net_ledgers": "0",
                "other_ledgers": "0",
            },
        ],
    })
}

fn reader() -> TopologyReader<MemoryStore> {
    let store = MemoryStore::from_json(&dump().to_string()).unwrap();
    let config: ReaderConfig = toml::from_str(
        r#"
        table-prefix = "mainnet_"
        max-page-size = 2
        "#,
    )
    .unwrap();

    TopologyReader::new(Arc::new(store), config)
}

#[tokio::test]
async fn test_walk_latest_snapshot() {
    let reader = reader();

    let first = reader.topology_nodes(NodesQuery::default()).await.unwrap();
    assert_eq!(first.date, DateTime::from_timestamp(1450086400, 0).unwrap());
    assert_eq!(first.nodes.len(), 2);

    let second = reader
        .topology_nodes(NodesQuery {
            marker: first.marker.clone(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(second.marker, None);

    let nodes = serde_json::to_value([first.nodes, second.nodes].concat()).unwrap();
    assert_eq!(
        nodes,
        json!([
            {"node_public_key": "n1", "uptime": 60},
            {"node_public_key": "n2", "uptime": 0, "inbound_count": 7},
            {"node_public_key": "n3", "ip": "5.6.7.8", "uptime": 0},
        ])
    );
}

#[tokio::test]
async fn test_historical_snapshot_with_links() {
    let reader = reader();
    let snapshot = reader
        .topology_nodes(NodesQuery {
            date: DateTime::from_timestamp(1450050000, 0),
            links: true,
            ..Default::default()
        })
        .await
        .unwrap();

    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json["date"], "2015-12-13T09:46:40Z");
    assert_eq!(json["nodes"][0]["port"], 51235);
    assert_eq!(json["nodes"][1]["version"], "0.30.0");
    assert_eq!(json["links"], json!([{"source": "n1", "target": "n2"}]));
}

#[tokio::test]
async fn test_links_pages() {
    let reader = reader();

    let first = reader.topology_links(LinksQuery::default()).await.unwrap();
    assert_eq!(first.links.len(), 2);

    let rest = reader
        .topology_links(LinksQuery {
            marker: first.marker,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(rest.links.len(), 1);
    assert_eq!(rest.links[0].source, "n3");
    assert_eq!(rest.marker, None);
}

#[tokio::test]
async fn test_info_and_not_found() {
    let reader = reader();

    let row = reader.topology_info(None).await.unwrap().unwrap();
    assert_eq!(row.rowkey, "1450086400000_b");
    assert_eq!(row.get("nodes_count"), Some("3"));

    let before = DateTime::from_timestamp(1449000000, 0);
    assert_eq!(reader.topology_info(before).await.unwrap(), None);
    assert!(matches!(
        reader
            .topology_nodes(NodesQuery {
                date: before,
                ..Default::default()
            })
            .await,
        Err(Error::NotFound)
    ));
}

#[tokio::test]
async fn test_latest_validator_reports() {
    let reader = reader();
    let page = reader
        .validator_reports(ReportsQuery::default())
        .await
        .unwrap();

    let json = serde_json::to_value(&page).unwrap();
    assert_eq!(json["reports"][0]["validation_public_key"], "v2");
    assert_eq!(json["reports"][0]["main_net_agreeement"], 1.0);
    assert_eq!(json["reports"][1]["validation_public_key"], "v1");
}
