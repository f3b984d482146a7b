// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Node stats table: one row per node seen by a crawl, filed under the crawl's snapshot key.

use serde::{Deserialize, Serialize};

use crate::Row;
use crate::error::DecodeError;
use crate::tables::{parse, required, truthy};

pub const NAME: &str = "rawl_node_stats";

pub mod col {
    pub const PUBKEY: &str = "pubkey";
    /// `<ip>[:<port>]`
    pub const IPP: &str = "ipp";
    pub const VERSION: &str = "version";
    pub const UPTIME: &str = "uptime";
    pub const IN_COUNT: &str = "in_count";
    pub const IN_ADD_COUNT: &str = "in_add_count";
    pub const IN_DROP_COUNT: &str = "in_drop_count";
    pub const OUT_COUNT: &str = "out_count";
    pub const OUT_ADD_COUNT: &str = "out_add_count";
    pub const OUT_DROP_COUNT: &str = "out_drop_count";
}

/// Peer-to-peer statistics for one node in a crawl.
///
/// The traffic counters are `None` both when the crawler did not report them and when it reported
/// zero; the store does not distinguish the two.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeStat {
    pub node_public_key: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    pub uptime: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inbound_count: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inbound_added: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inbound_dropped: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outbound_count: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outbound_added: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outbound_dropped: Option<u64>,
}

pub fn decode(row: &Row) -> Result<NodeStat, DecodeError> {
    let node_public_key = required(NAME, row, col::PUBKEY)?.to_string();

    let (ip, port) = match truthy(row, col::IPP) {
        None => (None, None),
        Some(ipp) => match ipp.split_once(':') {
            None => (Some(ipp), None),
            Some((ip, "")) => (Some(ip), None),
            Some((ip, port)) => (Some(ip), Some(parse(NAME, row, col::IPP, port)?)),
        },
    };

    let uptime = match truthy(row, col::UPTIME) {
        Some(uptime) => parse(NAME, row, col::UPTIME, uptime)?,
        None => 0,
    };

    Ok(NodeStat {
        node_public_key,
        ip: ip.map(str::to_string),
        port,
        version: row.get(col::VERSION).map(str::to_string),
        uptime,
        inbound_count: counter(row, col::IN_COUNT)?,
        inbound_added: counter(row, col::IN_ADD_COUNT)?,
        inbound_dropped: counter(row, col::IN_DROP_COUNT)?,
        outbound_count: counter(row, col::OUT_COUNT)?,
        outbound_added: counter(row, col::OUT_ADD_COUNT)?,
        outbound_dropped: counter(row, col::OUT_DROP_COUNT)?,
    })
}

/// Counters are only reported when present and not exactly `"0"`.
fn counter(row: &Row, column: &'static str) -> Result<Option<u64>, DecodeError> {
    match truthy(row, column) {
        None | Some("0") => Ok(None),
        Some(value) => parse(NAME, row, column, value).map(Some),
    }
}
