// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Connections table: one row per directed peer link in a crawl, keyed
//! `<snapshot_key>+<source>+<target>`. Only the row key is read.

use serde::{Deserialize, Serialize};

use crate::Row;
use crate::error::DecodeError;

pub const NAME: &str = "onnections";

const KEY_SEPARATOR: char = '+';

/// A directed edge between two node public keys.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    pub source: String,
    pub target: String,
}

pub fn decode(row: &Row) -> Result<Link, DecodeError> {
    let mut parts = row.rowkey.split(KEY_SEPARATOR).skip(1);
    match (parts.next(), parts.next()) {
        (Some(source), Some(target)) if !source.is_empty() && !target.is_empty() => Ok(Link {
            source: source.to_string(),
            target: target.to_string(),
        }),
        _ => Err(DecodeError::RowKey {
            table: NAME,
            key: row.rowkey.clone(),
            reason: "expected <snapshot>+<source>+<target>",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_decode() {
        let link = decode(&Row::new("PFX+abc+def")).unwrap();
        assert_eq!(
            link,
            Link {
                source: "abc".to_string(),
                target: "def".to_string(),
            }
        );

        // Cell values are ignored.
        let link = decode(&Row::new("1450000000000_x+n9a+n9b").with("weight", "3")).unwrap();
        assert_eq!(link.source, "n9a");
        assert_eq!(link.target, "n9b");
    }

    #[test]
    fn test_decode_malformed() {
        for key in ["", "PFX", "PFX+abc", "PFX++def", "PFX+abc+"] {
            assert!(
                matches!(
                    decode(&Row::new(key)),
                    Err(DecodeError::RowKey { table: NAME, .. })
                ),
                "{key:?} should not decode"
            );
        }
    }

    proptest! {
        #[test]
        fn short_keys_are_errors(key in "[A-Za-z0-9_]{0,20}(\\+[A-Za-z0-9]{0,20})?") {
            prop_assert!(decode(&Row::new(key)).is_err());
        }

        #[test]
        fn well_formed_keys_decode(
            prefix in "[0-9]{13}_[a-z0-9]{1,8}",
            source in "[A-Za-z0-9]{1,40}",
            target in "[A-Za-z0-9]{1,40}",
        ) {
            let link = decode(&Row::new(format!("{prefix}+{source}+{target}"))).unwrap();
            prop_assert_eq!(link.source, source);
            prop_assert_eq!(link.target, target);
        }
    }
}
