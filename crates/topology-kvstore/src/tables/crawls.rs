// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Crawls table: one row per topology snapshot, keyed `<epoch_millis>_<suffix>`. Keys are
//! zero-padded, so string order is chronological order.

use chrono::{DateTime, Utc};

use crate::error::DecodeError;
use crate::tables::RowRange;

pub const NAME: &str = "rawls";

/// Sorts after every numeric key.
const KEY_UPPER_SENTINEL: &str = "a";

const KEY_LOWER_BOUND: &str = "0";

/// Width of the zero-padded millisecond prefix.
const KEY_TIMESTAMP_DIGITS: usize = 13;

/// Range covering every snapshot captured at or before `before_or_at`, or every snapshot at all
/// when no instant is given. Rows come back newest first.
pub fn encode_range(before_or_at: Option<DateTime<Utc>>) -> RowRange {
    let stop = match before_or_at {
        // The stop key is exclusive: bump by a millisecond so a snapshot captured exactly at
        // `before_or_at` is still in range.
        Some(date) => encode_stop_row(date.timestamp_millis().saturating_add(1)),
        None => KEY_UPPER_SENTINEL.to_string(),
    };
    RowRange::descending(KEY_LOWER_BOUND, stop)
}

/// Stop rows are padded like keys, so they compare against keys in time order.
fn encode_stop_row(millis: i64) -> String {
    if millis <= 0 {
        return KEY_LOWER_BOUND.to_string();
    }

    let stop = format!("{millis:0width$}", width = KEY_TIMESTAMP_DIGITS);
    if stop.len() > KEY_TIMESTAMP_DIGITS {
        KEY_UPPER_SENTINEL.to_string()
    } else {
        stop
    }
}

/// Capture instant of a snapshot, truncated to whole seconds.
pub fn decode_timestamp(key: &str) -> Result<DateTime<Utc>, DecodeError> {
    let malformed = |reason| DecodeError::RowKey {
        table: NAME,
        key: key.to_string(),
        reason,
    };

    let millis: u64 = key
        .split('_')
        .next()
        .and_then(|prefix| prefix.parse().ok())
        .ok_or_else(|| malformed("expected a millisecond timestamp prefix"))?;

    i64::try_from(millis / 1000)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .ok_or_else(|| malformed("timestamp out of range"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_decode_timestamp() {
        let ts = decode_timestamp("1450000123456_abcdef").unwrap();
        assert_eq!(ts.timestamp(), 1450000123);
        assert_eq!(ts.to_rfc3339(), "2015-12-13T09:48:43+00:00");

        // No suffix is still a valid key.
        assert_eq!(decode_timestamp("1000").unwrap().timestamp(), 1);
    }

    #[test]
    fn test_decode_timestamp_malformed() {
        for key in ["", "_abc", "abc_123", "-5_x", "1.5_x"] {
            assert!(
                matches!(decode_timestamp(key), Err(DecodeError::RowKey { .. })),
                "{key:?} should not decode"
            );
        }
    }

    #[test]
    fn test_encode_range() {
        let date = DateTime::from_timestamp(1450000000, 0).unwrap();
        let range = encode_range(Some(date));
        assert!(range.descending);
        assert_eq!(range.start, "0");
        assert_eq!(range.stop, "1450000000001");

        // Captured exactly at the bound: included. A millisecond later: excluded.
        assert!("1450000000000_x" < range.stop.as_str());
        assert!("1450000000001_x" >= range.stop.as_str());

        let latest = encode_range(None);
        assert!("9999999999999_x" < latest.stop.as_str());
    }

    #[test]
    fn test_encode_range_pads_stop_row() {
        // 1990-01-01: shorter than a key's prefix unless padded.
        let range = encode_range(DateTime::from_timestamp(631152000, 0));
        assert_eq!(range.stop, "0631152000001");
        assert!("1450000000000_a" >= range.stop.as_str());
        assert!("0631152000000_a" < range.stop.as_str());

        // Before the epoch nothing can be in range.
        let range = encode_range(DateTime::from_timestamp(-1, 0));
        assert_eq!(range.stop, range.start);

        // Past the widest key prefix, everything is.
        let range = encode_range(DateTime::from_timestamp(10_000_000_000, 0));
        assert_eq!(range.stop, "a");
    }

    proptest! {
        #[test]
        fn key_order_is_chronological(
            a in 0u64..10_000_000_000_000,
            b in 0u64..10_000_000_000_000,
        ) {
            let ka = format!("{a:013}_x");
            let kb = format!("{b:013}_y");
            let (lo, hi) = if ka <= kb { (ka, kb) } else { (kb, ka) };
            prop_assert!(decode_timestamp(&lo).unwrap() <= decode_timestamp(&hi).unwrap());
        }
    }
}
