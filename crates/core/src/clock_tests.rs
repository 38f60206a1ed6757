// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use chrono::TimeZone;
use std::sync::Arc;

#[test]
fn system_clock_is_close_to_now() {
    let before = Utc::now();
    let now = SystemClock.now();
    assert!(now >= before);
}

#[test]
fn manual_clock_set_and_advance() {
    let start = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
    let clock = ManualClock::new(start);
    assert_eq!(clock.now(), start);

    clock.advance(chrono::Duration::seconds(5));
    assert_eq!(clock.now(), start + chrono::Duration::seconds(5));

    clock.set(start);
    assert_eq!(clock.now(), start);
}

#[test]
fn arc_clock_delegates() {
    let start = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
    let clock = Arc::new(ManualClock::new(start));
    let shared = Arc::clone(&clock);
    clock.advance(chrono::Duration::milliseconds(1));
    assert_eq!(shared.now(), start + chrono::Duration::milliseconds(1));
}
