// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[parameterized(
    one = { "1", 1 },
    six = { "6", 6 },
    padded = { " 3 ", 3 },
)]
fn period_parses(input: &str, expected: u8) {
    assert_eq!(input.parse::<Period>().unwrap().get(), expected);
}

#[parameterized(
    zero = { "0" },
    seven = { "7" },
    negative = { "-1" },
    word = { "first" },
    empty = { "" },
)]
fn period_rejects(input: &str) {
    assert!(matches!(input.parse::<Period>(), Err(Error::InvalidPeriod(_))));
}

#[test]
fn period_from_number_treats_out_of_range_as_unscoped() {
    assert_eq!(Period::from_number(4), Some(Period::new(4).unwrap()));
    assert_eq!(Period::from_number(0), None);
    assert_eq!(Period::from_number(12), None);
    assert_eq!(Period::from_number(-3), None);
}

#[test]
fn period_serializes_as_string() {
    let p = Period::new(2).unwrap();
    assert_eq!(serde_json::to_string(&p).unwrap(), "\"2\"");
    let back: Period = serde_json::from_str("\"2\"").unwrap();
    assert_eq!(back, p);
    assert!(serde_json::from_str::<Period>("\"9\"").is_err());
}

#[test]
fn period_all_lists_six() {
    let all: Vec<u8> = Period::all().map(Period::get).collect();
    assert_eq!(all, vec![1, 2, 3, 4, 5, 6]);
}

#[parameterized(
    all_lower = { "all", PeriodFilter::All },
    all_title = { "All", PeriodFilter::All },
    three = { "3", PeriodFilter::One(Period(3)) },
)]
fn filter_parses(input: &str, expected: PeriodFilter) {
    assert_eq!(input.parse::<PeriodFilter>().unwrap(), expected);
}

#[test]
fn filter_rejects_garbage() {
    assert!(matches!(
        "none".parse::<PeriodFilter>(),
        Err(Error::InvalidPeriodFilter(_))
    ));
}

#[test]
fn filter_default_is_period_one() {
    assert_eq!(PeriodFilter::default(), PeriodFilter::One(Period(1)));
}

#[test]
fn filter_matches() {
    let two = Period::new(2).unwrap();
    assert!(PeriodFilter::All.matches(None));
    assert!(PeriodFilter::All.matches(Some(two)));
    assert!(PeriodFilter::One(two).matches(Some(two)));
    assert!(!PeriodFilter::One(two).matches(None));
    assert!(!PeriodFilter::One(two).matches(Some(Period(3))));
}

#[test]
fn filter_next_cycles_through_all() {
    let mut filter = PeriodFilter::One(Period(5));
    filter = filter.next();
    assert_eq!(filter, PeriodFilter::One(Period(6)));
    filter = filter.next();
    assert_eq!(filter, PeriodFilter::All);
    filter = filter.next();
    assert_eq!(filter, PeriodFilter::One(Period(1)));
}

#[test]
fn filter_serde_roundtrip_uses_display_form() {
    assert_eq!(serde_json::to_string(&PeriodFilter::All).unwrap(), "\"All\"");
    let f: PeriodFilter = serde_json::from_str("\"4\"").unwrap();
    assert_eq!(f.single(), Some(Period(4)));
}
