// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;

fn row(id: &str, name: &str, period: Option<&str>) -> StudentRow {
    StudentRow {
        student_id: id.to_string(),
        name: name.to_string(),
        period: period.map(str::to_string),
        tenant_id: "T".to_string(),
    }
}

#[test]
fn student_row_from_entry() {
    let entry = RosterEntry {
        name: "Ana Diaz".into(),
        period: Some(Period::new(3).unwrap()),
    };
    let built = StudentRow::from_entry("55555", &entry, "T");
    assert_eq!(built, row("55555", "Ana Diaz", Some("3")));
}

#[test]
fn into_entry_drops_unknown_period() {
    let (id, entry) = row("1", "Ben", Some("zero")).into_entry();
    assert_eq!(id, "1");
    assert_eq!(entry.period, None);
}

#[test]
fn roster_from_rows_later_row_wins() {
    let roster = roster_from_rows(vec![
        row("1", "Ben", Some("1")),
        row("2", "Cy", None),
        row("1", "Ben Ortiz", Some("4")),
    ]);
    assert_eq!(roster.len(), 2);
    assert_eq!(roster["1"].name, "Ben Ortiz");
    assert_eq!(roster["1"].period, Some(Period::new(4).unwrap()));
    assert_eq!(roster["2"].period, None);
}

#[test]
fn roster_entry_json_period_is_string() {
    let entry = RosterEntry {
        name: "Dee".into(),
        period: Some(Period::new(6).unwrap()),
    };
    let json = serde_json::to_string(&entry).unwrap();
    assert_eq!(json, r#"{"name":"Dee","period":"6"}"#);
}
