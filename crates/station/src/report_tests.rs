// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use chrono::Duration;
use hp_core::{NewPass, Period};
use yare::parameterized;

/// Monday, 2026-01-05 08:00:00 UTC.
fn monday_morning() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 5, 8, 0, 0).unwrap()
}

fn closed(
    name: &str,
    destination: &str,
    period: u8,
    start: DateTime<Utc>,
    secs: i64,
    late_reason: Option<&str>,
) -> Pass {
    let mut pass = Pass::open(
        format!("{name}-{}", start.timestamp()),
        NewPass {
            subject_name: name.to_string(),
            subject_id: None,
            destination: destination.to_string(),
            period: Some(Period::new(period).unwrap()),
            max_minutes: 8,
        },
        start,
    );
    pass.close(
        start + Duration::seconds(secs),
        late_reason.is_some(),
        late_reason.unwrap_or_default().to_string(),
    );
    pass
}

#[parameterized(
    zero = { 0, "00:00" },
    negative = { -5_000, "00:00" },
    seconds = { 59_999, "00:59" },
    minutes = { 185_000, "03:05" },
    long = { 6_000_000, "100:00" },
)]
fn mm_ss_format(ms: i64, expected: &str) {
    assert_eq!(mm_ss(ms), expected);
}

#[test]
fn file_names_name_the_period() {
    let p2 = PeriodFilter::One(Period::new(2).unwrap());
    assert_eq!(history_file_name(PeriodFilter::All), "Pass_History_All.csv");
    assert_eq!(history_file_name(p2), "Pass_History_P2.csv");
    assert_eq!(flyers_file_name(p2), "Frequent_Flyers_P2.csv");
}

#[test]
fn history_csv_rows_newest_first_with_escaping() {
    let base = monday_morning();
    let history = vec![
        closed("Alice", "Bathroom", 1, base, 185, None),
        closed(
            "Bo \"B\" Lee",
            "Nurse",
            2,
            base + Duration::minutes(330),
            600,
            Some("line, long"),
        ),
    ];

    let csv = history_csv_in(&history, PeriodFilter::All, &Utc).unwrap();

    let expected = "\u{feff}Student,Period,Destination,Date,Start Time,End Time,\
Duration (mm:ss),Late,Late Reason,Max (mins)\n\
\"Bo \"\"B\"\" Lee\",2,Nurse,2026-01-05,1:30:00 PM,1:40:00 PM,10:00,TRUE,\"line, long\",8\n\
Alice,1,Bathroom,2026-01-05,8:00:00 AM,8:03:05 AM,03:05,FALSE,,8\n";
    assert_eq!(csv, expected);
}

#[test]
fn history_csv_respects_period_filter() {
    let base = monday_morning();
    let history = vec![
        closed("Alice", "Bathroom", 1, base, 60, None),
        closed("Bo", "Bathroom", 2, base, 60, None),
    ];
    let csv = history_csv_in(&history, PeriodFilter::One(Period::new(2).unwrap()), &Utc).unwrap();
    assert_eq!(csv.lines().count(), 2);
    assert!(csv.contains("Bo,2,"));
    assert!(!csv.contains("Alice"));
}

#[test]
fn late_reason_only_exported_when_late() {
    let mut pass = closed("Alice", "Bathroom", 1, monday_morning(), 60, None);
    pass.late_reason = "stale".into();
    let csv = history_csv_in(&[pass], PeriodFilter::All, &Utc).unwrap();
    assert!(!csv.contains("stale"));
}

#[test]
fn flyers_rank_by_count_then_total_time() {
    let base = monday_morning();
    let history = vec![
        closed("Cy", "Bathroom", 1, base, 30, None),
        closed("Bo", "Bathroom", 1, base, 60, None),
        closed("Alice", "Bathroom", 1, base, 180, None),
        closed("Bo", "Nurse", 1, base + Duration::hours(1), 60, None),
        closed("Alice", "Nurse", 1, base + Duration::hours(1), 300, Some("late")),
    ];

    let ranked = flyers(&history, PeriodFilter::All);
    let names: Vec<&str> = ranked.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["Alice", "Bo", "Cy"]);

    let alice = &ranked[0];
    assert_eq!(alice.count, 2);
    assert_eq!(alice.total_ms, 480_000);
    assert_eq!(alice.avg_ms(), 240_000);
    assert_eq!(alice.late, 1);
    assert_eq!(alice.late_pct(), 50.0);
    assert_eq!(
        alice.last_seen,
        Some(base + Duration::hours(1) + Duration::seconds(300))
    );
}

#[test]
fn late_percentage_has_one_decimal() {
    let flyer = Flyer {
        name: "A".into(),
        count: 3,
        total_ms: 0,
        late: 1,
        last_seen: None,
    };
    assert_eq!(flyer.late_pct(), 33.3);
}

#[test]
fn flyers_csv_rows() {
    let base = monday_morning();
    let history = vec![
        closed("Alice", "Bathroom", 1, base, 180, None),
        closed("Alice", "Nurse", 1, base + Duration::hours(1), 300, Some("late")),
    ];
    let csv = flyers_csv_in(&flyers(&history, PeriodFilter::All), &Utc).unwrap();
    let expected = "\u{feff}Student,Passes,Avg (mm:ss),Total (mm:ss),Late Count,Late %,Last Seen\n\
Alice,2,04:00,08:00,1,50,2026-01-05 9:05:00 AM\n";
    assert_eq!(csv, expected);
}

#[test]
fn summary_of_nothing() {
    let summary = Summary::of(&[] as &[Pass]);
    assert_eq!(
        summary,
        Summary {
            count: 0,
            avg_minutes: 0.0,
            busiest: "-".into(),
            late: 0,
        }
    );
}

#[test]
fn summary_busiest_tie_goes_to_first_seen() {
    let base = monday_morning();
    let history = [
        closed("A", "Nurse", 1, base, 100, None),
        closed("B", "Bathroom", 1, base, 100, None),
    ];
    let summary = Summary::of(&history);
    assert_eq!(summary.busiest, "Nurse");
    assert_eq!(summary.avg_minutes, 1.7);
}

#[test]
fn daily_and_weekly_windows() {
    let base = monday_morning();
    let history = vec![
        closed("A", "Bathroom", 1, base, 240, None),
        closed("B", "Nurse", 1, base + Duration::minutes(30), 360, Some("late")),
        closed("C", "Bathroom", 1, base + Duration::minutes(60), 300, None),
        // Sunday belongs to the previous week
        closed("D", "Office", 1, base - Duration::days(1), 60, None),
        closed("E", "Office", 1, base + Duration::days(2), 60, None),
    ];
    let now = base + Duration::hours(2);

    let daily = daily_summary_in(&history, &now);
    assert_eq!(
        daily,
        Summary {
            count: 3,
            avg_minutes: 5.0,
            busiest: "Bathroom".into(),
            late: 1,
        }
    );

    let weekly = weekly_summary_in(&history, &now);
    assert_eq!(weekly.count, 4);
    assert_eq!(weekly.busiest, "Bathroom");
}
