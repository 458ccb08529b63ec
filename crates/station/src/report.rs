// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! History reports: CSV export, frequent flyers, daily and weekly summaries.
//!
//! Everything here reads the local history only. Calendar boundaries and
//! printed times use the station's local time zone; the `*_in` variants
//! take an explicit zone.

use std::fmt::Display;

use chrono::{DateTime, Datelike, Days, Local, NaiveDate, TimeZone, Utc};
use hp_core::{Pass, PeriodFilter};

use crate::error::Result;

const BOM: &str = "\u{feff}";

const HISTORY_HEADERS: [&str; 10] = [
    "Student",
    "Period",
    "Destination",
    "Date",
    "Start Time",
    "End Time",
    "Duration (mm:ss)",
    "Late",
    "Late Reason",
    "Max (mins)",
];

const FLYER_HEADERS: [&str; 7] = [
    "Student",
    "Passes",
    "Avg (mm:ss)",
    "Total (mm:ss)",
    "Late Count",
    "Late %",
    "Last Seen",
];

/// History visible under `filter`, newest start first.
pub fn filtered_history(history: &[Pass], filter: PeriodFilter) -> Vec<&Pass> {
    let mut passes: Vec<&Pass> = history.iter().filter(|p| filter.matches(p.period)).collect();
    passes.sort_by(|a, b| b.start_time.cmp(&a.start_time));
    passes
}

fn file_suffix(filter: PeriodFilter) -> String {
    match filter.single() {
        Some(p) => format!("P{p}"),
        None => "All".to_string(),
    }
}

pub fn history_file_name(filter: PeriodFilter) -> String {
    format!("Pass_History_{}.csv", file_suffix(filter))
}

pub fn flyers_file_name(filter: PeriodFilter) -> String {
    format!("Frequent_Flyers_{}.csv", file_suffix(filter))
}

/// `mm:ss`, minutes unbounded.
pub fn mm_ss(ms: i64) -> String {
    let total = ms.max(0) / 1000;
    format!("{:02}:{:02}", total / 60, total % 60)
}

fn date_in<Tz: TimeZone>(ts: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    ts.with_timezone(tz).format("%Y-%m-%d").to_string()
}

fn time_in<Tz: TimeZone>(ts: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    ts.with_timezone(tz).format("%-I:%M:%S %p").to_string()
}

fn write_csv<const N: usize>(headers: [&str; N], rows: Vec<[String; N]>) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(&row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    Ok(format!("{BOM}{}", String::from_utf8_lossy(&bytes)))
}

/// History export in the station's local time zone.
pub fn history_csv(history: &[Pass], filter: PeriodFilter) -> Result<String> {
    history_csv_in(history, filter, &Local)
}

pub fn history_csv_in<Tz: TimeZone>(history: &[Pass], filter: PeriodFilter, tz: &Tz) -> Result<String>
where
    Tz::Offset: Display,
{
    let rows = filtered_history(history, filter)
        .into_iter()
        .map(|p| {
            [
                p.subject_name.clone(),
                p.period.map(|p| p.to_string()).unwrap_or_default(),
                p.destination.clone(),
                date_in(&p.start_time, tz),
                time_in(&p.start_time, tz),
                p.end_time.map(|t| time_in(&t, tz)).unwrap_or_default(),
                p.end_time
                    .map(|end| mm_ss((end - p.start_time).num_milliseconds()))
                    .unwrap_or_default(),
                if p.over_limit { "TRUE" } else { "FALSE" }.to_string(),
                if p.over_limit {
                    p.late_reason.clone()
                } else {
                    String::new()
                },
                p.max_minutes.to_string(),
            ]
        })
        .collect();
    write_csv(HISTORY_HEADERS, rows)
}

/// Per-subject pass statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct Flyer {
    pub name: String,
    pub count: usize,
    pub total_ms: i64,
    pub late: usize,
    pub last_seen: Option<DateTime<Utc>>,
}

impl Flyer {
    pub fn avg_ms(&self) -> i64 {
        match i64::try_from(self.count) {
            Ok(count) if count > 0 => self.total_ms / count,
            _ => 0,
        }
    }

    /// Late share in percent, one decimal.
    pub fn late_pct(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        (self.late as f64 / self.count as f64 * 1000.0).round() / 10.0
    }
}

/// Frequent flyers over the filtered history, most passes first and then
/// most total time.
pub fn flyers(history: &[Pass], filter: PeriodFilter) -> Vec<Flyer> {
    let mut flyers: Vec<Flyer> = Vec::new();
    for pass in history.iter().filter(|p| filter.matches(p.period)) {
        let index = match flyers.iter().position(|f| f.name == pass.subject_name) {
            Some(index) => index,
            None => {
                flyers.push(Flyer {
                    name: pass.subject_name.clone(),
                    count: 0,
                    total_ms: 0,
                    late: 0,
                    last_seen: None,
                });
                flyers.len() - 1
            }
        };
        let flyer = &mut flyers[index];
        flyer.count += 1;
        if let Some(end) = pass.end_time {
            flyer.total_ms += (end - pass.start_time).num_milliseconds();
        }
        if pass.over_limit {
            flyer.late += 1;
        }
        let seen = pass.end_time.unwrap_or(pass.start_time);
        flyer.last_seen = flyer.last_seen.max(Some(seen));
    }
    flyers.sort_by(|a, b| b.count.cmp(&a.count).then(b.total_ms.cmp(&a.total_ms)));
    flyers
}

/// Blank for zero, like an unset duration.
fn flyer_mm_ss(ms: i64) -> String {
    if ms <= 0 {
        String::new()
    } else {
        mm_ss(ms)
    }
}

pub fn flyers_csv(flyers: &[Flyer]) -> Result<String> {
    flyers_csv_in(flyers, &Local)
}

pub fn flyers_csv_in<Tz: TimeZone>(flyers: &[Flyer], tz: &Tz) -> Result<String>
where
    Tz::Offset: Display,
{
    let rows = flyers
        .iter()
        .map(|f| {
            [
                f.name.clone(),
                f.count.to_string(),
                flyer_mm_ss(f.avg_ms()),
                flyer_mm_ss(f.total_ms),
                f.late.to_string(),
                f.late_pct().to_string(),
                f.last_seen
                    .map(|t| format!("{} {}", date_in(&t, tz), time_in(&t, tz)))
                    .unwrap_or_default(),
            ]
        })
        .collect();
    write_csv(FLYER_HEADERS, rows)
}

/// Aggregate over a window of history.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub count: usize,
    /// Average duration in minutes, one decimal.
    pub avg_minutes: f64,
    /// Destination with the most passes, `-` when there are none.
    pub busiest: String,
    pub late: usize,
}

impl Summary {
    pub fn of<'a>(passes: impl IntoIterator<Item = &'a Pass>) -> Self {
        let mut count = 0usize;
        let mut total_ms = 0i64;
        let mut late = 0usize;
        let mut destinations: Vec<(&str, usize)> = Vec::new();
        for pass in passes {
            count += 1;
            if let Some(end) = pass.end_time {
                total_ms += (end - pass.start_time).num_milliseconds();
            }
            if pass.over_limit {
                late += 1;
            }
            match destinations.iter_mut().find(|(d, _)| *d == pass.destination) {
                Some((_, n)) => *n += 1,
                None => destinations.push((pass.destination.as_str(), 1)),
            }
        }

        // First destination to reach the highest count wins ties
        let mut busiest = "-";
        let mut best = 0;
        for (destination, n) in destinations {
            if n > best {
                best = n;
                busiest = destination;
            }
        }

        let avg_minutes = if count == 0 {
            0.0
        } else {
            (total_ms as f64 / count as f64 / 60_000.0 * 10.0).round() / 10.0
        };
        Summary {
            count,
            avg_minutes,
            busiest: busiest.to_string(),
            late,
        }
    }
}

/// Local calendar day a pass started on.
fn start_day<Tz: TimeZone>(pass: &Pass, tz: &Tz) -> NaiveDate {
    pass.start_time.with_timezone(tz).date_naive()
}

/// Passes started on the same local day as `now`.
pub fn daily_summary_in<Tz: TimeZone>(history: &[Pass], now: &DateTime<Tz>) -> Summary {
    let tz = now.timezone();
    let today = now.date_naive();
    Summary::of(history.iter().filter(|p| start_day(p, &tz) == today))
}

/// Passes started in the Monday-based week containing `now`.
pub fn weekly_summary_in<Tz: TimeZone>(history: &[Pass], now: &DateTime<Tz>) -> Summary {
    let tz = now.timezone();
    let today = now.date_naive();
    let monday = today - Days::new(u64::from(today.weekday().num_days_from_monday()));
    let next_monday = monday + Days::new(7);
    Summary::of(history.iter().filter(|p| {
        let day = start_day(p, &tz);
        day >= monday && day < next_monday
    }))
}

pub fn daily_summary(history: &[Pass], now: DateTime<Utc>) -> Summary {
    daily_summary_in(history, &now.with_timezone(&Local))
}

pub fn weekly_summary(history: &[Pass], now: DateTime<Utc>) -> Summary {
    weekly_summary_in(history, &now.with_timezone(&Local))
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
