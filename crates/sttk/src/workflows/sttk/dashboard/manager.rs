use std::collections::{BTreeMap, HashSet};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::super::domain::{ReportStatus, SttkReport};

const TREND_MONTHS: i32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyCount {
    /// Abbreviated English month name, e.g. `"May"`.
    pub month: String,
    pub year: i32,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmPerformance {
    pub name: String,
    pub total: usize,
    pub verified: usize,
    pub pending: usize,
    pub masa_kerja: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerSummary {
    pub total_submissions_this_month: usize,
    pub pending_verification: usize,
    pub active_ams: usize,
    pub submission_trend: Vec<MonthlyCount>,
    pub am_performance: Vec<AmPerformance>,
}

/// `(year, month)` pairs for the trend window ending at `today`, oldest first.
fn trend_window(today: NaiveDate) -> Vec<(i32, u32)> {
    let current = today.year() * 12 + today.month0() as i32;
    (0..TREND_MONTHS)
        .rev()
        .map(|offset| {
            let index = current - offset;
            (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
        })
        .collect()
}

fn month_label(year: i32, month: u32) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|date| date.format("%b").to_string())
        .unwrap_or_default()
}

pub fn manager_summary(reports: &[SttkReport], today: NaiveDate) -> ManagerSummary {
    let in_month = |date: NaiveDate, year: i32, month: u32| {
        date.year() == year && date.month() == month
    };

    let total_submissions_this_month = reports
        .iter()
        .filter_map(|report| report.header.tanggal_sttk)
        .filter(|date| in_month(*date, today.year(), today.month()))
        .count();

    let pending_verification = reports
        .iter()
        .filter(|report| report.status == ReportStatus::Pending)
        .count();

    let active_ams = reports
        .iter()
        .map(|report| report.header.nama_am.trim())
        .collect::<HashSet<_>>()
        .len();

    let submission_trend = trend_window(today)
        .into_iter()
        .map(|(year, month)| MonthlyCount {
            month: month_label(year, month),
            year,
            count: reports
                .iter()
                .filter_map(|report| report.header.tanggal_sttk)
                .filter(|date| in_month(*date, year, month))
                .count(),
        })
        .collect();

    let mut performance: BTreeMap<&str, AmPerformance> = BTreeMap::new();
    for report in reports {
        let name = report.header.nama_am.trim();
        let entry = performance.entry(name).or_insert_with(|| AmPerformance {
            name: name.to_string(),
            total: 0,
            verified: 0,
            pending: 0,
            masa_kerja: report
                .area_manager_masa_kerja()
                .map(|masa_kerja| masa_kerja.label().to_string())
                .unwrap_or_else(|| "N/A".to_string()),
        });
        entry.total += 1;
        match report.status {
            ReportStatus::Verified => entry.verified += 1,
            ReportStatus::Pending => entry.pending += 1,
        }
    }

    let mut am_performance: Vec<AmPerformance> = performance.into_values().collect();
    am_performance.sort_by(|a, b| b.total.cmp(&a.total));

    ManagerSummary {
        total_submissions_this_month,
        pending_verification,
        active_ams,
        submission_trend,
        am_performance,
    }
}
