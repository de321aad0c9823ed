use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use super::super::domain::SttkReport;

const TOP_AREA_MANAGERS: usize = 4;
const TOP_LOW_ACCURACY_STORES: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AmSubmissionCount {
    pub am: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LowAccuracyStore {
    pub store: String,
    /// Variance penalty as a share of the report's total penalty, e.g. `"31.25%"`.
    pub accuracy: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiSummary {
    pub am_submissions: Vec<AmSubmissionCount>,
    pub low_accuracy_stores: Vec<LowAccuracyStore>,
    pub am_without_submissions: Vec<String>,
}

pub fn kpi_summary(reports: &[SttkReport], known_area_managers: &[String]) -> KpiSummary {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for report in reports {
        *counts.entry(report.header.nama_am.trim()).or_default() += 1;
    }

    let mut am_submissions: Vec<AmSubmissionCount> = counts
        .iter()
        .map(|(am, count)| AmSubmissionCount {
            am: am.to_string(),
            count: *count,
        })
        .collect();
    // BTreeMap order breaks ties by name.
    am_submissions.sort_by(|a, b| b.count.cmp(&a.count));
    am_submissions.truncate(TOP_AREA_MANAGERS);

    let mut penalised: Vec<&SttkReport> = reports
        .iter()
        .filter(|report| report.variance_details.denda > 0)
        .collect();
    penalised.sort_by(|a, b| b.variance_details.denda.cmp(&a.variance_details.denda));
    let low_accuracy_stores = penalised
        .into_iter()
        .take(TOP_LOW_ACCURACY_STORES)
        .map(|report| {
            let total = if report.total_denda == 0 {
                1
            } else {
                report.total_denda
            };
            let share = report.variance_details.denda as f64 / total as f64 * 100.0;
            LowAccuracyStore {
                store: report.header.nama_toko.clone(),
                accuracy: format!("{share:.2}%"),
            }
        })
        .collect();

    let submitted: HashSet<&str> = counts.keys().copied().collect();
    let am_without_submissions = known_area_managers
        .iter()
        .filter(|am| !submitted.contains(am.trim()))
        .cloned()
        .collect();

    KpiSummary {
        am_submissions,
        low_accuracy_stores,
        am_without_submissions,
    }
}
