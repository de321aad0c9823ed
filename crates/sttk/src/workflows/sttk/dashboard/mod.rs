//! Read-only aggregations over stored reports for the KPI and manager views.

mod kpi;
mod manager;

pub use kpi::{kpi_summary, AmSubmissionCount, KpiSummary, LowAccuracyStore};
pub use manager::{manager_summary, AmPerformance, ManagerSummary, MonthlyCount};
