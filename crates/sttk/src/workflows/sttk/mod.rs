//! STTK report lifecycle: draft form state, submission with server-side
//! recomputation, approval, CSV export and dashboard aggregations.

pub mod dashboard;
pub mod domain;
pub mod draft;
pub mod export;
pub mod options;
pub mod repository;
pub mod router;
pub mod service;
pub(crate) mod validation;

#[cfg(test)]
mod tests;

pub use dashboard::{
    kpi_summary, manager_summary, AmPerformance, AmSubmissionCount, KpiSummary, LowAccuracyStore,
    ManagerSummary, MonthlyCount,
};
pub use domain::{
    AttachmentManifest, AttachmentPayload, LossDetails, ReportFiles, ReportHeader, ReportId,
    ReportRequest, ReportStatus, SttkReport, StoredAttachment, SubmissionReceipt,
    VarianceDetails,
};
pub use draft::{LossField, ReportDraft, VarianceField};
pub use export::{export_csv, export_csv_string, ExportError};
pub use options::{AreaManagerOption, DropdownOptions, OptionsProvider, StaticOptions};
pub use repository::{RepositoryError, ReportRepository};
pub use router::sttk_router;
pub use service::{ReportServiceError, SttkReportService};
pub use validation::{SubmissionError, SubmissionGuard};
