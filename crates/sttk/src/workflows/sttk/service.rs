use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDate;

use crate::penalty::{PenaltyComputation, PenaltyEngine, PenaltyInputs};

use super::dashboard::{kpi_summary, manager_summary, KpiSummary, ManagerSummary};
use super::domain::{ReportId, ReportRequest, ReportStatus, SttkReport};
use super::export::{export_csv, export_csv_string, ExportError};
use super::options::{DropdownOptions, OptionsProvider};
use super::repository::{RepositoryError, ReportRepository};
use super::validation::{SubmissionError, SubmissionGuard};

/// Service composing the submission guard, penalty engine and repository.
pub struct SttkReportService<R, O> {
    guard: SubmissionGuard,
    repository: Arc<R>,
    options: Arc<O>,
    engine: Arc<PenaltyEngine>,
    /// Next report id. Held across the insert so ids are only consumed by
    /// reports that were actually stored.
    next_id: Mutex<u64>,
}

impl<R, O> SttkReportService<R, O>
where
    R: ReportRepository + 'static,
    O: OptionsProvider + 'static,
{
    pub fn new(repository: Arc<R>, options: Arc<O>, engine: PenaltyEngine) -> Self {
        Self {
            guard: SubmissionGuard::new(),
            repository,
            options,
            engine: Arc::new(engine),
            next_id: Mutex::new(1),
        }
    }

    /// Continue numbering after reports that already exist in the repository.
    pub fn resume_numbering(&self) -> Result<ReportId, ReportServiceError> {
        let next = self
            .repository
            .list()?
            .iter()
            .map(|report| report.id.0 + 1)
            .max()
            .unwrap_or(1);
        let mut next_id = self.next_id()?;
        *next_id = (*next_id).max(next);
        Ok(ReportId(*next_id))
    }

    fn next_id(&self) -> Result<MutexGuard<'_, u64>, RepositoryError> {
        self.next_id
            .lock()
            .map_err(|_| RepositoryError::Unavailable("report sequence poisoned".to_string()))
    }

    pub fn engine(&self) -> &PenaltyEngine {
        &self.engine
    }

    /// Validate, recompute and store a new report with status `Pending`.
    pub fn submit(&self, request: ReportRequest) -> Result<SttkReport, ReportServiceError> {
        let files = self.guard.check(&request)?;
        let computation = self.engine.compute(&request.penalty_inputs());

        let mut next_id = self.next_id()?;
        let id = ReportId(*next_id);
        let report = SttkReport::from_computation(id, &request, computation, files);
        let stored = self.repository.insert(report)?;
        *next_id += 1;
        drop(next_id);

        tracing::info!(
            report_id = %stored.id,
            outlet = %stored.header.nama_toko,
            total_denda = stored.total_denda,
            "sttk report submitted"
        );
        Ok(stored)
    }

    /// Recompute penalties without storing anything.
    pub fn preview(&self, inputs: &PenaltyInputs) -> PenaltyComputation {
        self.engine.compute(inputs)
    }

    /// Mark a report as verified. Approving a verified report is a no-op.
    pub fn approve(&self, id: ReportId) -> Result<SttkReport, ReportServiceError> {
        let mut report = self.get(id)?;
        if report.status == ReportStatus::Verified {
            return Ok(report);
        }

        report.status = ReportStatus::Verified;
        self.repository.update(report.clone())?;
        tracing::info!(report_id = %id, "sttk report verified");
        Ok(report)
    }

    pub fn get(&self, id: ReportId) -> Result<SttkReport, ReportServiceError> {
        let report = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(report)
    }

    pub fn list(&self) -> Result<Vec<SttkReport>, ReportServiceError> {
        Ok(self.repository.list()?)
    }

    pub fn options(&self) -> Result<DropdownOptions, ReportServiceError> {
        Ok(self.options.options()?)
    }

    pub fn kpi(&self) -> Result<KpiSummary, ReportServiceError> {
        let reports = self.list()?;
        let known = self.options()?.area_manager_names();
        Ok(kpi_summary(&reports, &known))
    }

    pub fn manager_summary(&self, today: NaiveDate) -> Result<ManagerSummary, ReportServiceError> {
        let reports = self.list()?;
        Ok(manager_summary(&reports, today))
    }

    pub fn export_csv<W: Write>(&self, writer: W) -> Result<(), ReportServiceError> {
        let reports = self.list()?;
        export_csv(&reports, writer)?;
        Ok(())
    }

    pub fn export_csv_string(&self) -> Result<String, ReportServiceError> {
        let reports = self.list()?;
        Ok(export_csv_string(&reports)?)
    }
}

/// Error raised by the report service.
#[derive(Debug, thiserror::Error)]
pub enum ReportServiceError {
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Export(#[from] ExportError),
}
