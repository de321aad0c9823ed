use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use sttk::penalty::PenaltyEngine;
use sttk::workflows::sttk::{
    AreaManagerOption, ReportId, ReportRepository, RepositoryError, StaticOptions, SttkReport,
    SttkReportService,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type ReportService = SttkReportService<InMemoryReportRepository, StaticOptions>;

/// Reports keyed by id, so listing is always in id order.
#[derive(Default, Clone)]
pub(crate) struct InMemoryReportRepository {
    records: Arc<Mutex<BTreeMap<ReportId, SttkReport>>>,
}

impl ReportRepository for InMemoryReportRepository {
    fn insert(&self, report: SttkReport) -> Result<SttkReport, RepositoryError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("report store poisoned".to_string()))?;
        if guard.contains_key(&report.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(report.id, report.clone());
        Ok(report)
    }

    fn update(&self, report: SttkReport) -> Result<(), RepositoryError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("report store poisoned".to_string()))?;
        if guard.contains_key(&report.id) {
            guard.insert(report.id, report);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: ReportId) -> Result<Option<SttkReport>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("report store poisoned".to_string()))?;
        Ok(guard.get(&id).cloned())
    }

    fn list(&self) -> Result<Vec<SttkReport>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("report store poisoned".to_string()))?;
        Ok(guard.values().cloned().collect())
    }
}

pub(crate) fn standard_options() -> StaticOptions {
    StaticOptions::standard(
        vec![
            AreaManagerOption::new("GENY SARASWATI", "AM-001"),
            AreaManagerOption::new("JULAINI", "AM-002"),
            AreaManagerOption::new("RYAN ADILA", "AM-003"),
            AreaManagerOption::new("ANDIKA PRATAMA", "AM-004"),
        ],
        [
            "Alpro Sabang",
            "Alpro Tebet",
            "Alpro Kemang",
            "Alpro Depok Baru",
            "Alpro Bogor Tengah",
        ],
    )
}

pub(crate) fn build_service(engine: PenaltyEngine) -> ReportService {
    SttkReportService::new(
        Arc::new(InMemoryReportRepository::default()),
        Arc::new(standard_options()),
        engine,
    )
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
