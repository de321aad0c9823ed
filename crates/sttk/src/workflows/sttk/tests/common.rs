use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::penalty::{
    EmployeeId, EmployeeRecord, Jabatan, LossInput, MasaKerja, PenaltyEngine, VarianceInput,
};
use crate::workflows::sttk::domain::{
    AttachmentPayload, ReportFiles, ReportHeader, ReportId, ReportRequest, SttkReport,
};
use crate::workflows::sttk::options::{AreaManagerOption, StaticOptions};
use crate::workflows::sttk::repository::{RepositoryError, ReportRepository};
use crate::workflows::sttk::{sttk_router, SttkReportService};

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn employee(nama: &str, jabatan: Jabatan, masa_kerja: MasaKerja) -> EmployeeRecord {
    EmployeeRecord {
        id: EmployeeId::default(),
        nama: nama.to_string(),
        nip: format!("EMP-{nama}"),
        jabatan: Some(jabatan),
        masa_kerja: Some(masa_kerja),
    }
}

pub(super) fn files() -> ReportFiles {
    ReportFiles {
        bap: Some(AttachmentPayload::new("bap.pdf", "application/pdf", "JVBERi0xLjQ=")),
        expired_list: Some(AttachmentPayload::new("expired.xlsx", "", "UEsDBA==")),
        photos: vec![
            AttachmentPayload::new("rak-1.jpg", "image/jpeg", "/9j/4AAQ"),
            AttachmentPayload::new("rak-2.png", "image/png", "iVBORw0K"),
        ],
    }
}

/// Loss of 1.1M plus a category B variance, one senior HA: 1.6M total.
pub(super) fn request(nama_am: &str, nama_toko: &str, tanggal: NaiveDate) -> ReportRequest {
    ReportRequest {
        header: ReportHeader {
            nama_am: nama_am.to_string(),
            nip_am: format!("AM-{nama_am}"),
            masa_kerja_am: Some(MasaKerja::MoreThanThreeMonths),
            area: "Jakarta Barat".to_string(),
            nama_toko: nama_toko.to_string(),
            tanggal_sttk: Some(tanggal),
        },
        loss_details: LossInput {
            selisih_plus: 0,
            selisih_minus: -1_100_000,
            ed_awal: 0,
        },
        variance_details: VarianceInput {
            nilai_plus: 3_000_000,
            nilai_minus: -2_000_000,
            ed_awal: 0,
        },
        employees: vec![employee(
            "rina",
            Jabatan::HealthAdvisor,
            MasaKerja::MoreThanThreeMonths,
        )],
        is_am_changed: false,
        outgoing_am: None,
        files: files(),
    }
}

pub(super) fn options() -> StaticOptions {
    StaticOptions::standard(
        vec![
            AreaManagerOption::new("GENY SARASWATI", "AM-001"),
            AreaManagerOption::new("JULAINI", "AM-002"),
            AreaManagerOption::new("RYAN ADILA", "AM-003"),
        ],
        ["Alpro Sabang", "Alpro Tebet"],
    )
}

pub(super) type TestService = SttkReportService<MemoryRepository, StaticOptions>;

pub(super) fn build_service() -> (TestService, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = SttkReportService::new(
        repository.clone(),
        Arc::new(options()),
        PenaltyEngine::default(),
    );
    (service, repository)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) reports: Arc<Mutex<BTreeMap<ReportId, SttkReport>>>,
}

impl ReportRepository for MemoryRepository {
    fn insert(&self, report: SttkReport) -> Result<SttkReport, RepositoryError> {
        let mut guard = self.reports.lock().expect("repository mutex poisoned");
        if guard.contains_key(&report.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(report.id, report.clone());
        Ok(report)
    }

    fn update(&self, report: SttkReport) -> Result<(), RepositoryError> {
        let mut guard = self.reports.lock().expect("repository mutex poisoned");
        guard.insert(report.id, report);
        Ok(())
    }

    fn fetch(&self, id: ReportId) -> Result<Option<SttkReport>, RepositoryError> {
        let guard = self.reports.lock().expect("repository mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    fn list(&self) -> Result<Vec<SttkReport>, RepositoryError> {
        let guard = self.reports.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

/// Refuses the first `failures` inserts, then behaves like [`MemoryRepository`].
pub(super) struct FlakyRepository {
    failures: AtomicUsize,
    inner: MemoryRepository,
}

impl FlakyRepository {
    pub(super) fn failing(failures: usize) -> Self {
        Self {
            failures: AtomicUsize::new(failures),
            inner: MemoryRepository::default(),
        }
    }
}

impl ReportRepository for FlakyRepository {
    fn insert(&self, report: SttkReport) -> Result<SttkReport, RepositoryError> {
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(RepositoryError::Unavailable("sheet offline".to_string()));
        }
        self.inner.insert(report)
    }

    fn update(&self, report: SttkReport) -> Result<(), RepositoryError> {
        self.inner.update(report)
    }

    fn fetch(&self, id: ReportId) -> Result<Option<SttkReport>, RepositoryError> {
        self.inner.fetch(id)
    }

    fn list(&self) -> Result<Vec<SttkReport>, RepositoryError> {
        self.inner.list()
    }
}

pub(super) struct UnavailableRepository;

impl ReportRepository for UnavailableRepository {
    fn insert(&self, _report: SttkReport) -> Result<SttkReport, RepositoryError> {
        Err(RepositoryError::Unavailable("sheet offline".to_string()))
    }

    fn update(&self, _report: SttkReport) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("sheet offline".to_string()))
    }

    fn fetch(&self, _id: ReportId) -> Result<Option<SttkReport>, RepositoryError> {
        Err(RepositoryError::Unavailable("sheet offline".to_string()))
    }

    fn list(&self) -> Result<Vec<SttkReport>, RepositoryError> {
        Err(RepositoryError::Unavailable("sheet offline".to_string()))
    }
}

pub(super) fn router_with_service(service: TestService) -> axum::Router {
    sttk_router(Arc::new(service))
}

pub(super) async fn read_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body")
        .to_vec()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = read_body(response).await;
    serde_json::from_slice(&body).expect("json payload")
}
