use std::sync::Arc;

use super::common::*;
use crate::penalty::{LedgerRole, MasaKerja, PenaltyEngine, PenaltyPolicy, VarianceCategory};
use crate::workflows::sttk::domain::{ReportId, ReportStatus};
use crate::workflows::sttk::repository::{RepositoryError, ReportRepository};
use crate::workflows::sttk::validation::SubmissionError;
use crate::workflows::sttk::{ReportServiceError, SttkReportService};

#[test]
fn submit_recomputes_penalties_and_stores_a_pending_report() {
    let (service, repository) = build_service();

    let report = service
        .submit(request("GENY SARASWATI", "Alpro Sabang", date(2025, 5, 12)))
        .expect("submission accepted");

    assert_eq!(report.id, ReportId(1));
    assert_eq!(report.status, ReportStatus::Pending);
    assert_eq!(report.total_denda, 1_600_000);
    assert_eq!(report.loss_details.denda_akhir, -1_100_000);
    assert_eq!(report.variance_details.kategori, VarianceCategory::B);
    assert_eq!(report.penalty_distribution.len(), 2);
    assert_eq!(report.penalty_distribution[0].jabatan, LedgerRole::AreaManager);
    assert_eq!(report.penalty_distribution[0].jumlah_denda, 160_000.0);
    assert_eq!(report.files.photos.len(), 2);
    assert_eq!(report.files.bap.size_bytes, 8);

    let stored = repository
        .fetch(report.id)
        .expect("fetch succeeds")
        .expect("report present");
    assert_eq!(stored, report);
}

#[test]
fn ids_are_sequential_per_service() {
    let (service, _) = build_service();
    let first = service
        .submit(request("JULAINI", "Alpro Tebet", date(2025, 5, 1)))
        .expect("first report");
    let second = service
        .submit(request("JULAINI", "Alpro Tebet", date(2025, 5, 2)))
        .expect("second report");

    assert_eq!(first.id, ReportId(1));
    assert_eq!(second.id, ReportId(2));
}

#[test]
fn configured_policy_drives_the_recomputation() {
    let repository = Arc::new(MemoryRepository::default());
    let service = SttkReportService::new(
        repository,
        Arc::new(options()),
        PenaltyEngine::new(PenaltyPolicy::earliest()),
    );

    let mut submission = request("JULAINI", "Alpro Tebet", date(2025, 5, 1));
    submission.loss_details.selisih_plus = 2_000_000;
    let report = service.submit(submission).expect("report stored");

    // Always-charge loss: 2.0M - 1.1M surplus still costs 900k; signed
    // variance 1M stays in category A.
    assert_eq!(report.loss_details.denda_akhir, 900_000);
    assert_eq!(report.variance_details.kategori, VarianceCategory::A);
    assert_eq!(report.total_denda, 900_000);
}

#[test]
fn submit_rejects_missing_photos() {
    let (service, repository) = build_service();
    let mut submission = request("JULAINI", "Alpro Tebet", date(2025, 5, 1));
    submission.files.photos.clear();

    match service.submit(submission) {
        Err(ReportServiceError::Submission(SubmissionError::MissingAttachment { slot })) => {
            assert_eq!(slot, "photos");
        }
        other => panic!("expected missing attachment, got {other:?}"),
    }
    assert!(repository.list().expect("list succeeds").is_empty());
}

#[test]
fn approve_marks_verified_and_is_idempotent() {
    let (service, repository) = build_service();
    let report = service
        .submit(request("JULAINI", "Alpro Tebet", date(2025, 5, 1)))
        .expect("report stored");

    let approved = service.approve(report.id).expect("approve succeeds");
    assert_eq!(approved.status, ReportStatus::Verified);

    let again = service.approve(report.id).expect("second approve succeeds");
    assert_eq!(again.status, ReportStatus::Verified);

    let stored = repository
        .fetch(report.id)
        .expect("fetch succeeds")
        .expect("report present");
    assert_eq!(stored.status, ReportStatus::Verified);
}

#[test]
fn approve_unknown_report_is_not_found() {
    let (service, _) = build_service();
    assert!(matches!(
        service.approve(ReportId(77)),
        Err(ReportServiceError::Repository(RepositoryError::NotFound))
    ));
}

#[test]
fn list_is_ordered_by_id() {
    let (service, _) = build_service();
    for day in 1..=3 {
        service
            .submit(request("JULAINI", "Alpro Tebet", date(2025, 5, day)))
            .expect("report stored");
    }

    let ids: Vec<u64> = service
        .list()
        .expect("list succeeds")
        .iter()
        .map(|report| report.id.0)
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn resume_numbering_skips_existing_ids() {
    let (first, repository) = build_service();
    first
        .submit(request("JULAINI", "Alpro Tebet", date(2025, 5, 1)))
        .expect("report stored");
    first
        .submit(request("JULAINI", "Alpro Tebet", date(2025, 5, 2)))
        .expect("report stored");

    let second = SttkReportService::new(
        repository.clone(),
        Arc::new(options()),
        PenaltyEngine::default(),
    );
    assert_eq!(second.resume_numbering().expect("list succeeds"), ReportId(3));

    let report = second
        .submit(request("JULAINI", "Alpro Tebet", date(2025, 5, 3)))
        .expect("report stored");
    assert_eq!(report.id, ReportId(3));
}

#[test]
fn hand_over_reports_record_both_area_managers() {
    let (service, _) = build_service();
    let mut submission = request("GENY SARASWATI", "Alpro Sabang", date(2025, 5, 12));
    submission.is_am_changed = true;
    submission.outgoing_am = Some(crate::penalty::AreaManagerInfo::new(
        "JULAINI",
        "AM-002",
        Some(MasaKerja::MoreThanThreeMonths),
    ));

    let report = service.submit(submission).expect("report stored");
    let roles: Vec<LedgerRole> = report
        .penalty_distribution
        .iter()
        .map(|item| item.jabatan)
        .collect();
    assert_eq!(
        roles[..2],
        [LedgerRole::IncomingAreaManager, LedgerRole::OutgoingAreaManager]
    );
    assert_eq!(report.penalty_distribution[0].jumlah_denda, 80_000.0);
    assert_eq!(report.penalty_distribution[1].jumlah_denda, 80_000.0);
}

#[test]
fn repository_outage_is_propagated() {
    let service = SttkReportService::new(
        Arc::new(UnavailableRepository),
        Arc::new(options()),
        PenaltyEngine::default(),
    );

    assert!(matches!(
        service.submit(request("JULAINI", "Alpro Tebet", date(2025, 5, 1))),
        Err(ReportServiceError::Repository(RepositoryError::Unavailable(_)))
    ));
    assert!(matches!(
        service.kpi(),
        Err(ReportServiceError::Repository(RepositoryError::Unavailable(_)))
    ));
}

#[test]
fn failed_inserts_do_not_consume_report_ids() {
    let repository = Arc::new(FlakyRepository::failing(2));
    let service = SttkReportService::new(
        repository.clone(),
        Arc::new(options()),
        PenaltyEngine::default(),
    );

    for day in [1, 2] {
        assert!(service
            .submit(request("JULAINI", "Alpro Tebet", date(2025, 5, day)))
            .is_err());
    }
    let first = service
        .submit(request("JULAINI", "Alpro Tebet", date(2025, 5, 3)))
        .expect("report stored");
    let second = service
        .submit(request("JULAINI", "Alpro Tebet", date(2025, 5, 4)))
        .expect("report stored");

    assert_eq!(first.id, ReportId(1));
    assert_eq!(second.id, ReportId(2));
    let stored: Vec<ReportId> = repository
        .list()
        .expect("list succeeds")
        .iter()
        .map(|report| report.id)
        .collect();
    assert_eq!(stored, vec![ReportId(1), ReportId(2)]);
}

#[test]
fn export_writes_a_header_and_one_row_per_report() {
    let (service, _) = build_service();
    service
        .submit(request("JULAINI", "Alpro Tebet", date(2025, 5, 1)))
        .expect("report stored");

    let csv = service.export_csv_string().expect("export succeeds");
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("ID,Tanggal STTK,Nama AM"));
    assert_eq!(
        lines[1],
        "1,2025-05-01,JULAINI,Jakarta Barat,Alpro Tebet,Pending,1100000,B,500000,1600000,2"
    );
}
