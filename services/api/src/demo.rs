use crate::infra::{build_service, ReportService};
use chrono::{Local, NaiveDate};
use clap::Args;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use sttk::config::{AppConfig, ConfigError};
use sttk::error::AppError;
use sttk::penalty::{
    AreaManagerInfo, EmployeeId, EmployeeRecord, Jabatan, MasaKerja, PenaltyComputation,
    PenaltyEngine, PenaltyInputs, PenaltyPolicy,
};
use sttk::workflows::sttk::{
    AttachmentPayload, LossField, ReportDraft, ReportFiles, ReportId, SttkReport, VarianceField,
};

#[derive(Args, Debug)]
pub(crate) struct ComputeArgs {
    /// JSON document with loss, variance, employees and area manager fields
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Policy preset to use instead of the configured one (latest, earliest, job-weighted)
    #[arg(long)]
    pub(crate) preset: Option<String>,
    /// Print the full computation as JSON instead of a ledger table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Reporting date for the dashboards (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// Destination CSV file
    #[arg(long)]
    pub(crate) output: PathBuf,
    /// Anchor date for the generated report history (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn run_compute(args: ComputeArgs) -> Result<(), AppError> {
    let ComputeArgs {
        input,
        preset,
        json,
    } = args;

    let policy = match preset {
        Some(name) => PenaltyPolicy::preset(&name).ok_or(ConfigError::InvalidPolicyValue {
            key: "--preset",
            value: name,
        })?,
        None => AppConfig::load()?.penalty,
    };

    let raw = std::fs::read_to_string(&input)?;
    let computation = compute_from_json(&raw, PenaltyEngine::new(policy))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&computation)?);
    } else {
        render_computation(&computation);
    }
    Ok(())
}

pub(crate) fn compute_from_json(
    raw: &str,
    engine: PenaltyEngine,
) -> Result<PenaltyComputation, AppError> {
    let inputs: PenaltyInputs = serde_json::from_str(raw)?;
    Ok(engine.compute(&inputs))
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let service = build_service(PenaltyEngine::default());

    println!("STTK penalty ledger demo ({today})");

    let draft = sabang_draft(today);
    println!("\nLive draft preview for {}", draft.header().nama_toko);
    render_computation(draft.computation());

    let history = seed_history(&service, today)?;
    println!("\nSubmitted reports");
    for report in &history {
        println!(
            "  #{} {} / {} ({}): total denda {} [{}]",
            report.id,
            report.header.nama_toko,
            report.header.nama_am,
            report
                .header
                .tanggal_sttk
                .map(|date| date.to_string())
                .unwrap_or_default(),
            format_rupiah(report.total_denda as f64),
            report.status.label(),
        );
    }

    let kpi = service.kpi()?;
    println!("\nKPI dashboard");
    println!("  Submissions per Area Manager:");
    for entry in &kpi.am_submissions {
        println!("    {:<20} {}", entry.am, entry.count);
    }
    println!("  Outlets with the highest variance penalty:");
    for store in &kpi.low_accuracy_stores {
        println!(
            "    {:<20} variance share {}",
            store.store, store.accuracy
        );
    }
    if kpi.am_without_submissions.is_empty() {
        println!("  Every Area Manager has submitted");
    } else {
        println!(
            "  Area Managers without submissions: {}",
            kpi.am_without_submissions.join(", ")
        );
    }

    let summary = service.manager_summary(today)?;
    println!("\nManager dashboard");
    println!(
        "  This month: {} submissions, {} pending verification, {} active AMs",
        summary.total_submissions_this_month, summary.pending_verification, summary.active_ams
    );
    println!("  Trend:");
    for month in &summary.submission_trend {
        println!("    {} {}: {}", month.month, month.year, month.count);
    }
    println!("  Area Manager performance:");
    for row in &summary.am_performance {
        println!(
            "    {:<20} total {} / verified {} / pending {} (masa kerja {})",
            row.name, row.total, row.verified, row.pending, row.masa_kerja
        );
    }

    Ok(())
}

pub(crate) fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let service = build_service(PenaltyEngine::default());
    let history = seed_history(&service, today)?;

    let file = File::create(&args.output)?;
    service.export_csv(BufWriter::new(file))?;
    println!(
        "Wrote {} reports to {}",
        history.len(),
        args.output.display()
    );
    Ok(())
}

/// Submits three drafted reports and verifies the first one.
pub(crate) fn seed_history(
    service: &ReportService,
    today: NaiveDate,
) -> Result<Vec<SttkReport>, AppError> {
    let drafts = [sabang_draft(today), tebet_draft(today), depok_draft(today)];
    for draft in &drafts {
        service.submit(draft.to_request(sample_files()))?;
    }
    service.approve(ReportId(1))?;
    Ok(service.list()?)
}

fn staff(nama: &str, nip: &str, jabatan: Jabatan, masa_kerja: MasaKerja) -> EmployeeRecord {
    EmployeeRecord {
        id: EmployeeId::default(),
        nama: nama.to_string(),
        nip: nip.to_string(),
        jabatan: Some(jabatan),
        masa_kerja: Some(masa_kerja),
    }
}

fn sabang_draft(today: NaiveDate) -> ReportDraft {
    let mut draft = ReportDraft::default();
    draft.set_area_manager("GENY SARASWATI", "AM-001");
    draft.set_area_manager_tenure(Some(MasaKerja::MoreThanThreeMonths));
    draft.set_area("Jakarta Barat");
    draft.set_outlet("Alpro Sabang");
    draft.set_date(Some(today - chrono::Duration::days(2)));
    draft.add_employee(staff(
        "Dewi Lestari",
        "10021",
        Jabatan::BranchManager,
        MasaKerja::MoreThanThreeMonths,
    ));
    draft.add_employee(staff(
        "Sari Wulandari",
        "10022",
        Jabatan::Apoteker,
        MasaKerja::MoreThanThreeMonths,
    ));
    draft.add_employee(staff(
        "Tono Saputra",
        "10023",
        Jabatan::HealthAdvisor,
        MasaKerja::LessThanThreeMonths,
    ));
    draft.set_loss_field(LossField::SelisihMinus, "-Rp 1.250.000");
    draft.set_loss_field(LossField::EdAwal, "-500.000");
    draft.set_variance_field(VarianceField::NilaiPlus, "4.000.000");
    draft.set_variance_field(VarianceField::NilaiMinus, "-2.500.000");
    draft
}

fn tebet_draft(today: NaiveDate) -> ReportDraft {
    let mut draft = ReportDraft::default();
    draft.set_area_manager("JULAINI", "AM-002");
    draft.set_area_manager_tenure(Some(MasaKerja::LessThanThreeMonths));
    draft.set_area("Jakarta Selatan");
    draft.set_outlet("Alpro Tebet");
    draft.set_date(Some(today - chrono::Duration::days(10)));
    draft.set_am_changed(true);
    draft.set_outgoing_am(AreaManagerInfo::new(
        "RYAN ADILA",
        "AM-003",
        Some(MasaKerja::MoreThanThreeMonths),
    ));
    draft.add_employee(staff(
        "Rina Marlina",
        "20011",
        Jabatan::Apoteker,
        MasaKerja::MoreThanThreeMonths,
    ));
    draft.add_employee(staff(
        "Bayu Nugroho",
        "20012",
        Jabatan::TenagaKefarmasian,
        MasaKerja::MoreThanThreeMonths,
    ));
    draft.set_loss_field(LossField::SelisihMinus, "-800.000");
    draft.set_variance_field(VarianceField::NilaiPlus, "9.000.000");
    draft.set_variance_field(VarianceField::NilaiMinus, "-3.000.000");
    draft
}

fn depok_draft(today: NaiveDate) -> ReportDraft {
    let mut draft = ReportDraft::default();
    draft.set_area_manager("ANDIKA PRATAMA", "AM-004");
    draft.set_area_manager_tenure(Some(MasaKerja::MoreThanThreeMonths));
    draft.set_area("Depok");
    draft.set_outlet("Alpro Depok Baru");
    draft.set_date(Some(today - chrono::Duration::days(40)));
    draft.add_employee(staff(
        "Lina Kartika",
        "30011",
        Jabatan::HealthAdvisor,
        MasaKerja::MoreThanThreeMonths,
    ));
    draft.set_loss_field(LossField::SelisihPlus, "150.000");
    draft.set_loss_field(LossField::SelisihMinus, "-450.000");
    draft.set_variance_field(VarianceField::NilaiPlus, "1.200.000");
    draft
}

fn sample_files() -> ReportFiles {
    ReportFiles {
        bap: Some(AttachmentPayload::new(
            "bap-sttk.pdf",
            "application/pdf",
            "JVBERi0xLjQK",
        )),
        expired_list: Some(AttachmentPayload::new("expired-list.csv", "", "a29kZSxxdHkK")),
        photos: vec![AttachmentPayload::new("rak-obat.jpg", "", "/9j/4AAQSkZJRg==")],
    }
}

fn render_computation(computation: &PenaltyComputation) {
    println!(
        "  Loss: ED akhir {} / denda akhir {}",
        format_rupiah(computation.loss_result.ed_akhir as f64),
        format_rupiah(computation.loss_result.denda_akhir as f64)
    );
    println!(
        "  Variance: total {} / kategori {} / denda {}",
        format_rupiah(computation.variance_result.total as f64),
        computation.variance_result.kategori.label(),
        format_rupiah(computation.variance_result.denda as f64)
    );
    println!(
        "  Total denda: {}",
        format_rupiah(computation.total_penalty as f64)
    );

    if computation.ledger.is_empty() {
        println!("  Ledger: nothing to distribute");
        return;
    }
    println!("  Ledger:");
    for item in &computation.ledger {
        println!(
            "    {:<24} {:<28} {:<10} {}",
            item.nama,
            item.jabatan.label(),
            item.masa_kerja.map(MasaKerja::label).unwrap_or("-"),
            format_rupiah(item.jumlah_denda)
        );
    }
}

/// `Rp 1.234.567`, rounded to whole rupiah.
pub(crate) fn format_rupiah(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    if rounded < 0 {
        format!("-Rp {grouped}")
    } else {
        format!("Rp {grouped}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sttk::workflows::sttk::ReportStatus;

    fn anchor() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 31).expect("valid date")
    }

    #[test]
    fn formats_rupiah_with_dot_grouping() {
        assert_eq!(format_rupiah(0.0), "Rp 0");
        assert_eq!(format_rupiah(950.0), "Rp 950");
        assert_eq!(format_rupiah(1_600_000.0), "Rp 1.600.000");
        assert_eq!(format_rupiah(-1_100_000.4), "-Rp 1.100.000");
    }

    #[test]
    fn seeded_history_is_recomputed_and_partially_verified() {
        let service = build_service(PenaltyEngine::default());
        let history = seed_history(&service, anchor()).expect("seed succeeds");

        assert_eq!(history.len(), 3);
        assert_eq!(history[0].status, ReportStatus::Verified);
        assert_eq!(history[1].status, ReportStatus::Pending);
        // 1.25M shortage plus 350k retained expiry, variance category B.
        assert_eq!(history[0].total_denda, 2_100_000);
        assert!(history[1].is_am_changed);
        // 300k net shortage, variance stays in category A.
        assert_eq!(history[2].total_denda, 300_000);

        let summary = service.manager_summary(anchor()).expect("summary builds");
        assert_eq!(summary.total_submissions_this_month, 2);
        assert_eq!(summary.pending_verification, 2);
    }

    #[test]
    fn compute_reads_penalty_inputs_json() {
        let raw = r#"{
            "loss": { "selisihMinus": -1100000 },
            "variance": { "nilaiPlus": 3000000, "nilaiMinus": -2000000 },
            "employees": [
                { "nama": "rina", "nip": "1", "jabatan": "Health Advisor (HA)", "masaKerja": "> 3 bulan" }
            ],
            "areaManager": { "nama": "JULAINI", "nip": "AM-002", "masaKerja": "> 3 bulan" }
        }"#;

        let computation =
            compute_from_json(raw, PenaltyEngine::default()).expect("inputs deserialize");
        assert_eq!(computation.total_penalty, 1_600_000);
        assert_eq!(computation.ledger.len(), 2);
        assert_eq!(computation.ledger[0].jumlah_denda, 160_000.0);
    }

    #[test]
    fn compute_rejects_malformed_json() {
        let result = compute_from_json("{ not json", PenaltyEngine::default());
        assert!(matches!(result, Err(AppError::Input(_))));
    }

    #[test]
    fn export_writes_header_and_seeded_rows() {
        let output = std::env::temp_dir().join(format!(
            "sttk-demo-export-{}.csv",
            std::process::id()
        ));
        run_export(ExportArgs {
            output: output.clone(),
            today: Some(anchor()),
        })
        .expect("export succeeds");

        let written = std::fs::read_to_string(&output).expect("csv readable");
        std::fs::remove_file(&output).ok();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("ID,"));
        assert!(lines[1].contains("Alpro Sabang"));
    }
}
