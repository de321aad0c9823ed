//! End-to-end penalty computation through the public `sttk::penalty` facade.

mod common {
    use sttk::penalty::{
        AreaManagerInfo, EmployeeId, EmployeeRecord, Jabatan, LossInput, MasaKerja,
        PenaltyComputation, VarianceInput,
    };

    pub(super) fn worker(nama: &str, jabatan: Jabatan, masa_kerja: MasaKerja) -> EmployeeRecord {
        EmployeeRecord {
            id: EmployeeId::default(),
            nama: nama.to_string(),
            nip: format!("NIP-{nama}"),
            jabatan: Some(jabatan),
            masa_kerja: Some(masa_kerja),
        }
    }

    pub(super) fn area_manager(nama: &str, masa_kerja: MasaKerja) -> AreaManagerInfo {
        AreaManagerInfo::new(nama, format!("AM-{nama}"), Some(masa_kerja))
    }

    /// 1.1M net shortage.
    pub(super) fn shortage() -> LossInput {
        LossInput {
            selisih_plus: 0,
            selisih_minus: -1_100_000,
            ed_awal: 0,
        }
    }

    /// 5M absolute movement, category B.
    pub(super) fn moderate_variance() -> VarianceInput {
        VarianceInput {
            nilai_plus: 3_000_000,
            nilai_minus: -2_000_000,
            ed_awal: 0,
        }
    }

    pub(super) fn amounts(computation: &PenaltyComputation) -> Vec<(String, f64)> {
        computation
            .ledger
            .iter()
            .map(|item| (item.jabatan.label().to_string(), item.jumlah_denda))
            .collect()
    }

    pub(super) fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {expected}, got {actual}"
        );
    }
}

use common::*;
use sttk::penalty::{
    compute_penalties, AreaManagerInfo, Jabatan, LossInput, MasaKerja, PenaltyEngine,
    PenaltyInputs, PenaltyPolicy, VarianceCategory, VarianceInput,
};

#[test]
fn full_store_is_split_across_all_three_groups() {
    let roster = vec![
        worker("dewi", Jabatan::BranchManager, MasaKerja::MoreThanThreeMonths),
        worker("sari", Jabatan::Apoteker, MasaKerja::MoreThanThreeMonths),
        worker("tono", Jabatan::HealthAdvisor, MasaKerja::LessThanThreeMonths),
    ];
    let am = area_manager("GENY SARASWATI", MasaKerja::MoreThanThreeMonths);

    let computation = compute_penalties(
        &shortage(),
        &moderate_variance(),
        &roster,
        &am,
        false,
        None,
    );

    assert_eq!(computation.loss_result.denda_akhir, -1_100_000);
    assert_eq!(computation.variance_result.kategori, VarianceCategory::B);
    assert_eq!(computation.total_penalty, 1_600_000);

    let lines = amounts(&computation);
    let labels: Vec<&str> = lines.iter().map(|(label, _)| label.as_str()).collect();
    assert_eq!(
        labels,
        [
            "Area Manager",
            "Branch Manager (BM)",
            "Apoteker",
            "Health Advisor (HA)"
        ]
    );
    assert_close(lines[0].1, 80_000.0);
    assert_close(lines[1].1, 560_000.0);
    // Store team pool of 960k: the junior pays half a base share.
    assert_close(lines[2].1, 720_000.0);
    assert_close(lines[3].1, 240_000.0);
    assert_close(computation.ledger_total(), 1_600_000.0);
}

#[test]
fn area_manager_hand_over_splits_the_area_manager_pool() {
    let roster = vec![worker(
        "rina",
        Jabatan::HealthAdvisor,
        MasaKerja::MoreThanThreeMonths,
    )];
    let incoming = area_manager("JULAINI", MasaKerja::MoreThanThreeMonths);
    let outgoing = area_manager("RYAN ADILA", MasaKerja::MoreThanThreeMonths);

    let computation = compute_penalties(
        &shortage(),
        &moderate_variance(),
        &roster,
        &incoming,
        true,
        Some(&outgoing),
    );

    let lines = amounts(&computation);
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0].0, "Area Manager (Baru)");
    assert_eq!(lines[1].0, "Area Manager (Lama)");
    assert_close(lines[0].1, 80_000.0);
    assert_close(lines[1].1, 80_000.0);
    assert_close(lines[2].1, 1_440_000.0);
    assert_eq!(
        computation.area_manager_entry().map(|item| item.nama.as_str()),
        Some("JULAINI")
    );
}

#[test]
fn surplus_with_quiet_variance_owes_nothing() {
    let loss = LossInput {
        selisih_plus: 2_000_000,
        selisih_minus: -500_000,
        ed_awal: -1_000_000,
    };
    let variance = VarianceInput {
        nilai_plus: 1_000_000,
        nilai_minus: -1_000_000,
        ed_awal: 0,
    };
    let roster = vec![worker("rina", Jabatan::HealthAdvisor, MasaKerja::MoreThanThreeMonths)];

    let computation = compute_penalties(
        &loss,
        &variance,
        &roster,
        &area_manager("JULAINI", MasaKerja::MoreThanThreeMonths),
        false,
        None,
    );

    assert_eq!(computation.loss_result.denda_akhir, 0);
    assert_eq!(computation.variance_result.kategori, VarianceCategory::A);
    assert_eq!(computation.total_penalty, 0);
    assert!(computation.ledger.is_empty());
}

#[test]
fn missing_area_manager_share_is_carried_by_the_team() {
    let roster = vec![
        worker("sari", Jabatan::Apoteker, MasaKerja::MoreThanThreeMonths),
        worker("rina", Jabatan::HealthAdvisor, MasaKerja::MoreThanThreeMonths),
    ];

    let computation = compute_penalties(
        &shortage(),
        &moderate_variance(),
        &roster,
        &AreaManagerInfo::default(),
        false,
        None,
    );

    assert!(computation.area_manager_entry().is_none());
    let lines = amounts(&computation);
    assert_close(lines[0].1, 800_000.0);
    assert_close(lines[1].1, 800_000.0);
}

#[test]
fn earliest_policy_uses_signed_formulas() {
    let engine = PenaltyEngine::new(PenaltyPolicy::earliest());
    let inputs = PenaltyInputs {
        loss: shortage(),
        variance: moderate_variance(),
        employees: vec![worker(
            "rina",
            Jabatan::HealthAdvisor,
            MasaKerja::MoreThanThreeMonths,
        )],
        area_manager: area_manager("JULAINI", MasaKerja::MoreThanThreeMonths),
        ..PenaltyInputs::default()
    };

    let computation = engine.compute(&inputs);

    // 3M - 2M nets to 1M, which stays in category A.
    assert_eq!(computation.variance_result.total, 1_000_000);
    assert_eq!(computation.variance_result.kategori, VarianceCategory::A);
    assert_eq!(computation.total_penalty, 1_100_000);
    assert_close(computation.ledger_total(), 1_100_000.0);
}
