use crate::penalty::domain::{
    AreaManagerInfo, EmployeeId, EmployeeRecord, Jabatan, LedgerRole, LossInput, MasaKerja,
    PenaltyDistributionItem, VarianceInput,
};

pub(super) const SENIOR: MasaKerja = MasaKerja::MoreThanThreeMonths;
pub(super) const JUNIOR: MasaKerja = MasaKerja::LessThanThreeMonths;

pub(super) fn employee(nama: &str, jabatan: Jabatan, masa_kerja: MasaKerja) -> EmployeeRecord {
    EmployeeRecord {
        id: EmployeeId::default(),
        nama: nama.to_string(),
        nip: format!("NIP-{}", nama.to_ascii_uppercase()),
        jabatan: Some(jabatan),
        masa_kerja: Some(masa_kerja),
    }
}

pub(super) fn area_manager(nama: &str) -> AreaManagerInfo {
    AreaManagerInfo::new(nama, format!("AM-{nama}"), Some(SENIOR))
}

pub(super) fn no_area_manager() -> AreaManagerInfo {
    AreaManagerInfo::default()
}

/// Loss of 1.1M plus a category B variance: 1.6M in total.
pub(super) fn loss_1_100_000() -> LossInput {
    LossInput {
        selisih_plus: 0,
        selisih_minus: -1_100_000,
        ed_awal: 0,
    }
}

pub(super) fn variance_category_b() -> VarianceInput {
    VarianceInput {
        nilai_plus: 3_000_000,
        nilai_minus: -2_000_000,
        ed_awal: 0,
    }
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    let tolerance = 1e-6 * expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected}, got {actual}"
    );
}

pub(super) fn amount_for(ledger: &[PenaltyDistributionItem], nama: &str) -> f64 {
    ledger
        .iter()
        .find(|item| item.nama == nama)
        .map(|item| item.jumlah_denda)
        .unwrap_or_else(|| panic!("{nama} missing from ledger"))
}

pub(super) fn ledger_sum(ledger: &[PenaltyDistributionItem]) -> f64 {
    ledger.iter().map(|item| item.jumlah_denda).sum()
}

pub(super) fn roles(ledger: &[PenaltyDistributionItem]) -> Vec<LedgerRole> {
    ledger.iter().map(|item| item.jabatan).collect()
}
