use super::domain::{LossInput, LossResult};
use super::policy::LossPolicy;

/// Expiry value retained after the 70% factor, truncated toward zero.
pub fn retained_expiry(ed_awal: i64) -> i64 {
    (i128::from(ed_awal) * 7 / 10) as i64
}

pub fn calculate_loss(input: &LossInput, policy: LossPolicy) -> LossResult {
    let ed_akhir = retained_expiry(input.ed_awal);
    let balance = input
        .selisih_plus
        .saturating_add(input.selisih_minus)
        .saturating_add(ed_akhir);

    let denda_akhir = match policy {
        LossPolicy::FloorAtZero => balance.min(0),
        LossPolicy::AlwaysCharge => balance,
    };

    LossResult {
        ed_akhir,
        denda_akhir,
    }
}
