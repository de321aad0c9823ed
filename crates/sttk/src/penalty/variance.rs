use super::domain::{VarianceInput, VarianceResult};
use super::policy::{VarianceBands, VariancePolicy};

pub fn variance_total(input: &VarianceInput, policy: VariancePolicy) -> i64 {
    match policy {
        VariancePolicy::SignedNet => input
            .nilai_plus
            .saturating_sub(input.nilai_minus.saturating_abs())
            .saturating_add(input.ed_awal),
        VariancePolicy::AbsoluteSum => input
            .nilai_plus
            .saturating_abs()
            .saturating_add(input.nilai_minus.saturating_abs())
            .saturating_add(input.ed_awal.saturating_abs()),
    }
}

pub fn calculate_variance(
    input: &VarianceInput,
    policy: VariancePolicy,
    bands: &VarianceBands,
) -> VarianceResult {
    let total = variance_total(input, policy);
    let (kategori, denda) = bands.classify(total);

    VarianceResult {
        total,
        kategori,
        denda,
    }
}
