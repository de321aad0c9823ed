//! STTK penalty (denda) computation and distribution.
//!
//! Everything in this module is a pure function of its inputs. The loss and
//! variance calculators feed the aggregate total, which the distributor then
//! splits across the Area Manager, Branch Manager and store team groups.

pub mod distribution;
pub mod domain;
pub mod input;
pub mod loss;
pub mod policy;
pub mod roster;
mod shares;
pub mod variance;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

pub use distribution::{distribute, PenaltyGroup};
pub use domain::{
    AreaManagerInfo, EmployeeId, EmployeeRecord, Jabatan, LedgerRole, LossInput, LossResult,
    MasaKerja, PenaltyDistributionItem, UnknownLabel, VarianceCategory, VarianceInput,
    VarianceResult,
};
pub use input::parse_formatted_number;
pub use loss::calculate_loss;
pub use policy::{
    AllocationSplit, AllocationTable, LossPolicy, PenaltyPolicy, PolicyError, ShareRule,
    UnassignedPool, VarianceBands, VariancePolicy,
};
pub use roster::{Roster, RosterError};
pub use variance::calculate_variance;

/// Everything the engine needs for one recomputation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PenaltyInputs {
    pub loss: LossInput,
    pub variance: VarianceInput,
    pub employees: Vec<EmployeeRecord>,
    pub area_manager: AreaManagerInfo,
    pub is_am_changed: bool,
    pub outgoing_am: Option<AreaManagerInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PenaltyComputation {
    pub loss_result: LossResult,
    pub variance_result: VarianceResult,
    pub total_penalty: i64,
    pub ledger: Vec<PenaltyDistributionItem>,
}

impl PenaltyComputation {
    pub fn ledger_total(&self) -> f64 {
        self.ledger.iter().map(|item| item.jumlah_denda).sum()
    }

    /// The ledger line for the current or incoming Area Manager, if any.
    pub fn area_manager_entry(&self) -> Option<&PenaltyDistributionItem> {
        self.ledger.iter().find(|item| {
            matches!(
                item.jabatan,
                LedgerRole::AreaManager | LedgerRole::IncomingAreaManager
            )
        })
    }
}

/// Runs the loss, variance, aggregate and distribution steps under one policy.
#[derive(Debug, Clone, Default)]
pub struct PenaltyEngine {
    policy: PenaltyPolicy,
}

impl PenaltyEngine {
    pub fn new(policy: PenaltyPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &PenaltyPolicy {
        &self.policy
    }

    pub fn compute(&self, inputs: &PenaltyInputs) -> PenaltyComputation {
        let loss_result = calculate_loss(&inputs.loss, self.policy.loss);
        let variance_result = calculate_variance(
            &inputs.variance,
            self.policy.variance,
            &self.policy.variance_bands,
        );
        let total_penalty = total_penalty(&loss_result, &variance_result);

        let ledger = distribute(
            total_penalty,
            &inputs.employees,
            &inputs.area_manager,
            inputs.is_am_changed,
            inputs.outgoing_am.as_ref(),
            &self.policy,
        );

        tracing::debug!(
            total_penalty,
            kategori = variance_result.kategori.label(),
            ledger_lines = ledger.len(),
            "penalties recomputed"
        );

        PenaltyComputation {
            loss_result,
            variance_result,
            total_penalty,
            ledger,
        }
    }
}

/// `|denda_akhir| + denda`, never negative.
pub fn total_penalty(loss: &LossResult, variance: &VarianceResult) -> i64 {
    loss.penalty().saturating_add(variance.denda.max(0))
}

/// One-shot computation with the default policy.
pub fn compute_penalties(
    loss: &LossInput,
    variance: &VarianceInput,
    roster: &[EmployeeRecord],
    am_info: &AreaManagerInfo,
    is_am_changed: bool,
    outgoing_am: Option<&AreaManagerInfo>,
) -> PenaltyComputation {
    let inputs = PenaltyInputs {
        loss: *loss,
        variance: *variance,
        employees: roster.to_vec(),
        area_manager: am_info.clone(),
        is_am_changed,
        outgoing_am: outgoing_am.cloned(),
    };
    PenaltyEngine::default().compute(&inputs)
}
