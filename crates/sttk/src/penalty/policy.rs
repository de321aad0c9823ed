use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::domain::{Jabatan, UnknownLabel, VarianceCategory};

const PERCENT_TOLERANCE: f64 = 1e-9;

/// How the loss balance turns into `denda_akhir`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossPolicy {
    /// Only a negative net balance is charged; a surplus yields zero.
    #[default]
    FloorAtZero,
    /// The net balance is charged whatever its sign.
    AlwaysCharge,
}

impl FromStr for LossPolicy {
    type Err = UnknownLabel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "floor" | "floor_at_zero" => Ok(LossPolicy::FloorAtZero),
            "always" | "always_charge" => Ok(LossPolicy::AlwaysCharge),
            other => Err(UnknownLabel(other.to_string())),
        }
    }
}

/// How the three variance figures collapse into one total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariancePolicy {
    /// `nilai_plus - |nilai_minus| + ed_awal`
    SignedNet,
    /// `|nilai_plus| + |nilai_minus| + |ed_awal|`
    #[default]
    AbsoluteSum,
}

impl FromStr for VariancePolicy {
    type Err = UnknownLabel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "signed" | "signed_net" => Ok(VariancePolicy::SignedNet),
            "absolute" | "absolute_sum" => Ok(VariancePolicy::AbsoluteSum),
            other => Err(UnknownLabel(other.to_string())),
        }
    }
}

/// Category thresholds for the variance total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarianceBands {
    /// Smallest total that lands in category B.
    pub category_b_from: i64,
    /// Totals strictly above this land in category C.
    pub category_c_above: i64,
    pub category_b_penalty: i64,
    pub category_c_penalty: i64,
}

impl Default for VarianceBands {
    fn default() -> Self {
        Self {
            category_b_from: 5_000_000,
            category_c_above: 10_000_000,
            category_b_penalty: 500_000,
            category_c_penalty: 1_000_000,
        }
    }
}

impl VarianceBands {
    pub fn classify(&self, total: i64) -> (VarianceCategory, i64) {
        if total > self.category_c_above {
            (VarianceCategory::C, self.category_c_penalty)
        } else if total >= self.category_b_from {
            (VarianceCategory::B, self.category_b_penalty)
        } else {
            (VarianceCategory::A, 0)
        }
    }
}

/// Percentages of the total penalty handed to each group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AllocationSplit {
    pub area_manager: f64,
    pub branch_manager: f64,
    pub store_team: f64,
}

impl AllocationSplit {
    pub const fn new(area_manager: f64, branch_manager: f64, store_team: f64) -> Self {
        Self {
            area_manager,
            branch_manager,
            store_team,
        }
    }

    pub fn total(&self) -> f64 {
        self.area_manager + self.branch_manager + self.store_team
    }

    fn validate(&self, name: &'static str) -> Result<(), PolicyError> {
        let parts = [self.area_manager, self.branch_manager, self.store_team];
        if parts.iter().any(|part| !part.is_finite() || *part < 0.0) {
            return Err(PolicyError::NegativePercentage { split: name });
        }
        if (self.total() - 100.0).abs() > PERCENT_TOLERANCE {
            return Err(PolicyError::SplitNotWhole {
                split: name,
                total: self.total(),
            });
        }
        Ok(())
    }
}

/// Group percentages keyed on whether a Branch Manager is on the roster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AllocationTable {
    pub with_branch_manager: AllocationSplit,
    pub without_branch_manager: AllocationSplit,
}

impl AllocationTable {
    /// 5 / 35 / 60 with a BM, 10 / 0 / 90 without.
    pub const fn latest() -> Self {
        Self {
            with_branch_manager: AllocationSplit::new(5.0, 35.0, 60.0),
            without_branch_manager: AllocationSplit::new(10.0, 0.0, 90.0),
        }
    }

    /// 7.5 / 37.5 / 55 with a BM, 10 / 0 / 90 without.
    pub const fn earliest() -> Self {
        Self {
            with_branch_manager: AllocationSplit::new(7.5, 37.5, 55.0),
            without_branch_manager: AllocationSplit::new(10.0, 0.0, 90.0),
        }
    }

    pub fn split(&self, has_branch_manager: bool) -> AllocationSplit {
        if has_branch_manager {
            self.with_branch_manager
        } else {
            self.without_branch_manager
        }
    }
}

impl Default for AllocationTable {
    fn default() -> Self {
        Self::latest()
    }
}

/// How a group's pool is divided between its members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ShareRule {
    /// Pro-rata by tenure: juniors carry `junior_weight`, seniors carry 1.
    TenureWeighted { junior_weight: f64 },
    /// Pro-rata by a fixed weight per role; unlisted roles weigh 0.
    JobWeighted { weights: BTreeMap<Jabatan, f64> },
    /// Equal base share; juniors pay `1 - discount` of it when a senior is
    /// present, and the waived part is split equally between the seniors.
    JuniorDiscount { discount: f64 },
}

impl ShareRule {
    pub fn tenure_weighted() -> Self {
        ShareRule::TenureWeighted {
            junior_weight: 4.0 / 9.0,
        }
    }

    pub fn job_weighted() -> Self {
        let weights = BTreeMap::from([
            (Jabatan::Apoteker, 2.0),
            (Jabatan::HealthAdvisor, 5.0),
            (Jabatan::TenagaKefarmasian, 5.0),
        ]);
        ShareRule::JobWeighted { weights }
    }

    pub fn junior_discount() -> Self {
        ShareRule::JuniorDiscount { discount: 0.5 }
    }

    fn validate(&self) -> Result<(), PolicyError> {
        match self {
            ShareRule::TenureWeighted { junior_weight } => {
                if !junior_weight.is_finite() || *junior_weight < 0.0 {
                    return Err(PolicyError::NegativeWeight);
                }
            }
            ShareRule::JobWeighted { weights } => {
                if weights
                    .values()
                    .any(|weight| !weight.is_finite() || *weight < 0.0)
                {
                    return Err(PolicyError::NegativeWeight);
                }
            }
            ShareRule::JuniorDiscount { discount } => {
                if !(0.0..=1.0).contains(discount) {
                    return Err(PolicyError::DiscountOutOfRange(*discount));
                }
            }
        }
        Ok(())
    }
}

/// What happens to a group's percentage when nobody in the group can carry it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnassignedPool {
    /// Fold it into the populated groups in proportion to their percentages.
    #[default]
    Redistribute,
    /// Leave it off the ledger.
    Drop,
}

impl FromStr for UnassignedPool {
    type Err = UnknownLabel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "redistribute" => Ok(UnassignedPool::Redistribute),
            "drop" => Ok(UnassignedPool::Drop),
            other => Err(UnknownLabel(other.to_string())),
        }
    }
}

/// Complete set of swappable rules used by [`super::PenaltyEngine`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenaltyPolicy {
    #[serde(default)]
    pub loss: LossPolicy,
    #[serde(default)]
    pub variance: VariancePolicy,
    #[serde(default)]
    pub variance_bands: VarianceBands,
    #[serde(default)]
    pub allocation: AllocationTable,
    pub area_manager_rule: ShareRule,
    pub branch_manager_rule: ShareRule,
    pub store_team_rule: ShareRule,
    #[serde(default)]
    pub unassigned: UnassignedPool,
}

impl PenaltyPolicy {
    /// Junior discount in every group with the 5 / 35 / 60 table.
    pub fn latest() -> Self {
        Self {
            loss: LossPolicy::FloorAtZero,
            variance: VariancePolicy::AbsoluteSum,
            variance_bands: VarianceBands::default(),
            allocation: AllocationTable::latest(),
            area_manager_rule: ShareRule::junior_discount(),
            branch_manager_rule: ShareRule::junior_discount(),
            store_team_rule: ShareRule::junior_discount(),
            unassigned: UnassignedPool::Redistribute,
        }
    }

    /// First revision: 7.5 / 37.5 / 55 table, tenure-weighted team, signed
    /// formulas, unassigned money dropped.
    pub fn earliest() -> Self {
        Self {
            loss: LossPolicy::AlwaysCharge,
            variance: VariancePolicy::SignedNet,
            variance_bands: VarianceBands::default(),
            allocation: AllocationTable::earliest(),
            area_manager_rule: ShareRule::tenure_weighted(),
            branch_manager_rule: ShareRule::tenure_weighted(),
            store_team_rule: ShareRule::tenure_weighted(),
            unassigned: UnassignedPool::Drop,
        }
    }

    /// Latest table with the store team weighted by role.
    pub fn job_weighted() -> Self {
        Self {
            store_team_rule: ShareRule::job_weighted(),
            ..Self::latest()
        }
    }

    pub fn preset(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "latest" => Some(Self::latest()),
            "earliest" => Some(Self::earliest()),
            "job-weighted" | "job_weighted" => Some(Self::job_weighted()),
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<(), PolicyError> {
        self.allocation
            .with_branch_manager
            .validate("with_branch_manager")?;
        self.allocation
            .without_branch_manager
            .validate("without_branch_manager")?;
        self.area_manager_rule.validate()?;
        self.branch_manager_rule.validate()?;
        self.store_team_rule.validate()?;

        let bands = &self.variance_bands;
        if bands.category_b_from > bands.category_c_above {
            return Err(PolicyError::OverlappingBands);
        }
        if bands.category_b_penalty < 0 || bands.category_c_penalty < 0 {
            return Err(PolicyError::NegativeBandPenalty);
        }
        Ok(())
    }
}

impl Default for PenaltyPolicy {
    fn default() -> Self {
        Self::latest()
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PolicyError {
    #[error("allocation split '{split}' sums to {total}, expected 100")]
    SplitNotWhole { split: &'static str, total: f64 },
    #[error("allocation split '{split}' contains a negative or non-finite percentage")]
    NegativePercentage { split: &'static str },
    #[error("share weights must be finite and non-negative")]
    NegativeWeight,
    #[error("junior discount {0} must lie between 0 and 1")]
    DiscountOutOfRange(f64),
    #[error("category B threshold lies above the category C threshold")]
    OverlappingBands,
    #[error("variance penalties must not be negative")]
    NegativeBandPenalty,
}
