use serde::{Deserialize, Serialize};

use super::domain::{
    AreaManagerInfo, EmployeeRecord, Jabatan, LedgerRole, MasaKerja, PenaltyDistributionItem,
};
use super::policy::{AllocationSplit, PenaltyPolicy, ShareRule, UnassignedPool};
use super::shares::{share_fractions, ShareHolder};

/// Role groups the total penalty is split between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyGroup {
    AreaManager,
    BranchManager,
    StoreTeam,
}

impl PenaltyGroup {
    pub const fn ordered() -> [PenaltyGroup; 3] {
        [
            PenaltyGroup::AreaManager,
            PenaltyGroup::BranchManager,
            PenaltyGroup::StoreTeam,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            PenaltyGroup::AreaManager => "Area Manager",
            PenaltyGroup::BranchManager => "Branch Manager",
            PenaltyGroup::StoreTeam => "Store Team",
        }
    }

    fn percent(self, split: &AllocationSplit) -> f64 {
        match self {
            PenaltyGroup::AreaManager => split.area_manager,
            PenaltyGroup::BranchManager => split.branch_manager,
            PenaltyGroup::StoreTeam => split.store_team,
        }
    }

    fn rule(self, policy: &PenaltyPolicy) -> &ShareRule {
        match self {
            PenaltyGroup::AreaManager => &policy.area_manager_rule,
            PenaltyGroup::BranchManager => &policy.branch_manager_rule,
            PenaltyGroup::StoreTeam => &policy.store_team_rule,
        }
    }
}

#[derive(Debug, Clone)]
struct Member {
    nama: String,
    nip: String,
    masa_kerja: Option<MasaKerja>,
    holder: ShareHolder,
}

impl Member {
    fn from_employee(employee: &EmployeeRecord, jabatan: Jabatan, masa_kerja: MasaKerja) -> Self {
        Self {
            nama: employee.nama.trim().to_string(),
            nip: employee.nip.trim().to_string(),
            masa_kerja: Some(masa_kerja),
            holder: ShareHolder {
                role: LedgerRole::Staff(jabatan),
                junior: masa_kerja.is_junior(),
            },
        }
    }

    fn from_area_manager(info: &AreaManagerInfo, role: LedgerRole, junior: bool) -> Self {
        Self {
            nama: info.nama.trim().to_string(),
            nip: info.nip.trim().to_string(),
            masa_kerja: info.masa_kerja,
            holder: ShareHolder { role, junior },
        }
    }
}

struct GroupPlan {
    group: PenaltyGroup,
    percent: f64,
    members: Vec<Member>,
    fractions: Option<Vec<f64>>,
}

/// Roster split into the three allocation groups.
#[derive(Debug, Clone, Default)]
struct Partition {
    area_manager: Vec<Member>,
    branch_manager: Vec<Member>,
    store_team: Vec<Member>,
}

impl Partition {
    fn build(
        employees: &[EmployeeRecord],
        area_manager: &AreaManagerInfo,
        is_am_changed: bool,
        outgoing_am: Option<&AreaManagerInfo>,
    ) -> Self {
        let mut partition = Partition::default();
        let outgoing = outgoing_am.filter(|info| is_am_changed && info.is_named());

        if area_manager.is_named() {
            // During a hand-over the incoming AM is new to the outlet as well.
            let (role, junior) = match outgoing {
                Some(_) => (LedgerRole::IncomingAreaManager, true),
                None => (
                    LedgerRole::AreaManager,
                    area_manager.masa_kerja.is_some_and(MasaKerja::is_junior),
                ),
            };
            partition
                .area_manager
                .push(Member::from_area_manager(area_manager, role, junior));
        }

        if let Some(outgoing) = outgoing {
            partition.area_manager.push(Member::from_area_manager(
                outgoing,
                LedgerRole::OutgoingAreaManager,
                true,
            ));
        }

        for employee in employees.iter().filter(|employee| employee.is_named()) {
            let (Some(jabatan), Some(masa_kerja)) = (employee.jabatan, employee.masa_kerja) else {
                continue;
            };
            let member = Member::from_employee(employee, jabatan, masa_kerja);
            if jabatan == Jabatan::BranchManager {
                partition.branch_manager.push(member);
            } else {
                partition.store_team.push(member);
            }
        }

        partition
    }

    fn into_groups(self) -> [(PenaltyGroup, Vec<Member>); 3] {
        [
            (PenaltyGroup::AreaManager, self.area_manager),
            (PenaltyGroup::BranchManager, self.branch_manager),
            (PenaltyGroup::StoreTeam, self.store_team),
        ]
    }
}

/// Allocates `total_penalty` across the AM, BM and store team groups and
/// returns the ledger sorted by role rank.
pub fn distribute(
    total_penalty: i64,
    employees: &[EmployeeRecord],
    area_manager: &AreaManagerInfo,
    is_am_changed: bool,
    outgoing_am: Option<&AreaManagerInfo>,
    policy: &PenaltyPolicy,
) -> Vec<PenaltyDistributionItem> {
    if total_penalty <= 0 {
        return Vec::new();
    }

    let partition = Partition::build(employees, area_manager, is_am_changed, outgoing_am);
    let has_branch_manager = !partition.branch_manager.is_empty();
    let split = policy.allocation.split(has_branch_manager);

    let plans: Vec<GroupPlan> = partition
        .into_groups()
        .into_iter()
        .map(|(group, members)| {
            let holders: Vec<ShareHolder> = members.iter().map(|member| member.holder).collect();
            GroupPlan {
                group,
                percent: group.percent(&split),
                fractions: share_fractions(&holders, group.rule(policy)),
                members,
            }
        })
        .collect();

    if plans.iter().all(|plan| plan.members.is_empty()) {
        tracing::warn!(total_penalty, "no named roster members to carry the penalty");
        return Vec::new();
    }

    let percents = effective_percents(&plans, policy.unassigned);
    let total = total_penalty as f64;

    let mut ledger: Vec<PenaltyDistributionItem> = Vec::new();
    for (plan, percent) in plans.into_iter().zip(percents) {
        let pool = total * percent / 100.0;
        let fractions = plan
            .fractions
            .unwrap_or_else(|| vec![0.0; plan.members.len()]);

        for (member, fraction) in plan.members.into_iter().zip(fractions) {
            ledger.push(PenaltyDistributionItem {
                nama: member.nama,
                jabatan: member.holder.role,
                masa_kerja: member.masa_kerja,
                nip: member.nip,
                jumlah_denda: pool * fraction,
            });
        }
    }

    ledger.sort_by_key(|item| item.jabatan.rank());
    ledger
}

/// Percentage each group finally carries once unassigned pools are handled.
fn effective_percents(plans: &[GroupPlan], unassigned: UnassignedPool) -> Vec<f64> {
    let carrying = |plan: &GroupPlan| plan.fractions.is_some();

    let orphaned: f64 = plans
        .iter()
        .filter(|plan| !carrying(plan))
        .map(|plan| plan.percent)
        .sum();

    let base = plans
        .iter()
        .map(|plan| if carrying(plan) { plan.percent } else { 0.0 });

    if orphaned <= 0.0 || unassigned == UnassignedPool::Drop {
        if orphaned > 0.0 {
            tracing::debug!(orphaned, "dropping unassigned penalty share");
        }
        return base.collect();
    }

    let carrying_count = plans.iter().filter(|plan| carrying(plan)).count();
    if carrying_count == 0 {
        tracing::warn!(orphaned, "no group can carry the penalty");
        return base.collect();
    }

    let carried: f64 = plans
        .iter()
        .filter(|plan| carrying(plan))
        .map(|plan| plan.percent)
        .sum();

    for plan in plans.iter().filter(|plan| !carrying(plan) && plan.percent > 0.0) {
        tracing::debug!(
            group = plan.group.label(),
            percent = plan.percent,
            "redistributing unassigned penalty share"
        );
    }

    base.zip(plans)
        .map(|(percent, plan)| {
            if !carrying(plan) {
                0.0
            } else if carried > 0.0 {
                percent + orphaned * plan.percent / carried
            } else {
                percent + orphaned / carrying_count as f64
            }
        })
        .collect()
}
