use super::domain::LedgerRole;
use super::policy::ShareRule;

/// Attributes of a group member that the share rules look at.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ShareHolder {
    pub role: LedgerRole,
    pub junior: bool,
}

/// Fractions of the group pool owed by each holder, in input order.
///
/// Returns `None` when the group cannot carry its pool: it is empty, or every
/// holder weighs zero under the rule. Otherwise the fractions sum to 1.
pub(crate) fn share_fractions(holders: &[ShareHolder], rule: &ShareRule) -> Option<Vec<f64>> {
    if holders.is_empty() {
        return None;
    }

    match rule {
        ShareRule::TenureWeighted { junior_weight } => weighted(holders, |holder| {
            if holder.junior {
                *junior_weight
            } else {
                1.0
            }
        }),
        ShareRule::JobWeighted { weights } => weighted(holders, |holder| match holder.role {
            LedgerRole::Staff(jabatan) => weights.get(&jabatan).copied().unwrap_or(0.0),
            _ => 0.0,
        }),
        ShareRule::JuniorDiscount { discount } => Some(junior_discount(holders, *discount)),
    }
}

fn weighted<F>(holders: &[ShareHolder], weight_of: F) -> Option<Vec<f64>>
where
    F: Fn(&ShareHolder) -> f64,
{
    let weights: Vec<f64> = holders.iter().map(weight_of).collect();
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return None;
    }
    Some(weights.into_iter().map(|weight| weight / total).collect())
}

fn junior_discount(holders: &[ShareHolder], discount: f64) -> Vec<f64> {
    let headcount = holders.len() as f64;
    let base = 1.0 / headcount;
    let juniors = holders.iter().filter(|holder| holder.junior).count();
    let seniors = holders.len() - juniors;

    // Without a senior to absorb the deficit the discount does not apply.
    if juniors == 0 || seniors == 0 {
        return vec![base; holders.len()];
    }

    let waived = base * discount;
    let surcharge = waived * juniors as f64 / seniors as f64;

    holders
        .iter()
        .map(|holder| {
            if holder.junior {
                base - waived
            } else {
                base + surcharge
            }
        })
        .collect()
}
