use super::SchedError;
use crate::fairness::{FairnessCounters, FairnessLedger, Tally};
use crate::model::{MemberId, OwnerId};
use crate::repository::{MemberProvider, ShiftRepository};
use serde::Serialize;

/// Statistiques d'astreinte d'un membre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberStats {
    pub member: MemberId,
    pub name: String,
    pub total_days: i64,
    pub long_shift_count: usize,
    /// Jours recalculés depuis l'historique des shifts.
    pub history: FairnessCounters,
    /// Compteurs cachés du registre (incluent l'amorçage à l'arrivée).
    pub ledger: FairnessCounters,
}

pub fn member_stats<S>(store: &S, owner: &OwnerId) -> Result<Vec<MemberStats>, SchedError>
where
    S: MemberProvider + ShiftRepository + FairnessLedger + ?Sized,
{
    let members = store.list_members(owner)?;
    let history = store.all_shifts(owner)?;
    let ledger = store.all_counters(owner)?;
    let tally = Tally::from_history(&history, members.iter().map(|m| &m.id));

    Ok(members
        .iter()
        .map(|m| {
            let counters = tally.counters(&m.id);
            MemberStats {
                member: m.id.clone(),
                name: m.name.clone(),
                total_days: counters.total(),
                long_shift_count: history
                    .iter()
                    .filter(|s| s.member == m.id && s.is_long_shift)
                    .count(),
                history: counters,
                ledger: ledger.get(&m.id).copied().unwrap_or_default(),
            }
        })
        .collect())
}
