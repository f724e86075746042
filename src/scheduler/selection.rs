use crate::fairness::Tally;
use crate::model::{MemberId, ShiftClass};
use rand::Rng;
use std::collections::HashSet;

/// Candidats éligibles : le roster moins les membres de `on_leave`, moins
/// l'astreinte de la veille. Si l'exclusion de la veille vide la liste, on la
/// relâche (mieux vaut répéter que laisser le jour vide). La liste n'est vide
/// que si tout le roster figure dans `on_leave`.
pub(super) fn candidates<'a>(
    roster: &'a [MemberId],
    previous: Option<&MemberId>,
    on_leave: Option<&HashSet<MemberId>>,
) -> Vec<&'a MemberId> {
    let available = |id: &MemberId| on_leave.map_or(true, |set| !set.contains(id));

    let strict: Vec<&MemberId> = roster
        .iter()
        .filter(|id| available(*id) && Some(*id) != previous)
        .collect();
    if !strict.is_empty() {
        return strict;
    }

    roster.iter().filter(|id| available(*id)).collect()
}

/// Membre le moins chargé pour la classe demandée ; égalités départagées
/// uniformément au hasard.
pub(super) fn least_loaded<'a, R: Rng>(
    candidates: &[&'a MemberId],
    tally: &Tally,
    class: ShiftClass,
    rng: &mut R,
) -> Option<&'a MemberId> {
    let min = candidates.iter().map(|id| tally.get(id, class)).min()?;
    let tied: Vec<&'a MemberId> = candidates
        .iter()
        .copied()
        .filter(|id| tally.get(id, class) == min)
        .collect();
    let pick = rng.random_range(0..tied.len());
    Some(tied[pick])
}
