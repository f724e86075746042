use super::{util, SchedError};
use crate::calendar::Calendar;
use crate::model::{MemberId, OwnerId, Shift, ShiftId};
use crate::repository::{LeaveProvider, MemberProvider, ShiftRepository};
use chrono::NaiveDate;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindingKind {
    /// Jour ouvré sans astreinte alors qu'un membre était disponible.
    Uncovered,
    /// Jour couvert par plusieurs shifts.
    DoubleCovered,
    /// Shift démarrant un jour non ouvré.
    StartsOnRestDay,
    /// Membre d'astreinte un jour de congé alors qu'un autre était libre.
    OnLeave,
    /// Shift rattaché à un membre absent du roster.
    UnknownMember,
}

#[derive(Debug, Clone)]
pub struct Finding {
    pub kind: FindingKind,
    pub date: NaiveDate,
    pub shifts: Vec<ShiftId>,
    pub member: Option<MemberId>,
}

/// Vérifie les invariants de couverture sur [start, end] pour `owner`.
pub fn audit<S, C>(
    store: &S,
    calendar: &C,
    owner: &OwnerId,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<Finding>, SchedError>
where
    S: MemberProvider + LeaveProvider + ShiftRepository + ?Sized,
    C: Calendar,
{
    util::check_window(start, end)?;

    let roster: HashSet<MemberId> = store
        .list_members(owner)?
        .into_iter()
        .map(|m| m.id)
        .collect();
    let shifts = store.shifts_by_range(owner, start, end)?;
    let leave = util::leave_index(&store.leave_by_range(owner, start, end)?);

    let mut out = Vec::new();

    for shift in &shifts {
        if !roster.contains(&shift.member) {
            out.push(finding(FindingKind::UnknownMember, shift.start, &[shift]));
        }
        if !calendar.is_working_day(shift.start) {
            out.push(finding(FindingKind::StartsOnRestDay, shift.start, &[shift]));
        }
    }

    if roster.is_empty() {
        return Ok(out);
    }

    for day in start.iter_days().take_while(|d| *d <= end) {
        if !calendar.is_working_day(day) {
            continue;
        }
        let absent = leave.get(&day);
        let everyone_away = absent.map_or(false, |set| roster.iter().all(|id| set.contains(id)));
        let covering: Vec<&Shift> = shifts.iter().filter(|s| s.covers(day)).collect();

        match covering.as_slice() {
            [] if !everyone_away => {
                out.push(Finding {
                    kind: FindingKind::Uncovered,
                    date: day,
                    shifts: Vec::new(),
                    member: None,
                });
            }
            [] => {}
            [single] => {
                let on_leave = absent.map_or(false, |set| set.contains(&single.member));
                if on_leave && !everyone_away {
                    out.push(finding(FindingKind::OnLeave, day, &covering));
                }
            }
            _ => out.push(finding(FindingKind::DoubleCovered, day, &covering)),
        }
    }

    if !out.is_empty() {
        tracing::warn!(owner = %owner, findings = out.len(), "audit found issues");
    }
    Ok(out)
}

fn finding(kind: FindingKind, date: NaiveDate, shifts: &[&Shift]) -> Finding {
    Finding {
        kind,
        date,
        shifts: shifts.iter().map(|s| s.id.clone()).collect(),
        member: shifts.first().map(|s| s.member.clone()),
    }
}
