use super::{Plan, SchedError};
use crate::calendar::Calendar;
use crate::fairness::{FairnessLedger, ShiftDelta};
use crate::model::{MemberId, OwnerId, Shift, ShiftId};
use crate::repository::{ShiftRepository, StoreError};
use chrono::NaiveDate;

fn lift(err: StoreError) -> SchedError {
    match err {
        StoreError::UnknownMember(id) => SchedError::UnknownMember(id),
        StoreError::UnknownShift(id) => SchedError::UnknownShift(id),
        other => SchedError::Store(other),
    }
}

/// Débite le registre pour des shifts supprimés.
pub(super) fn release<S>(store: &S, owner: &OwnerId, removed: &[Shift]) -> Result<(), SchedError>
where
    S: FairnessLedger + ?Sized,
{
    for shift in removed {
        match store.apply_shift_delta(owner, &shift.member, ShiftDelta::removed(shift)) {
            Ok(_) => {}
            Err(StoreError::UnknownMember(id)) => {
                tracing::warn!(owner = %owner, member = %id, shift = %shift.id, "removed shift of unknown member");
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

/// Persiste un planning et crédite le registre.
pub fn commit_plan<S>(store: &S, plan: &Plan) -> Result<Vec<Shift>, SchedError>
where
    S: ShiftRepository + FairnessLedger + ?Sized,
{
    let mut saved = Vec::with_capacity(plan.shifts.len());
    for shift in &plan.shifts {
        let stored = store.insert(shift.clone()).map_err(lift)?;
        store
            .apply_shift_delta(&stored.owner, &stored.member, ShiftDelta::created(&stored))
            .map_err(lift)?;
        saved.push(stored);
    }
    tracing::info!(owner = %plan.owner, shifts = saved.len(), "plan committed");
    Ok(saved)
}

/// Pose `member` d'astreinte le `date` : réassigne le shift qui couvre ce
/// jour, ou crée un shift d'un jour si `date` est ouvré.
pub fn assign_day<C, S>(
    calendar: &C,
    store: &S,
    owner: &OwnerId,
    member: &MemberId,
    date: NaiveDate,
) -> Result<Shift, SchedError>
where
    C: Calendar,
    S: ShiftRepository + FairnessLedger + ?Sized,
{
    if let Some(existing) = store.shift_covering(owner, date).map_err(lift)? {
        return reassign_shift(store, owner, &existing.id, member);
    }

    if !calendar.is_working_day(date) {
        return Err(SchedError::RestDay(date));
    }

    // Shift d'un seul jour ; la classe suit le lendemain comme au planning.
    let is_long = calendar.starts_long_shift(date);
    let shift = Shift::new(owner.clone(), member.clone(), date, date, is_long)
        .map_err(|_| SchedError::InvalidWindow {
            start: date,
            end: date,
        })?;
    let stored = store.insert(shift).map_err(lift)?;
    store
        .apply_shift_delta(owner, member, ShiftDelta::created(&stored))
        .map_err(lift)?;
    tracing::info!(owner = %owner, date = %date, member = %member, long = is_long, "shift created");
    Ok(stored)
}

pub fn reassign_shift<S>(
    store: &S,
    owner: &OwnerId,
    shift: &ShiftId,
    member: &MemberId,
) -> Result<Shift, SchedError>
where
    S: ShiftRepository + FairnessLedger + ?Sized,
{
    let previous = store.set_member(owner, shift, member).map_err(lift)?;
    if &previous.member != member {
        store
            .apply_shift_delta(owner, &previous.member, ShiftDelta::removed(&previous))
            .map_err(lift)?;
        store
            .apply_shift_delta(owner, member, ShiftDelta::created(&previous))
            .map_err(lift)?;
        tracing::info!(
            owner = %owner,
            shift = %shift,
            from = %previous.member,
            to = %member,
            "shift reassigned"
        );
    }
    Ok(Shift {
        member: member.clone(),
        ..previous
    })
}

pub fn remove_shift<S>(store: &S, owner: &OwnerId, shift: &ShiftId) -> Result<Shift, SchedError>
where
    S: ShiftRepository + FairnessLedger + ?Sized,
{
    let removed = store.delete(owner, shift).map_err(lift)?;
    release(store, owner, std::slice::from_ref(&removed))?;
    Ok(removed)
}

/// Supprime tous les shifts de l'owner ; renvoie le nombre supprimé.
pub fn clear_shifts<S>(store: &S, owner: &OwnerId) -> Result<usize, SchedError>
where
    S: ShiftRepository + FairnessLedger + ?Sized,
{
    let removed = store.delete_all(owner).map_err(lift)?;
    release(store, owner, &removed)?;
    tracing::info!(owner = %owner, removed = removed.len(), "all shifts cleared");
    Ok(removed.len())
}
