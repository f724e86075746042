//! Moteur de rotation : un shift par jour ouvré, équité par classe de shift.
//!
//! L'algorithme est glouton : chaque jour ouvré de la fenêtre reçoit le
//! candidat éligible le moins chargé (compteur de la classe du jour), puis le
//! compteur est mis à jour avant le jour suivant. Un shift long démarre la
//! veille d'une suite de jours non ouvrés et la couvre entièrement (coupé à la
//! fin de la fenêtre).

mod audit;
mod mutate;
mod selection;
mod stats;
mod types;
mod util;

pub use audit::{audit, Finding, FindingKind};
pub use mutate::{assign_day, clear_shifts, commit_plan, reassign_shift, remove_shift};
pub use stats::{member_stats, MemberStats};
pub use types::{Plan, PlanStore, SchedError};

use crate::calendar::Calendar;
use crate::fairness::{FairnessLedger, Tally};
use crate::model::{MemberId, OwnerId, Shift, ShiftClass, ShiftId};
use crate::repository::ShiftRepository;
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Planificateur : un calendrier et une source d'aléa injectée pour les
/// égalités.
#[derive(Debug)]
pub struct RotationScheduler<C, R> {
    calendar: C,
    rng: R,
}

impl<C: Calendar> RotationScheduler<C, StdRng> {
    /// Tirages reproductibles.
    pub fn seeded(calendar: C, seed: u64) -> Self {
        Self::new(calendar, StdRng::seed_from_u64(seed))
    }

    pub fn from_os_rng(calendar: C) -> Self {
        Self::new(calendar, StdRng::from_os_rng())
    }
}

impl<C: Calendar, R: Rng> RotationScheduler<C, R> {
    pub fn new(calendar: C, rng: R) -> Self {
        Self { calendar, rng }
    }

    pub fn calendar(&self) -> &C {
        &self.calendar
    }

    /// Calcule le planning de [start, end] pour `owner`.
    ///
    /// Les shifts déjà enregistrés qui chevauchent la fenêtre sont supprimés
    /// (re-planifier écrase), avec les deltas de registre correspondants. Le
    /// résultat n'est pas persisté : voir [`Self::commit_plan`].
    pub fn plan_shifts<S: PlanStore + ?Sized>(
        &mut self,
        store: &S,
        owner: &OwnerId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Plan, SchedError> {
        util::check_window(start, end)?;

        let members = store.list_members(owner)?;
        if members.is_empty() {
            tracing::info!(owner = %owner, "empty roster, nothing to plan");
            return Ok(Plan::empty(owner, start, end));
        }
        let roster: Vec<MemberId> = members.into_iter().map(|m| m.id).collect();

        // Compteurs issus de tout l'historique, avant suppression de la fenêtre.
        let history = store.all_shifts(owner)?;
        let mut tally = Tally::from_history(&history, &roster);

        let replaced = store.delete_by_range(owner, start, end)?;
        mutate::release(store, owner, &replaced)?;

        let leave = store.leave_by_range(owner, start, end)?;
        let on_leave = util::leave_index(&leave);

        let mut plan = Plan::empty(owner, start, end);
        let mut previous: Option<MemberId> = None;
        let mut current = Some(start);

        while let Some(day) = current.filter(|d| *d <= end) {
            if !self.calendar.is_working_day(day) {
                current = util::next_day(day);
                continue;
            }

            let is_long = self.calendar.starts_long_shift(day);
            let class = ShiftClass::from_long(is_long);
            let shift_end = if is_long {
                self.calendar.long_shift_end(day).min(end)
            } else {
                day
            };

            // Congés vérifiés sur toute la durée du shift ; si personne n'est
            // libre sur l'ensemble, seul le jour de début compte.
            let away = util::leave_over(&on_leave, day, shift_end);
            let mut pool = selection::candidates(&roster, previous.as_ref(), Some(&away));
            if pool.is_empty() && shift_end > day {
                pool = selection::candidates(&roster, previous.as_ref(), on_leave.get(&day));
            }
            let Some(chosen) = selection::least_loaded(&pool, &tally, class, &mut self.rng) else {
                tracing::warn!(owner = %owner, date = %day, "every member on leave, day left unscheduled");
                plan.unfilled.push(day);
                previous = None;
                current = util::next_day(day);
                continue;
            };
            let chosen = chosen.clone();

            let shift = Shift::new(owner.clone(), chosen.clone(), day, shift_end, is_long)
                .map_err(|_| SchedError::InvalidWindow {
                    start: day,
                    end: shift_end,
                })?;
            tracing::debug!(
                date = %day,
                end = %shift_end,
                member = %chosen,
                long = is_long,
                load = tally.get(&chosen, class),
                "assigned"
            );

            tally.add(&chosen, class, shift.days());
            plan.shifts.push(shift);
            previous = Some(chosen);
            current = util::next_day(shift_end);
        }

        tracing::info!(
            owner = %owner,
            start = %start,
            end = %end,
            shifts = plan.shifts.len(),
            unfilled = plan.unfilled.len(),
            replaced = replaced.len(),
            "plan computed"
        );
        Ok(plan)
    }

    /// Persiste un planning et crédite le registre.
    pub fn commit_plan<S>(&self, store: &S, plan: &Plan) -> Result<Vec<Shift>, SchedError>
    where
        S: ShiftRepository + FairnessLedger + ?Sized,
    {
        mutate::commit_plan(store, plan)
    }

    /// Voir [`assign_day`].
    pub fn assign_day<S>(
        &self,
        store: &S,
        owner: &OwnerId,
        member: &MemberId,
        date: NaiveDate,
    ) -> Result<Shift, SchedError>
    where
        S: ShiftRepository + FairnessLedger + ?Sized,
    {
        mutate::assign_day(&self.calendar, store, owner, member, date)
    }

    pub fn reassign_shift<S>(
        &self,
        store: &S,
        owner: &OwnerId,
        shift: &ShiftId,
        member: &MemberId,
    ) -> Result<Shift, SchedError>
    where
        S: ShiftRepository + FairnessLedger + ?Sized,
    {
        mutate::reassign_shift(store, owner, shift, member)
    }

    pub fn remove_shift<S>(
        &self,
        store: &S,
        owner: &OwnerId,
        shift: &ShiftId,
    ) -> Result<Shift, SchedError>
    where
        S: ShiftRepository + FairnessLedger + ?Sized,
    {
        mutate::remove_shift(store, owner, shift)
    }

    /// Supprime tous les shifts de l'owner ; renvoie le nombre supprimé.
    pub fn clear_shifts<S>(&self, store: &S, owner: &OwnerId) -> Result<usize, SchedError>
    where
        S: ShiftRepository + FairnessLedger + ?Sized,
    {
        mutate::clear_shifts(store, owner)
    }
}
