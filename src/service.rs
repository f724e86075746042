//! Sérialisation par owner des opérations qui modifient le planning.
//!
//! La séquence « supprimer la fenêtre, recalculer, insérer » n'est pas
//! atomique côté store : une planification et une modification (assignation,
//! réassignation, suppression) du même owner ne doivent pas s'entrelacer.
//! Les owners distincts avancent en parallèle.

use crate::calendar::Calendar;
use crate::model::{MemberId, OwnerId, Shift, ShiftId};
use crate::scheduler::{self, Plan, PlanStore, RotationScheduler, SchedError};
use chrono::NaiveDate;
use dashmap::DashMap;
use parking_lot::{ArcMutexGuard, Mutex, RawMutex};
use std::sync::Arc;

pub type OwnerGuard = ArcMutexGuard<RawMutex, ()>;

/// Un verrou par owner, créé à la demande.
#[derive(Debug, Default)]
pub struct OwnerLocks {
    locks: DashMap<OwnerId, Arc<Mutex<()>>>,
}

impl OwnerLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bloque jusqu'à obtenir l'exclusivité sur `owner`.
    pub fn lock(&self, owner: &OwnerId) -> OwnerGuard {
        // L'entrée de la map est relâchée avant d'attendre le verrou.
        let lock = Arc::clone(&*self.locks.entry(owner.clone()).or_default());
        lock.lock_arc()
    }
}

/// Façade de planification partageable entre threads.
pub struct Planner<S, C> {
    store: S,
    calendar: C,
    locks: OwnerLocks,
}

impl<S, C> Planner<S, C>
where
    S: PlanStore,
    C: Calendar,
{
    pub fn new(store: S, calendar: C) -> Self {
        Self {
            store,
            calendar,
            locks: OwnerLocks::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn calendar(&self) -> &C {
        &self.calendar
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Planifie et persiste [start, end]. `seed` rend les égalités
    /// reproductibles.
    pub fn plan(
        &self,
        owner: &OwnerId,
        start: NaiveDate,
        end: NaiveDate,
        seed: Option<u64>,
    ) -> Result<Plan, SchedError> {
        let _guard = self.locks.lock(owner);
        let mut rotation = match seed {
            Some(seed) => RotationScheduler::seeded(&self.calendar, seed),
            None => RotationScheduler::from_os_rng(&self.calendar),
        };
        let mut plan = rotation.plan_shifts(&self.store, owner, start, end)?;
        plan.shifts = scheduler::commit_plan(&self.store, &plan)?;
        Ok(plan)
    }

    pub fn assign_day(
        &self,
        owner: &OwnerId,
        member: &MemberId,
        date: NaiveDate,
    ) -> Result<Shift, SchedError> {
        let _guard = self.locks.lock(owner);
        scheduler::assign_day(&self.calendar, &self.store, owner, member, date)
    }

    pub fn reassign_shift(
        &self,
        owner: &OwnerId,
        shift: &ShiftId,
        member: &MemberId,
    ) -> Result<Shift, SchedError> {
        let _guard = self.locks.lock(owner);
        scheduler::reassign_shift(&self.store, owner, shift, member)
    }

    pub fn remove_shift(&self, owner: &OwnerId, shift: &ShiftId) -> Result<Shift, SchedError> {
        let _guard = self.locks.lock(owner);
        scheduler::remove_shift(&self.store, owner, shift)
    }

    pub fn clear(&self, owner: &OwnerId) -> Result<usize, SchedError> {
        let _guard = self.locks.lock(owner);
        scheduler::clear_shifts(&self.store, owner)
    }
}
