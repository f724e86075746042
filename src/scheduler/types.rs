use crate::fairness::FairnessLedger;
use crate::model::{OwnerId, Shift};
use crate::repository::{LeaveProvider, MemberProvider, ShiftRepository, StoreError};
use chrono::NaiveDate;
use thiserror::Error;

/// Ensemble des collaborateurs dont la planification a besoin.
pub trait PlanStore: MemberProvider + LeaveProvider + ShiftRepository + FairnessLedger {}

impl<T> PlanStore for T where T: MemberProvider + LeaveProvider + ShiftRepository + FairnessLedger {}

/// Résultat d'une planification (pas encore persisté).
#[derive(Debug, Clone)]
pub struct Plan {
    pub owner: OwnerId,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Shifts ordonnés par date de début.
    pub shifts: Vec<Shift>,
    /// Jours ouvrés restés sans astreinte : tous les membres étaient en congé.
    pub unfilled: Vec<NaiveDate>,
}

impl Plan {
    pub(super) fn empty(owner: &OwnerId, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            owner: owner.clone(),
            start,
            end,
            shifts: Vec::new(),
            unfilled: Vec::new(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.unfilled.is_empty()
    }

    /// Shift couvrant `date`, s'il y en a un.
    pub fn shift_on(&self, date: NaiveDate) -> Option<&Shift> {
        self.shifts.iter().find(|s| s.covers(date))
    }
}

#[derive(Error, Debug)]
pub enum SchedError {
    #[error("invalid window: start {start} is after end {end}")]
    InvalidWindow { start: NaiveDate, end: NaiveDate },
    #[error("{0} is not a working day")]
    RestDay(NaiveDate),
    #[error("unknown member: {0}")]
    UnknownMember(String),
    #[error("unknown shift: {0}")]
    UnknownShift(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}
