//! Compteurs d'équité par membre et par classe de shift.
//!
//! Deux vues coexistent :
//! - le [`Tally`], recalculé en sommant l'historique des shifts (vue qui fait foi
//!   pour la sélection) ;
//! - le registre ([`FairnessLedger`]), maintenu par deltas, qui sert à
//!   initialiser un nouvel arrivant.
//!
//! Tout chemin qui crée, modifie ou supprime un shift applique le delta
//! correspondant afin que les deux vues restent d'accord.

use crate::model::{MemberId, OwnerId, Shift, ShiftClass};
use crate::repository::StoreError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Jours d'astreinte cumulés, séparés par classe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FairnessCounters {
    pub normal_days: i64,
    pub long_days: i64,
}

impl FairnessCounters {
    pub fn new(normal_days: i64, long_days: i64) -> Self {
        Self {
            normal_days,
            long_days,
        }
    }

    pub fn get(&self, class: ShiftClass) -> i64 {
        match class {
            ShiftClass::Normal => self.normal_days,
            ShiftClass::Long => self.long_days,
        }
    }

    pub fn add(&mut self, class: ShiftClass, days: i64) {
        match class {
            ShiftClass::Normal => self.normal_days += days,
            ShiftClass::Long => self.long_days += days,
        }
    }

    /// Applique un delta signé ; les deux compteurs restent >= 0.
    pub fn apply(&mut self, normal_delta: i64, long_delta: i64) {
        self.normal_days = (self.normal_days + normal_delta).max(0);
        self.long_days = (self.long_days + long_delta).max(0);
    }

    pub fn total(&self) -> i64 {
        self.normal_days + self.long_days
    }
}

/// Compteurs initiaux d'un nouveau membre : moyenne entière (plancher) des
/// compteurs existants, zéro si la liste est vide.
pub fn seed_counters<'a, I>(existing: I) -> FairnessCounters
where
    I: IntoIterator<Item = &'a FairnessCounters>,
{
    let (mut normal, mut long, mut count) = (0i64, 0i64, 0i64);
    for c in existing {
        normal += c.normal_days;
        long += c.long_days;
        count += 1;
    }
    if count == 0 {
        return FairnessCounters::default();
    }
    FairnessCounters::new(normal.div_euclid(count), long.div_euclid(count))
}

/// Delta signé à appliquer au registre pour un shift donné.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftDelta {
    pub normal: i64,
    pub long: i64,
}

impl ShiftDelta {
    pub fn created(shift: &Shift) -> Self {
        match shift.class() {
            ShiftClass::Normal => Self {
                normal: shift.days(),
                long: 0,
            },
            ShiftClass::Long => Self {
                normal: 0,
                long: shift.days(),
            },
        }
    }

    pub fn removed(shift: &Shift) -> Self {
        let created = Self::created(shift);
        Self {
            normal: -created.normal,
            long: -created.long,
        }
    }
}

/// Vue « historique » : somme des jours de shifts par membre et par classe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    counters: HashMap<MemberId, FairnessCounters>,
}

impl Tally {
    /// Somme l'historique ; chaque membre de `roster` apparaît, à zéro s'il
    /// n'a aucun shift.
    pub fn from_history<'a, S, M>(shifts: S, roster: M) -> Self
    where
        S: IntoIterator<Item = &'a Shift>,
        M: IntoIterator<Item = &'a MemberId>,
    {
        let mut counters: HashMap<MemberId, FairnessCounters> = roster
            .into_iter()
            .map(|id| (id.clone(), FairnessCounters::default()))
            .collect();
        for shift in shifts {
            counters
                .entry(shift.member.clone())
                .or_default()
                .add(shift.class(), shift.days());
        }
        Self { counters }
    }

    pub fn get(&self, member: &MemberId, class: ShiftClass) -> i64 {
        self.counters.get(member).map_or(0, |c| c.get(class))
    }

    pub fn counters(&self, member: &MemberId) -> FairnessCounters {
        self.counters.get(member).copied().unwrap_or_default()
    }

    pub fn add(&mut self, member: &MemberId, class: ShiftClass, days: i64) {
        self.counters
            .entry(member.clone())
            .or_default()
            .add(class, days);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MemberId, &FairnessCounters)> {
        self.counters.iter()
    }
}

/// Registre d'équité persistant, cloisonné par owner.
pub trait FairnessLedger {
    fn counters(&self, owner: &OwnerId, member: &MemberId) -> Result<FairnessCounters, StoreError>;

    fn all_counters(
        &self,
        owner: &OwnerId,
    ) -> Result<HashMap<MemberId, FairnessCounters>, StoreError>;

    /// Lecture-modification-écriture atomique, compteurs bornés à zéro.
    fn apply_delta(
        &self,
        owner: &OwnerId,
        member: &MemberId,
        normal_delta: i64,
        long_delta: i64,
    ) -> Result<FairnessCounters, StoreError>;

    /// Compteurs d'amorçage pour un membre ajouté à la rotation.
    fn seed_new_member(&self, owner: &OwnerId) -> Result<FairnessCounters, StoreError> {
        let all = self.all_counters(owner)?;
        Ok(seed_counters(all.values()))
    }

    fn apply_shift_delta(
        &self,
        owner: &OwnerId,
        member: &MemberId,
        delta: ShiftDelta,
    ) -> Result<FairnessCounters, StoreError> {
        self.apply_delta(owner, member, delta.normal, delta.long)
    }
}
