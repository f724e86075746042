//! Interfaces des collaborateurs de la planification et implémentation mémoire.
//!
//! Les traits prennent `&self` : chaque store gère sa propre synchronisation.
//! `MemoryStore` garde un [`Dataset`] derrière un `RwLock`, chaque opération
//! s'exécute sous un seul verrou (les deltas du registre sont donc atomiques).

use crate::fairness::{seed_counters, FairnessCounters, FairnessLedger};
use crate::model::{Dataset, LeaveDay, LeaveId, Member, MemberId, OwnerId, Shift, ShiftId};
use chrono::NaiveDate;
use parking_lot::RwLock;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("unknown member: {0}")]
    UnknownMember(String),
    #[error("member already exists: {0}")]
    DuplicateMember(String),
    #[error("unknown shift: {0}")]
    UnknownShift(String),
    #[error("unknown leave day: {0}")]
    UnknownLeave(String),
    #[error("invalid date range: {start} > {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub trait MemberProvider {
    /// Membres de l'owner, triés par nom.
    fn list_members(&self, owner: &OwnerId) -> Result<Vec<Member>, StoreError>;
}

pub trait LeaveProvider {
    /// Congés dont la date tombe dans [start, end].
    fn leave_by_range(
        &self,
        owner: &OwnerId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<LeaveDay>, StoreError>;
}

pub trait ShiftRepository {
    /// Shifts chevauchant [start, end], triés par date de début.
    fn shifts_by_range(
        &self,
        owner: &OwnerId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Shift>, StoreError>;

    /// Supprime les shifts chevauchant [start, end] et les renvoie.
    fn delete_by_range(
        &self,
        owner: &OwnerId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Shift>, StoreError>;

    fn insert(&self, shift: Shift) -> Result<Shift, StoreError>;

    fn shift_covering(&self, owner: &OwnerId, date: NaiveDate)
        -> Result<Option<Shift>, StoreError>;

    /// Réassigne un shift ; renvoie l'enregistrement avant modification.
    fn set_member(
        &self,
        owner: &OwnerId,
        shift: &ShiftId,
        member: &MemberId,
    ) -> Result<Shift, StoreError>;

    fn delete(&self, owner: &OwnerId, shift: &ShiftId) -> Result<Shift, StoreError>;

    fn delete_all(&self, owner: &OwnerId) -> Result<Vec<Shift>, StoreError>;

    /// Tout l'historique de l'owner.
    fn all_shifts(&self, owner: &OwnerId) -> Result<Vec<Shift>, StoreError> {
        self.shifts_by_range(owner, NaiveDate::MIN, NaiveDate::MAX)
    }
}

/// Store en mémoire, sérialisable via [`crate::storage::Storage`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<Dataset>,
}

impl From<Dataset> for MemoryStore {
    fn from(data: Dataset) -> Self {
        Self {
            data: RwLock::new(data),
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copie cohérente du document courant (pour sauvegarde).
    pub fn snapshot(&self) -> Dataset {
        self.data.read().clone()
    }

    pub fn into_dataset(self) -> Dataset {
        self.data.into_inner()
    }

    /// Ajoute un membre dont les compteurs cachés partent de la moyenne des
    /// membres existants.
    pub fn add_member(&self, owner: &OwnerId, name: &str) -> Result<Member, StoreError> {
        let name = name.trim();
        let mut data = self.data.write();
        if data
            .members_of(owner)
            .any(|m| m.name.eq_ignore_ascii_case(name))
        {
            return Err(StoreError::DuplicateMember(name.to_string()));
        }
        let existing: Vec<FairnessCounters> = data.members_of(owner).map(ledger_counters).collect();
        let seed = seed_counters(&existing);

        let mut member = Member::new(owner.clone(), name);
        member.hidden_normal_days = seed.normal_days;
        member.hidden_long_days = seed.long_days;
        data.members.push(member.clone());
        tracing::info!(
            owner = %owner,
            member = %member.id,
            normal = seed.normal_days,
            long = seed.long_days,
            "member added with seeded counters"
        );
        Ok(member)
    }

    /// Supprime un membre, ses shifts et ses congés.
    pub fn remove_member(&self, owner: &OwnerId, member: &MemberId) -> Result<Member, StoreError> {
        let mut data = self.data.write();
        let pos = data
            .members
            .iter()
            .position(|m| &m.owner == owner && &m.id == member)
            .ok_or_else(|| StoreError::UnknownMember(member.to_string()))?;
        let removed = data.members.remove(pos);
        data.shifts
            .retain(|s| !(&s.owner == owner && &s.member == member));
        data.leave_days
            .retain(|l| !(&l.owner == owner && &l.member == member));
        Ok(removed)
    }

    /// Recherche insensible à la casse.
    pub fn member_by_name(&self, owner: &OwnerId, name: &str) -> Result<Member, StoreError> {
        let data = self.data.read();
        let found = data
            .members_of(owner)
            .find(|m| m.name.eq_ignore_ascii_case(name.trim()))
            .cloned()
            .ok_or_else(|| StoreError::UnknownMember(name.to_string()));
        found
    }

    /// Enregistre un jour de congé ; renvoie l'existant s'il est déjà présent.
    pub fn add_leave_day(
        &self,
        owner: &OwnerId,
        member: &MemberId,
        date: NaiveDate,
    ) -> Result<LeaveDay, StoreError> {
        let mut data = self.data.write();
        insert_leave(&mut data, owner, member, date)
    }

    /// Un congé par jour de [start, end], sans doublon.
    pub fn add_leave_range(
        &self,
        owner: &OwnerId,
        member: &MemberId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<LeaveDay>, StoreError> {
        if start > end {
            return Err(StoreError::InvalidRange { start, end });
        }
        let mut data = self.data.write();
        start
            .iter_days()
            .take_while(|d| *d <= end)
            .map(|date| insert_leave(&mut data, owner, member, date))
            .collect()
    }

    pub fn leave_by_member(
        &self,
        owner: &OwnerId,
        member: &MemberId,
    ) -> Result<Vec<LeaveDay>, StoreError> {
        let data = self.data.read();
        let mut out: Vec<LeaveDay> = data
            .leave_days
            .iter()
            .filter(|l| &l.owner == owner && &l.member == member)
            .cloned()
            .collect();
        out.sort_by_key(|l| l.date);
        Ok(out)
    }

    pub fn remove_leave_day(&self, owner: &OwnerId, id: &LeaveId) -> Result<LeaveDay, StoreError> {
        let mut data = self.data.write();
        let pos = data
            .leave_days
            .iter()
            .position(|l| &l.owner == owner && &l.id == id)
            .ok_or_else(|| StoreError::UnknownLeave(id.to_string()))?;
        Ok(data.leave_days.remove(pos))
    }
}

fn ledger_counters(member: &Member) -> FairnessCounters {
    FairnessCounters::new(member.hidden_normal_days, member.hidden_long_days)
}

fn insert_leave(
    data: &mut Dataset,
    owner: &OwnerId,
    member: &MemberId,
    date: NaiveDate,
) -> Result<LeaveDay, StoreError> {
    if data.find_member(owner, member).is_none() {
        return Err(StoreError::UnknownMember(member.to_string()));
    }
    if let Some(existing) = data
        .leave_days
        .iter()
        .find(|l| &l.owner == owner && &l.member == member && l.date == date)
    {
        return Ok(existing.clone());
    }
    let leave = LeaveDay::new(owner.clone(), member.clone(), date);
    data.leave_days.push(leave.clone());
    Ok(leave)
}

impl MemberProvider for MemoryStore {
    fn list_members(&self, owner: &OwnerId) -> Result<Vec<Member>, StoreError> {
        let data = self.data.read();
        let mut out: Vec<Member> = data.members_of(owner).cloned().collect();
        out.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(out)
    }
}

impl LeaveProvider for MemoryStore {
    fn leave_by_range(
        &self,
        owner: &OwnerId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<LeaveDay>, StoreError> {
        let data = self.data.read();
        let mut out: Vec<LeaveDay> = data
            .leave_days
            .iter()
            .filter(|l| &l.owner == owner && start <= l.date && l.date <= end)
            .cloned()
            .collect();
        out.sort_by_key(|l| l.date);
        Ok(out)
    }
}

impl ShiftRepository for MemoryStore {
    fn shifts_by_range(
        &self,
        owner: &OwnerId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Shift>, StoreError> {
        let data = self.data.read();
        let mut out: Vec<Shift> = data
            .shifts_of(owner)
            .filter(|s| s.overlaps(start, end))
            .cloned()
            .collect();
        out.sort_by_key(|s| s.start);
        Ok(out)
    }

    fn delete_by_range(
        &self,
        owner: &OwnerId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Shift>, StoreError> {
        let mut data = self.data.write();
        let (removed, kept): (Vec<Shift>, Vec<Shift>) = std::mem::take(&mut data.shifts)
            .into_iter()
            .partition(|s| &s.owner == owner && s.overlaps(start, end));
        data.shifts = kept;
        Ok(removed)
    }

    fn insert(&self, shift: Shift) -> Result<Shift, StoreError> {
        if shift.end < shift.start {
            return Err(StoreError::InvalidRange {
                start: shift.start,
                end: shift.end,
            });
        }
        let mut data = self.data.write();
        if data.find_member(&shift.owner, &shift.member).is_none() {
            return Err(StoreError::UnknownMember(shift.member.to_string()));
        }
        data.shifts.push(shift.clone());
        Ok(shift)
    }

    fn shift_covering(
        &self,
        owner: &OwnerId,
        date: NaiveDate,
    ) -> Result<Option<Shift>, StoreError> {
        let data = self.data.read();
        Ok(data
            .shifts_of(owner)
            .filter(|s| s.covers(date))
            .min_by_key(|s| s.start)
            .cloned())
    }

    fn set_member(
        &self,
        owner: &OwnerId,
        shift: &ShiftId,
        member: &MemberId,
    ) -> Result<Shift, StoreError> {
        let mut data = self.data.write();
        if data.find_member(owner, member).is_none() {
            return Err(StoreError::UnknownMember(member.to_string()));
        }
        let target = data
            .find_shift_mut(owner, shift)
            .ok_or_else(|| StoreError::UnknownShift(shift.to_string()))?;
        let previous = target.clone();
        target.member = member.clone();
        Ok(previous)
    }

    fn delete(&self, owner: &OwnerId, shift: &ShiftId) -> Result<Shift, StoreError> {
        let mut data = self.data.write();
        let pos = data
            .shifts
            .iter()
            .position(|s| &s.owner == owner && &s.id == shift)
            .ok_or_else(|| StoreError::UnknownShift(shift.to_string()))?;
        Ok(data.shifts.remove(pos))
    }

    fn delete_all(&self, owner: &OwnerId) -> Result<Vec<Shift>, StoreError> {
        let mut data = self.data.write();
        let (removed, kept): (Vec<Shift>, Vec<Shift>) = std::mem::take(&mut data.shifts)
            .into_iter()
            .partition(|s| &s.owner == owner);
        data.shifts = kept;
        Ok(removed)
    }
}

impl FairnessLedger for MemoryStore {
    fn counters(&self, owner: &OwnerId, member: &MemberId) -> Result<FairnessCounters, StoreError> {
        let data = self.data.read();
        data.find_member(owner, member)
            .map(ledger_counters)
            .ok_or_else(|| StoreError::UnknownMember(member.to_string()))
    }

    fn all_counters(
        &self,
        owner: &OwnerId,
    ) -> Result<HashMap<MemberId, FairnessCounters>, StoreError> {
        let data = self.data.read();
        Ok(data
            .members_of(owner)
            .map(|m| (m.id.clone(), ledger_counters(m)))
            .collect())
    }

    fn apply_delta(
        &self,
        owner: &OwnerId,
        member: &MemberId,
        normal_delta: i64,
        long_delta: i64,
    ) -> Result<FairnessCounters, StoreError> {
        let mut data = self.data.write();
        let target = data
            .find_member_mut(owner, member)
            .ok_or_else(|| StoreError::UnknownMember(member.to_string()))?;
        let mut counters = ledger_counters(target);
        counters.apply(normal_delta, long_delta);
        target.hidden_normal_days = counters.normal_days;
        target.hidden_long_days = counters.long_days;
        Ok(counters)
    }
}
