use super::SchedError;
use crate::model::{LeaveDay, MemberId};
use chrono::{Days, NaiveDate};
use std::collections::{HashMap, HashSet};

/// Membres en congé, indexés par date.
pub(super) type LeaveIndex = HashMap<NaiveDate, HashSet<MemberId>>;

pub(super) fn leave_index(leave_days: &[LeaveDay]) -> LeaveIndex {
    let mut index = LeaveIndex::new();
    for leave in leave_days {
        index
            .entry(leave.date)
            .or_default()
            .insert(leave.member.clone());
    }
    index
}

/// Membres en congé au moins un jour de [start, end].
pub(super) fn leave_over(index: &LeaveIndex, start: NaiveDate, end: NaiveDate) -> HashSet<MemberId> {
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter_map(|d| index.get(&d))
        .flatten()
        .cloned()
        .collect()
}

pub(super) fn check_window(start: NaiveDate, end: NaiveDate) -> Result<(), SchedError> {
    if start > end {
        return Err(SchedError::InvalidWindow { start, end });
    }
    Ok(())
}

/// Lendemain ; `None` au bout du calendrier.
pub(super) fn next_day(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_add_days(Days::new(1))
}
