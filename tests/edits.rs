#![forbid(unsafe_code)]
mod common;

use common::{day, store_with};
use shiftplan::{
    FairnessCounters, FairnessLedger, HolidayCalendar, MemberId, MemoryStore, OwnerId,
    RotationScheduler, SchedError, ShiftId, ShiftRepository,
};

fn planned(names: &[&str]) -> (MemoryStore, OwnerId, Vec<shiftplan::Member>) {
    let (store, owner, members) = store_with(names);
    let mut sched = RotationScheduler::seeded(HolidayCalendar::builtin(), 7);
    let plan = sched
        .plan_shifts(&store, &owner, day(2025, 1, 6), day(2025, 1, 12))
        .unwrap();
    sched.commit_plan(&store, &plan).unwrap();
    (store, owner, members)
}

fn sched() -> RotationScheduler<HolidayCalendar, rand::rngs::StdRng> {
    RotationScheduler::seeded(HolidayCalendar::builtin(), 0)
}

fn ledger(store: &MemoryStore, owner: &OwnerId, member: &MemberId) -> FairnessCounters {
    store.counters(owner, member).unwrap()
}

#[test]
fn assign_day_reassigns_the_covering_shift() {
    let (store, owner, m) = planned(&["Alice", "Bob"]);
    // samedi : couvert par le shift long du vendredi
    let before = store.shift_covering(&owner, day(2025, 1, 11)).unwrap().unwrap();
    let target = if before.member == m[0].id { &m[1] } else { &m[0] };
    let old_from = ledger(&store, &owner, &before.member);
    let old_to = ledger(&store, &owner, &target.id);

    let shift = sched()
        .assign_day(&store, &owner, &target.id, day(2025, 1, 11))
        .unwrap();

    assert_eq!(shift.id, before.id);
    assert_eq!(shift.start, day(2025, 1, 10));
    assert_eq!(shift.member, target.id);
    assert_eq!(store.all_shifts(&owner).unwrap().len(), 5);
    assert_eq!(
        ledger(&store, &owner, &before.member).long_days,
        old_from.long_days - 3
    );
    assert_eq!(
        ledger(&store, &owner, &target.id).long_days,
        old_to.long_days + 3
    );
}

#[test]
fn assign_day_creates_a_single_day_shift() {
    let (store, owner, m) = store_with(&["Alice", "Bob"]);
    let sched = sched();

    let monday = sched
        .assign_day(&store, &owner, &m[1].id, day(2025, 1, 6))
        .unwrap();
    assert_eq!((monday.start, monday.end), (day(2025, 1, 6), day(2025, 1, 6)));
    assert!(!monday.is_long_shift);
    assert_eq!(ledger(&store, &owner, &m[1].id), FairnessCounters::new(1, 0));

    // veille de week-end : classé long, mais un seul jour
    let friday = sched
        .assign_day(&store, &owner, &m[0].id, day(2025, 1, 10))
        .unwrap();
    assert!(friday.is_long_shift);
    assert_eq!(friday.days(), 1);
    assert_eq!(ledger(&store, &owner, &m[0].id), FairnessCounters::new(0, 1));
}

#[test]
fn assigning_the_same_member_is_a_no_op() {
    let (store, owner, _) = planned(&["Alice", "Bob"]);
    let before = store.shift_covering(&owner, day(2025, 1, 7)).unwrap().unwrap();
    let counters = store.all_counters(&owner).unwrap();

    let shift = sched()
        .assign_day(&store, &owner, &before.member, day(2025, 1, 7))
        .unwrap();
    assert_eq!(shift, before);
    assert_eq!(store.all_counters(&owner).unwrap(), counters);
}

#[test]
fn assign_day_rejects_unknown_member() {
    let (store, owner, _) = store_with(&["Alice"]);
    let err = sched()
        .assign_day(&store, &owner, &MemberId::new("ghost"), day(2025, 1, 6))
        .unwrap_err();
    assert!(matches!(err, SchedError::UnknownMember(id) if id == "ghost"));
    assert!(store.all_shifts(&owner).unwrap().is_empty());
}

#[test]
fn reassign_shift_moves_the_days() {
    let (store, owner, m) = planned(&["Alice", "Bob"]);
    let monday = store.shift_covering(&owner, day(2025, 1, 6)).unwrap().unwrap();
    let other = if monday.member == m[0].id { &m[1] } else { &m[0] };
    let before = ledger(&store, &owner, &other.id);

    let updated = sched()
        .reassign_shift(&store, &owner, &monday.id, &other.id)
        .unwrap();
    assert_eq!(updated.member, other.id);
    assert_eq!(
        store.shift_covering(&owner, day(2025, 1, 6)).unwrap().unwrap().member,
        other.id
    );
    assert_eq!(ledger(&store, &owner, &other.id).normal_days, before.normal_days + 1);
}

#[test]
fn reassign_unknown_shift_fails() {
    let (store, owner, m) = store_with(&["Alice"]);
    let err = sched()
        .reassign_shift(&store, &owner, &ShiftId::new("nope"), &m[0].id)
        .unwrap_err();
    assert!(matches!(err, SchedError::UnknownShift(_)));
}

#[test]
fn remove_shift_releases_the_ledger() {
    let (store, owner, _) = planned(&["Alice", "Bob"]);
    let friday = store.shift_covering(&owner, day(2025, 1, 10)).unwrap().unwrap();
    let before = ledger(&store, &owner, &friday.member);

    let removed = sched().remove_shift(&store, &owner, &friday.id).unwrap();
    assert_eq!(removed.id, friday.id);
    assert!(store.shift_covering(&owner, day(2025, 1, 11)).unwrap().is_none());
    assert_eq!(
        ledger(&store, &owner, &friday.member).long_days,
        before.long_days - 3
    );

    let err = sched().remove_shift(&store, &owner, &friday.id).unwrap_err();
    assert!(matches!(err, SchedError::UnknownShift(_)));
}

#[test]
fn clear_shifts_is_scoped_to_the_owner() {
    let (store, owner, m) = planned(&["Alice", "Bob"]);
    let other = OwnerId::new("globex");
    let carol = store.add_member(&other, "Carol").unwrap();
    sched()
        .assign_day(&store, &other, &carol.id, day(2025, 1, 6))
        .unwrap();

    let removed = sched().clear_shifts(&store, &owner).unwrap();
    assert_eq!(removed, 5);
    assert!(store.all_shifts(&owner).unwrap().is_empty());
    for member in &m {
        assert_eq!(ledger(&store, &owner, &member.id), FairnessCounters::default());
    }
    assert_eq!(store.all_shifts(&other).unwrap().len(), 1);
    assert_eq!(ledger(&store, &other, &carol.id), FairnessCounters::new(1, 0));
}

#[test]
fn assign_day_refuses_an_uncovered_rest_day() {
    let (store, owner, m) = store_with(&["Alice"]);
    let cal = HolidayCalendar::builtin();

    // samedi, puis 1er mai férié
    for date in [day(2025, 1, 11), day(2025, 5, 1)] {
        let err = shiftplan::assign_day(&cal, &store, &owner, &m[0].id, date).unwrap_err();
        assert!(matches!(err, SchedError::RestDay(d) if d == date));
    }
    assert!(store.all_shifts(&owner).unwrap().is_empty());
    assert_eq!(ledger(&store, &owner, &m[0].id), FairnessCounters::default());
}

#[test]
fn edits_work_without_a_scheduler() {
    let (store, owner, m) = store_with(&["Alice", "Bob"]);
    let cal = HolidayCalendar::builtin();

    let shift = shiftplan::assign_day(&cal, &store, &owner, &m[0].id, day(2025, 1, 7)).unwrap();
    let moved = shiftplan::reassign_shift(&store, &owner, &shift.id, &m[1].id).unwrap();
    assert_eq!(moved.member, m[1].id);
    assert_eq!(ledger(&store, &owner, &m[0].id), FairnessCounters::default());
    assert_eq!(ledger(&store, &owner, &m[1].id), FairnessCounters::new(1, 0));

    shiftplan::remove_shift(&store, &owner, &shift.id).unwrap();
    assert_eq!(shiftplan::clear_shifts(&store, &owner).unwrap(), 0);
    assert_eq!(ledger(&store, &owner, &m[1].id), FairnessCounters::default());
}
