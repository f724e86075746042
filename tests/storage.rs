#![forbid(unsafe_code)]
mod common;

use common::{day, store_with};
use shiftplan::{
    FairnessCounters, FairnessLedger, HolidayCalendar, JsonStorage, LeaveProvider,
    MemberProvider, MemoryStore, OwnerId, RotationScheduler, ShiftRepository, Storage,
    StoreError,
};
use tempfile::tempdir;

#[test]
fn dataset_survives_a_save_and_reload() {
    let (store, owner, m) = store_with(&["Alice", "Bob"]);
    store.add_leave_day(&owner, &m[0].id, day(2025, 1, 8)).unwrap();
    let mut sched = RotationScheduler::seeded(HolidayCalendar::builtin(), 1);
    let plan = sched
        .plan_shifts(&store, &owner, day(2025, 1, 6), day(2025, 1, 12))
        .unwrap();
    sched.commit_plan(&store, &plan).unwrap();

    let dir = tempdir().unwrap();
    let storage = JsonStorage::open(dir.path().join("data.json")).unwrap();
    storage.save(&store.snapshot()).unwrap();

    let reloaded = MemoryStore::from(storage.load().unwrap());
    assert_eq!(
        reloaded.list_members(&owner).unwrap(),
        store.list_members(&owner).unwrap()
    );
    assert_eq!(
        reloaded.all_shifts(&owner).unwrap(),
        store.all_shifts(&owner).unwrap()
    );
    assert_eq!(
        reloaded
            .leave_by_range(&owner, day(2025, 1, 1), day(2025, 1, 31))
            .unwrap()
            .len(),
        1
    );
    assert_eq!(
        reloaded.all_counters(&owner).unwrap(),
        store.all_counters(&owner).unwrap()
    );
}

#[test]
fn missing_file_loads_as_empty() {
    let dir = tempdir().unwrap();
    let storage = JsonStorage::open(dir.path().join("absent.json")).unwrap();
    let data = storage.load_or_default().unwrap();
    assert!(data.members.is_empty());
    assert!(data.shifts.is_empty());
    assert!(storage.load().is_err());
}

#[test]
fn corrupt_file_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();
    let err = JsonStorage::open(&path).unwrap().load_or_default().unwrap_err();
    assert!(format!("{err:#}").contains("parsing"));
}

#[test]
fn older_documents_without_counters_still_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("old.json");
    std::fs::write(
        &path,
        r#"{
  "members": [
    {
      "id": "m1",
      "owner": "acme",
      "name": "Alice",
      "created_at": "2025-01-01T00:00:00Z"
    }
  ]
}"#,
    )
    .unwrap();

    let store = MemoryStore::from(JsonStorage::open(&path).unwrap().load().unwrap());
    let owner = OwnerId::new("acme");
    let members = store.list_members(&owner).unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(
        store.counters(&owner, &members[0].id).unwrap(),
        FairnessCounters::default()
    );
    assert!(store.all_shifts(&owner).unwrap().is_empty());
}

#[test]
fn member_names_are_unique_per_owner() {
    let (store, owner, _) = store_with(&["Alice"]);
    let err = store.add_member(&owner, "  alice ").unwrap_err();
    assert!(matches!(err, StoreError::DuplicateMember(_)));

    // un autre owner peut réutiliser le nom
    let other = OwnerId::new("globex");
    store.add_member(&other, "Alice").unwrap();
    assert_eq!(store.member_by_name(&owner, "ALICE").unwrap().owner, owner);
}

#[test]
fn members_are_listed_by_name() {
    let (store, owner, _) = store_with(&["Carol", "Alice", "Bob"]);
    let names: Vec<String> = store
        .list_members(&owner)
        .unwrap()
        .into_iter()
        .map(|m| m.name)
        .collect();
    assert_eq!(names, ["Alice", "Bob", "Carol"]);
}

#[test]
fn removing_a_member_drops_their_shifts_and_leave() {
    let (store, owner, m) = store_with(&["Alice", "Bob"]);
    store
        .add_leave_range(&owner, &m[0].id, day(2025, 2, 3), day(2025, 2, 5))
        .unwrap();
    let mut sched = RotationScheduler::seeded(HolidayCalendar::builtin(), 2);
    let plan = sched
        .plan_shifts(&store, &owner, day(2025, 1, 6), day(2025, 1, 10))
        .unwrap();
    sched.commit_plan(&store, &plan).unwrap();

    store.remove_member(&owner, &m[0].id).unwrap();
    assert!(store
        .all_shifts(&owner)
        .unwrap()
        .iter()
        .all(|s| s.member == m[1].id));
    assert!(store.leave_by_member(&owner, &m[0].id).unwrap().is_empty());
    assert!(matches!(
        store.remove_member(&owner, &m[0].id),
        Err(StoreError::UnknownMember(_))
    ));
}

#[test]
fn leave_days_are_idempotent() {
    let (store, owner, m) = store_with(&["Alice"]);
    let first = store.add_leave_day(&owner, &m[0].id, day(2025, 3, 3)).unwrap();
    let again = store.add_leave_day(&owner, &m[0].id, day(2025, 3, 3)).unwrap();
    assert_eq!(first.id, again.id);

    let range = store
        .add_leave_range(&owner, &m[0].id, day(2025, 3, 1), day(2025, 3, 4))
        .unwrap();
    assert_eq!(range.len(), 4);
    assert_eq!(store.leave_by_member(&owner, &m[0].id).unwrap().len(), 4);

    store.remove_leave_day(&owner, &first.id).unwrap();
    assert_eq!(store.leave_by_member(&owner, &m[0].id).unwrap().len(), 3);
    assert!(matches!(
        store.remove_leave_day(&owner, &first.id),
        Err(StoreError::UnknownLeave(_))
    ));
}

#[test]
fn leave_range_must_be_ordered() {
    let (store, owner, m) = store_with(&["Alice"]);
    let err = store
        .add_leave_range(&owner, &m[0].id, day(2025, 3, 4), day(2025, 3, 1))
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidRange { .. }));
}

#[test]
fn leave_for_unknown_member_is_rejected() {
    let (store, owner, _) = store_with(&["Alice"]);
    let err = store
        .add_leave_day(&owner, &shiftplan::MemberId::new("ghost"), day(2025, 3, 3))
        .unwrap_err();
    assert!(matches!(err, StoreError::UnknownMember(_)));
}
