#![allow(dead_code)]
use chrono::NaiveDate;
use shiftplan::{Member, MemoryStore, OwnerId};

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Store avec un owner et des membres ajoutés dans l'ordre donné.
pub fn store_with(names: &[&str]) -> (MemoryStore, OwnerId, Vec<Member>) {
    let store = MemoryStore::new();
    let owner = OwnerId::new("acme");
    let members = names
        .iter()
        .map(|n| store.add_member(&owner, n).unwrap())
        .collect();
    (store, owner, members)
}
