#![forbid(unsafe_code)]
//! Shiftplan : planification d'astreintes par rotation équitable.
//!
//! - Un shift par jour ouvré ; shift long la veille d'un week-end ou férié.
//! - Équité par classe (jours simples / jours longs), congés respectés.
//! - Registre d'équité maintenu par deltas, amorçage des nouveaux membres.
//! - Stockage fichier JSON ; données cloisonnées par owner.

pub mod calendar;
pub mod fairness;
pub mod io;
pub mod model;
pub mod repository;
pub mod scheduler;
pub mod service;
pub mod storage;

pub use calendar::{Calendar, Holiday, HolidayCalendar};
pub use fairness::{seed_counters, FairnessCounters, FairnessLedger, ShiftDelta, Tally};
pub use model::{
    Dataset, LeaveDay, LeaveId, Member, MemberId, OwnerId, Shift, ShiftClass, ShiftId,
};
pub use repository::{LeaveProvider, MemberProvider, MemoryStore, ShiftRepository, StoreError};
pub use scheduler::{
    assign_day, audit, clear_shifts, commit_plan, member_stats, reassign_shift, remove_shift,
    Finding, FindingKind, MemberStats, Plan, PlanStore, RotationScheduler, SchedError,
};
pub use service::{OwnerLocks, Planner};
pub use storage::{JsonStorage, Storage};
