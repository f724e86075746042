use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            pub fn new<S: AsRef<str>>(s: S) -> Self {
                Self(s.as_ref().to_owned())
            }
            pub fn random() -> Self {
                Self(Uuid::new_v4().to_string())
            }
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Compte propriétaire : toutes les données sont cloisonnées par owner.
    OwnerId
);
string_id!(
    /// Identifiant fort pour Member
    MemberId
);
string_id!(
    /// Identifiant fort pour Shift
    ShiftId
);
string_id!(LeaveId);

/// Membre de la rotation.
///
/// Les compteurs `hidden_*` sont le registre d'équité : ils ne sont modifiés
/// que par des deltas et servent à initialiser un nouvel arrivant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub owner: OwnerId,
    pub name: String,
    #[serde(default)]
    pub hidden_normal_days: i64,
    #[serde(default)]
    pub hidden_long_days: i64,
    pub created_at: DateTime<Utc>,
}

impl Member {
    pub fn new<N: Into<String>>(owner: OwnerId, name: N) -> Self {
        Self {
            id: MemberId::random(),
            owner,
            name: name.into(),
            hidden_normal_days: 0,
            hidden_long_days: 0,
            created_at: Utc::now(),
        }
    }
}

/// Classe d'un shift : simple ou long (enchaîné sur des jours non ouvrés).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftClass {
    Normal,
    Long,
}

impl ShiftClass {
    pub fn from_long(is_long: bool) -> Self {
        if is_long {
            Self::Long
        } else {
            Self::Normal
        }
    }
}

/// Astreinte sur un intervalle de dates calendaires [start, end] inclus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    pub id: ShiftId,
    pub owner: OwnerId,
    pub member: MemberId,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub is_long_shift: bool,
    pub created_at: DateTime<Utc>,
}

impl Shift {
    /// Crée un shift en validant que `end >= start`.
    pub fn new(
        owner: OwnerId,
        member: MemberId,
        start: NaiveDate,
        end: NaiveDate,
        is_long_shift: bool,
    ) -> Result<Self, String> {
        if end < start {
            return Err("shift end must not be before start".to_string());
        }
        Ok(Self {
            id: ShiftId::random(),
            owner,
            member,
            start,
            end,
            is_long_shift,
            created_at: Utc::now(),
        })
    }

    /// Nombre de jours couverts, bornes incluses.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn class(&self) -> ShiftClass {
        ShiftClass::from_long(self.is_long_shift)
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Vrai si le shift chevauche [start, end].
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start <= end && start <= self.end
    }
}

/// Jour de congé d'un membre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveDay {
    pub id: LeaveId,
    pub owner: OwnerId,
    pub member: MemberId,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl LeaveDay {
    pub fn new(owner: OwnerId, member: MemberId, date: NaiveDate) -> Self {
        Self {
            id: LeaveId::random(),
            owner,
            member,
            date,
            created_at: Utc::now(),
        }
    }
}

/// Document persisté : tous les owners ensemble, chaque requête filtre par owner.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub shifts: Vec<Shift>,
    #[serde(default)]
    pub leave_days: Vec<LeaveDay>,
}

impl Dataset {
    pub fn members_of<'a>(&'a self, owner: &'a OwnerId) -> impl Iterator<Item = &'a Member> + 'a {
        self.members.iter().filter(move |m| &m.owner == owner)
    }
    pub fn shifts_of<'a>(&'a self, owner: &'a OwnerId) -> impl Iterator<Item = &'a Shift> + 'a {
        self.shifts.iter().filter(move |s| &s.owner == owner)
    }
    pub fn find_member<'a>(&'a self, owner: &OwnerId, id: &MemberId) -> Option<&'a Member> {
        self.members
            .iter()
            .find(|m| &m.owner == owner && &m.id == id)
    }
    pub fn find_member_mut(&mut self, owner: &OwnerId, id: &MemberId) -> Option<&mut Member> {
        self.members
            .iter_mut()
            .find(|m| &m.owner == owner && &m.id == id)
    }
    pub fn find_shift_mut(&mut self, owner: &OwnerId, id: &ShiftId) -> Option<&mut Shift> {
        self.shifts
            .iter_mut()
            .find(|s| &s.owner == owner && &s.id == id)
    }
}
