//! Calendrier ouvré : jours fériés, week-ends et règle du shift long.
//!
//! Les marches `next_working_day` / `previous_working_day` avancent jour par
//! jour sans borne : une table dont la suite de jours non ouvrés est infinie
//! ferait boucler l'appelant. Les tables de jours fériés sont finies et
//! clairsemées, ce qui suffit en pratique.

use anyhow::Context;
use chrono::{Datelike, Days, NaiveDate, Weekday};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Oracle calendaire. Seul `is_holiday` est à fournir.
pub trait Calendar {
    fn is_holiday(&self, date: NaiveDate) -> bool;

    /// Samedi ou dimanche.
    fn is_weekend(&self, date: NaiveDate) -> bool {
        matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    fn is_working_day(&self, date: NaiveDate) -> bool {
        !self.is_holiday(date) && !self.is_weekend(date)
    }

    /// Premier jour ouvré strictement après `date`.
    fn next_working_day(&self, date: NaiveDate) -> NaiveDate {
        let mut day = succ(date);
        while !self.is_working_day(day) {
            day = succ(day);
        }
        day
    }

    /// Dernier jour ouvré strictement avant `date`.
    fn previous_working_day(&self, date: NaiveDate) -> NaiveDate {
        let mut day = pred(date);
        while !self.is_working_day(day) {
            day = pred(day);
        }
        day
    }

    /// Un shift démarrant le `date` est long si le lendemain n'est pas ouvré.
    fn starts_long_shift(&self, date: NaiveDate) -> bool {
        let next = succ(date);
        self.is_holiday(next) || self.is_weekend(next)
    }

    /// Dernier jour couvert par un shift long démarrant le `date` :
    /// la veille du prochain jour ouvré.
    fn long_shift_end(&self, date: NaiveDate) -> NaiveDate {
        pred(self.next_working_day(date))
    }
}

fn succ(date: NaiveDate) -> NaiveDate {
    date.checked_add_days(Days::new(1)).unwrap_or(NaiveDate::MAX)
}

fn pred(date: NaiveDate) -> NaiveDate {
    date.checked_sub_days(Days::new(1)).unwrap_or(NaiveDate::MIN)
}

/// Jour férié nommé.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Holiday {
    pub date: NaiveDate,
    pub name: String,
}

/// Table fixe de jours fériés.
#[derive(Debug, Clone, Default)]
pub struct HolidayCalendar {
    holidays: BTreeMap<NaiveDate, String>,
}

const BUILTIN_YEARS: [i32; 2] = [2025, 2026];

const BUILTIN: &[(u32, u32, &str)] = &[
    (1, 1, "New Year's Day"),
    (4, 23, "National Sovereignty and Children's Day"),
    (5, 1, "Labor and Solidarity Day"),
    (5, 19, "Commemoration of Atatürk, Youth and Sports Day"),
    (7, 15, "Democracy and National Unity Day"),
    (8, 30, "Victory Day"),
    (10, 29, "Republic Day"),
    (12, 31, "New Year's Eve"),
];

impl HolidayCalendar {
    /// Calendrier sans jour férié (seuls les week-ends sont chômés).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Table intégrée : jours fériés publics 2025-2026.
    pub fn builtin() -> Self {
        let mut holidays = BTreeMap::new();
        for year in BUILTIN_YEARS {
            for &(month, day, name) in BUILTIN {
                if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                    holidays.insert(date, name.to_string());
                }
            }
        }
        Self { holidays }
    }

    pub fn from_holidays<I>(holidays: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, String)>,
    {
        Self {
            holidays: holidays.into_iter().collect(),
        }
    }

    /// Charge un objet JSON `{"YYYY-MM-DD": "nom"}`.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let raw: BTreeMap<String, String> = serde_json::from_slice(&data)
            .with_context(|| format!("parsing holiday table {}", path.display()))?;
        let mut holidays = BTreeMap::new();
        for (date, name) in raw {
            let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
                .with_context(|| format!("invalid holiday date: {date}"))?;
            holidays.insert(date, name);
        }
        Ok(Self { holidays })
    }

    pub fn holiday_name(&self, date: NaiveDate) -> Option<&str> {
        self.holidays.get(&date).map(String::as_str)
    }

    pub fn holidays(&self) -> Vec<Holiday> {
        self.holidays
            .iter()
            .map(|(date, name)| Holiday {
                date: *date,
                name: name.clone(),
            })
            .collect()
    }
}

impl Calendar for HolidayCalendar {
    fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains_key(&date)
    }
}

impl<C: Calendar + ?Sized> Calendar for &C {
    fn is_holiday(&self, date: NaiveDate) -> bool {
        (**self).is_holiday(date)
    }

    fn is_weekend(&self, date: NaiveDate) -> bool {
        (**self).is_weekend(date)
    }
}
