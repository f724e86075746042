use crate::model::{Member, Shift};
use crate::scheduler::MemberStats;
use anyhow::Context;
use chrono::NaiveDate;
use csv::WriterBuilder;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Date calendaire `YYYY-MM-DD` ; une date-heure ISO-8601 est tronquée au `T`.
pub fn parse_day(raw: &str) -> anyhow::Result<NaiveDate> {
    let raw = raw.trim();
    let day = raw.split('T').next().unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").with_context(|| format!("invalid date: {raw}"))
}

/// Shift enrichi du nom du membre, pour l'affichage et l'export.
#[derive(Debug, Clone, Serialize)]
pub struct ShiftView {
    #[serde(flatten)]
    pub shift: Shift,
    pub member_name: String,
}

pub fn shift_views(members: &[Member], shifts: &[Shift]) -> Vec<ShiftView> {
    let names: HashMap<_, _> = members.iter().map(|m| (&m.id, m.name.as_str())).collect();
    shifts
        .iter()
        .map(|s| ShiftView {
            shift: s.clone(),
            member_name: names.get(&s.member).copied().unwrap_or_default().to_string(),
        })
        .collect()
}

/// Export JSON des shifts (jolie mise en forme)
pub fn export_shifts_json<P: AsRef<Path>>(path: P, views: &[ShiftView]) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(views)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV des shifts: header `id,member,start,end,days,is_long_shift`
pub fn write_shifts_csv<W: Write>(out: W, views: &[ShiftView]) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(false).from_writer(out);
    w.write_record(["id", "member", "start", "end", "days", "is_long_shift"])?;
    for v in views {
        let start = v.shift.start.to_string();
        let end = v.shift.end.to_string();
        let days = v.shift.days().to_string();
        w.write_record([
            v.shift.id.as_str(),
            v.member_name.as_str(),
            start.as_str(),
            end.as_str(),
            days.as_str(),
            if v.shift.is_long_shift { "true" } else { "false" },
        ])?;
    }
    w.flush()?;
    Ok(())
}

pub fn export_shifts_csv<P: AsRef<Path>>(path: P, views: &[ShiftView]) -> anyhow::Result<()> {
    let path = path.as_ref();
    let file = fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_shifts_csv(file, views)
}

/// Export CSV des statistiques:
/// header `member,total_days,long_shift_count,normal_days,long_days,ledger_normal,ledger_long`
pub fn write_stats_csv<W: Write>(out: W, stats: &[MemberStats]) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(false).from_writer(out);
    w.write_record([
        "member",
        "total_days",
        "long_shift_count",
        "normal_days",
        "long_days",
        "ledger_normal",
        "ledger_long",
    ])?;
    for s in stats {
        w.write_record([
            s.name.clone(),
            s.total_days.to_string(),
            s.long_shift_count.to_string(),
            s.history.normal_days.to_string(),
            s.history.long_days.to_string(),
            s.ledger.normal_days.to_string(),
            s.ledger.long_days.to_string(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

pub fn export_stats_csv<P: AsRef<Path>>(path: P, stats: &[MemberStats]) -> anyhow::Result<()> {
    let path = path.as_ref();
    let file = fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_stats_csv(file, stats)
}
