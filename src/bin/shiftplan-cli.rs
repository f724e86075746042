#![forbid(unsafe_code)]
use anyhow::{bail, Context, Result};
use chrono::{Months, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use shiftplan::{
    audit,
    calendar::HolidayCalendar,
    io,
    member_stats,
    model::{LeaveId, Member, MemberId, OwnerId},
    repository::{LeaveProvider, MemberProvider, MemoryStore, ShiftRepository},
    service::Planner,
    storage::{JsonStorage, Storage},
    FindingKind,
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de planification d'astreintes par rotation
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON des données
    #[arg(long, global = true, default_value = "shiftplan.json")]
    data: String,

    /// Compte propriétaire des données
    #[arg(long, global = true, default_value = "default")]
    owner: String,

    /// Table de jours fériés JSON `{"YYYY-MM-DD": "nom"}` (sinon table intégrée)
    #[arg(long, global = true)]
    holidays: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Gérer les membres de la rotation
    Member {
        #[command(subcommand)]
        cmd: MemberCmd,
    },

    /// Gérer les congés
    Leave {
        #[command(subcommand)]
        cmd: LeaveCmd,
    },

    /// Planifier une période (écrase les shifts existants de la période)
    Plan {
        /// YYYY-MM-DD
        #[arg(long)]
        start: String,
        /// YYYY-MM-DD
        #[arg(long)]
        end: String,
        /// Graine pour des égalités reproductibles
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        out_json: Option<String>,
    },

    /// Lister et optionnellement exporter les shifts
    Shifts {
        /// défaut : il y a un mois
        #[arg(long)]
        start: Option<String>,
        /// défaut : dans un mois
        #[arg(long)]
        end: Option<String>,
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Mettre un membre d'astreinte un jour donné
    Assign {
        #[arg(long)]
        date: String,
        /// nom du membre
        #[arg(long)]
        member: String,
    },

    /// Supprimer tous les shifts
    Clear,

    /// Statistiques par membre
    Stats {
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Lister les jours fériés
    Holidays,

    /// Vérifier la couverture d'une période
    Check {
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
    },
}

#[derive(Subcommand, Debug)]
enum MemberCmd {
    Add {
        #[arg(long)]
        name: String,
    },
    List,
    /// Supprime aussi ses shifts et congés
    Remove {
        #[arg(long)]
        name: String,
    },
}

#[derive(Subcommand, Debug)]
enum LeaveCmd {
    /// Un jour (`--date`) ou une plage (`--from`/`--to`)
    Add {
        #[arg(long)]
        member: String,
        #[arg(long, conflicts_with_all = ["from", "to"])]
        date: Option<String>,
        #[arg(long, requires = "to")]
        from: Option<String>,
        #[arg(long, requires = "from")]
        to: Option<String>,
    },
    List {
        #[arg(long)]
        member: Option<String>,
    },
    Remove {
        #[arg(long)]
        id: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let storage = JsonStorage::open(&cli.data)?;
    let calendar = match &cli.holidays {
        Some(path) => HolidayCalendar::from_json_file(path)?,
        None => HolidayCalendar::builtin(),
    };
    let planner = Planner::new(MemoryStore::from(storage.load_or_default()?), calendar);
    let owner = OwnerId::new(&cli.owner);
    let store = planner.store();
    let mut dirty = false;

    let code = match cli.cmd {
        Commands::Member { cmd } => match cmd {
            MemberCmd::Add { name } => {
                if name.trim().is_empty() {
                    bail!("member name cannot be empty");
                }
                let m = store.add_member(&owner, &name)?;
                println!(
                    "{} | {} (normal {}, long {})",
                    m.id, m.name, m.hidden_normal_days, m.hidden_long_days
                );
                dirty = true;
                0
            }
            MemberCmd::List => {
                for m in store.list_members(&owner)? {
                    println!(
                        "{} | {} | normal {} | long {}",
                        m.id, m.name, m.hidden_normal_days, m.hidden_long_days
                    );
                }
                0
            }
            MemberCmd::Remove { name } => {
                let m = store.member_by_name(&owner, &name)?;
                store.remove_member(&owner, &m.id)?;
                dirty = true;
                0
            }
        },
        Commands::Leave { cmd } => match cmd {
            LeaveCmd::Add {
                member,
                date,
                from,
                to,
            } => {
                let m = store.member_by_name(&owner, &member)?;
                let added = match (date, from, to) {
                    (Some(d), _, _) => vec![store.add_leave_day(&owner, &m.id, io::parse_day(&d)?)?],
                    (None, Some(f), Some(t)) => store.add_leave_range(
                        &owner,
                        &m.id,
                        io::parse_day(&f)?,
                        io::parse_day(&t)?,
                    )?,
                    _ => bail!("either --date or --from/--to is required"),
                };
                println!("{} leave day(s) recorded for {}", added.len(), m.name);
                dirty = true;
                0
            }
            LeaveCmd::List { member } => {
                let members = store.list_members(&owner)?;
                let leave = match member {
                    Some(name) => {
                        let m = store.member_by_name(&owner, &name)?;
                        store.leave_by_member(&owner, &m.id)?
                    }
                    None => store.leave_by_range(&owner, NaiveDate::MIN, NaiveDate::MAX)?,
                };
                for l in leave {
                    println!("{} | {} | {}", l.id, l.date, member_name(&members, &l.member));
                }
                0
            }
            LeaveCmd::Remove { id } => {
                store.remove_leave_day(&owner, &LeaveId::new(id))?;
                dirty = true;
                0
            }
        },
        Commands::Plan {
            start,
            end,
            seed,
            out_json,
        } => {
            let start = io::parse_day(&start)?;
            let end = io::parse_day(&end)?;
            let plan = planner.plan(&owner, start, end, seed)?;
            dirty = true;

            let views = io::shift_views(&store.list_members(&owner)?, &plan.shifts);
            if let Some(path) = out_json {
                io::export_shifts_json(path, &views)?;
            }
            print_shifts(&views);
            if plan.is_complete() {
                0
            } else {
                for day in &plan.unfilled {
                    eprintln!("warning: {day} left unscheduled (every member on leave)");
                }
                // Code 2 = WARNING/INCOMPLETE
                2
            }
        }
        Commands::Shifts {
            start,
            end,
            out_json,
            out_csv,
        } => {
            let today = Utc::now().date_naive();
            let start = match start {
                Some(s) => io::parse_day(&s)?,
                None => today.checked_sub_months(Months::new(1)).context("date overflow")?,
            };
            let end = match end {
                Some(s) => io::parse_day(&s)?,
                None => today.checked_add_months(Months::new(1)).context("date overflow")?,
            };
            let shifts = store.shifts_by_range(&owner, start, end)?;
            let views = io::shift_views(&store.list_members(&owner)?, &shifts);
            if let Some(path) = out_json {
                io::export_shifts_json(path, &views)?;
            }
            if let Some(path) = out_csv {
                io::export_shifts_csv(path, &views)?;
            }
            print_shifts(&views);
            0
        }
        Commands::Assign { date, member } => {
            let m = store.member_by_name(&owner, &member)?;
            let shift = planner.assign_day(&owner, &m.id, io::parse_day(&date)?)?;
            dirty = true;
            println!(
                "{} | {} → {} | {}",
                shift.id, shift.start, shift.end, m.name
            );
            0
        }
        Commands::Clear => {
            let removed = planner.clear(&owner)?;
            dirty = true;
            println!("{removed} shift(s) removed");
            0
        }
        Commands::Stats { out_csv } => {
            let stats = member_stats(store, &owner)?;
            if let Some(path) = out_csv {
                io::export_stats_csv(path, &stats)?;
            }
            for s in &stats {
                println!(
                    "{} | total {} | long shifts {} | normal days {} | long days {}",
                    s.name, s.total_days, s.long_shift_count, s.history.normal_days, s.history.long_days
                );
            }
            0
        }
        Commands::Holidays => {
            for h in planner.calendar().holidays() {
                println!("{} | {}", h.date, h.name);
            }
            0
        }
        Commands::Check { start, end } => {
            let start = io::parse_day(&start)?;
            let end = io::parse_day(&end)?;
            let findings = audit(store, planner.calendar(), &owner, start, end)?;
            if findings.is_empty() {
                println!("OK: no issues");
                0
            } else {
                eprintln!("Found {} issue(s)", findings.len());
                for f in &findings {
                    let kind = match f.kind {
                        FindingKind::Uncovered => "uncovered",
                        FindingKind::DoubleCovered => "double",
                        FindingKind::StartsOnRestDay => "rest-day-start",
                        FindingKind::OnLeave => "on-leave",
                        FindingKind::UnknownMember => "unknown-member",
                    };
                    println!("{} | {}", f.date, kind);
                }
                2
            }
        }
    };

    if dirty {
        storage.save(&planner.store().snapshot())?;
    }

    std::process::exit(code);
}

fn member_name<'a>(members: &'a [Member], id: &MemberId) -> &'a str {
    members
        .iter()
        .find(|m| &m.id == id)
        .map(|m| m.name.as_str())
        .unwrap_or("-")
}

fn print_shifts(views: &[io::ShiftView]) {
    for v in views {
        println!(
            "{} → {} | {} | {}",
            v.shift.start,
            v.shift.end,
            v.member_name,
            if v.shift.is_long_shift { "long" } else { "normal" }
        );
    }
}
