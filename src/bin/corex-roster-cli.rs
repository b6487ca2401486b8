#![forbid(unsafe_code)]
use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use corex_roster::{
    io,
    model::{EmployeeRef, ShiftDraft, ShiftId, ShiftUpdate},
    notification::{check_missing_roster, prepare_reminder, TextReminder},
    status::ClassifiedShift,
    storage::Storage,
    time,
    week::{self, WeekCursor},
    JsonRosterApi, RosterApi, RosterService,
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI planning CoreX : semaines, statuts et shifts d'un roster local
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON du roster
    #[arg(long, global = true, default_value = "roster.json")]
    roster: String,

    /// Date du jour forcée (YYYY-MM-DD)
    #[arg(long, global = true)]
    today: Option<String>,

    /// Instant forcé (YYYY-MM-DDTHH:MM[:SS]) pour le calcul des statuts
    #[arg(long, global = true)]
    now: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Enregistrer un membre du personnel
    Employee {
        #[arg(long)]
        uid: String,
        #[arg(long)]
        name: String,
    },

    /// Planning hebdomadaire d'un employé
    Week {
        #[arg(long)]
        staff: String,
        /// Semaines depuis aujourd'hui (-1 = semaine dernière)
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        offset: i32,
    },

    /// Tous les shifts d'une journée
    Day {
        #[arg(long)]
        date: String,
    },

    /// Shifts à venir d'un employé, regroupés par jour
    Upcoming {
        #[arg(long)]
        staff: String,
        #[arg(long)]
        days: Option<u32>,
    },

    /// Calendrier mensuel d'un employé
    Month {
        #[arg(long)]
        staff: String,
        #[arg(long)]
        month: u32,
        #[arg(long)]
        year: i32,
    },

    /// Créer un shift
    Add {
        #[arg(long)]
        staff: String,
        #[arg(long)]
        date: String,
        /// HH:MM
        #[arg(long)]
        start: String,
        /// HH:MM
        #[arg(long)]
        end: String,
        #[arg(long)]
        note: Option<String>,
    },

    /// Modifier un shift
    Update {
        #[arg(long)]
        id: String,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        #[arg(long)]
        note: Option<String>,
    },

    /// Supprimer un shift
    Delete {
        #[arg(long)]
        id: String,
    },

    /// Importer des shifts depuis un CSV
    Import {
        #[arg(long)]
        csv: String,
    },

    /// Exporter la semaine d'un employé
    Export {
        #[arg(long)]
        staff: String,
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        offset: i32,
        #[arg(long)]
        out_csv: Option<String>,
        #[arg(long)]
        out_json: Option<String>,
    },

    /// Générer un rappel texte pour le prochain shift d'un employé
    Notify {
        #[arg(long)]
        staff: String,
        #[arg(long, default_value_t = 1)]
        days_before: i64,
        /// Fichier de sortie (texte brut)
        #[arg(long)]
        out: String,
    },

    /// Vérifier que demain est planifié
    CheckMissing,
}

fn parse_now(raw: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
        .with_context(|| format!("invalid --now value: {raw}"))
}

fn print_shift(classified: &ClassifiedShift) {
    let shift = &classified.shift;
    println!(
        "{} | {} | {} → {} | {} | {}",
        shift.id.as_str(),
        shift.employee.username,
        time::format_time_12(shift.start_time),
        time::format_time_12(shift.end_time),
        classified.status,
        shift.shift_note.as_deref().unwrap_or("-"),
    );
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let now: NaiveDateTime = match (&cli.now, &cli.today) {
        (Some(raw), _) => parse_now(raw)?,
        (None, Some(raw)) => time::parse_iso_date(raw)?.and_time(Local::now().time()),
        (None, None) => Local::now().naive_local(),
    };
    let today: NaiveDate = match &cli.today {
        Some(raw) => time::parse_iso_date(raw)?,
        None => now.date(),
    };

    let api = JsonRosterApi::open(&cli.roster).with_today(today);
    let mut service = RosterService::new(&api);

    let code = match cli.cmd {
        Commands::Employee { uid, name } => {
            api.register_employee(EmployeeRef::new(uid, name))?;
            0
        }
        Commands::Week { staff, offset } => {
            let reference = WeekCursor::new(offset)
                .reference_date(today)
                .with_context(|| format!("week offset {offset} is out of range"))?;
            service.load_week(&staff, reference, today)?;
            let view = service.week_view(reference, today, now)?;
            print!("{}", io::render_week_text(&view));
            0
        }
        Commands::Day { date } => {
            let date = time::parse_iso_date(&date)?;
            service.fetch_shifts_for_date(date)?;
            println!("{}", time::format_long_date(date));
            let shifts = service.day_shifts().to_vec();
            if shifts.is_empty() {
                println!("no shifts");
            }
            for shift in shifts {
                print_shift(&ClassifiedShift::new(shift, now));
            }
            0
        }
        Commands::Upcoming { staff, days } => {
            let days = days.unwrap_or(service.config().upcoming_days);
            service.fetch_upcoming(&staff, days)?;
            let summaries = service.formatted_upcoming();
            if summaries.is_empty() {
                println!("no upcoming shifts in the next {days} days");
            }
            for summary in summaries {
                println!(
                    "{}: {} shift(s), {}h",
                    summary.formatted_date, summary.total_shifts, summary.total_hours
                );
                for shift in summary.shifts {
                    print_shift(&ClassifiedShift::new(shift, now));
                }
            }
            0
        }
        Commands::Month { staff, month, year } => {
            service.fetch_monthly(&staff, month, year)?;
            let cells = week::month_grid(year, month, today, service.monthly())?;
            let (first, last) = week::month_bounds(year, month)?;
            print!("{}", io::render_month_text(&cells));
            println!(
                "Monthly hours: {}",
                service.monthly().total_hours_between(first, last)
            );
            0
        }
        Commands::Add {
            staff,
            date,
            start,
            end,
            note,
        } => {
            let mut draft = ShiftDraft::new(
                staff,
                time::parse_iso_date(&date)?,
                time::parse_time_of_day(&start)?,
                time::parse_time_of_day(&end)?,
            );
            draft.shift_note = note;
            let created = service.add_shift(&draft)?;
            println!("{} ({})", created.message, created.id.as_str());
            0
        }
        Commands::Update {
            id,
            date,
            start,
            end,
            note,
        } => {
            let update = ShiftUpdate {
                date: date.as_deref().map(time::parse_iso_date).transpose()?,
                start_time: start.as_deref().map(time::parse_time_of_day).transpose()?,
                end_time: end.as_deref().map(time::parse_time_of_day).transpose()?,
                shift_note: note,
            };
            if update.is_empty() {
                bail!("nothing to update");
            }
            service.update_shift(&ShiftId::new(id), &update)?;
            println!("Shift updated successfully");
            0
        }
        Commands::Delete { id } => {
            service.delete_shift(&ShiftId::new(id))?;
            println!("Shift deleted successfully");
            0
        }
        Commands::Import { csv } => {
            let drafts = io::import_shifts_csv(&csv)?;
            let total = drafts.len();
            for draft in &drafts {
                api.create_shift(draft)?;
            }
            println!("Imported {total} shift(s)");
            0
        }
        Commands::Export {
            staff,
            offset,
            out_csv,
            out_json,
        } => {
            let reference = WeekCursor::new(offset)
                .reference_date(today)
                .with_context(|| format!("week offset {offset} is out of range"))?;
            service.load_week(&staff, reference, today)?;
            if let Some(path) = out_csv {
                io::export_week_csv(path, &service.week_view(reference, today, now)?)?;
            }
            if let Some(path) = out_json {
                io::export_index_json(path, &service.combined())?;
            }
            0
        }
        Commands::Notify {
            staff,
            days_before,
            out,
        } => {
            let roster = api.storage().load()?;
            let reminder =
                prepare_reminder(&roster.shifts, &staff, days_before, now, &TextReminder)?;
            std::fs::write(&out, &reminder.content)?;
            println!(
                "Reminder generated for {} (shift {}) at {}",
                reminder.staff_id,
                reminder.shift_id,
                reminder.notice_at.format("%Y-%m-%d %H:%M")
            );
            0
        }
        Commands::CheckMissing => {
            let tomorrow = today.succ_opt().context("no calendar day after --today")?;
            let shifts = api.shifts_by_date(tomorrow)?;
            match check_missing_roster(&shifts, today) {
                None => {
                    println!("OK: shifts exist for tomorrow");
                    0
                }
                Some(alert) => {
                    eprintln!("{}", alert.message);
                    // Code 2 = WARNING
                    2
                }
            }
        }
    };

    std::process::exit(code);
}
