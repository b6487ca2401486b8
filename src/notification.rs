use crate::model::Shift;
use crate::time;
use anyhow::{bail, Context, Result};
use chrono::{Days, NaiveDate, NaiveDateTime};

/// Rappel généré pour un membre du personnel.
#[derive(Debug, Clone)]
pub struct Reminder {
    pub staff_id: String,
    pub username: String,
    pub shift_id: String,
    pub notice_at: NaiveDateTime,
    pub content: String,
}

/// Permet de customiser le rendu du message (texte, mail, push...).
pub trait ReminderRenderer {
    fn render(&self, shift: &Shift, notice_at: NaiveDateTime) -> String;
}

/// Gabarit texte simple.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextReminder;

impl ReminderRenderer for TextReminder {
    fn render(&self, shift: &Shift, notice_at: NaiveDateTime) -> String {
        let name = if shift.employee.username.is_empty() {
            shift.employee.uid.as_str()
        } else {
            shift.employee.username.as_str()
        };
        let mut out = format!(
            "Hi {name},\n\nYou are rostered on {date} from {start} to {end} ({hours}h).\n",
            date = time::format_long_date(shift.date),
            start = time::format_time_12(shift.start_time),
            end = time::format_time_12(shift.end_time),
            hours = time::round_tenth(shift.duration_hours()),
        );
        if let Some(note) = &shift.shift_note {
            out.push_str(&format!("Note: {note}\n"));
        }
        out.push_str(&format!(
            "\nThis reminder was generated for {}.\n",
            notice_at.format("%Y-%m-%d %H:%M")
        ));
        out
    }
}

/// Prépare un rappel pour le prochain shift (début >= `now`) d'un employé.
pub fn prepare_reminder<'a, I>(
    shifts: I,
    staff_id: &str,
    days_before: i64,
    now: NaiveDateTime,
    renderer: &dyn ReminderRenderer,
) -> Result<Reminder>
where
    I: IntoIterator<Item = &'a Shift>,
{
    if days_before < 0 {
        bail!("days_before must be positive");
    }

    let Some(shift) = shifts
        .into_iter()
        .filter(|s| s.employee_uid() == staff_id && s.window().0 >= now)
        .min_by_key(|s| s.window().0)
    else {
        bail!("no upcoming shift found for staff member {staff_id}");
    };

    let notice_at = u64::try_from(days_before)
        .ok()
        .and_then(|days| shift.window().0.checked_sub_days(Days::new(days)))
        .with_context(|| format!("days_before {days_before} is out of range"))?;
    let content = renderer.render(shift, notice_at);
    Ok(Reminder {
        staff_id: staff_id.to_string(),
        username: shift.employee.username.clone(),
        shift_id: shift.id.as_str().to_string(),
        notice_at,
        content,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    Admin,
    Manager,
}

/// Alerte « aucun shift planifié demain ».
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingRosterAlert {
    pub date: NaiveDate,
    pub audience: Vec<Audience>,
    pub message: String,
}

pub fn check_missing_roster<'a, I>(shifts: I, today: NaiveDate) -> Option<MissingRosterAlert>
where
    I: IntoIterator<Item = &'a Shift>,
{
    let tomorrow = today.succ_opt()?;
    if shifts.into_iter().any(|s| s.date == tomorrow) {
        return None;
    }
    Some(MissingRosterAlert {
        date: tomorrow,
        audience: vec![Audience::Admin, Audience::Manager],
        message: format!("No shifts are rostered for {}", time::format_long_date(tomorrow)),
    })
}
