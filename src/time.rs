use chrono::{Datelike, Days, NaiveDate, NaiveTime, Timelike};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeError {
    #[error("invalid time of day (expected HH:MM or HH:MM:SS): {0:?}")]
    InvalidTime(String),
    #[error("invalid date (expected YYYY-MM-DD): {0:?}")]
    InvalidDate(String),
    #[error("date out of range: {0}")]
    OutOfRange(String),
}

const MONTHS_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Heure locale `HH:MM` ou `HH:MM:SS` (24h).
pub fn parse_time_of_day(raw: &str) -> Result<NaiveTime, TimeError> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map_err(|_| TimeError::InvalidTime(raw.to_string()))
}

/// Date ISO. Un timestamp complet (`2025-01-06T10:00:00Z`) est tronqué à sa partie date.
pub fn parse_iso_date(raw: &str) -> Result<NaiveDate, TimeError> {
    let raw = raw.trim();
    let date_part = raw.split_once('T').map_or(raw, |(d, _)| d);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|_| TimeError::InvalidDate(raw.to_string()))
}

/// Décalage calendaire vérifié : hors de la plage de `NaiveDate`, erreur plutôt que panique.
pub fn add_days(d: NaiveDate, days: i64) -> Result<NaiveDate, TimeError> {
    let step = Days::new(days.unsigned_abs());
    let shifted = if days >= 0 { d.checked_add_days(step) } else { d.checked_sub_days(step) };
    shifted.ok_or_else(|| TimeError::OutOfRange(format!("{d} {days:+} days")))
}

pub fn format_time_24(t: NaiveTime) -> String {
    t.format("%H:%M").to_string()
}

/// Forme longue utilisée côté stockage : les secondes ne sont écrites que si non nulles.
pub fn format_time_wire(t: NaiveTime) -> String {
    if t.second() == 0 {
        format_time_24(t)
    } else {
        t.format("%H:%M:%S").to_string()
    }
}

/// Affichage 12h sans zéro de tête (`9:00 AM`, `12:30 PM`).
pub fn format_time_12(t: NaiveTime) -> String {
    let (pm, hour) = t.hour12();
    format!(
        "{hour}:{minute:02} {suffix}",
        minute = t.minute(),
        suffix = if pm { "PM" } else { "AM" }
    )
}

/// `Monday, January 6, 2025`
pub fn format_long_date(d: NaiveDate) -> String {
    d.format("%A, %B %-d, %Y").to_string()
}

pub fn month_short(d: NaiveDate) -> &'static str {
    MONTHS_SHORT[d.month0() as usize]
}

pub fn iso_date(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

/// Durée en heures entre deux heures locales d'un même créneau.
/// Un créneau dont la fin n'est pas après le début se termine le lendemain.
pub fn hours_between(start: NaiveTime, end: NaiveTime) -> f64 {
    let mut secs = (end - start).num_seconds();
    if secs <= 0 {
        secs += 24 * 60 * 60;
    }
    secs as f64 / 3600.0
}

/// Arrondi au dixième (affichage des totaux d'heures).
pub fn round_tenth(hours: f64) -> f64 {
    (hours * 10.0).round() / 10.0
}
