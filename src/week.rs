use crate::index::ShiftsByDate;
use crate::model::Shift;
use crate::time::{self, TimeError};
use chrono::{Datelike, NaiveDate, Weekday};
use std::fmt;

/// Descripteur d'un jour de la semaine affichée (valeur immuable, recalculée à chaque fois).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekDay {
    pub weekday: Weekday,
    /// Jour du mois.
    pub date: u32,
    pub month: &'static str,
    pub full_date: NaiveDate,
    pub is_today: bool,
}

impl WeekDay {
    pub fn day_name(&self) -> &'static str {
        day_name(self.weekday)
    }
    pub fn iso_date(&self) -> String {
        time::iso_date(self.full_date)
    }
}

pub fn day_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Lundi de la semaine contenant `reference` (le dimanche compte comme 7e jour).
pub fn week_start(reference: NaiveDate) -> Result<NaiveDate, TimeError> {
    time::add_days(reference, -i64::from(reference.weekday().num_days_from_monday()))
}

/// Dimanche de la semaine commençant à `monday`.
pub fn week_end(monday: NaiveDate) -> Result<NaiveDate, TimeError> {
    time::add_days(monday, 6)
}

/// Les sept jours, du lundi au dimanche, de la semaine contenant `reference`.
/// Une semaine qui déborde de la plage de `NaiveDate` est une erreur.
pub fn generate_week_dates(
    reference: NaiveDate,
    today: NaiveDate,
) -> Result<[WeekDay; 7], TimeError> {
    let monday = week_start(reference)?;
    let days: Vec<WeekDay> = monday
        .iter_days()
        .take(7)
        .map(|full_date| WeekDay {
            weekday: full_date.weekday(),
            date: full_date.day(),
            month: time::month_short(full_date),
            full_date,
            is_today: full_date == today,
        })
        .collect();
    <[WeekDay; 7]>::try_from(days).map_err(|_| TimeError::OutOfRange(format!("week of {monday}")))
}

/// Libellé dérivé d'un décalage absolu en semaines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekLabel {
    LastWeek,
    ThisWeek,
    NextWeek,
    WeeksAgo(u32),
    WeeksAhead(u32),
}

impl WeekLabel {
    fn offset(self) -> i32 {
        match self {
            WeekLabel::LastWeek => -1,
            WeekLabel::ThisWeek => 0,
            WeekLabel::NextWeek => 1,
            WeekLabel::WeeksAgo(n) => i32::try_from(n).map_or(i32::MIN, |n| -n),
            WeekLabel::WeeksAhead(n) => i32::try_from(n).unwrap_or(i32::MAX),
        }
    }
}

impl fmt::Display for WeekLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeekLabel::LastWeek => f.write_str("Last Week"),
            WeekLabel::ThisWeek => f.write_str("This Week"),
            WeekLabel::NextWeek => f.write_str("Next Week"),
            WeekLabel::WeeksAgo(n) => write!(f, "{n} weeks ago"),
            WeekLabel::WeeksAhead(n) => write!(f, "In {n} weeks"),
        }
    }
}

/// Position de navigation : nombre de semaines depuis aujourd'hui.
/// Le libellé est toujours dérivé de l'offset, jamais stocké à part.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeekCursor {
    pub offset: i32,
}

impl WeekCursor {
    pub fn new(offset: i32) -> Self {
        Self { offset }
    }

    /// Curseur correspondant à la semaine de `reference`.
    pub fn containing(reference: NaiveDate, today: NaiveDate) -> Result<Self, TimeError> {
        let days = (week_start(reference)? - week_start(today)?).num_days();
        let offset = i32::try_from(days / 7)
            .map_err(|_| TimeError::OutOfRange(format!("{days} days from {today}")))?;
        Ok(Self { offset })
    }

    pub fn prev(self) -> Self {
        Self {
            offset: self.offset.saturating_sub(1),
        }
    }
    pub fn next(self) -> Self {
        Self {
            offset: self.offset.saturating_add(1),
        }
    }
    pub fn today() -> Self {
        Self::default()
    }
    pub fn jump(label: WeekLabel) -> Self {
        Self {
            offset: label.offset(),
        }
    }

    pub fn label(self) -> WeekLabel {
        match self.offset {
            -1 => WeekLabel::LastWeek,
            0 => WeekLabel::ThisWeek,
            1 => WeekLabel::NextWeek,
            n if n < 0 => WeekLabel::WeeksAgo(n.unsigned_abs()),
            n => WeekLabel::WeeksAhead(n as u32),
        }
    }

    /// Date de référence de la semaine visée ; erreur si l'offset sort du calendrier.
    pub fn reference_date(self, today: NaiveDate) -> Result<NaiveDate, TimeError> {
        time::add_days(today, i64::from(self.offset) * 7)
    }

    pub fn week(self, today: NaiveDate) -> Result<[WeekDay; 7], TimeError> {
        generate_week_dates(self.reference_date(today)?, today)
    }
}

/// Mois (année, mois 1-12) couverts par la semaine commençant à `monday` : un ou deux.
pub fn months_spanned(monday: NaiveDate) -> Result<Vec<(i32, u32)>, TimeError> {
    let sunday = week_end(monday)?;
    let first = (monday.year(), monday.month());
    let last = (sunday.year(), sunday.month());
    Ok(if first == last {
        vec![first]
    } else {
        vec![first, last]
    })
}

/// Premier et dernier jour d'un mois calendaire.
pub fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate), TimeError> {
    let invalid = || TimeError::InvalidDate(format!("{year}-{month:02}"));
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(invalid)?;
    Ok((first, time::add_days(next_first, -1)?))
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub is_current_month: bool,
    pub is_today: bool,
    pub shifts: Vec<Shift>,
}

/// Grille mensuelle commençant le dimanche, complétée jusqu'au samedi suivant la fin du mois.
pub fn month_grid(
    year: i32,
    month: u32,
    today: NaiveDate,
    index: &ShiftsByDate,
) -> Result<Vec<CalendarCell>, TimeError> {
    let (first, last) = month_bounds(year, month)?;
    let start = time::add_days(first, -i64::from(first.weekday().num_days_from_sunday()))?;
    let end = time::add_days(last, 6 - i64::from(last.weekday().num_days_from_sunday()))?;

    Ok(start
        .iter_days()
        .take_while(|d| *d <= end)
        .map(|date| CalendarCell {
            date,
            is_current_month: date.month() == month && date.year() == year,
            is_today: date == today,
            shifts: index.shifts_on(date).to_vec(),
        })
        .collect())
}
