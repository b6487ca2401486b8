use crate::index::ShiftsByDate;
use crate::model::{Shift, ShiftDraft};
use crate::service::WeekView;
use crate::time;
use crate::week::CalendarCell;
use anyhow::{bail, Context};
use chrono::Datelike;
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::Path;

/// Import de shifts : header `employee_uid,date,start_time,end_time[,note]`
pub fn import_shifts_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<ShiftDraft>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for (line, rec) in rdr.records().enumerate() {
        let rec = rec?;
        let row = line + 2;
        let uid = rec.get(0).context("missing employee_uid")?.trim();
        if uid.is_empty() {
            bail!("row {row}: empty employee_uid");
        }
        let date = time::parse_iso_date(rec.get(1).context("missing date")?)
            .with_context(|| format!("row {row}: date"))?;
        let start = time::parse_time_of_day(rec.get(2).context("missing start_time")?)
            .with_context(|| format!("row {row}: start_time"))?;
        let end = time::parse_time_of_day(rec.get(3).context("missing end_time")?)
            .with_context(|| format!("row {row}: end_time"))?;

        let mut draft = ShiftDraft::new(uid, date, start, end);
        draft.shift_note = rec
            .get(4)
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        draft
            .validate()
            .with_context(|| format!("row {row}: invalid shift"))?;
        out.push(draft);
    }
    Ok(out)
}

/// Export CSV d'une semaine : header `date,day,employee,start,end,hours,status`
pub fn export_week_csv<P: AsRef<Path>>(path: P, week: &WeekView) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["date", "day", "employee", "start", "end", "hours", "status"])?;
    for day in &week.days {
        let date = day.day.iso_date();
        for classified in &day.shifts {
            let shift = &classified.shift;
            let hours = time::round_tenth(shift.duration_hours()).to_string();
            w.write_record([
                date.as_str(),
                day.day.day_name(),
                shift.employee.username.as_str(),
                time::format_time_24(shift.start_time).as_str(),
                time::format_time_24(shift.end_time).as_str(),
                hours.as_str(),
                classified.status.label(),
            ])?;
        }
    }
    w.flush()?;
    Ok(())
}

/// Export JSON de l'index par date (jolie mise en forme)
pub fn export_index_json<P: AsRef<Path>>(path: P, index: &ShiftsByDate) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(index)?;
    fs::write(path, s)?;
    Ok(())
}

/// Rendu texte d'une semaine (une ligne par shift, `-` pour un jour vide).
pub fn render_week_text(week: &WeekView) -> String {
    let mut out = String::new();
    if let (Some(first), Some(last)) = (week.days.first(), week.days.last()) {
        out.push_str(&format!(
            "{label} ({} {} - {} {}) {hours}h\n",
            first.day.date,
            first.day.month,
            last.day.date,
            last.day.month,
            label = week.label(),
            hours = week.total_hours(),
        ));
    }
    for day in &week.days {
        let marker = if day.day.is_today { " *" } else { "" };
        if day.has_shifts() {
            out.push_str(&format!(
                "{} {} {}{marker} [{}h]\n",
                day.day.day_name(),
                day.day.date,
                day.day.month,
                day.total_hours
            ));
        } else {
            out.push_str(&format!(
                "{} {} {}{marker} -\n",
                day.day.day_name(),
                day.day.date,
                day.day.month
            ));
        }
        for classified in &day.shifts {
            let shift = &classified.shift;
            out.push_str(&format!(
                "  {}-{} {} ({})\n",
                time::format_time_24(shift.start_time),
                time::format_time_24(shift.end_time),
                display_name(shift),
                classified.status
            ));
        }
    }
    out
}

/// Rendu texte d'une grille mensuelle (semaines commençant le dimanche).
/// `[n]` : nombre de shifts du jour ; `.` : jour hors mois.
pub fn render_month_text(cells: &[CalendarCell]) -> String {
    let mut out = String::from("Sun  Mon  Tue  Wed  Thu  Fri  Sat\n");
    for week in cells.chunks(7) {
        let row: Vec<String> = week
            .iter()
            .map(|cell| {
                if !cell.is_current_month {
                    return format!("{:<4}", ".");
                }
                let day = cell.date.day();
                if cell.shifts.is_empty() {
                    format!("{day:<4}")
                } else {
                    format!("{:<4}", format!("{day}[{}]", cell.shifts.len()))
                }
            })
            .collect();
        out.push_str(row.join(" ").trim_end());
        out.push('\n');
    }
    out
}

fn display_name(shift: &Shift) -> &str {
    if shift.employee.username.is_empty() {
        &shift.employee.uid
    } else {
        &shift.employee.username
    }
}
