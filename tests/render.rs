#![forbid(unsafe_code)]
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use corex_roster::io::{export_week_csv, render_month_text, render_week_text};
use corex_roster::service::day_view;
use corex_roster::{
    generate_week_dates, month_grid, EmployeeRef, Shift, ShiftsByDate, WeekCursor, WeekView,
};
use tempfile::tempdir;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn shift(date: NaiveDate, start: (u32, u32), end: (u32, u32)) -> Shift {
    Shift::new(
        EmployeeRef::new("u-alice", "Alice"),
        date,
        NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
        NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
    )
}

fn sample_week() -> WeekView {
    let today = d(2025, 1, 6);
    let now = NaiveDateTime::new(today, NaiveTime::from_hms_opt(12, 0, 0).unwrap());
    let index = ShiftsByDate::from_shifts(vec![
        shift(d(2025, 1, 6), (9, 0), (17, 0)),
        shift(d(2025, 1, 8), (22, 0), (6, 0)),
        shift(d(2025, 1, 10), (13, 30), (18, 0)),
    ]);
    WeekView {
        cursor: WeekCursor::today(),
        days: generate_week_dates(today, today)
            .unwrap()
            .into_iter()
            .map(|day| day_view(&index, day, now))
            .collect(),
    }
}

#[test]
fn week_text_lists_each_day() {
    let text = render_week_text(&sample_week());
    insta::assert_snapshot!(text.trim_end(), @r"
    This Week (6 Jan - 12 Jan) 20.5h
    Monday 6 Jan * [8h]
      09:00-17:00 Alice (In Progress)
    Tuesday 7 Jan -
    Wednesday 8 Jan [8h]
      22:00-06:00 Alice (Scheduled)
    Thursday 9 Jan -
    Friday 10 Jan [4.5h]
      13:30-18:00 Alice (Scheduled)
    Saturday 11 Jan -
    Sunday 12 Jan -
    ");
}

#[test]
fn month_text_marks_shift_counts() {
    let index = ShiftsByDate::from_shifts(vec![
        shift(d(2025, 2, 3), (9, 0), (17, 0)),
        shift(d(2025, 2, 3), (18, 0), (22, 0)),
    ]);
    let cells = month_grid(2025, 2, d(2025, 2, 14), &index).unwrap();
    let text = render_month_text(&cells);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], "Sun  Mon  Tue  Wed  Thu  Fri  Sat");
    assert_eq!(lines[1], ".    .    .    .    .    .    1");
    assert_eq!(lines[2], "2    3[2] 4    5    6    7    8");
    assert_eq!(lines[5], "23   24   25   26   27   28   .");
}

#[test]
fn week_csv_has_one_row_per_shift() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("week.csv");
    export_week_csv(&path, &sample_week()).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let rows: Vec<&str> = content.lines().collect();
    assert_eq!(rows[0], "date,day,employee,start,end,hours,status");
    assert_eq!(rows[1], "2025-01-06,Monday,Alice,09:00,17:00,8,In Progress");
    assert_eq!(rows[3], "2025-01-10,Friday,Alice,13:30,18:00,4.5,Scheduled");
    assert_eq!(rows.len(), 4);
}
