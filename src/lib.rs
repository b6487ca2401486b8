#![forbid(unsafe_code)]
//! CoreX Roster : calcul des semaines, index des shifts par date et classification d'état.
//!
//! - Fenêtre lundi → dimanche autour d'une date de référence.
//! - Regroupement par date ISO et fusion de deux sources (à venir / mensuel).
//! - Statut d'affichage (terminé, en cours, aujourd'hui, à venir).
//! - Heures locales naïves partout ; l'horloge est fournie par l'appelant.

/// Journalisation conditionnelle (feature `logging`).
macro_rules! log_event {
    ($level:ident, $($arg:tt)+) => {
        #[cfg(feature = "logging")]
        ::tracing::$level!($($arg)+);
    };
}

pub mod api;
pub mod index;
pub mod io;
pub mod model;
pub mod notification;
pub mod service;
pub mod status;
pub mod storage;
pub mod time;
pub mod week;

pub use api::{ApiError, JsonRosterApi, RosterApi};
pub use index::{build_shifts_by_date, merge_shift_sources, DaySummary, ShiftsByDate};
pub use model::{EmployeeRef, Roster, Shift, ShiftDraft, ShiftError, ShiftId, ShiftUpdate};
pub use notification::{
    check_missing_roster, prepare_reminder, MissingRosterAlert, Reminder, ReminderRenderer,
    TextReminder,
};
pub use service::{Applied, DayView, RosterService, ServiceConfig, WeekView};
pub use status::{classify, shift_style, ClassifiedShift, ShiftStatus, ShiftStyle};
pub use storage::{JsonStorage, Storage};
pub use week::{
    generate_week_dates, month_grid, week_start, CalendarCell, WeekCursor, WeekDay, WeekLabel,
};
