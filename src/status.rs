use crate::model::Shift;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;

/// Classification temporelle d'un shift, utilisée uniquement pour l'affichage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ShiftStatus {
    Completed,
    InProgress,
    Today,
    Upcoming,
}

impl ShiftStatus {
    pub fn label(self) -> &'static str {
        match self {
            ShiftStatus::Completed => "Completed",
            ShiftStatus::InProgress => "In Progress",
            ShiftStatus::Today => "Today",
            ShiftStatus::Upcoming => "Scheduled",
        }
    }

    pub fn style(self) -> ShiftStyle {
        let (bg_color, text_color, border_color) = match self {
            ShiftStatus::Completed => ("bg-gray-100", "text-gray-600", "border-gray-200"),
            ShiftStatus::InProgress => ("bg-green-100", "text-green-800", "border-green-200"),
            ShiftStatus::Today => ("bg-yellow-100", "text-yellow-800", "border-yellow-200"),
            ShiftStatus::Upcoming => ("bg-blue-100", "text-blue-800", "border-blue-200"),
        };
        ShiftStyle {
            status: self,
            bg_color,
            text_color,
            border_color,
        }
    }
}

impl fmt::Display for ShiftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShiftStyle {
    pub status: ShiftStatus,
    pub bg_color: &'static str,
    pub text_color: &'static str,
    pub border_color: &'static str,
}

/// Premier cas qui s'applique :
/// terminé, en cours (bornes incluses), aujourd'hui pas encore commencé, sinon à venir.
pub fn classify(shift: &Shift, now: NaiveDateTime) -> ShiftStatus {
    let (start, end) = shift.window();
    if now > end {
        ShiftStatus::Completed
    } else if start <= now {
        ShiftStatus::InProgress
    } else if now.date() == shift.date {
        ShiftStatus::Today
    } else {
        ShiftStatus::Upcoming
    }
}

pub fn shift_style(shift: &Shift, now: NaiveDateTime) -> ShiftStyle {
    classify(shift, now).style()
}

/// Shift accompagné de son statut au moment du rendu.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedShift {
    pub shift: Shift,
    pub status: ShiftStatus,
}

impl ClassifiedShift {
    pub fn new(shift: Shift, now: NaiveDateTime) -> Self {
        let status = classify(&shift, now);
        Self { shift, status }
    }
}
