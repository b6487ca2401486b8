//! Contrat du backend roster (REST) et implémentation locale sur fichier.

mod file;
mod types;
pub mod wire;

pub use file::JsonRosterApi;
pub use types::ApiError;
pub use wire::{
    MonthlyShiftsResponse, ShiftCreated, ShiftDeleted, ShiftUpdated, UpcomingShiftsResponse,
};

use crate::model::{Shift, ShiftDraft, ShiftId, ShiftUpdate};
use chrono::NaiveDate;

/// Opérations roster exposées par le backend.
///
/// - `GET /rosters/by-date?date=YYYY-MM-DD`
/// - `GET /rosters/upcoming/:staffId?days=N`
/// - `GET /rosters/by-month/:staffId?month=M&year=Y`
/// - `POST /rosters`, `PUT /rosters/:id`, `DELETE /rosters/:id`
///   (réservés aux managers côté serveur)
pub trait RosterApi {
    fn shifts_by_date(&self, date: NaiveDate) -> Result<Vec<Shift>, ApiError>;

    fn upcoming_shifts(&self, staff_id: &str, days: u32)
        -> Result<UpcomingShiftsResponse, ApiError>;

    fn monthly_shifts(
        &self,
        staff_id: &str,
        month: u32,
        year: i32,
    ) -> Result<MonthlyShiftsResponse, ApiError>;

    fn create_shift(&self, draft: &ShiftDraft) -> Result<ShiftCreated, ApiError>;

    fn update_shift(&self, id: &ShiftId, update: &ShiftUpdate) -> Result<ShiftUpdated, ApiError>;

    fn delete_shift(&self, id: &ShiftId) -> Result<ShiftDeleted, ApiError>;
}

impl<A: RosterApi + ?Sized> RosterApi for &A {
    fn shifts_by_date(&self, date: NaiveDate) -> Result<Vec<Shift>, ApiError> {
        (**self).shifts_by_date(date)
    }
    fn upcoming_shifts(
        &self,
        staff_id: &str,
        days: u32,
    ) -> Result<UpcomingShiftsResponse, ApiError> {
        (**self).upcoming_shifts(staff_id, days)
    }
    fn monthly_shifts(
        &self,
        staff_id: &str,
        month: u32,
        year: i32,
    ) -> Result<MonthlyShiftsResponse, ApiError> {
        (**self).monthly_shifts(staff_id, month, year)
    }
    fn create_shift(&self, draft: &ShiftDraft) -> Result<ShiftCreated, ApiError> {
        (**self).create_shift(draft)
    }
    fn update_shift(&self, id: &ShiftId, update: &ShiftUpdate) -> Result<ShiftUpdated, ApiError> {
        (**self).update_shift(id, update)
    }
    fn delete_shift(&self, id: &ShiftId) -> Result<ShiftDeleted, ApiError> {
        (**self).delete_shift(id)
    }
}
