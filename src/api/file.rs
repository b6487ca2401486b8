use super::{
    ApiError, MonthlyShiftsResponse, RosterApi, ShiftCreated, ShiftDeleted, ShiftUpdated,
    UpcomingShiftsResponse,
};
use crate::model::{EmployeeRef, Shift, ShiftDraft, ShiftId, ShiftUpdate};
use crate::storage::{JsonStorage, Storage};
use crate::week;
use chrono::{Days, Local, NaiveDate};
use std::path::Path;

/// Backend roster local : mêmes règles que l'API REST, données dans un fichier JSON.
#[derive(Debug, Clone)]
pub struct JsonRosterApi {
    storage: JsonStorage,
    today: Option<NaiveDate>,
}

impl JsonRosterApi {
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self {
            storage: JsonStorage::open(path),
            today: None,
        }
    }

    /// Fige la date du jour (sinon horloge locale).
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn storage(&self) -> &JsonStorage {
        &self.storage
    }

    /// Enregistre (ou renomme) un membre du personnel.
    pub fn register_employee(&self, employee: EmployeeRef) -> Result<(), ApiError> {
        if employee.uid.trim().is_empty() {
            return Err(ApiError::BadRequest("employee uid is required".to_string()));
        }
        let mut roster = self.storage.load()?;
        roster.upsert_employee(employee);
        self.storage.save(&roster)?;
        Ok(())
    }

    /// Tous les shifts d'un employé entre deux dates incluses, triés par date.
    fn staff_shifts_between(
        &self,
        staff_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Shift>, ApiError> {
        if staff_id.trim().is_empty() {
            return Err(ApiError::BadRequest("Staff ID is required".to_string()));
        }
        let roster = self.storage.load()?;
        let mut shifts: Vec<Shift> = roster
            .shifts
            .into_iter()
            .filter(|s| s.employee_uid() == staff_id && s.date >= from && s.date <= to)
            .collect();
        shifts.sort_by_key(|s| s.date);
        Ok(shifts)
    }
}

impl RosterApi for JsonRosterApi {
    fn shifts_by_date(&self, date: NaiveDate) -> Result<Vec<Shift>, ApiError> {
        let roster = self.storage.load()?;
        Ok(roster.shifts.into_iter().filter(|s| s.date == date).collect())
    }

    fn upcoming_shifts(
        &self,
        staff_id: &str,
        days: u32,
    ) -> Result<UpcomingShiftsResponse, ApiError> {
        let from = self.today();
        let to = from
            .checked_add_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MAX);
        let shifts = self.staff_shifts_between(staff_id, from, to)?;
        Ok(UpcomingShiftsResponse::from_shifts(shifts, from, to))
    }

    fn monthly_shifts(
        &self,
        staff_id: &str,
        month: u32,
        year: i32,
    ) -> Result<MonthlyShiftsResponse, ApiError> {
        let (first, last) = week::month_bounds(year, month)?;
        let shifts = self.staff_shifts_between(staff_id, first, last)?;
        Ok(MonthlyShiftsResponse { shifts })
    }

    fn create_shift(&self, draft: &ShiftDraft) -> Result<ShiftCreated, ApiError> {
        draft.validate()?;
        let mut roster = self.storage.load()?;
        let employee = roster
            .find_employee(&draft.employee.uid)
            .cloned()
            .ok_or_else(|| ApiError::NotFound("Employee not found with given UID".to_string()))?;

        let id = ShiftId::random();
        let shift = draft.clone().into_shift(id.clone(), employee);
        let data = ShiftDraft::from(&shift);
        roster.shifts.push(shift);
        self.storage.save(&roster)?;

        Ok(ShiftCreated {
            message: "Shift added successfully".to_string(),
            id,
            data,
        })
    }

    fn update_shift(&self, id: &ShiftId, update: &ShiftUpdate) -> Result<ShiftUpdated, ApiError> {
        let mut roster = self.storage.load()?;
        let shift = roster
            .find_shift_mut(id)
            .ok_or_else(|| ApiError::NotFound("Shift not found".to_string()))?;
        update.apply(shift)?;
        let updated_data = ShiftDraft::from(&*shift);
        self.storage.save(&roster)?;

        Ok(ShiftUpdated {
            message: "Shift updated successfully".to_string(),
            updated_data,
        })
    }

    fn delete_shift(&self, id: &ShiftId) -> Result<ShiftDeleted, ApiError> {
        let mut roster = self.storage.load()?;
        let pos = roster
            .shifts
            .iter()
            .position(|s| &s.id == id)
            .ok_or_else(|| ApiError::NotFound("Shift not found".to_string()))?;
        roster.shifts.remove(pos);
        self.storage.save(&roster)?;

        Ok(ShiftDeleted {
            message: "Shift deleted successfully".to_string(),
        })
    }
}
