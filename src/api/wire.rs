//! Schémas de réponse du backend. Une réponse dont la forme ne correspond pas
//! échoue au décodage au lieu d'être devinée.

use super::ApiError;
use crate::index::ShiftsByDate;
use crate::model::{Shift, ShiftDraft, ShiftId};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// `GET /rosters/upcoming/:staffId?days=N`
///
/// Sans résultat, le backend omet `shiftsByDate` et les totaux mais renvoie
/// la fenêtre interrogée (`date`, `endDate`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingShiftsResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub total_shifts: usize,
    #[serde(default)]
    pub upcoming_days: usize,
    #[serde(default)]
    pub shifts_by_date: ShiftsByDate,
    #[serde(default)]
    pub shifts: Vec<Shift>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl UpcomingShiftsResponse {
    /// Construit la réponse telle que le backend la produit pour `shifts` (triés par date).
    pub fn from_shifts(shifts: Vec<Shift>, from: NaiveDate, to: NaiveDate) -> Self {
        if shifts.is_empty() {
            return Self {
                message: "No upcoming shifts found for this staff member".to_string(),
                date: Some(from),
                end_date: Some(to),
                ..Self::default()
            };
        }
        let shifts_by_date = ShiftsByDate::from_shifts(shifts.iter().cloned());
        Self {
            message: "Upcoming shifts retrieved successfully".to_string(),
            total_shifts: shifts.len(),
            upcoming_days: shifts_by_date.len(),
            shifts_by_date,
            shifts,
            date: None,
            end_date: None,
        }
    }

    /// Vérifie la cohérence interne : l'index doit être exactement le regroupement de `shifts`.
    pub fn validate(&self) -> Result<(), ApiError> {
        let rebuilt = ShiftsByDate::from_shifts(self.shifts.iter().cloned());
        if rebuilt != self.shifts_by_date {
            return Err(ApiError::Schema(
                "shiftsByDate disagrees with shifts".to_string(),
            ));
        }
        if self.total_shifts != 0 && self.total_shifts != self.shifts.len() {
            return Err(ApiError::Schema(format!(
                "totalShifts is {} but {} shifts were sent",
                self.total_shifts,
                self.shifts.len()
            )));
        }
        if self.upcoming_days != 0 && self.upcoming_days != self.shifts_by_date.len() {
            return Err(ApiError::Schema(format!(
                "upcomingDays is {} but shiftsByDate has {} dates",
                self.upcoming_days,
                self.shifts_by_date.len()
            )));
        }
        Ok(())
    }
}

/// `GET /rosters/by-month/:staffId?month=M&year=Y`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyShiftsResponse {
    pub shifts: Vec<Shift>,
}

/// `POST /rosters` : `data` ne porte pas l'identifiant, il est à côté.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftCreated {
    pub message: String,
    pub id: ShiftId,
    pub data: ShiftDraft,
}

impl ShiftCreated {
    pub fn shift(&self) -> Shift {
        self.data
            .clone()
            .into_shift(self.id.clone(), self.data.employee.clone())
    }
}

/// `PUT /rosters/:id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftUpdated {
    pub message: String,
    pub updated_data: ShiftDraft,
}

/// `DELETE /rosters/:id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftDeleted {
    pub message: String,
}

/// Corps d'erreur `{ error, details? }`.
#[derive(Debug, Clone, Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    details: Vec<String>,
}

fn decode<T: DeserializeOwned>(body: &[u8], what: &str) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|err| ApiError::Schema(format!("{what}: {err}")))
}

pub fn parse_shift_list(body: &[u8]) -> Result<Vec<Shift>, ApiError> {
    decode(body, "shift list")
}

pub fn parse_upcoming(body: &[u8]) -> Result<UpcomingShiftsResponse, ApiError> {
    let resp: UpcomingShiftsResponse = decode(body, "upcoming shifts")?;
    resp.validate()?;
    Ok(resp)
}

pub fn parse_monthly(body: &[u8]) -> Result<MonthlyShiftsResponse, ApiError> {
    decode(body, "monthly shifts")
}

pub fn parse_created(body: &[u8]) -> Result<ShiftCreated, ApiError> {
    decode(body, "created shift")
}

pub fn parse_updated(body: &[u8]) -> Result<ShiftUpdated, ApiError> {
    decode(body, "updated shift")
}

pub fn parse_deleted(body: &[u8]) -> Result<ShiftDeleted, ApiError> {
    decode(body, "deleted shift")
}

/// Convertit une réponse non-2xx en erreur typée.
pub fn error_from_status(status: u16, body: &[u8]) -> ApiError {
    let parsed: Option<ErrorBody> = serde_json::from_slice(body).ok();
    let message = parsed.as_ref().map_or_else(
        || String::from_utf8_lossy(body).trim().to_string(),
        |b| b.error.clone(),
    );
    match (status, parsed) {
        (400, Some(body)) if !body.details.is_empty() => ApiError::Validation(body.details),
        (400, _) => ApiError::BadRequest(message),
        (404, _) => ApiError::NotFound(message),
        _ => ApiError::Transport(anyhow::anyhow!("HTTP {status}: {message}")),
    }
}
