//! Service roster : état partagé des vues planning, construit une fois et injecté.

use crate::api::{
    ApiError, MonthlyShiftsResponse, RosterApi, ShiftCreated, UpcomingShiftsResponse,
};
use crate::index::{merge_shift_sources, DaySummary, ShiftsByDate};
use crate::model::{Shift, ShiftDraft, ShiftId, ShiftUpdate};
use crate::status::ClassifiedShift;
use crate::time::{self, TimeError};
use crate::week::{self, WeekCursor, WeekDay, WeekLabel};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::{HashMap, HashSet};

/// Fenêtres de recherche des shifts à venir (en jours).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Vue personnelle au chargement.
    pub upcoming_days: u32,
    /// Navigation de semaine et rafraîchissement.
    pub extended_days: u32,
    /// Vue manager d'un employé.
    pub manager_days: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            upcoming_days: 30,
            extended_days: 45,
            manager_days: 14,
        }
    }
}

/// Requête distante rejouable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Upcoming { staff_id: String, days: u32 },
    Monthly { staff_id: String, month: u32, year: i32 },
    ByDate(NaiveDate),
}

/// Deux requêtes de même clé se remplacent : seule la plus récente peut écrire l'état.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum RequestKey {
    Upcoming,
    Monthly { month: u32, year: i32 },
    ByDate,
}

impl RequestKey {
    /// Clés dont le résultat appartient à un employé précis.
    fn is_staff_scoped(self) -> bool {
        !matches!(self, RequestKey::ByDate)
    }
}

impl Request {
    pub fn staff_id(&self) -> Option<&str> {
        match self {
            Request::Upcoming { staff_id, .. } | Request::Monthly { staff_id, .. } => {
                Some(staff_id.as_str())
            }
            Request::ByDate(_) => None,
        }
    }

    fn key(&self) -> RequestKey {
        match self {
            Request::Upcoming { .. } => RequestKey::Upcoming,
            Request::Monthly { month, year, .. } => RequestKey::Monthly {
                month: *month,
                year: *year,
            },
            Request::ByDate(_) => RequestKey::ByDate,
        }
    }

    fn describe(&self) -> String {
        match self {
            Request::Upcoming { .. } => "Failed to fetch upcoming shifts".to_string(),
            Request::Monthly { month, year, .. } => {
                format!("Failed to fetch shifts for {month}/{year}")
            }
            Request::ByDate(date) => format!("Failed to fetch shifts for {date}"),
        }
    }
}

/// Jeton remis au lancement d'une requête et exigé pour en appliquer le résultat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    request: Request,
    generation: u64,
}

impl RequestTicket {
    pub fn request(&self) -> &Request {
        &self.request
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Fresh,
    /// Une requête plus récente de même nature a été lancée : résultat ignoré.
    Stale,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayView {
    pub day: WeekDay,
    pub shifts: Vec<ClassifiedShift>,
    pub total_hours: f64,
}

impl DayView {
    pub fn has_shifts(&self) -> bool {
        !self.shifts.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeekView {
    pub cursor: WeekCursor,
    pub days: Vec<DayView>,
}

impl WeekView {
    pub fn label(&self) -> WeekLabel {
        self.cursor.label()
    }

    pub fn total_hours(&self) -> f64 {
        time::round_tenth(self.days.iter().map(|d| d.total_hours).sum())
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DayView> {
        self.days.iter().find(|d| d.day.full_date == date)
    }
}

pub struct RosterService<A: RosterApi> {
    api: A,
    config: ServiceConfig,
    generations: HashMap<RequestKey, u64>,
    in_flight: HashSet<RequestKey>,
    /// Employé auquel appartiennent `upcoming` et `monthly`.
    staff_id: Option<String>,
    upcoming: Option<UpcomingShiftsResponse>,
    monthly: ShiftsByDate,
    day_shifts: Vec<Shift>,
    day_date: Option<NaiveDate>,
    error: Option<String>,
    last_failed: Option<Request>,
}

impl<A: RosterApi> RosterService<A> {
    pub fn new(api: A) -> Self {
        Self::with_config(api, ServiceConfig::default())
    }

    pub fn with_config(api: A, config: ServiceConfig) -> Self {
        Self {
            api,
            config,
            generations: HashMap::new(),
            in_flight: HashSet::new(),
            staff_id: None,
            upcoming: None,
            monthly: ShiftsByDate::new(),
            day_shifts: Vec::new(),
            day_date: None,
            error: None,
            last_failed: None,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }
    pub fn config(&self) -> ServiceConfig {
        self.config
    }
    pub fn staff_id(&self) -> Option<&str> {
        self.staff_id.as_deref()
    }
    pub fn upcoming(&self) -> Option<&UpcomingShiftsResponse> {
        self.upcoming.as_ref()
    }
    pub fn monthly(&self) -> &ShiftsByDate {
        &self.monthly
    }
    /// Résultat du dernier `fetch_shifts_for_date` (vue manager).
    pub fn day_shifts(&self) -> &[Shift] {
        &self.day_shifts
    }
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
    pub fn clear_error(&mut self) {
        self.error = None;
    }
    pub fn is_loading(&self) -> bool {
        !self.in_flight.is_empty()
    }
    pub fn last_failed(&self) -> Option<&Request> {
        self.last_failed.as_ref()
    }

    /// Enregistre le lancement d'une requête ; toute requête antérieure de même clé
    /// devient obsolète. Une requête pour un autre employé vide d'abord l'état du précédent.
    pub fn begin(&mut self, request: Request) -> RequestTicket {
        if let Some(staff_id) = request.staff_id() {
            self.scope_to(staff_id);
        }
        let key = request.key();
        let generation = self.generations.entry(key).or_insert(0);
        *generation += 1;
        self.in_flight.insert(key);
        RequestTicket {
            generation: *generation,
            request,
        }
    }

    /// Passage à un autre employé : rien de l'ancien ne doit survivre ni arriver en retard.
    fn scope_to(&mut self, staff_id: &str) {
        if self.staff_id.as_deref() == Some(staff_id) {
            return;
        }
        log_event!(debug, staff_id, "roster scope switched");
        self.staff_id = Some(staff_id.to_string());
        self.upcoming = None;
        self.monthly = ShiftsByDate::new();
        for (key, generation) in self.generations.iter_mut() {
            if key.is_staff_scoped() {
                *generation += 1;
            }
        }
        self.in_flight.retain(|key| !key.is_staff_scoped());
        if self.last_failed.as_ref().is_some_and(|r| r.staff_id().is_some()) {
            self.last_failed = None;
            self.error = None;
        }
    }

    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        self.generations.get(&ticket.request.key()) == Some(&ticket.generation)
    }

    /// Commun à tous les `apply_*` : filtre l'obsolète, tient à jour erreur et rejeu.
    fn settle<T>(
        &mut self,
        ticket: &RequestTicket,
        result: Result<T, ApiError>,
    ) -> Result<Option<T>, ApiError> {
        if !self.is_current(ticket) {
            log_event!(debug, request = ?ticket.request, "dropping stale roster response");
            return Ok(None);
        }
        self.in_flight.remove(&ticket.request.key());
        match result {
            Ok(value) => {
                if self.last_failed.as_ref() == Some(&ticket.request) {
                    self.last_failed = None;
                    self.error = None;
                }
                Ok(Some(value))
            }
            Err(err) => {
                log_event!(warn, request = ?ticket.request, error = %err, "roster request failed");
                self.error = Some(format!("{}: {err}", ticket.request.describe()));
                self.last_failed = Some(ticket.request.clone());
                Err(err)
            }
        }
    }

    pub fn apply_upcoming(
        &mut self,
        ticket: &RequestTicket,
        result: Result<UpcomingShiftsResponse, ApiError>,
    ) -> Result<Applied, ApiError> {
        match self.settle(ticket, result)? {
            Some(resp) => {
                log_event!(debug, shifts = resp.shifts.len(), "upcoming shifts loaded");
                self.upcoming = Some(resp);
                Ok(Applied::Fresh)
            }
            None => Ok(Applied::Stale),
        }
    }

    pub fn apply_monthly(
        &mut self,
        ticket: &RequestTicket,
        result: Result<MonthlyShiftsResponse, ApiError>,
    ) -> Result<Applied, ApiError> {
        let (month, year) = match &ticket.request {
            Request::Monthly { month, year, .. } => (*month, *year),
            _ => {
                return Err(ApiError::BadRequest(
                    "ticket does not belong to a monthly request".to_string(),
                ))
            }
        };
        match self.settle(ticket, result)? {
            Some(resp) => {
                let (first, last) = week::month_bounds(year, month)?;
                self.monthly
                    .replace_range(first, last, ShiftsByDate::from_shifts(resp.shifts));
                Ok(Applied::Fresh)
            }
            None => Ok(Applied::Stale),
        }
    }

    pub fn apply_by_date(
        &mut self,
        ticket: &RequestTicket,
        result: Result<Vec<Shift>, ApiError>,
    ) -> Result<Applied, ApiError> {
        let date = match &ticket.request {
            Request::ByDate(date) => Some(*date),
            _ => None,
        };
        match self.settle(ticket, result)? {
            Some(shifts) => {
                self.day_shifts = shifts;
                self.day_date = date;
                Ok(Applied::Fresh)
            }
            None => Ok(Applied::Stale),
        }
    }

    pub fn fetch_upcoming(&mut self, staff_id: &str, days: u32) -> Result<Applied, ApiError> {
        let ticket = self.begin(Request::Upcoming {
            staff_id: staff_id.to_string(),
            days,
        });
        let result = self.api.upcoming_shifts(staff_id, days);
        self.apply_upcoming(&ticket, result)
    }

    pub fn fetch_monthly(
        &mut self,
        staff_id: &str,
        month: u32,
        year: i32,
    ) -> Result<Applied, ApiError> {
        let ticket = self.begin(Request::Monthly {
            staff_id: staff_id.to_string(),
            month,
            year,
        });
        let result = self.api.monthly_shifts(staff_id, month, year);
        self.apply_monthly(&ticket, result)
    }

    pub fn fetch_shifts_for_date(&mut self, date: NaiveDate) -> Result<Applied, ApiError> {
        let ticket = self.begin(Request::ByDate(date));
        let result = self.api.shifts_by_date(date);
        self.apply_by_date(&ticket, result)
    }

    /// « Réessayer » : relance la dernière requête en échec, sans délai ni quota.
    pub fn retry(&mut self) -> Result<Option<Applied>, ApiError> {
        let Some(request) = self.last_failed.clone() else {
            return Ok(None);
        };
        let applied = match request {
            Request::Upcoming { staff_id, days } => self.fetch_upcoming(&staff_id, days)?,
            Request::Monthly {
                staff_id,
                month,
                year,
            } => self.fetch_monthly(&staff_id, month, year)?,
            Request::ByDate(date) => self.fetch_shifts_for_date(date)?,
        };
        Ok(Some(applied))
    }

    /// Premier chargement de la vue personnelle : à venir + mois courant.
    pub fn load_initial(&mut self, staff_id: &str, today: NaiveDate) -> Result<(), ApiError> {
        let months = week::months_spanned(week::week_start(today)?)?;
        let upcoming = self.fetch_upcoming(staff_id, self.config.upcoming_days);
        for (year, month) in months {
            if let Err(_err) = self.fetch_monthly(staff_id, month, year) {
                log_event!(warn, month, year, error = %_err, "monthly shifts unavailable");
            }
        }
        upcoming.map(|_| ())
    }

    /// Charge les données d'une semaine : la fenêtre « à venir » si la semaine n'est pas
    /// entièrement passée, puis chaque mois couvert. Un mois en échec est ignoré.
    pub fn load_week(
        &mut self,
        staff_id: &str,
        reference: NaiveDate,
        today: NaiveDate,
    ) -> Result<(), ApiError> {
        let monday = week::week_start(reference)?;
        let sunday = week::week_end(monday)?;

        let mut upcoming = Ok(Applied::Fresh);
        if sunday >= today {
            upcoming = self.fetch_upcoming(staff_id, self.config.extended_days);
        }

        for (year, month) in week::months_spanned(monday)? {
            if let Err(_err) = self.fetch_monthly(staff_id, month, year) {
                log_event!(warn, month, year, error = %_err, "monthly shifts unavailable");
            }
        }
        upcoming.map(|_| ())
    }

    /// Vue manager d'un employé : fenêtre courte, sans données mensuelles.
    pub fn load_staff_schedule(&mut self, staff_id: &str) -> Result<(), ApiError> {
        self.fetch_upcoming(staff_id, self.config.manager_days).map(|_| ())
    }

    /// Fusion des deux sources : « à venir » prioritaire, mensuel en complément.
    pub fn combined(&self) -> ShiftsByDate {
        match &self.upcoming {
            Some(resp) => merge_shift_sources(&resp.shifts_by_date, &self.monthly),
            None => self.monthly.clone(),
        }
    }

    pub fn formatted_upcoming(&self) -> Vec<DaySummary> {
        self.upcoming
            .as_ref()
            .map(|resp| resp.shifts_by_date.day_summaries())
            .unwrap_or_default()
    }

    pub fn upcoming_count(&self) -> usize {
        self.upcoming.as_ref().map_or(0, |resp| resp.shifts.len())
    }

    pub fn hours_this_week(&self, today: NaiveDate) -> Result<f64, TimeError> {
        let monday = week::week_start(today)?;
        Ok(self
            .combined()
            .total_hours_between(monday, week::week_end(monday)?))
    }

    pub fn week_view(
        &self,
        reference: NaiveDate,
        today: NaiveDate,
        now: NaiveDateTime,
    ) -> Result<WeekView, TimeError> {
        let index = self.combined();
        let days = week::generate_week_dates(reference, today)?
            .into_iter()
            .map(|day| day_view(&index, day, now))
            .collect();
        Ok(WeekView {
            cursor: WeekCursor::containing(reference, today)?,
            days,
        })
    }

    pub fn add_shift(&mut self, draft: &ShiftDraft) -> Result<ShiftCreated, ApiError> {
        let created = self.api.create_shift(draft)?;
        let shift = created.shift();
        if self.day_date == Some(shift.date) {
            self.day_shifts.push(shift);
        }
        Ok(created)
    }

    pub fn update_shift(&mut self, id: &ShiftId, update: &ShiftUpdate) -> Result<(), ApiError> {
        let updated = self.api.update_shift(id, update)?;
        let employee = updated.updated_data.employee.clone();
        let fresh = updated.updated_data.into_shift(id.clone(), employee);
        if let Some(slot) = self.day_shifts.iter_mut().find(|s| &s.id == id) {
            *slot = fresh;
        } else if self.day_date == Some(fresh.date) {
            self.day_shifts.push(fresh);
        }
        let day_date = self.day_date;
        self.day_shifts.retain(|s| Some(s.date) == day_date);
        Ok(())
    }

    pub fn delete_shift(&mut self, id: &ShiftId) -> Result<(), ApiError> {
        self.api.delete_shift(id)?;
        self.day_shifts.retain(|s| &s.id != id);
        Ok(())
    }
}

pub fn day_view(index: &ShiftsByDate, day: WeekDay, now: NaiveDateTime) -> DayView {
    let shifts: Vec<ClassifiedShift> = index
        .shifts_on(day.full_date)
        .iter()
        .cloned()
        .map(|shift| ClassifiedShift::new(shift, now))
        .collect();
    let total_hours = time::round_tenth(shifts.iter().map(|c| c.shift.duration_hours()).sum());
    DayView {
        day,
        shifts,
        total_hours,
    }
}
