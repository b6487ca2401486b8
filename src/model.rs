use crate::time;
use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Identifiant fort pour Shift (attribué par le backend)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShiftId(String);

impl ShiftId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Référence vers un membre du personnel, telle qu'embarquée dans chaque shift.
/// Côté fil, c'est toujours un objet `{ uid, username, profilePicture }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRef {
    pub uid: String,
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
}

impl EmployeeRef {
    pub fn new<U: Into<String>, N: Into<String>>(uid: U, username: N) -> Self {
        Self {
            uid: uid.into(),
            username: username.into(),
            profile_picture: None,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShiftError {
    #[error("validation failed: {}", .0.join(", "))]
    Invalid(Vec<String>),
}

/// Créneau de travail d'un employé sur une journée (heures locales).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub id: ShiftId,
    #[serde(rename = "employeeId")]
    pub employee: EmployeeRef,
    #[serde(with = "wire_fmt::date")]
    pub date: NaiveDate,
    #[serde(with = "wire_fmt::hour")]
    pub start_time: NaiveTime,
    #[serde(with = "wire_fmt::hour")]
    pub end_time: NaiveTime,
    #[serde(
        default,
        alias = "notes",
        deserialize_with = "wire_fmt::note",
        skip_serializing_if = "Option::is_none"
    )]
    pub shift_note: Option<String>,
}

impl Shift {
    pub fn new(
        employee: EmployeeRef,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Self {
        Self {
            id: ShiftId::random(),
            employee,
            date,
            start_time,
            end_time,
            shift_note: None,
        }
    }

    pub fn employee_uid(&self) -> &str {
        &self.employee.uid
    }

    /// Fin au lendemain (`end_time <= start_time`).
    pub fn is_overnight(&self) -> bool {
        self.end_time <= self.start_time
    }

    /// Bornes locales du créneau ; un shift de nuit se termine le lendemain.
    pub fn window(&self) -> (NaiveDateTime, NaiveDateTime) {
        let start = self.date.and_time(self.start_time);
        let mut end = self.date.and_time(self.end_time);
        if self.is_overnight() {
            end = end.checked_add_days(Days::new(1)).unwrap_or(NaiveDateTime::MAX);
        }
        (start, end)
    }

    pub fn duration_hours(&self) -> f64 {
        time::hours_between(self.start_time, self.end_time)
    }
}

/// Charge utile de création (`POST /rosters`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftDraft {
    #[serde(rename = "employeeId")]
    pub employee: EmployeeRef,
    #[serde(with = "wire_fmt::date")]
    pub date: NaiveDate,
    #[serde(with = "wire_fmt::hour")]
    pub start_time: NaiveTime,
    #[serde(with = "wire_fmt::hour")]
    pub end_time: NaiveTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift_note: Option<String>,
}

impl ShiftDraft {
    pub fn new<U: Into<String>>(
        employee_uid: U,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Self {
        Self {
            employee: EmployeeRef::new(employee_uid, ""),
            date,
            start_time,
            end_time,
            shift_note: None,
        }
    }

    /// Collecte toutes les erreurs plutôt que de s'arrêter à la première.
    pub fn validate(&self) -> Result<(), ShiftError> {
        let mut errors = Vec::new();
        if self.employee.uid.trim().is_empty() {
            errors.push("Employee UID is required in employeeId".to_string());
        }
        if self.start_time == self.end_time {
            errors.push("startTime and endTime cannot be equal".to_string());
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ShiftError::Invalid(errors))
        }
    }

    /// Matérialise le shift avec l'identité complète de l'employé.
    pub fn into_shift(self, id: ShiftId, employee: EmployeeRef) -> Shift {
        Shift {
            id,
            employee,
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            shift_note: self.shift_note.filter(|n| !n.trim().is_empty()),
        }
    }
}

impl From<&Shift> for ShiftDraft {
    fn from(shift: &Shift) -> Self {
        Self {
            employee: shift.employee.clone(),
            date: shift.date,
            start_time: shift.start_time,
            end_time: shift.end_time,
            shift_note: shift.shift_note.clone(),
        }
    }
}

/// Mise à jour partielle (`PUT /rosters/:id`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftUpdate {
    #[serde(
        default,
        with = "wire_fmt::opt_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<NaiveDate>,
    #[serde(
        default,
        with = "wire_fmt::opt_hour",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_time: Option<NaiveTime>,
    #[serde(
        default,
        with = "wire_fmt::opt_hour",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_time: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift_note: Option<String>,
}

impl ShiftUpdate {
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.start_time.is_none()
            && self.end_time.is_none()
            && self.shift_note.is_none()
    }

    /// Applique la mise à jour ; refuse un résultat où début et fin coïncident.
    pub fn apply(&self, shift: &mut Shift) -> Result<(), ShiftError> {
        let start = self.start_time.unwrap_or(shift.start_time);
        let end = self.end_time.unwrap_or(shift.end_time);
        if start == end {
            return Err(ShiftError::Invalid(vec![
                "startTime and endTime cannot be equal".to_string(),
            ]));
        }
        if let Some(date) = self.date {
            shift.date = date;
        }
        shift.start_time = start;
        shift.end_time = end;
        if let Some(note) = &self.shift_note {
            shift.shift_note = Some(note.clone()).filter(|n| !n.trim().is_empty());
        }
        Ok(())
    }
}

/// Collection persistée : employés connus et shifts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    #[serde(default)]
    pub employees: Vec<EmployeeRef>,
    #[serde(default)]
    pub shifts: Vec<Shift>,
}

impl Roster {
    pub fn find_employee<'a>(&'a self, uid: &str) -> Option<&'a EmployeeRef> {
        self.employees.iter().find(|e| e.uid == uid)
    }
    pub fn find_shift<'a>(&'a self, id: &ShiftId) -> Option<&'a Shift> {
        self.shifts.iter().find(|s| &s.id == id)
    }
    pub fn find_shift_mut(&mut self, id: &ShiftId) -> Option<&mut Shift> {
        self.shifts.iter_mut().find(|s| &s.id == id)
    }

    /// Ajoute ou renomme un employé.
    pub fn upsert_employee(&mut self, employee: EmployeeRef) {
        match self.employees.iter_mut().find(|e| e.uid == employee.uid) {
            Some(existing) => *existing = employee,
            None => self.employees.push(employee),
        }
    }
}

mod wire_fmt {
    use serde::{Deserialize, Deserializer};

    pub(super) mod date {
        use crate::time;
        use chrono::NaiveDate;
        use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(d: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
            s.serialize_str(&time::iso_date(*d))
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
            let raw = String::deserialize(d)?;
            time::parse_iso_date(&raw).map_err(D::Error::custom)
        }
    }

    pub(super) mod hour {
        use crate::time;
        use chrono::NaiveTime;
        use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(t: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
            s.serialize_str(&time::format_time_wire(*t))
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
            let raw = String::deserialize(d)?;
            time::parse_time_of_day(&raw).map_err(D::Error::custom)
        }
    }

    pub(super) mod opt_date {
        use crate::time;
        use chrono::NaiveDate;
        use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(d: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
            match d {
                Some(d) => s.serialize_some(&time::iso_date(*d)),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            d: D,
        ) -> Result<Option<NaiveDate>, D::Error> {
            Option::<String>::deserialize(d)?
                .map(|raw| time::parse_iso_date(&raw).map_err(D::Error::custom))
                .transpose()
        }
    }

    pub(super) mod opt_hour {
        use crate::time;
        use chrono::NaiveTime;
        use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(t: &Option<NaiveTime>, s: S) -> Result<S::Ok, S::Error> {
            match t {
                Some(t) => s.serialize_some(&time::format_time_wire(*t)),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            d: D,
        ) -> Result<Option<NaiveTime>, D::Error> {
            Option::<String>::deserialize(d)?
                .map(|raw| time::parse_time_of_day(&raw).map_err(D::Error::custom))
                .transpose()
        }
    }

    /// Le backend envoie `""` par défaut : on le ramène à `None`.
    pub(super) fn note<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        Ok(raw.filter(|n| !n.trim().is_empty()))
    }
}
