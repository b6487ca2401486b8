use crate::model::Shift;
use crate::time;
use chrono::NaiveDate;
use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Index date ISO -> shifts du jour. L'ordre à l'intérieur d'une journée est l'ordre d'arrivée.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ShiftsByDate(BTreeMap<NaiveDate, Vec<Shift>>);

/// Les clés suivent la même règle que les dates de shift : un timestamp est tronqué à sa date,
/// et deux clés tombant le même jour sont regroupées.
impl<'de> Deserialize<'de> for ShiftsByDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, Vec<Shift>>::deserialize(deserializer)?;
        let mut index = Self::new();
        for (key, shifts) in raw {
            let date = time::parse_iso_date(&key).map_err(D::Error::custom)?;
            index.0.entry(date).or_default().extend(shifts);
        }
        Ok(index)
    }
}

impl ShiftsByDate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_shifts<I: IntoIterator<Item = Shift>>(shifts: I) -> Self {
        let mut index = Self::new();
        for shift in shifts {
            index.push(shift);
        }
        index
    }

    pub fn push(&mut self, shift: Shift) {
        self.0.entry(shift.date).or_default().push(shift);
    }

    /// Remplace (ou crée) l'entrée complète d'une journée.
    pub fn insert_day(&mut self, date: NaiveDate, shifts: Vec<Shift>) {
        self.0.insert(date, shifts);
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.0.contains_key(&date)
    }

    pub fn shifts_on(&self, date: NaiveDate) -> &[Shift] {
        self.0.get(&date).map_or(&[], Vec::as_slice)
    }

    pub fn has_shifts(&self, date: NaiveDate) -> bool {
        !self.shifts_on(date).is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &Vec<Shift>)> {
        self.0.iter()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.0.keys().copied()
    }

    pub fn all_shifts(&self) -> impl Iterator<Item = &Shift> {
        self.0.values().flatten()
    }

    /// Nombre de journées présentes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total_shifts(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn for_employee(&self, uid: &str) -> Self {
        Self::from_shifts(
            self.all_shifts()
                .filter(|s| s.employee_uid() == uid)
                .cloned(),
        )
    }

    /// Tri explicite par heure de début (stable) ; la construction ne trie jamais.
    pub fn sort_within_days(&mut self) {
        for shifts in self.0.values_mut() {
            shifts.sort_by_key(|s| s.start_time);
        }
    }

    /// Les journées de `other` remplacent entièrement celles déjà présentes.
    pub fn overlay(&mut self, other: ShiftsByDate) {
        self.0.extend(other.0);
    }

    /// Remplace toutes les journées de `[from, to]` par celles de `other` pour cette plage.
    /// Une journée vidée côté source disparaît donc aussi de l'index.
    pub fn replace_range(&mut self, from: NaiveDate, to: NaiveDate, other: ShiftsByDate) {
        self.0.retain(|date, _| *date < from || *date > to);
        self.0
            .extend(other.0.into_iter().filter(|(date, _)| *date >= from && *date <= to));
    }

    pub fn day_summaries(&self) -> Vec<DaySummary> {
        self.0
            .iter()
            .map(|(date, shifts)| DaySummary {
                date: *date,
                formatted_date: time::format_long_date(*date),
                shifts: shifts.clone(),
                total_hours: time::round_tenth(day_hours(shifts)),
                total_shifts: shifts.len(),
            })
            .collect()
    }

    /// Heures cumulées des journées comprises entre `from` et `to` inclus.
    pub fn total_hours_between(&self, from: NaiveDate, to: NaiveDate) -> f64 {
        if to < from {
            return 0.0;
        }
        let hours = self
            .0
            .range(from..=to)
            .map(|(_, shifts)| day_hours(shifts))
            .sum();
        time::round_tenth(hours)
    }
}

impl FromIterator<Shift> for ShiftsByDate {
    fn from_iter<I: IntoIterator<Item = Shift>>(iter: I) -> Self {
        Self::from_shifts(iter)
    }
}

/// Résumé d'une journée pour la vue liste.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub date: NaiveDate,
    pub formatted_date: String,
    pub shifts: Vec<Shift>,
    pub total_hours: f64,
    pub total_shifts: usize,
}

pub fn day_hours(shifts: &[Shift]) -> f64 {
    shifts.iter().map(Shift::duration_hours).sum()
}

/// Regroupement en une passe, par date.
pub fn build_shifts_by_date(shifts: &[Shift]) -> ShiftsByDate {
    shifts.iter().cloned().collect()
}

/// Fusion de deux sources : une date déjà présente dans `primary` l'emporte,
/// `secondary` ne fait que compléter les dates manquantes.
pub fn merge_shift_sources(primary: &ShiftsByDate, secondary: &ShiftsByDate) -> ShiftsByDate {
    let mut merged = primary.clone();
    for (date, shifts) in secondary.iter() {
        if !merged.contains_date(*date) {
            merged.insert_day(*date, shifts.clone());
        }
    }
    merged
}
