//! In-memory workout schedule shared by the coaching executors.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use stride_domain::calendar::DayKey;
use stride_domain::value::DynamicValue;

/// One planned workout on a calendar day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workout {
    pub title: String,
    /// Structured details as authored by the model, passed through verbatim.
    pub details: DynamicValue,
}

/// Day-keyed schedule. All entries live under canonical [`DayKey`]s, so a
/// workout planned as "today" and queried by its explicit date agree.
#[derive(Default)]
pub struct ScheduleStore {
    days: RwLock<HashMap<DayKey, Vec<Workout>>>,
}

impl ScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plan(&self, day: DayKey, workout: Workout) {
        self.days.write().entry(day).or_default().push(workout);
    }

    /// Drop every workout on `day`; returns how many were removed.
    pub fn clear_day(&self, day: DayKey) -> usize {
        self.days.write().remove(&day).map(|w| w.len()).unwrap_or(0)
    }

    pub fn on_day(&self, day: DayKey) -> Vec<Workout> {
        self.days.read().get(&day).cloned().unwrap_or_default()
    }

    /// Total workouts across all days.
    pub fn len(&self) -> usize {
        self.days.read().values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
