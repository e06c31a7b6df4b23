use axum::{extract::State, Json};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::shared::{AppError, AppState};

/// The next club event, configured via NEXT_EVENT_DATE (YYYY-MM-DD).
#[derive(Clone)]
pub struct EventSchedule {
    event_date: NaiveDate,
}

impl EventSchedule {
    pub fn from_env() -> Self {
        let event_date = std::env::var("NEXT_EVENT_DATE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(|| NaiveDate::from_ymd_opt(2026, 2, 16).unwrap());
        Self { event_date }
    }

    pub fn new(event_date: NaiveDate) -> Self {
        Self { event_date }
    }

    /// Whole days from `today` to the event; negative once it has passed.
    pub fn days_until(&self, today: NaiveDate) -> i64 {
        (self.event_date - today).num_days()
    }

    pub fn event_date(&self) -> NaiveDate {
        self.event_date
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScheduleResponse {
    pub event_date: NaiveDate,
    pub days_remaining: i64,
}

/// HTTP handler for the next-event countdown
///
/// GET /schedule
#[instrument(name = "get_schedule", skip(state))]
pub async fn get_schedule(
    State(state): State<AppState>,
) -> Result<Json<ScheduleResponse>, AppError> {
    let today = chrono::Local::now().date_naive();
    Ok(Json(ScheduleResponse {
        event_date: state.schedule.event_date(),
        days_remaining: state.schedule.days_until(today),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn counts_down_to_the_event() {
        let schedule = EventSchedule::new(date(2026, 2, 16));
        assert_eq!(schedule.days_until(date(2026, 2, 1)), 15);
        assert_eq!(schedule.days_until(date(2026, 2, 16)), 0);
    }

    #[test]
    fn goes_negative_after_the_event() {
        let schedule = EventSchedule::new(date(2026, 2, 16));
        assert_eq!(schedule.days_until(date(2026, 2, 20)), -4);
    }
}
