//! Executors for the day-to-day training schedule.

use std::sync::Arc;

use async_trait::async_trait;
use chrono_tz::Tz;

use stride_domain::calendar::{normalize, Clock, DayKey};
use stride_domain::tool::{ToolCall, ToolCallResult};
use stride_domain::value::DynamicValue;
use stride_domain::Result;
use stride_protocol::params::JSON_PAYLOAD_KEY;

use crate::coaching::schedule::{ScheduleStore, Workout};
use crate::handler::CapabilityHandler;

/// Capability names served by [`TrainingHandler`].
pub const TRAINING_CAPABILITIES: &[&str] =
    &["get_training_status", "plan_workout", "remove_workout"];

/// Schedule read/write capabilities, one handler for all three names.
///
/// Date parameters are normalized against the injected clock and the
/// athlete's timezone, so "today", "tomorrow", and explicit dates all land
/// on canonical day keys.
pub struct TrainingHandler {
    store: Arc<ScheduleStore>,
    clock: Arc<dyn Clock>,
    tz: Tz,
}

impl TrainingHandler {
    pub fn new(store: Arc<ScheduleStore>, clock: Arc<dyn Clock>, tz: Tz) -> Self {
        Self { store, clock, tz }
    }

    fn day_for(&self, call: &ToolCall) -> DayKey {
        let token = call.param_str("date").unwrap_or("today");
        normalize(token, self.clock.now(), self.tz)
    }

    fn status(&self, call: &ToolCall) -> ToolCallResult {
        let day = self.day_for(call);
        let workouts = self.store.on_day(day);
        if workouts.is_empty() {
            return ToolCallResult::success(&call.name, format!("no workouts planned for {day}"));
        }
        let titles: Vec<&str> = workouts.iter().map(|w| w.title.as_str()).collect();
        ToolCallResult::success(
            &call.name,
            format!("{} planned for {day}: {}", workouts.len(), titles.join(", ")),
        )
    }

    fn plan(&self, call: &ToolCall) -> ToolCallResult {
        if let Some(failure) = call
            .decode_failures
            .iter()
            .find(|f| f.key == JSON_PAYLOAD_KEY)
        {
            return ToolCallResult::failure(
                &call.name,
                format!("{JSON_PAYLOAD_KEY} did not parse: {}", failure.reason),
            );
        }
        let Some(details) = call.param(JSON_PAYLOAD_KEY) else {
            return ToolCallResult::failure(&call.name, format!("missing {JSON_PAYLOAD_KEY}"));
        };

        let day = self.day_for(call);
        let title = details
            .as_object()
            .and_then(|details| details.get("title"))
            .and_then(DynamicValue::as_str)
            .unwrap_or("Workout")
            .to_string();
        self.store.plan(
            day,
            Workout {
                title: title.clone(),
                details: details.clone(),
            },
        );
        ToolCallResult::success(&call.name, format!("planned {title} for {day}"))
    }

    fn remove(&self, call: &ToolCall) -> ToolCallResult {
        let day = self.day_for(call);
        let removed = self.store.clear_day(day);
        ToolCallResult::success(&call.name, format!("removed {removed} workout(s) on {day}"))
    }
}

#[async_trait]
impl CapabilityHandler for TrainingHandler {
    async fn execute(&self, call: &ToolCall) -> Result<ToolCallResult> {
        Ok(match call.name.as_str() {
            "get_training_status" => self.status(call),
            "plan_workout" => self.plan(call),
            "remove_workout" => self.remove(call),
            other => ToolCallResult::failure(other, "unknown tool"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use stride_domain::calendar::parse_tz;
    use stride_domain::value::ParamFailure;
    use stride_protocol::detect;

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    /// 03:30 UTC on Mar 16 = 23:30 on Mar 15 in New York.
    fn handler() -> (TrainingHandler, Arc<ScheduleStore>) {
        let store = Arc::new(ScheduleStore::new());
        let clock = Arc::new(FixedClock(
            Utc.with_ymd_and_hms(2025, 3, 16, 3, 30, 0).unwrap(),
        ));
        let handler = TrainingHandler::new(
            Arc::clone(&store),
            clock,
            parse_tz("America/New_York"),
        );
        (handler, store)
    }

    fn call_from(marker: &str) -> ToolCall {
        let mut calls = detect(marker);
        assert_eq!(calls.len(), 1, "marker must parse: {marker:?}");
        calls.remove(0)
    }

    #[tokio::test]
    async fn plan_today_then_query_by_explicit_date() {
        let (handler, store) = handler();
        let plan = call_from(
            r#"[TOOL_CALL: plan_workout(date: "today", workout_json: "{\"title\":\"Row\"}")]"#,
        );
        let result = handler.execute(&plan).await.unwrap();
        assert!(result.succeeded);
        assert_eq!(result.payload, "planned Row for 2025-03-15");

        // The local day in New York, not the UTC day.
        let status = call_from("[TOOL_CALL: get_training_status(date: 2025-03-15)]");
        let result = handler.execute(&status).await.unwrap();
        assert!(result.payload.contains("Row"));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn status_defaults_to_today() {
        let (handler, _store) = handler();
        let status = call_from("[TOOL_CALL: get_training_status]");
        let result = handler.execute(&status).await.unwrap();
        assert!(result.succeeded);
        assert_eq!(result.payload, "no workouts planned for 2025-03-15");
    }

    #[tokio::test]
    async fn plan_without_payload_fails() {
        let (handler, store) = handler();
        let plan = call_from(r#"[TOOL_CALL: plan_workout(date: "today")]"#);
        let result = handler.execute(&plan).await.unwrap();
        assert!(!result.succeeded);
        assert!(result.failure_reason.as_deref().unwrap().contains("workout_json"));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn plan_reports_payload_decode_failure() {
        let (handler, store) = handler();
        let mut plan = call_from(r#"[TOOL_CALL: plan_workout(date: "today")]"#);
        plan.decode_failures.push(ParamFailure {
            key: JSON_PAYLOAD_KEY.to_string(),
            reason: "key must be a string at line 1 column 2".to_string(),
        });
        let result = handler.execute(&plan).await.unwrap();
        assert!(!result.succeeded);
        assert!(result.failure_reason.as_deref().unwrap().contains("did not parse"));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn tomorrow_lands_on_the_next_local_day() {
        let (handler, store) = handler();
        let plan = call_from(
            r#"[TOOL_CALL: plan_workout(date: "tomorrow", workout_json: {"title": "Bike"})]"#,
        );
        assert!(handler.execute(&plan).await.unwrap().succeeded);
        let day: DayKey = "2025-03-16".parse().unwrap();
        assert_eq!(store.on_day(day).len(), 1);
    }

    #[tokio::test]
    async fn remove_reports_count() {
        let (handler, _store) = handler();
        let plan = call_from(
            r#"[TOOL_CALL: plan_workout(date: "today", workout_json: {"title": "Row"})]"#,
        );
        handler.execute(&plan).await.unwrap();

        let remove = call_from(r#"[TOOL_CALL: remove_workout(date: "today")]"#);
        let result = handler.execute(&remove).await.unwrap();
        assert!(result.succeeded);
        assert_eq!(result.payload, "removed 1 workout(s) on 2025-03-15");
    }
}
