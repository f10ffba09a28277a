//! Multi-week program bootstrap executor.

use std::sync::Arc;

use async_trait::async_trait;
use chrono_tz::Tz;

use stride_domain::calendar::{normalize, Clock};
use stride_domain::tool::{ToolCall, ToolCallResult};
use stride_domain::value::DynamicValue;
use stride_domain::Result;

use crate::coaching::schedule::{ScheduleStore, Workout};
use crate::handler::CapabilityHandler;

/// Capability name served by [`ProgramHandler`].
pub const PROGRAM_CAPABILITY: &str = "start_program";

const DEFAULT_WEEKS: usize = 4;
const MAX_WEEKS: usize = 52;

/// Seeds the schedule with one anchor workout per week.
pub struct ProgramHandler {
    store: Arc<ScheduleStore>,
    clock: Arc<dyn Clock>,
    tz: Tz,
}

impl ProgramHandler {
    pub fn new(store: Arc<ScheduleStore>, clock: Arc<dyn Clock>, tz: Tz) -> Self {
        Self { store, clock, tz }
    }
}

#[async_trait]
impl CapabilityHandler for ProgramHandler {
    async fn execute(&self, call: &ToolCall) -> Result<ToolCallResult> {
        let focus = call.param_str("focus").unwrap_or("general fitness");
        let weeks = call
            .param("weeks")
            .and_then(DynamicValue::as_f64)
            .map(|w| (w as usize).clamp(1, MAX_WEEKS))
            .unwrap_or(DEFAULT_WEEKS);
        let start = normalize(
            call.param_str("date").unwrap_or("today"),
            self.clock.now(),
            self.tz,
        );

        let mut day = start;
        for week in 1..=weeks {
            self.store.plan(
                day,
                Workout {
                    title: format!("{focus} week {week}"),
                    details: DynamicValue::Null,
                },
            );
            for _ in 0..7 {
                day = day.next();
            }
        }

        Ok(ToolCallResult::success(
            &call.name,
            format!("started {weeks}-week {focus} program from {start}"),
        ))
    }
}
