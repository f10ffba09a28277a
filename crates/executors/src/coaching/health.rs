//! Read-side health metrics executor.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono_tz::Tz;
use parking_lot::RwLock;

use stride_domain::calendar::{normalize, Clock, DayKey};
use stride_domain::tool::{ToolCall, ToolCallResult};
use stride_domain::value::DynamicValue;
use stride_domain::Result;

use crate::handler::CapabilityHandler;

/// Capability name served by [`HealthHandler`].
pub const HEALTH_CAPABILITY: &str = "get_health_data";

/// Per-day health metrics, keyed like the schedule.
pub trait HealthDataSource: Send + Sync {
    fn metrics_for(&self, day: DayKey) -> Option<DynamicValue>;
}

/// Metrics store backed by a plain map; the seam tests and the default
/// wiring share it.
#[derive(Default)]
pub struct InMemoryHealthSource {
    days: RwLock<HashMap<DayKey, DynamicValue>>,
}

impl InMemoryHealthSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, day: DayKey, metrics: DynamicValue) {
        self.days.write().insert(day, metrics);
    }
}

impl HealthDataSource for InMemoryHealthSource {
    fn metrics_for(&self, day: DayKey) -> Option<DynamicValue> {
        self.days.read().get(&day).cloned()
    }
}

pub struct HealthHandler {
    source: Arc<dyn HealthDataSource>,
    clock: Arc<dyn Clock>,
    tz: Tz,
}

impl HealthHandler {
    pub fn new(source: Arc<dyn HealthDataSource>, clock: Arc<dyn Clock>, tz: Tz) -> Self {
        Self { source, clock, tz }
    }
}

#[async_trait]
impl CapabilityHandler for HealthHandler {
    async fn execute(&self, call: &ToolCall) -> Result<ToolCallResult> {
        let token = call.param_str("date").unwrap_or("today");
        let day = normalize(token, self.clock.now(), self.tz);
        Ok(match self.source.metrics_for(day) {
            Some(metrics) => {
                ToolCallResult::success(&call.name, format!("health data for {day}: {metrics}"))
            }
            None => {
                ToolCallResult::success(&call.name, format!("no health data recorded for {day}"))
            }
        })
    }
}
