//! Reference coaching capabilities.
//!
//! The concrete capability set the conversation layer ships with: schedule
//! read/write, health metrics, and program setup. They also serve as the
//! canonical examples of writing an executor against the registry.

pub mod health;
pub mod program;
pub mod schedule;
pub mod training;

use std::sync::Arc;

use chrono_tz::Tz;

use stride_domain::calendar::Clock;

use crate::registry::ExecutorRegistry;

pub use health::{HealthDataSource, HealthHandler, InMemoryHealthSource, HEALTH_CAPABILITY};
pub use program::{ProgramHandler, PROGRAM_CAPABILITY};
pub use schedule::{ScheduleStore, Workout};
pub use training::{TrainingHandler, TRAINING_CAPABILITIES};

/// Register the full coaching set against `registry`.
pub fn install(
    registry: &ExecutorRegistry,
    store: Arc<ScheduleStore>,
    health: Arc<dyn HealthDataSource>,
    clock: Arc<dyn Clock>,
    tz: Tz,
) {
    registry.register(
        TRAINING_CAPABILITIES,
        Arc::new(TrainingHandler::new(
            Arc::clone(&store),
            Arc::clone(&clock),
            tz,
        )),
    );
    registry.register(
        &[HEALTH_CAPABILITY],
        Arc::new(HealthHandler::new(health, Arc::clone(&clock), tz)),
    );
    registry.register(
        &[PROGRAM_CAPABILITY],
        Arc::new(ProgramHandler::new(store, clock, tz)),
    );
}
